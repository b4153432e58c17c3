//! PNG export of rendered surfaces.
//!
//! Encoding is handled by `image`; delivering the bytes (a browser download,
//! a file on disk) is left to an [`ExportSink`].

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::error::{Error, Result};

/// Name given to every exported file.
pub const EXPORT_FILENAME: &str = "codigo-qr.png";

/// An exported file as handed to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Destination for exported files.
pub trait ExportSink {
    fn deliver(&mut self, file: &ExportedFile) -> Result<()>;
}

/// Encodes a surface as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| Error::Export(e.to_string()))?;
    Ok(bytes)
}

// ============================================================================
// Sinks
// ============================================================================

/// Writes exported files into a directory, overwriting earlier exports.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for FileSink {
    fn deliver(&mut self, file: &ExportedFile) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| Error::Export(e.to_string()))?;
        let path = self.dir.join(&file.filename);
        fs::write(&path, &file.bytes).map_err(|e| Error::Export(e.to_string()))?;
        log::info!("wrote {} ({} bytes)", path.display(), file.bytes.len());
        Ok(())
    }
}

/// Keeps exported files in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub files: Vec<ExportedFile>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&ExportedFile> {
        self.files.last()
    }
}

impl ExportSink for MemorySink {
    fn deliver(&mut self, file: &ExportedFile) -> Result<()> {
        self.files.push(file.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn encode_png_has_signature() {
        let img = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]));
        let bytes = encode_png(&img).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 8);
    }

    #[test]
    fn file_sink_writes_into_directory() {
        let dir = std::env::temp_dir().join(format!("qrlogo-export-{}", std::process::id()));
        let mut sink = FileSink::new(&dir);
        let file = ExportedFile {
            filename: EXPORT_FILENAME.into(),
            bytes: vec![1, 2, 3],
        };
        sink.deliver(&file).unwrap();
        assert_eq!(fs::read(dir.join(EXPORT_FILENAME)).unwrap(), vec![1, 2, 3]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn memory_sink_collects() {
        let mut sink = MemorySink::new();
        assert!(sink.last().is_none());
        sink.deliver(&ExportedFile {
            filename: "a.png".into(),
            bytes: vec![],
        })
        .unwrap();
        assert_eq!(sink.last().unwrap().filename, "a.png");
    }
}
