//! Logo uploads: validation, decoding and stale-result tracking.

use image::{ImageFormat, RgbaImage};

use crate::error::{Error, Result};
use crate::geometry::SizePx;

/// The only MIME type accepted for logo uploads.
pub const PNG_MIME: &str = "image/png";

/// A file handed over by the host's file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    /// MIME type as reported by the host, e.g. `image/png`.
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Returns true if the declared MIME type is PNG.
    pub fn is_png(&self) -> bool {
        self.mime_type == PNG_MIME
    }
}

/// A decoded logo image.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoAsset {
    /// The image data in RGBA format.
    pub data: RgbaImage,
}

impl LogoAsset {
    pub fn new(data: RgbaImage) -> Self {
        Self { data }
    }

    /// Decodes PNG bytes into a logo.
    pub fn decode_png(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .map_err(|e| Error::LogoDecode(e.to_string()))?
            .to_rgba8();

        if img.width() == 0 || img.height() == 0 {
            return Err(Error::LogoDecode("image has no pixels".into()));
        }
        Ok(Self::new(img))
    }

    /// Returns the intrinsic pixel dimensions.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }
}

// ============================================================================
// Upload tracking
// ============================================================================

/// Identifies one upload so a late decode result can be recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadTicket(u64);

impl UploadTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Hands out upload tickets and remembers which one is current.
///
/// Every new upload (or removal) supersedes all earlier tickets.
#[derive(Debug, Default)]
pub struct UploadTracker {
    latest: u64,
}

impl UploadTracker {
    /// Starts a new upload, invalidating any in flight.
    pub fn issue(&mut self) -> UploadTicket {
        self.latest = self.latest.wrapping_add(1);
        UploadTicket(self.latest)
    }

    /// Invalidates outstanding tickets without starting a new upload.
    pub fn cancel(&mut self) {
        self.latest = self.latest.wrapping_add(1);
    }

    pub fn is_current(&self, ticket: UploadTicket) -> bool {
        ticket.0 == self.latest
    }
}
