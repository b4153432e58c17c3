//! Command-line front-end: renders a QR code with an optional logo to PNG.
//!
//! ```text
//! qrlogo --text https://example.com --logo logo.png --logo-size 25 --out ./out
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use qrlogo_renderer::{
    CANVAS_SIZE_CHOICES, Configurable, EXPORT_FILENAME, Error, ExportSink, ExportedFile, FileSink,
    InputEvent, PNG_MIME, QrCodeProvider, QrSession, SelectedFile, SessionProfile, encode_png,
};

#[derive(Debug, Parser)]
#[command(name = "qrlogo", version, about = "Render a QR code with a centred logo")]
struct Args {
    /// Text or URL to encode. Overrides the profile's text.
    #[arg(short, long)]
    text: Option<String>,

    /// PNG logo to place in the centre.
    #[arg(short, long)]
    logo: Option<PathBuf>,

    /// Requested image size in pixels.
    #[arg(short, long)]
    size: Option<u32>,

    /// Logo size as a percentage of the image side.
    #[arg(long)]
    logo_size: Option<f32>,

    /// Quiet zone in modules.
    #[arg(long)]
    margin: Option<u32>,

    /// JSON profile with default settings.
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Directory the PNG is written to.
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Write the preview render, resize border included.
    #[arg(long)]
    preview: bool,

    /// Print the settings used as JSON.
    #[arg(long)]
    print_profile: bool,
}

/// Writes the current preview surface to the sink as is.
fn write_preview(
    session: &mut QrSession<QrCodeProvider, FileSink>,
) -> qrlogo_renderer::Result<ExportedFile> {
    let surface = session.surface().ok_or(Error::NothingToExport)?;
    let file = ExportedFile {
        filename: EXPORT_FILENAME.to_string(),
        bytes: encode_png(&surface.image)?,
    };
    session.sink_mut().deliver(&file)?;
    log::info!("wrote preview {}", file.filename);
    Ok(file)
}

fn run(args: Args) -> qrlogo_renderer::Result<()> {
    let mut profile = match &args.profile {
        Some(path) => SessionProfile::load(path)?,
        None => SessionProfile::new(),
    };
    if let Some(text) = args.text {
        profile.text = text;
    }
    if let Some(size) = args.size {
        if !CANVAS_SIZE_CHOICES.contains(&size) {
            log::warn!("{size} px is not one of the usual sizes {CANVAS_SIZE_CHOICES:?}");
        }
        profile.canvas_size = size;
    }
    if let Some(margin) = args.margin {
        profile.margin = margin;
    }
    if let Some(percent) = args.logo_size {
        profile.logo_size_percent = percent;
    }

    let mut session = QrSession::new(QrCodeProvider, FileSink::new(&args.out));
    session.apply_profile(&profile)?;

    if let Some(path) = &args.logo {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let is_png = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        let mime = if is_png { PNG_MIME } else { "application/octet-stream" };
        let file = SelectedFile::new(name, mime, fs::read(path)?);
        session.dispatch(InputEvent::FileSelected(Some(file)))?;
    }

    session.dispatch(InputEvent::Generate)?;
    let file = if args.preview {
        write_preview(&mut session)?
    } else {
        session.export()?
    };

    if args.print_profile {
        println!("{}", session.export_profile().to_json_pretty()?);
    }
    println!("{}", session.sink().dir().join(&file.filename).display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "qrlogo",
            "--text",
            "https://example.com",
            "--logo-size",
            "25",
            "--preview",
        ])
        .unwrap();
        assert_eq!(args.text.as_deref(), Some("https://example.com"));
        assert_eq!(args.logo_size, Some(25.0));
        assert!(args.preview);
        assert!(!args.print_profile);
        assert_eq!(args.out, PathBuf::from("."));
    }

    #[test]
    fn preview_render_keeps_border() {
        let dir = std::env::temp_dir().join(format!("qrlogo-cli-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let logo = dir.join("logo.png");
        image::RgbaImage::from_pixel(16, 16, image::Rgba([255, 0, 0, 255]))
            .save(&logo)
            .unwrap();

        let out = |preview: bool| {
            let mut args = vec!["qrlogo", "--text", "hi", "--out"];
            args.push(dir.to_str().unwrap());
            args.extend(["--logo", logo.to_str().unwrap()]);
            if preview {
                args.push("--preview");
            }
            run(Args::try_parse_from(args).unwrap()).unwrap();
            fs::read(dir.join(EXPORT_FILENAME)).unwrap()
        };
        let exported = out(false);
        let preview = out(true);
        assert_ne!(exported, preview);

        fs::remove_dir_all(&dir).unwrap();
    }
}
