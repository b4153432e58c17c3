//! qrlogo-renderer: QR codes with a centred, resizable logo
//!
//! This crate renders QR codes onto RGBA surfaces, overlays an optional PNG
//! logo on a rounded card in the middle, lets users resize that logo by
//! dragging, and exports the result as PNG. It is independent of any UI
//! toolkit: hosts forward typed [`InputEvent`]s to a [`QrSession`] and
//! display the surface it produces.
//!
//! # Example
//!
//! ```
//! use qrlogo_renderer::{InputEvent, Point, QrSession, SelectedFile};
//! # let logo_png = {
//! #     let img = image::RgbaImage::from_pixel(32, 32, image::Rgba([255, 0, 0, 255]));
//! #     let mut bytes = Vec::new();
//! #     img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png).unwrap();
//! #     bytes
//! # };
//!
//! let mut session = QrSession::in_memory();
//! session.dispatch(InputEvent::TextChanged("https://example.com".into())).unwrap();
//! session.dispatch(InputEvent::FileSelected(Some(SelectedFile::new(
//!     "logo.png",
//!     "image/png",
//!     logo_png,
//! )))).unwrap();
//! session.dispatch(InputEvent::Generate).unwrap();
//!
//! // Drag the logo upwards to make it bigger.
//! let center = session.surface().unwrap().side() as f32 / 2.0;
//! session.dispatch(InputEvent::PointerDown(Point::new(center, center))).unwrap();
//! session.dispatch(InputEvent::PointerMove(Point::new(center, center - 20.0))).unwrap();
//! session.dispatch(InputEvent::PointerUp).unwrap();
//! assert_eq!(session.config().logo_size_percent, 25.0);
//!
//! let file = session.export().unwrap();
//! assert_eq!(file.filename, "codigo-qr.png");
//! ```
//!
//! # Lower-level pieces
//!
//! [`Compositor`] renders a [`ModuleGrid`] directly, [`ResizeController`]
//! implements the drag gesture, and [`OfflineCacheProxy`] is a cache-first
//! asset proxy for hosting the UI offline.

mod compositor;
mod error;
mod export;
mod geometry;
mod grid;
mod logo;
pub mod offline;
mod profile;
mod resize;
mod session;

pub use compositor::{
    BORDER_DASH, BORDER_WIDTH, CANVAS_SIZE_CHOICES, CARD_RADIUS, Compositor, DEFAULT_CANVAS_SIZE,
    DEFAULT_LOGO_PERCENT, DEFAULT_MARGIN, LOGO_RADIUS, RenderColors, RenderConfig, RenderMode,
    RenderedQr,
};
pub use error::{Error, Result};
pub use export::{EXPORT_FILENAME, ExportSink, ExportedFile, FileSink, MemorySink, encode_png};
pub use geometry::{LOGO_PADDING, LogoPlacement, Point, Rect, SizePx};
pub use grid::{ErrorCorrection, ModuleGrid, ModuleGridProvider, QrCodeProvider};
pub use logo::{LogoAsset, PNG_MIME, SelectedFile, UploadTicket};
pub use offline::OfflineCacheProxy;
pub use profile::{ColorSettings, SerializableErrorCorrection, SessionProfile};
pub use resize::{
    Cursor, DEFAULT_SENSITIVITY, MAX_LOGO_PERCENT, MIN_LOGO_PERCENT, ResizeController,
    ResizeOutcome, canvas_point,
};
pub use session::{
    Configurable, InputEvent, MESSAGE_TIMEOUT, MessageArea, NO_FILE_LABEL, QrSession, RenderState,
};
