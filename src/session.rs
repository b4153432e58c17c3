//! Session controller: owns all UI state and reacts to typed input events.
//!
//! A host (web front-end, desktop shell, CLI) forwards [`InputEvent`]s to
//! [`QrSession::dispatch`] and reads back the surface, cursor, file label and
//! message to display. Every failure is also recorded in the session's
//! [`MessageArea`], so hosts that only care about display can ignore the
//! returned `Result`.

use std::time::{Duration, Instant};

use crate::compositor::{Compositor, RenderColors, RenderConfig, RenderMode, RenderedQr};
use crate::error::{Error, Result};
use crate::export::{EXPORT_FILENAME, ExportSink, ExportedFile, MemorySink, encode_png};
use crate::geometry::Point;
use crate::grid::{ErrorCorrection, ModuleGrid, ModuleGridProvider, QrCodeProvider};
use crate::logo::{LogoAsset, SelectedFile, UploadTicket, UploadTracker};
use crate::profile::{ColorSettings, SessionProfile};
use crate::resize::{Cursor, ResizeController, ResizeOutcome};

/// How long a message stays visible.
pub const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// File label shown when no logo file is selected.
pub const NO_FILE_LABEL: &str = "Ningún archivo seleccionado";

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be configured from a [`SessionProfile`].
pub trait Configurable {
    /// Applies a profile's settings to this instance.
    fn apply_profile(&mut self, profile: &SessionProfile) -> Result<()>;

    /// Exports the current settings as a profile.
    fn export_profile(&self) -> SessionProfile;
}

// ============================================================================
// Input Events
// ============================================================================

/// A discrete user action forwarded by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    TextChanged(String),
    /// A file was picked, or the selection was cleared (`None`).
    FileSelected(Option<SelectedFile>),
    LogoRemoved,
    /// The logo size slider moved to this percentage.
    SliderMoved(f32),
    CanvasSizeSelected(u32),
    Generate,
    Export,
    /// Pointer pressed, in surface coordinates.
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    PointerLeave,
}

// ============================================================================
// MessageArea
// ============================================================================

/// A single transient message slot that hides itself after a timeout.
#[derive(Debug, Clone)]
pub struct MessageArea {
    current: Option<(String, Instant)>,
    timeout: Duration,
}

impl Default for MessageArea {
    fn default() -> Self {
        Self {
            current: None,
            timeout: MESSAGE_TIMEOUT,
        }
    }
}

impl MessageArea {
    /// Shows `message`, replacing any previous one.
    pub fn show(&mut self, message: impl Into<String>, now: Instant) {
        self.current = Some((message.into(), now));
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Returns the message if it is still visible at `now`.
    pub fn visible_at(&self, now: Instant) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|(_, shown)| now.saturating_duration_since(*shown) < self.timeout)
            .map(|(message, _)| message.as_str())
    }
}

// ============================================================================
// QrSession
// ============================================================================

/// What is kept from the last successful generation so the surface can be
/// redrawn without encoding the text again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderState {
    pub grid: ModuleGrid,
}

/// The state of one QR-with-logo editing session.
///
/// # Example
///
/// ```
/// use qrlogo_renderer::{InputEvent, QrSession};
///
/// let mut session = QrSession::in_memory();
/// session.dispatch(InputEvent::TextChanged("https://example.com".into())).unwrap();
/// session.dispatch(InputEvent::Generate).unwrap();
/// session.dispatch(InputEvent::Export).unwrap();
///
/// assert!(session.is_preview_visible());
/// assert_eq!(session.sink().last().unwrap().filename, "codigo-qr.png");
/// ```
pub struct QrSession<P: ModuleGridProvider, S: ExportSink> {
    provider: P,
    sink: S,
    compositor: Compositor,
    level: ErrorCorrection,

    text: String,
    config: RenderConfig,
    logo: Option<LogoAsset>,
    logo_label: Option<String>,
    uploads: UploadTracker,

    render_state: Option<RenderState>,
    /// The single surface, toggled between preview and export renders.
    surface: Option<RenderedQr>,
    preview_visible: bool,

    resize: ResizeController,
    messages: MessageArea,
}

impl QrSession<QrCodeProvider, MemorySink> {
    /// A session using the `qrcode` crate that keeps exports in memory.
    pub fn in_memory() -> Self {
        Self::new(QrCodeProvider, MemorySink::new())
    }
}

impl<P: ModuleGridProvider, S: ExportSink> QrSession<P, S> {
    pub fn new(provider: P, sink: S) -> Self {
        Self {
            provider,
            sink,
            compositor: Compositor::default(),
            level: ErrorCorrection::High,
            text: String::new(),
            config: RenderConfig::default(),
            logo: None,
            logo_label: None,
            uploads: UploadTracker::default(),
            render_state: None,
            surface: None,
            preview_visible: false,
            resize: ResizeController::new(),
            messages: MessageArea::default(),
        }
    }

    pub fn with_resize_controller(mut self, resize: ResizeController) -> Self {
        self.resize = resize;
        self
    }

    // ---- Accessors ----

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn colors(&self) -> &RenderColors {
        &self.compositor.colors
    }

    pub fn logo(&self) -> Option<&LogoAsset> {
        self.logo.as_ref()
    }

    /// Name of the selected logo file, or [`NO_FILE_LABEL`].
    pub fn logo_label(&self) -> &str {
        self.logo_label.as_deref().unwrap_or(NO_FILE_LABEL)
    }

    pub fn surface(&self) -> Option<&RenderedQr> {
        self.surface.as_ref()
    }

    pub fn render_state(&self) -> Option<&RenderState> {
        self.render_state.as_ref()
    }

    pub fn is_preview_visible(&self) -> bool {
        self.preview_visible
    }

    pub fn cursor(&self) -> Cursor {
        self.resize.cursor()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// The message currently visible, if any.
    pub fn message(&self) -> Option<&str> {
        self.messages.visible_at(Instant::now())
    }

    pub fn message_at(&self, now: Instant) -> Option<&str> {
        self.messages.visible_at(now)
    }

    // ---- Event dispatch ----

    /// Applies one input event.
    pub fn dispatch(&mut self, event: InputEvent) -> Result<()> {
        match event {
            InputEvent::TextChanged(text) => {
                self.text = text;
                Ok(())
            }
            InputEvent::FileSelected(file) => self.select_file(file),
            InputEvent::LogoRemoved => self.select_file(None),
            InputEvent::SliderMoved(percent) => self.set_logo_size(percent),
            InputEvent::CanvasSizeSelected(size) => self.set_canvas_size(size),
            InputEvent::Generate => self.generate(),
            InputEvent::Export => self.export().map(|_| ()),
            InputEvent::PointerDown(point) => {
                self.pointer_down(point);
                Ok(())
            }
            InputEvent::PointerMove(point) => self.pointer_move(point),
            InputEvent::PointerUp => {
                self.resize.pointer_up();
                Ok(())
            }
            InputEvent::PointerLeave => {
                self.resize.pointer_leave();
                Ok(())
            }
        }
    }

    /// Encodes the current text and renders a fresh preview.
    pub fn generate(&mut self) -> Result<()> {
        let result = self.generate_inner();
        self.report(result)
    }

    /// Renders without the border, hands a PNG to the sink, then restores the
    /// preview.
    pub fn export(&mut self) -> Result<ExportedFile> {
        let result = self.export_inner();
        self.report(result)
    }

    /// Handles a file picker change.
    ///
    /// Decoding happens inline; hosts that decode elsewhere can use
    /// [`begin_upload`](Self::begin_upload) and
    /// [`finish_upload`](Self::finish_upload) instead.
    pub fn select_file(&mut self, file: Option<SelectedFile>) -> Result<()> {
        let Some(file) = file else {
            self.uploads.cancel();
            self.logo = None;
            self.logo_label = None;
            let result = self.redraw(RenderMode::Preview);
            return self.report(result);
        };

        let ticket = self.begin_upload(&file)?;
        let decoded = LogoAsset::decode_png(&file.bytes);
        self.finish_upload(ticket, decoded).map(|_| ())
    }

    /// Validates a picked file and starts tracking its upload.
    ///
    /// Non-PNG files are rejected and the selection is cleared; the current
    /// logo is kept.
    pub fn begin_upload(&mut self, file: &SelectedFile) -> Result<UploadTicket> {
        if !file.is_png() {
            log::warn!("rejected logo {:?} with type {}", file.name, file.mime_type);
            self.logo_label = None;
            return self.report(Err(Error::NotPng));
        }
        self.logo_label = Some(file.name.clone());
        Ok(self.uploads.issue())
    }

    /// Applies a decode result for `ticket`.
    ///
    /// Returns `Ok(false)` without touching any state if a newer upload has
    /// started since the ticket was issued.
    pub fn finish_upload(
        &mut self,
        ticket: UploadTicket,
        decoded: Result<LogoAsset>,
    ) -> Result<bool> {
        if !self.uploads.is_current(ticket) {
            log::debug!("dropping stale decode result #{}", ticket.generation());
            return Ok(false);
        }

        let result = match decoded {
            Ok(logo) => {
                log::info!("logo loaded ({}x{})", logo.data.width(), logo.data.height());
                self.logo = Some(logo);
                self.messages.clear();
                self.redraw(RenderMode::Preview).map(|()| true)
            }
            Err(err) => {
                self.logo = None;
                self.redraw(RenderMode::Preview).and(Err(err))
            }
        };
        self.report(result)
    }

    /// Sets the logo size from the slider, clamped to the slider range.
    pub fn set_logo_size(&mut self, percent: f32) -> Result<()> {
        let percent = self.resize.clamp(percent);
        self.config.set_logo_size_percent(percent);
        let result = self.redraw(RenderMode::Preview);
        self.report(result)
    }

    /// Changes the requested surface size, keeping the old one if the new one
    /// cannot be rendered.
    pub fn set_canvas_size(&mut self, canvas_size: u32) -> Result<()> {
        let previous = self.config.canvas_size;
        self.config.canvas_size = canvas_size;
        let result = self.redraw(RenderMode::Preview);
        if result.is_err() {
            self.config.canvas_size = previous;
        }
        self.report(result)
    }

    /// Replaces the render colours and redraws.
    pub fn set_colors(&mut self, colors: RenderColors) -> Result<()> {
        self.compositor.colors = colors;
        let result = self.redraw(RenderMode::Preview);
        self.report(result)
    }

    // ---- Internals ----

    fn generate_inner(&mut self) -> Result<()> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(Error::EmptyText);
        }
        self.messages.clear();

        let grid = self.provider.encode(text, self.level)?;
        let rendered = self.compositor.render(
            &grid,
            &self.config,
            self.logo.as_ref(),
            RenderMode::Preview,
        )?;
        log::info!(
            "generated {}x{} modules at {} px",
            grid.module_count(),
            grid.module_count(),
            rendered.side()
        );

        self.render_state = Some(RenderState { grid });
        self.surface = Some(rendered);
        self.preview_visible = true;
        Ok(())
    }

    fn export_inner(&mut self) -> Result<ExportedFile> {
        if self.render_state.is_none() {
            return Err(Error::NothingToExport);
        }

        let exported = self
            .redraw(RenderMode::Export)
            .and_then(|()| self.encode_and_deliver());
        let restored = self.redraw(RenderMode::Preview);

        let file = exported.map_err(|err| match err {
            Error::Export(_) => err,
            other => Error::Export(other.to_string()),
        })?;
        restored?;
        Ok(file)
    }

    fn encode_and_deliver(&mut self) -> Result<ExportedFile> {
        let surface = self.surface.as_ref().ok_or(Error::NothingToExport)?;
        let file = ExportedFile {
            filename: EXPORT_FILENAME.to_string(),
            bytes: encode_png(&surface.image)?,
        };
        self.sink.deliver(&file)?;
        log::info!("exported {} ({} bytes)", file.filename, file.bytes.len());
        Ok(file)
    }

    /// Re-renders the surface from the retained state. No-op before the first
    /// generation.
    fn redraw(&mut self, mode: RenderMode) -> Result<()> {
        let Some(state) = &self.render_state else {
            return Ok(());
        };
        let rendered = self
            .compositor
            .render(&state.grid, &self.config, self.logo.as_ref(), mode)?;
        self.surface = Some(rendered);
        Ok(())
    }

    fn pointer_down(&mut self, point: Point) {
        let placement = self.surface.as_ref().and_then(|s| s.placement);
        self.resize
            .pointer_down(point, placement.as_ref(), self.config.logo_size_percent);
    }

    fn pointer_move(&mut self, point: Point) -> Result<()> {
        let placement = self.surface.as_ref().and_then(|s| s.placement);
        match self.resize.pointer_move(point, placement.as_ref()) {
            ResizeOutcome::Resized(percent) if percent != self.config.logo_size_percent => {
                self.config.set_logo_size_percent(percent);
                let result = self.redraw(RenderMode::Preview);
                self.report(result)
            }
            _ => Ok(()),
        }
    }

    /// Records an error in the message area before handing it back.
    fn report<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            log::warn!("{err}");
            self.messages.show(err.to_string(), Instant::now());
        }
        result
    }
}

impl<P: ModuleGridProvider, S: ExportSink> Configurable for QrSession<P, S> {
    /// Applies text, sizes, colours and error correction level.
    ///
    /// The logo size is clamped to the slider range. Nothing is changed if the
    /// colours fail to parse or the current surface cannot be redrawn with the
    /// new settings.
    fn apply_profile(&mut self, profile: &SessionProfile) -> Result<()> {
        let colors = match &profile.colors {
            Some(settings) => settings.to_render_colors()?,
            None => RenderColors::default(),
        };

        let previous = (
            self.text.clone(),
            self.level,
            self.config,
            self.compositor.colors,
        );
        self.text = profile.text.clone();
        self.level = profile.error_correction.into();
        self.config.canvas_size = profile.canvas_size;
        self.config.margin = profile.margin;
        self.config
            .set_logo_size_percent(self.resize.clamp(profile.logo_size_percent));
        self.compositor.colors = colors;

        let result = self.redraw(RenderMode::Preview);
        if result.is_err() {
            (self.text, self.level, self.config, self.compositor.colors) = previous;
        }
        self.report(result)
    }

    fn export_profile(&self) -> SessionProfile {
        SessionProfile {
            text: self.text.clone(),
            canvas_size: self.config.canvas_size,
            margin: self.config.margin,
            logo_size_percent: self.config.logo_size_percent,
            colors: Some(ColorSettings::from(&self.compositor.colors)),
            error_correction: self.level.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logo::tests::png_bytes;
    use crate::resize::MAX_LOGO_PERCENT;

    /// Provider returning a fixed all-dark grid.
    struct FixedProvider(usize);

    impl ModuleGridProvider for FixedProvider {
        fn encode(&self, _text: &str, _level: ErrorCorrection) -> Result<ModuleGrid> {
            Ok(ModuleGrid::from_fn(self.0, |_, _| true).unwrap())
        }
    }

    /// Provider that always fails.
    struct FailingProvider;

    impl ModuleGridProvider for FailingProvider {
        fn encode(&self, _text: &str, _level: ErrorCorrection) -> Result<ModuleGrid> {
            Err(Error::Encoding("code length overflow".into()))
        }
    }

    /// Provider that only fails for one particular text.
    struct PickyProvider;

    impl ModuleGridProvider for PickyProvider {
        fn encode(&self, text: &str, _level: ErrorCorrection) -> Result<ModuleGrid> {
            if text == "too long" {
                Err(Error::Encoding("code length overflow".into()))
            } else {
                Ok(ModuleGrid::from_fn(21, |row, col| (row + col) % 2 == 0).unwrap())
            }
        }
    }

    /// Sink that refuses every file.
    struct BrokenSink;

    impl ExportSink for BrokenSink {
        fn deliver(&mut self, _file: &ExportedFile) -> Result<()> {
            Err(Error::Export("disk full".into()))
        }
    }

    fn png_file(width: u32, height: u32) -> SelectedFile {
        SelectedFile::new("logo.png", "image/png", png_bytes(width, height, [255, 0, 0, 255]))
    }

    fn generated_session() -> QrSession<FixedProvider, MemorySink> {
        let mut session = QrSession::new(FixedProvider(21), MemorySink::new());
        session
            .dispatch(InputEvent::TextChanged("hello".into()))
            .unwrap();
        session.dispatch(InputEvent::Generate).unwrap();
        session
    }

    #[test]
    fn generate_url_without_logo() {
        let mut session = QrSession::in_memory();
        session
            .dispatch(InputEvent::TextChanged("https://example.com".into()))
            .unwrap();
        session.dispatch(InputEvent::CanvasSizeSelected(300)).unwrap();
        session.dispatch(InputEvent::Generate).unwrap();

        assert!(session.is_preview_visible());
        let surface = session.surface().unwrap();
        assert_eq!(surface.image.width(), surface.image.height());
        assert_eq!(surface.side() % surface.cell_size, 0);
        assert!(surface.placement.is_none());
        let side = surface.side();

        let file = session.export().unwrap();
        assert_eq!(file.filename, "codigo-qr.png");
        let decoded = image::load_from_memory(&file.bytes).unwrap();
        assert_eq!(decoded.width(), side);
    }

    #[test]
    fn empty_text_is_rejected() {
        let mut session = QrSession::in_memory();
        session.dispatch(InputEvent::TextChanged("   ".into())).unwrap();
        let err = session.dispatch(InputEvent::Generate).unwrap_err();

        assert!(matches!(err, Error::EmptyText));
        assert!(!session.is_preview_visible());
        assert_eq!(
            session.message(),
            Some("Por favor, ingresa un texto o URL para el código QR.")
        );
    }

    #[test]
    fn encoding_failure_before_any_preview() {
        let mut session = QrSession::new(FailingProvider, MemorySink::new());
        session.dispatch(InputEvent::TextChanged("x".into())).unwrap();
        let err = session.dispatch(InputEvent::Generate).unwrap_err();

        assert!(matches!(err, Error::Encoding(_)));
        assert!(session.surface().is_none());
        assert!(session.render_state().is_none());
        assert_eq!(
            session.message(),
            Some("Error al generar el código QR: code length overflow")
        );
    }

    #[test]
    fn encoding_failure_after_success_leaves_preview_untouched() {
        let mut session = QrSession::new(PickyProvider, MemorySink::new());
        session.dispatch(InputEvent::TextChanged("ok".into())).unwrap();
        session.dispatch(InputEvent::Generate).unwrap();
        let surface = session.surface().unwrap().clone();
        let state = session.render_state().unwrap().clone();

        session
            .dispatch(InputEvent::TextChanged("too long".into()))
            .unwrap();
        let err = session.dispatch(InputEvent::Generate).unwrap_err();

        assert!(matches!(err, Error::Encoding(_)));
        assert!(session.is_preview_visible());
        assert_eq!(session.surface(), Some(&surface));
        assert_eq!(session.render_state(), Some(&state));
        assert!(session.message().is_some());
    }

    #[test]
    fn jpeg_upload_is_rejected() {
        let mut session = QrSession::in_memory();
        let file = SelectedFile::new("photo.jpg", "image/jpeg", vec![0xff, 0xd8, 0xff]);
        let err = session
            .dispatch(InputEvent::FileSelected(Some(file)))
            .unwrap_err();

        assert!(matches!(err, Error::NotPng));
        assert!(session.logo().is_none());
        assert_eq!(session.logo_label(), NO_FILE_LABEL);
        assert_eq!(session.message(), Some("Por favor, sube un archivo PNG válido."));
    }

    #[test]
    fn corrupt_png_clears_logo() {
        let mut session = generated_session();
        session
            .dispatch(InputEvent::FileSelected(Some(png_file(32, 32))))
            .unwrap();
        assert!(session.logo().is_some());

        let corrupt = SelectedFile::new("broken.png", "image/png", b"not a png".to_vec());
        let err = session
            .dispatch(InputEvent::FileSelected(Some(corrupt)))
            .unwrap_err();

        assert!(matches!(err, Error::LogoDecode(_)));
        assert!(session.logo().is_none());
        assert!(session.surface().unwrap().placement.is_none());
        assert_eq!(
            session.message(),
            Some("Error al cargar la imagen. Asegúrate de que sea un PNG válido.")
        );
    }

    #[test]
    fn logo_upload_updates_label_and_preview() {
        let mut session = generated_session();
        session
            .dispatch(InputEvent::FileSelected(Some(png_file(64, 32))))
            .unwrap();

        assert_eq!(session.logo_label(), "logo.png");
        let placement = session.surface().unwrap().placement.unwrap();
        let ratio = placement.inner.width / placement.inner.height;
        assert!((ratio - 2.0).abs() < 1e-3);

        session.dispatch(InputEvent::LogoRemoved).unwrap();
        assert_eq!(session.logo_label(), NO_FILE_LABEL);
        assert!(session.surface().unwrap().placement.is_none());
    }

    #[test]
    fn stale_decode_result_is_ignored() {
        let mut session = generated_session();
        let first = session.begin_upload(&png_file(10, 10)).unwrap();
        let second = session.begin_upload(&png_file(20, 10)).unwrap();

        // The second upload resolves first.
        let logo = LogoAsset::decode_png(&png_file(20, 10).bytes);
        assert!(session.finish_upload(second, logo).unwrap());

        let stale = LogoAsset::decode_png(&png_file(10, 10).bytes);
        assert!(!session.finish_upload(first, stale).unwrap());
        assert_eq!(session.logo().unwrap().data.width(), 20);
    }

    #[test]
    fn drag_past_ceiling_settles_at_max() {
        let mut session = generated_session();
        session
            .dispatch(InputEvent::FileSelected(Some(png_file(64, 64))))
            .unwrap();
        session.dispatch(InputEvent::SliderMoved(20.0)).unwrap();

        let before = session.surface().unwrap().clone();
        session
            .dispatch(InputEvent::PointerDown(Point::new(150.0, 150.0)))
            .unwrap();
        assert_eq!(session.cursor(), Cursor::Grabbing);
        session
            .dispatch(InputEvent::PointerMove(Point::new(150.0, -2000.0)))
            .unwrap();
        session.dispatch(InputEvent::PointerUp).unwrap();

        assert_eq!(session.config().logo_size_percent, MAX_LOGO_PERCENT);
        let after = session.surface().unwrap();
        assert!(after.placement.unwrap().inner.width > before.placement.unwrap().inner.width);
        // Redrawn from the retained grid, same geometry.
        assert_eq!(after.side(), before.side());
        assert_eq!(session.cursor(), Cursor::Default);
    }

    #[test]
    fn pointer_leave_cancels_drag() {
        let mut session = generated_session();
        session
            .dispatch(InputEvent::FileSelected(Some(png_file(64, 64))))
            .unwrap();
        session
            .dispatch(InputEvent::PointerDown(Point::new(150.0, 150.0)))
            .unwrap();
        session.dispatch(InputEvent::PointerLeave).unwrap();
        session
            .dispatch(InputEvent::PointerMove(Point::new(150.0, 0.0)))
            .unwrap();

        assert_eq!(session.config().logo_size_percent, 20.0);
    }

    #[test]
    fn export_without_generate_reports_error() {
        let mut session = QrSession::in_memory();
        let err = session.dispatch(InputEvent::Export).unwrap_err();

        assert!(matches!(err, Error::NothingToExport));
        assert!(session.sink().files.is_empty());
        assert_eq!(session.message(), Some("Primero debes generar un código QR."));
    }

    #[test]
    fn export_is_idempotent_and_restores_preview() {
        let mut session = generated_session();
        session
            .dispatch(InputEvent::FileSelected(Some(png_file(64, 64))))
            .unwrap();
        let preview = session.surface().unwrap().clone();

        let first = session.export().unwrap();
        let second = session.export().unwrap();
        assert_eq!(first.bytes, second.bytes);
        assert_eq!(session.sink().files.len(), 2);

        let restored = session.surface().unwrap();
        assert_eq!(restored.mode, RenderMode::Preview);
        assert_eq!(restored.image, preview.image);

        // The export lacks the preview border.
        let exported = image::load_from_memory(&first.bytes).unwrap().to_rgba8();
        assert_ne!(exported, preview.image);
    }

    #[test]
    fn sink_failure_is_reported_and_preview_restored() {
        let mut session = QrSession::new(FixedProvider(21), BrokenSink);
        session.dispatch(InputEvent::TextChanged("x".into())).unwrap();
        session.dispatch(InputEvent::Generate).unwrap();

        let err = session.export().unwrap_err();
        assert_eq!(err.to_string(), "Error al descargar el código QR: disk full");
        assert_eq!(session.surface().unwrap().mode, RenderMode::Preview);
    }

    #[test]
    fn invalid_canvas_size_keeps_previous() {
        let mut session = generated_session();
        let side = session.surface().unwrap().side();
        assert!(session.set_canvas_size(10).is_err());
        assert_eq!(session.config().canvas_size, 300);
        assert_eq!(session.surface().unwrap().side(), side);
    }

    #[test]
    fn slider_is_clamped_to_range() {
        let mut session = generated_session();
        session.dispatch(InputEvent::SliderMoved(95.0)).unwrap();
        assert_eq!(session.config().logo_size_percent, MAX_LOGO_PERCENT);
    }

    #[test]
    fn success_clears_message() {
        let mut session = generated_session();
        session.dispatch(InputEvent::TextChanged(String::new())).unwrap();
        assert!(session.dispatch(InputEvent::Generate).is_err());
        assert!(session.message().is_some());

        session.dispatch(InputEvent::TextChanged("again".into())).unwrap();
        session.dispatch(InputEvent::Generate).unwrap();
        assert!(session.message().is_none());
    }

    #[test]
    fn message_hides_after_timeout() {
        let mut area = MessageArea::default();
        let shown = Instant::now();
        area.show("oops", shown);
        assert_eq!(area.visible_at(shown + Duration::from_secs(4)), Some("oops"));
        assert_eq!(area.visible_at(shown + MESSAGE_TIMEOUT), None);
    }

    #[test]
    fn profile_roundtrip_through_session() {
        let profile = SessionProfile {
            text: "https://example.com".into(),
            canvas_size: 400,
            margin: 4,
            logo_size_percent: 90.0,
            colors: Some(ColorSettings {
                dark: "#102030".into(),
                light: "#fafafa".into(),
                border: "#ff0000".into(),
            }),
            error_correction: crate::profile::SerializableErrorCorrection::Q,
        };

        let mut session = QrSession::in_memory();
        session.apply_profile(&profile).unwrap();
        assert_eq!(session.text(), "https://example.com");
        assert_eq!(session.config().margin, 4);
        assert_eq!(session.config().logo_size_percent, MAX_LOGO_PERCENT);

        let exported = session.export_profile();
        assert_eq!(exported.canvas_size, 400);
        assert_eq!(exported.colors.unwrap().dark, "#102030");
        assert_eq!(
            exported.error_correction,
            crate::profile::SerializableErrorCorrection::Q
        );
    }

    #[test]
    fn unrenderable_profile_is_rolled_back() {
        let mut session = generated_session();
        let surface = session.surface().unwrap().clone();

        let mut profile = SessionProfile::new();
        profile.text = "changed".into();
        profile.canvas_size = 10;
        profile.colors = Some(ColorSettings {
            dark: "#ff0000".into(),
            ..ColorSettings::default()
        });
        let err = session.apply_profile(&profile).unwrap_err();

        assert!(matches!(err, Error::InvalidConfig(_)));
        assert_eq!(session.config().canvas_size, 300);
        assert_eq!(session.text(), "hello");
        assert_eq!(*session.colors(), RenderColors::default());
        assert_eq!(session.surface(), Some(&surface));

        // Later edits still render.
        session.dispatch(InputEvent::SliderMoved(30.0)).unwrap();
        assert_eq!(session.config().logo_size_percent, 30.0);
    }

    #[test]
    fn bad_profile_colors_change_nothing() {
        let mut profile = SessionProfile::new();
        profile.text = "changed".into();
        profile.colors = Some(ColorSettings {
            dark: "zzz".into(),
            ..ColorSettings::default()
        });

        let mut session = QrSession::in_memory();
        assert!(session.apply_profile(&profile).is_err());
        assert_eq!(session.text(), "");
    }
}
