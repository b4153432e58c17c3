//! Rasterizes module grids with an optional centred logo.
//!
//! The compositor is a pure function of its inputs: the same grid, config,
//! logo and mode always produce the same pixels. Every change is handled by
//! rendering the whole surface again.
//!
//! # Drawing order
//!
//! ```text
//! light background
//!     │
//!     ▼
//! dark modules ◄── cells touching the logo card are skipped whole
//!     │
//!     ▼
//! logo card (rounded, light colour)
//!     │
//!     ▼
//! logo image (scaled, clipped to a rounded rect)
//!     │
//!     ▼
//! dashed border ◄── preview mode only
//! ```

mod draw;

use std::str::FromStr;

use image::RgbaImage;
use palette::Srgb;
use resvg::tiny_skia::{Pixmap, Transform};

use crate::error::{Error, Result};
use crate::geometry::{LogoPlacement, Rect};
use crate::grid::ModuleGrid;
use crate::logo::LogoAsset;

/// Corner radius of the logo background card.
pub const CARD_RADIUS: f32 = 8.0;
/// Corner radius the logo image is clipped to.
pub const LOGO_RADIUS: f32 = 4.0;
/// Width of the preview-only border around the logo card.
pub const BORDER_WIDTH: f32 = 2.0;
/// Dash pattern (on, off) of the preview-only border.
pub const BORDER_DASH: [f32; 2] = [6.0, 4.0];

/// Requested surface sizes offered to users.
pub const CANVAS_SIZE_CHOICES: [u32; 4] = [200, 300, 400, 500];
pub const DEFAULT_CANVAS_SIZE: u32 = 300;
/// Quiet zone around the symbol, in modules.
pub const DEFAULT_MARGIN: u32 = 2;
pub const DEFAULT_LOGO_PERCENT: f32 = 20.0;

// ============================================================================
// RenderConfig
// ============================================================================

/// User-controlled render parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Requested surface side in pixels. The rendered side may be slightly
    /// smaller, see [`RenderConfig::surface_side`].
    pub canvas_size: u32,
    /// Quiet zone in modules.
    pub margin: u32,
    /// Logo size as a percentage (0-100) of the surface side.
    pub logo_size_percent: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas_size: DEFAULT_CANVAS_SIZE,
            margin: DEFAULT_MARGIN,
            logo_size_percent: DEFAULT_LOGO_PERCENT,
        }
    }
}

impl RenderConfig {
    pub fn new(canvas_size: u32) -> Self {
        Self {
            canvas_size,
            ..Self::default()
        }
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_logo_size_percent(mut self, percent: f32) -> Self {
        self.set_logo_size_percent(percent);
        self
    }

    /// Sets the logo size, clamped to 0-100.
    pub fn set_logo_size_percent(&mut self, percent: f32) {
        self.logo_size_percent = if percent.is_nan() {
            DEFAULT_LOGO_PERCENT
        } else {
            percent.clamp(0.0, 100.0)
        };
    }

    /// Number of cells along one side, quiet zone included. `None` if it
    /// does not fit in a `u32`.
    fn span(&self, module_count: usize) -> Option<u32> {
        u32::try_from(module_count)
            .ok()?
            .checked_add(self.margin.checked_mul(2)?)
    }

    /// Pixel size of one module: `floor(canvas_size / (N + 2 * margin))`.
    ///
    /// Zero when the canvas cannot hold the symbol, including margins too
    /// large to count.
    pub fn cell_size(&self, module_count: usize) -> u32 {
        self.span(module_count).map_or(0, |span| self.canvas_size / span.max(1))
    }

    /// Side of the rendered surface, always an exact multiple of the cell size.
    pub fn surface_side(&self, module_count: usize) -> u32 {
        // A non-zero cell size implies span <= canvas_size, so this cannot
        // overflow.
        self.span(module_count).map_or(0, |span| self.cell_size(module_count) * span)
    }
}

/// Whether the interactive border is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Live preview with the dashed resize border.
    #[default]
    Preview,
    /// Exported artifact without the border.
    Export,
}

// ============================================================================
// RenderColors
// ============================================================================

/// Colours used by the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderColors {
    /// Dark modules.
    pub dark: Srgb<u8>,
    /// Background and logo card.
    pub light: Srgb<u8>,
    /// Preview border.
    pub border: Srgb<u8>,
}

impl Default for RenderColors {
    fn default() -> Self {
        Self {
            dark: Srgb::new(0, 0, 0),
            light: Srgb::new(255, 255, 255),
            border: Srgb::new(0x4a, 0x90, 0xe2),
        }
    }
}

impl RenderColors {
    /// Parses colours from hex strings such as `#1a2b3c` or `1a2b3c`.
    pub fn from_hex(dark: &str, light: &str, border: &str) -> Result<Self> {
        Ok(Self {
            dark: parse_hex(dark)?,
            light: parse_hex(light)?,
            border: parse_hex(border)?,
        })
    }

    /// Formats a colour as `#rrggbb`.
    pub fn to_hex(color: Srgb<u8>) -> String {
        format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
    }
}

fn parse_hex(value: &str) -> Result<Srgb<u8>> {
    Srgb::from_str(value.trim())
        .map_err(|e| Error::InvalidConfig(format!("invalid colour {value:?}: {e}")))
}

// ============================================================================
// Compositor
// ============================================================================

/// A rendered surface and the geometry it was drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedQr {
    pub image: RgbaImage,
    pub cell_size: u32,
    pub module_count: usize,
    /// Logo placement, if a logo was drawn. Used for pointer hit tests.
    pub placement: Option<LogoPlacement>,
    pub mode: RenderMode,
}

impl RenderedQr {
    /// Side of the square surface in pixels.
    pub fn side(&self) -> u32 {
        self.image.width()
    }
}

/// Draws module grids and logos onto RGBA surfaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compositor {
    pub colors: RenderColors,
}

impl Compositor {
    pub fn new(colors: RenderColors) -> Self {
        Self { colors }
    }

    /// Renders `grid` with an optional centred `logo`.
    ///
    /// Fails if the requested canvas is too small to give every module at
    /// least one pixel.
    pub fn render(
        &self,
        grid: &ModuleGrid,
        config: &RenderConfig,
        logo: Option<&LogoAsset>,
        mode: RenderMode,
    ) -> Result<RenderedQr> {
        let module_count = grid.module_count();
        if config.canvas_size == 0 {
            return Err(Error::InvalidConfig("canvas size must be positive".into()));
        }
        let cell_size = config.cell_size(module_count);
        if cell_size == 0 {
            return Err(Error::InvalidConfig(format!(
                "{} px cannot fit {} modules plus a {}-module margin",
                config.canvas_size, module_count, config.margin
            )));
        }
        let side = config.surface_side(module_count);

        let mut pixmap = Pixmap::new(side, side)
            .ok_or_else(|| Error::InvalidConfig(format!("cannot allocate a {side} px surface")))?;
        pixmap.fill(draw::skia_color(self.colors.light));

        let placement = logo
            .map(|logo| LogoPlacement::compute(side, logo.dimensions(), config.logo_size_percent));

        let paint = draw::solid_paint(self.colors.dark, false);
        let cell = cell_size as f32;
        for (row, col) in grid.dark_modules() {
            let rect = Rect::new(
                (col as u32 + config.margin) as f32 * cell,
                (row as u32 + config.margin) as f32 * cell,
                cell,
                cell,
            );
            if placement.is_some_and(|p| rect.intersects(&p.outer)) {
                continue;
            }
            if let Some(rect) = rect.to_skia() {
                pixmap.fill_rect(rect, &paint, Transform::identity(), None);
            }
        }

        if let (Some(logo), Some(placement)) = (logo, placement) {
            self.draw_logo(&mut pixmap, logo, &placement, mode);
        }

        Ok(RenderedQr {
            image: draw::pixmap_to_rgba_image(&pixmap),
            cell_size,
            module_count,
            placement,
            mode,
        })
    }

    fn draw_logo(
        &self,
        pixmap: &mut Pixmap,
        logo: &LogoAsset,
        placement: &LogoPlacement,
        mode: RenderMode,
    ) {
        draw::fill_rounded_rect(pixmap, placement.outer, CARD_RADIUS, self.colors.light);
        draw::draw_image_clipped(pixmap, &logo.data, placement.inner, LOGO_RADIUS);

        if mode == RenderMode::Preview {
            draw::stroke_dashed_rect(
                pixmap,
                placement.outer,
                CARD_RADIUS,
                self.colors.border,
                BORDER_WIDTH,
                &BORDER_DASH,
            );
        }
    }
}
