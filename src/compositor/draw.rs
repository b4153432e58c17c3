//! Drawing helpers on top of tiny-skia (re-exported by resvg).

use image::{Rgba, RgbaImage};
use palette::Srgb;
use resvg::tiny_skia::{
    Color, ColorU8, FillRule, FilterQuality, IntSize, Mask, Paint, Path, PathBuilder, Pixmap,
    PixmapPaint, Stroke, StrokeDash, Transform,
};

use crate::geometry::Rect;

/// Builds a rectangle path with circular-ish corners.
///
/// The radius is clamped to half the shorter side. Returns `None` for
/// degenerate rectangles.
pub fn rounded_rect_path(rect: Rect, radius: f32) -> Option<Path> {
    let r = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
    let (x, y, right, bottom) = (rect.x, rect.y, rect.right(), rect.bottom());

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(right - r, y);
    pb.quad_to(right, y, right, y + r);
    pb.line_to(right, bottom - r);
    pb.quad_to(right, bottom, right - r, bottom);
    pb.line_to(x + r, bottom);
    pb.quad_to(x, bottom, x, bottom - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

pub fn skia_color(color: Srgb<u8>) -> Color {
    Color::from_rgba8(color.red, color.green, color.blue, 255)
}

pub fn solid_paint(color: Srgb<u8>, anti_alias: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(skia_color(color));
    paint.anti_alias = anti_alias;
    paint
}

/// Fills a rounded rectangle.
pub fn fill_rounded_rect(pixmap: &mut Pixmap, rect: Rect, radius: f32, color: Srgb<u8>) {
    if let Some(path) = rounded_rect_path(rect, radius) {
        pixmap.fill_path(
            &path,
            &solid_paint(color, true),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }
}

/// Strokes a dashed rounded rectangle outline.
pub fn stroke_dashed_rect(
    pixmap: &mut Pixmap,
    rect: Rect,
    radius: f32,
    color: Srgb<u8>,
    width: f32,
    dash: &[f32],
) {
    let Some(path) = rounded_rect_path(rect, radius) else {
        return;
    };
    let stroke = Stroke {
        width,
        dash: StrokeDash::new(dash.to_vec(), 0.0),
        ..Stroke::default()
    };
    pixmap.stroke_path(
        &path,
        &solid_paint(color, true),
        &stroke,
        Transform::identity(),
        None,
    );
}

/// Draws `image` scaled into `bounds`, clipped to a rounded rectangle.
pub fn draw_image_clipped(pixmap: &mut Pixmap, image: &RgbaImage, bounds: Rect, radius: f32) {
    let Some(source) = rgba_image_to_pixmap(image) else {
        return;
    };
    let Some(clip) = rounded_rect_path(bounds, radius) else {
        return;
    };
    let Some(mut mask) = Mask::new(pixmap.width(), pixmap.height()) else {
        return;
    };
    mask.fill_path(&clip, FillRule::Winding, true, Transform::identity());

    let sx = bounds.width / image.width() as f32;
    let sy = bounds.height / image.height() as f32;
    let transform = Transform::from_row(sx, 0.0, 0.0, sy, bounds.x, bounds.y);

    let paint = PixmapPaint {
        quality: FilterQuality::Bicubic,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, transform, Some(&mask));
}

// ============================================================================
// Conversion
// ============================================================================

/// Converts an `RgbaImage` into a premultiplied tiny-skia pixmap.
fn rgba_image_to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(image.width(), image.height())?;
    let mut data = Vec::with_capacity(image.as_raw().len());
    for pixel in image.pixels() {
        let [r, g, b, a] = pixel.0;
        let premultiplied = ColorU8::from_rgba(r, g, b, a).premultiply();
        data.extend_from_slice(&[
            premultiplied.red(),
            premultiplied.green(),
            premultiplied.blue(),
            premultiplied.alpha(),
        ]);
    }
    Pixmap::from_vec(data, size)
}

/// Converts a tiny-skia pixmap to an `RgbaImage`.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let pixels = pixmap.pixels();

    RgbaImage::from_fn(width, pixmap.height(), |x, y| {
        let pixel = pixels[(y * width + x) as usize];
        // tiny-skia stores premultiplied alpha
        let (r, g, b, a) = unpremultiply(pixel.red(), pixel.green(), pixel.blue(), pixel.alpha());
        Rgba([r, g, b, a])
    })
}

fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}
