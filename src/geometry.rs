//! Geometry types shared by the compositor and the resize controller.
//!
//! Surface coordinates are in pixels with the origin at the top-left corner.
//! Rectangles use `f32` because logo placement is derived from a percentage
//! and is not snapped to whole pixels.

/// A point in surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X offset from the left edge of the surface
    pub x: f32,
    /// Y offset from the top edge of the surface
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Creates a new rectangle with the given position and dimensions.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns the right edge coordinate (x + width).
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the bottom edge coordinate (y + height).
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns a copy grown by `amount` on every side.
    pub fn expand(&self, amount: f32) -> Self {
        Self {
            x: self.x - amount,
            y: self.y - amount,
            width: self.width + amount * 2.0,
            height: self.height + amount * 2.0,
        }
    }

    /// Inclusive containment test; points on the edge count as inside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Returns true if the two rectangles share a region of positive area.
    ///
    /// Rectangles that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub(crate) fn to_skia(self) -> Option<resvg::tiny_skia::Rect> {
        resvg::tiny_skia::Rect::from_xywh(self.x, self.y, self.width, self.height)
    }
}

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height. Zero-height sizes report 1.0.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

// ============================================================================
// LogoPlacement
// ============================================================================

/// Padding between the logo image and the edge of its background card.
pub const LOGO_PADDING: f32 = 10.0;

/// Where the logo and its background card land on a square surface.
///
/// Recomputed on every redraw from the surface side, the logo size percentage
/// and the logo's intrinsic size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoPlacement {
    /// The background card, `inner` grown by [`LOGO_PADDING`].
    pub outer: Rect,
    /// The drawn bounds of the logo image.
    pub inner: Rect,
}

impl LogoPlacement {
    /// Computes the placement of a logo of `logo_size` on a surface of side
    /// `surface_side`.
    ///
    /// The longest side of the logo becomes `surface_side * percent / 100`;
    /// the other side follows the logo's aspect ratio. The result is centred
    /// and is not clamped to the surface, so large percentages can overflow.
    pub fn compute(surface_side: u32, logo_size: SizePx, percent: f32) -> Self {
        let side = surface_side as f32;
        let box_size = side * percent / 100.0;
        let aspect = logo_size.aspect_ratio();

        let (width, height) = if aspect >= 1.0 {
            (box_size, box_size / aspect)
        } else {
            (box_size * aspect, box_size)
        };

        let inner = Rect::new((side - width) / 2.0, (side - height) / 2.0, width, height);
        Self {
            outer: inner.expand(LOGO_PADDING),
            inner,
        }
    }

    /// Returns true if the point lies over the logo card, padding included.
    pub fn hit_test(&self, point: Point) -> bool {
        self.outer.contains(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges() {
        let rect = Rect::new(10.0, 20.0, 100.0, 200.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 220.0);

        let grown = rect.expand(5.0);
        assert_eq!(grown, Rect::new(5.0, 15.0, 110.0, 210.0));
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        let c = Rect::new(9.5, 9.5, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
    }

    #[test]
    fn placement_square_logo_is_centered() {
        let placement = LogoPlacement::compute(300, SizePx::new(64, 64), 20.0);
        assert_eq!(placement.inner, Rect::new(120.0, 120.0, 60.0, 60.0));
        assert_eq!(placement.outer, Rect::new(110.0, 110.0, 80.0, 80.0));
    }

    #[test]
    fn placement_preserves_aspect_ratio() {
        let logo = SizePx::new(300, 120);
        for percent in 10..=40 {
            let placement = LogoPlacement::compute(296, logo, percent as f32);
            let ratio = placement.inner.width / placement.inner.height;
            assert!((ratio - 2.5).abs() < 1e-3, "ratio {ratio} at {percent}%");

            let center_x = placement.inner.x + placement.inner.width / 2.0;
            let center_y = placement.inner.y + placement.inner.height / 2.0;
            assert!((center_x - 148.0).abs() < 1e-3);
            assert!((center_y - 148.0).abs() < 1e-3);
        }
    }

    #[test]
    fn placement_tall_logo_uses_height() {
        let placement = LogoPlacement::compute(200, SizePx::new(50, 100), 40.0);
        assert_eq!(placement.inner.height, 80.0);
        assert_eq!(placement.inner.width, 40.0);
    }

    #[test]
    fn oversized_logo_is_not_clamped() {
        let placement = LogoPlacement::compute(100, SizePx::new(10, 10), 100.0);
        assert!(placement.outer.x < 0.0);
        assert!(placement.outer.right() > 100.0);
    }

    #[test]
    fn hit_test_inside_and_outside() {
        let placement = LogoPlacement::compute(300, SizePx::new(64, 64), 20.0);
        assert!(placement.hit_test(Point::new(150.0, 150.0)));
        // Inside the padding but outside the image.
        assert!(placement.hit_test(Point::new(112.0, 112.0)));
        assert!(!placement.hit_test(Point::new(109.0, 150.0)));
        assert!(!placement.hit_test(Point::new(150.0, 191.0)));
    }
}
