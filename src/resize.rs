//! Drag-to-resize handling for the logo.
//!
//! [`ResizeController`] is a two-state machine. Pressing on the logo card
//! starts a gesture; vertical movement while pressed changes the logo size
//! (up grows, down shrinks); releasing or leaving the surface ends it.

use crate::geometry::{LogoPlacement, Point, Rect};

/// Smallest logo size reachable by dragging or the slider.
pub const MIN_LOGO_PERCENT: f32 = 10.0;
/// Largest logo size reachable by dragging or the slider.
pub const MAX_LOGO_PERCENT: f32 = 40.0;
/// Percentage points gained per pixel of upward movement.
pub const DEFAULT_SENSITIVITY: f32 = 0.25;

/// Pointer affordance the host should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    /// Hovering over the logo; it can be grabbed.
    Grab,
    /// A resize gesture is in progress.
    Grabbing,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging {
        baseline_y: f32,
        baseline_percent: f32,
    },
}

/// Result of feeding a pointer event to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeOutcome {
    /// Nothing to do.
    Ignored,
    /// A gesture started.
    Started,
    /// The logo should be redrawn at this size.
    Resized(f32),
    /// Only the hover affordance changed.
    HoverChanged(bool),
    /// The gesture ended.
    Ended,
}

/// Tracks resize gestures over the rendered surface.
#[derive(Debug, Clone)]
pub struct ResizeController {
    state: DragState,
    hovering: bool,
    sensitivity: f32,
    min_percent: f32,
    max_percent: f32,
}

impl Default for ResizeController {
    fn default() -> Self {
        Self {
            state: DragState::Idle,
            hovering: false,
            sensitivity: DEFAULT_SENSITIVITY,
            min_percent: MIN_LOGO_PERCENT,
            max_percent: MAX_LOGO_PERCENT,
        }
    }
}

impl ResizeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn cursor(&self) -> Cursor {
        if self.is_dragging() {
            Cursor::Grabbing
        } else if self.hovering {
            Cursor::Grab
        } else {
            Cursor::Default
        }
    }

    /// Clamps a size to the reachable range.
    pub fn clamp(&self, percent: f32) -> f32 {
        percent.clamp(self.min_percent, self.max_percent)
    }

    /// Handles a button press at `point`.
    ///
    /// Starts a gesture only when the point is over the logo card.
    pub fn pointer_down(
        &mut self,
        point: Point,
        placement: Option<&LogoPlacement>,
        current_percent: f32,
    ) -> ResizeOutcome {
        match placement {
            Some(placement) if placement.hit_test(point) => {
                self.state = DragState::Dragging {
                    baseline_y: point.y,
                    baseline_percent: current_percent,
                };
                ResizeOutcome::Started
            }
            _ => ResizeOutcome::Ignored,
        }
    }

    /// Handles pointer movement.
    ///
    /// While dragging this computes the new size; otherwise it only updates
    /// the hover state.
    pub fn pointer_move(
        &mut self,
        point: Point,
        placement: Option<&LogoPlacement>,
    ) -> ResizeOutcome {
        match self.state {
            DragState::Dragging {
                baseline_y,
                baseline_percent,
            } => {
                let candidate = baseline_percent + (baseline_y - point.y) * self.sensitivity;
                // Garbage coordinates leave the size where it is.
                if !candidate.is_finite() {
                    return ResizeOutcome::Ignored;
                }
                ResizeOutcome::Resized(self.clamp(candidate.round()))
            }
            DragState::Idle => {
                let hovering = placement.is_some_and(|p| p.hit_test(point));
                if hovering != self.hovering {
                    self.hovering = hovering;
                    ResizeOutcome::HoverChanged(hovering)
                } else {
                    ResizeOutcome::Ignored
                }
            }
        }
    }

    /// Ends any gesture in progress.
    pub fn pointer_up(&mut self) -> ResizeOutcome {
        self.end()
    }

    /// Ends any gesture in progress and drops the hover state.
    ///
    /// A gesture cancelled this way does not resume when the pointer returns.
    pub fn pointer_leave(&mut self) -> ResizeOutcome {
        self.hovering = false;
        self.end()
    }

    fn end(&mut self) -> ResizeOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Dragging { .. } => ResizeOutcome::Ended,
            DragState::Idle => ResizeOutcome::Ignored,
        }
    }
}

/// Maps a pointer position in display coordinates to surface coordinates.
///
/// `display` is where the surface is shown on screen (it may be scaled);
/// `surface_side` is its real pixel size.
pub fn canvas_point(client: Point, display: Rect, surface_side: u32) -> Point {
    let scale_x = if display.width > 0.0 {
        surface_side as f32 / display.width
    } else {
        1.0
    };
    let scale_y = if display.height > 0.0 {
        surface_side as f32 / display.height
    } else {
        1.0
    };
    Point::new(
        (client.x - display.x) * scale_x,
        (client.y - display.y) * scale_y,
    )
}
