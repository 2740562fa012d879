/// Interactive view state and the reducer that mutates it
use crate::projection::Viewport;

/// Largest tilt magnitude on either axis (radians)
pub const TILT_LIMIT: f32 = 1.5;
pub const ZOOM_MIN: f32 = 0.1;
pub const ZOOM_MAX: f32 = 5.0;
/// Tilt applied per arrow key press (radians)
pub const KEY_TILT_STEP: f32 = 0.1;
/// Tilt reached when dragging to the viewport edge
pub const DRAG_TILT_GAIN: f32 = 1.2;
pub const ZOOM_IN_FACTOR: f32 = 1.1;
pub const ZOOM_OUT_FACTOR: f32 = 0.9;

/// Wheel direction of a single scroll step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Forward,
    Backward,
}

impl ScrollDirection {
    /// Classify a signed wheel delta. A zero delta has no direction.
    pub fn from_delta(delta: f32) -> Option<Self> {
        if delta > 0.0 {
            Some(Self::Forward)
        } else if delta < 0.0 {
            Some(Self::Backward)
        } else {
            None
        }
    }

    fn factor(self) -> f32 {
        match self {
            Self::Forward => ZOOM_IN_FACTOR,
            Self::Backward => ZOOM_OUT_FACTOR,
        }
    }
}

/// A single mutation of the view state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewAction {
    /// Pointer dragged to an absolute position inside the viewport
    Drag { x: f32, y: f32, viewport: Viewport },
    /// Relative tilt change from the keyboard (radians)
    Nudge { dx: f32, dy: f32 },
    Reset,
    Zoom(ScrollDirection),
    /// A new image finished decoding
    ImageLoaded { width: u32, height: u32 },
}

/// Tilt, zoom and image aspect ratio of the displayed quad.
///
/// Fields are private so that every way of producing a `ViewState` goes
/// through clamping: tilts stay within `[-TILT_LIMIT, TILT_LIMIT]` and zoom
/// within `[ZOOM_MIN, ZOOM_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    tilt_x: f32,
    tilt_y: f32,
    zoom: f32,
    image_aspect_ratio: f32,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            tilt_x: 0.0,
            tilt_y: 0.0,
            zoom: 1.0,
            image_aspect_ratio: 1.0,
        }
    }

    /// Build a state with explicit tilts and zoom, clamped into range
    pub fn with_view(tilt_x: f32, tilt_y: f32, zoom: f32) -> Self {
        Self {
            tilt_x: clamp_tilt(tilt_x),
            tilt_y: clamp_tilt(tilt_y),
            zoom: clamp_zoom(zoom),
            image_aspect_ratio: 1.0,
        }
    }

    /// Replace the aspect ratio, ignoring non-positive or non-finite values
    pub fn with_aspect_ratio(mut self, aspect: f32) -> Self {
        if aspect.is_finite() && aspect > 0.0 {
            self.image_aspect_ratio = aspect;
        }
        self
    }

    pub fn tilt_x(&self) -> f32 {
        self.tilt_x
    }

    pub fn tilt_y(&self) -> f32 {
        self.tilt_y
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn image_aspect_ratio(&self) -> f32 {
        self.image_aspect_ratio
    }

    /// Set both tilts from an absolute pointer position
    pub fn drag_to(&mut self, x: f32, y: f32, viewport: Viewport) {
        let (nx, ny) = viewport.normalize(x, y);
        self.tilt_y = clamp_tilt(nx * DRAG_TILT_GAIN);
        self.tilt_x = clamp_tilt(-ny * DRAG_TILT_GAIN);
    }

    /// Apply a relative tilt change (radians)
    pub fn nudge(&mut self, dx: f32, dy: f32) {
        self.tilt_x = clamp_tilt(self.tilt_x + dx);
        self.tilt_y = clamp_tilt(self.tilt_y + dy);
    }

    pub fn reset(&mut self) {
        self.tilt_x = 0.0;
        self.tilt_y = 0.0;
        self.zoom = 1.0;
    }

    /// Scale zoom by one wheel step; steps compound geometrically
    pub fn scroll(&mut self, direction: ScrollDirection) {
        self.zoom = clamp_zoom(self.zoom * direction.factor());
    }

    /// Adopt the aspect ratio of a freshly decoded image and reset the view
    pub fn image_loaded(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("ignoring image with empty dimensions {}x{}", width, height);
            return;
        }
        self.image_aspect_ratio = width as f32 / height as f32;
        self.reset();
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply one action to a view state and return the result
pub fn reduce(mut state: ViewState, action: ViewAction) -> ViewState {
    match action {
        ViewAction::Drag { x, y, viewport } => state.drag_to(x, y, viewport),
        ViewAction::Nudge { dx, dy } => state.nudge(dx, dy),
        ViewAction::Reset => state.reset(),
        ViewAction::Zoom(direction) => state.scroll(direction),
        ViewAction::ImageLoaded { width, height } => state.image_loaded(width, height),
    }
    state
}

fn clamp_tilt(angle: f32) -> f32 {
    if angle.is_nan() {
        return 0.0;
    }
    angle.clamp(-TILT_LIMIT, TILT_LIMIT)
}

fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_nan() {
        return 1.0;
    }
    zoom.clamp(ZOOM_MIN, ZOOM_MAX)
}
