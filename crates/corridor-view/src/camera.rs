//! 2D camera state for viewing a grid.
//!
//! Positions are in screen-space pixels of the unzoomed scene. `scroll` is
//! the scene point shown at the viewport's top-left corner.

/// Minimum zoom level (zoomed out).
pub const MIN_ZOOM: f32 = 0.1;

/// Maximum zoom level (zoomed in).
pub const MAX_ZOOM: f32 = 3.0;

/// Default zoom level.
pub const DEFAULT_ZOOM: f32 = 1.0;

/// Share of the viewport a fog-of-war focus square may fill.
const FOCUS_MARGIN: f32 = 0.9;

/// 2D camera for viewing the world.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Scene position at the top-left of the viewport.
    pub scroll: (f32, f32),
    /// Zoom level (1.0 = 1:1 pixel mapping).
    pub zoom: f32,
    /// Viewport size in pixels (width, height).
    pub viewport_size: (u32, u32),
    min_zoom: f32,
    max_zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

impl Camera {
    /// Creates a new camera with the given viewport size.
    #[must_use]
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            scroll: (0.0, 0.0),
            zoom: DEFAULT_ZOOM,
            viewport_size: (viewport_width, viewport_height),
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }

    /// Replaces the zoom limits. A reversed pair is swapped.
    #[must_use]
    pub fn with_zoom_limits(mut self, min_zoom: f32, max_zoom: f32) -> Self {
        let (lo, hi) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            (max_zoom, min_zoom)
        };
        self.min_zoom = lo.max(f32::EPSILON);
        self.max_zoom = hi.max(self.min_zoom);
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
        self
    }

    /// Zoom limits `(min, max)`.
    #[must_use]
    pub const fn zoom_limits(&self) -> (f32, f32) {
        (self.min_zoom, self.max_zoom)
    }

    /// Drag-pan by a pointer delta in screen pixels.
    ///
    /// Dragging right moves the view left, so the delta is scaled by zoom
    /// and subtracted.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.scroll.0 -= dx / self.zoom;
        self.scroll.1 -= dy / self.zoom;
    }

    /// Zoom in/out by factor (clamped to the zoom limits).
    ///
    /// Factor > 1.0 zooms in, < 1.0 zooms out.
    pub fn zoom_by(&mut self, factor: f32) {
        self.zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
    }

    /// Set absolute zoom level (clamped).
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Scroll so that a scene point sits at the viewport center.
    pub fn center_on(&mut self, x: f32, y: f32) {
        let (w, h) = self.visible_size();
        self.scroll = (x - w / 2.0, y - h / 2.0);
    }

    /// Set the viewport size.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport_size = (width, height);
    }

    /// Get the viewport size.
    #[must_use]
    pub const fn viewport(&self) -> (u32, u32) {
        self.viewport_size
    }

    /// Get visible scene size (width, height) at the current zoom.
    #[must_use]
    pub fn visible_size(&self) -> (f32, f32) {
        (
            self.viewport_size.0 as f32 / self.zoom,
            self.viewport_size.1 as f32 / self.zoom,
        )
    }

    /// Get visible scene bounds (min_x, min_y, max_x, max_y).
    #[must_use]
    pub fn visible_bounds(&self) -> (f32, f32, f32, f32) {
        let (w, h) = self.visible_size();
        (self.scroll.0, self.scroll.1, self.scroll.0 + w, self.scroll.1 + h)
    }

    /// Centers on `center` and zooms so a square `side` pixels wide fits
    /// the viewport with a 10% margin. Returns the applied zoom.
    pub fn focus_square(&mut self, center: (f32, f32), side: f32) -> f32 {
        if side > 0.0 {
            let fit_x = self.viewport_size.0 as f32 / side;
            let fit_y = self.viewport_size.1 as f32 / side;
            self.set_zoom(fit_x.min(fit_y) * FOCUS_MARGIN);
        }
        self.center_on(center.0, center.1);
        self.zoom
    }
}
