//! Viewport transform: world coordinates to canvas pixels
//!
//! `pixel = world * zoom + offset`. Zoom is always clamped to its bounds;
//! cursor-anchored zoom recomputes the offset so the world point under the
//! cursor keeps its pixel position.

use super::config::VisConfig;
use super::geometry::Point2D;

#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    zoom: f64,
    offset: Point2D,
    step: f64,
    min_zoom: f64,
    max_zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1.1, 0.5, 5.0)
    }
}

impl Viewport {
    pub fn new(step: f64, min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            zoom: 1.0,
            offset: Point2D::ZERO,
            step,
            min_zoom,
            max_zoom,
        }
    }

    pub fn from_config(config: &VisConfig) -> Self {
        Self::new(config.zoom_step, config.zoom_min, config.zoom_max)
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn offset(&self) -> Point2D {
        self.offset
    }

    pub fn to_canvas(&self, world: Point2D) -> Point2D {
        world * self.zoom + self.offset
    }

    /// Inverse of [`Viewport::to_canvas`], used for hit-testing the cursor.
    pub fn to_world(&self, pixel: Point2D) -> Point2D {
        (pixel - self.offset) / self.zoom
    }

    /// Wheel zoom anchored at `cursor` (canvas pixels).
    ///
    /// Positive `direction` zooms in by one step, negative zooms out, zero
    /// is ignored.
    pub fn zoom_at(&mut self, cursor: Point2D, direction: f64) {
        if direction == 0.0 || !direction.is_finite() {
            return;
        }
        let target = if direction > 0.0 {
            self.zoom * self.step
        } else {
            self.zoom / self.step
        };
        let new_zoom = self.clamp(target);
        if new_zoom == self.zoom {
            return;
        }
        let factor = new_zoom / self.zoom;
        self.offset = cursor - (cursor - self.offset) * factor;
        self.zoom = new_zoom;
    }

    /// Pinch gesture: multiplicative zoom, offset left as is.
    pub fn pinch(&mut self, scale_ratio: f64) {
        if scale_ratio <= 0.0 || !scale_ratio.is_finite() {
            return;
        }
        self.zoom = self.clamp(self.zoom * scale_ratio);
    }

    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.offset = Point2D::ZERO;
    }

    // Never panics, even if the bounds are inverted
    fn clamp(&self, zoom: f64) -> f64 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }
}
