//! Bounded motion-trail history per bob
//!
//! FIFO ring buffer of world positions. A timed quiet period (enabled /
//! disabled-until timestamp) suppresses pushes after control commands so the
//! trail does not draw a long segment across the jump.

use std::collections::VecDeque;
use tracing::{debug, trace};

use super::geometry::Point2D;

/// Default maximum number of points per trail
pub const DEFAULT_TRAIL_CAPACITY: usize = 300;

#[derive(Debug, Clone)]
pub struct TrailBuffer {
    /// Ring buffer of world positions, oldest first
    points: VecDeque<Point2D>,
    capacity: usize,
    /// Pushes are ignored while `now < disabled_until` (app-relative seconds)
    disabled_until: Option<f64>,
}

impl Default for TrailBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_TRAIL_CAPACITY)
    }
}

impl TrailBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
            disabled_until: None,
        }
    }

    /// Append a point, evicting the oldest if at capacity.
    ///
    /// Returns false if the buffer is in its quiet period and the point was
    /// dropped.
    pub fn push(&mut self, point: Point2D, now: f64) -> bool {
        if !self.is_enabled(now) {
            trace!(now, "Trail push suppressed");
            return false;
        }
        self.disabled_until = None;

        if self.capacity == 0 {
            return false;
        }
        if self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
        true
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Suppress pushes for `duration` seconds starting at `now`.
    pub fn disable_for(&mut self, duration: f64, now: f64) {
        let until = now + duration;
        debug!(now, until, "Trail disabled");
        self.disabled_until = Some(until);
    }

    #[inline]
    pub fn is_enabled(&self, now: f64) -> bool {
        self.disabled_until.map_or(true, |until| now >= until)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Points oldest first
    pub fn points(&self) -> impl Iterator<Item = Point2D> + '_ {
        self.points.iter().copied()
    }
}
