//! 2D points shared by the snapshot, viewport, trails and renderer.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// A position in the plane. No identity beyond its coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ZERO: Point2D = Point2D { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean norm when the point is read as a vector.
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Angle of the vector from `origin` to `self`, in radians (-π, π].
    pub fn angle_from(self, origin: Point2D) -> f64 {
        (self.y - origin.y).atan2(self.x - origin.x)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point2D {
    type Output = Point2D;

    fn add(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2D {
    type Output = Point2D;

    fn sub(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2D {
    type Output = Point2D;

    fn mul(self, rhs: f64) -> Point2D {
        Point2D::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point2D {
    type Output = Point2D;

    fn div(self, rhs: f64) -> Point2D {
        Point2D::new(self.x / rhs, self.y / rhs)
    }
}
