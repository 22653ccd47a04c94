//! Rolling time-series windows feeding the charts
//!
//! One bounded FIFO window of `(label, value)` pairs per plotted quantity.
//! Labels come from a simulated clock advanced by the emission period on
//! every accepted emission, formatted to one decimal place.

use std::collections::VecDeque;
use tracing::trace;

use super::kinematics::Derivatives;
use super::snapshot::BOB_COUNT;

/// Default maximum number of points per window
pub const DEFAULT_WINDOW: usize = 80;

static EMPTY_WINDOW: VecDeque<SeriesPoint> = VecDeque::new();

/// A plotted quantity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Acceleration magnitude of bob `n` (0-based)
    Acceleration(usize),
    /// Signed angular velocity of link `n` (0-based)
    AngularVelocity(usize),
}

impl Quantity {
    pub const ALL: [Quantity; 2 * BOB_COUNT] = [
        Quantity::Acceleration(0),
        Quantity::Acceleration(1),
        Quantity::AngularVelocity(0),
        Quantity::AngularVelocity(1),
    ];

    /// Window slot, `None` for a bob the pendulum does not have
    fn index(self) -> Option<usize> {
        match self {
            Quantity::Acceleration(bob) if bob < BOB_COUNT => Some(bob),
            Quantity::AngularVelocity(bob) if bob < BOB_COUNT => Some(BOB_COUNT + bob),
            _ => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Quantity::Acceleration(0) => "Bob 1 acceleration",
            Quantity::Acceleration(_) => "Bob 2 acceleration",
            Quantity::AngularVelocity(0) => "Bob 1 angular velocity",
            Quantity::AngularVelocity(_) => "Bob 2 angular velocity",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Quantity::Acceleration(_) => "px/s²",
            Quantity::AngularVelocity(_) => "rad/s",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct TimeSeriesFeed {
    /// [quantity index] = window, oldest first
    windows: Vec<VecDeque<SeriesPoint>>,
    max_points: usize,
    /// Simulated clock in seconds
    sim_time: f64,
    step: f64,
}

impl TimeSeriesFeed {
    pub fn new(max_points: usize, step: f64) -> Self {
        Self {
            windows: vec![VecDeque::with_capacity(max_points); Quantity::ALL.len()],
            max_points,
            sim_time: 0.0,
            step,
        }
    }

    /// Append a point to one quantity's window, evicting the oldest past
    /// capacity.
    pub fn push(&mut self, quantity: Quantity, label: impl Into<String>, value: f64) {
        if self.max_points == 0 {
            return;
        }
        let Some(window) = quantity.index().and_then(|i| self.windows.get_mut(i)) else {
            trace!(?quantity, "No window for quantity");
            return;
        };
        while window.len() >= self.max_points {
            window.pop_front();
        }
        window.push_back(SeriesPoint {
            label: label.into(),
            value,
        });
    }

    /// Advance the simulated clock and push every quantity available in
    /// `derived` under the new label. Returns the label used.
    pub fn emit(&mut self, derived: &Derivatives) -> String {
        self.sim_time += self.step;
        let label = format_label(self.sim_time);

        for (bob, d) in derived.bobs.iter().enumerate() {
            if let Some(accel) = d.acceleration_magnitude() {
                self.push(Quantity::Acceleration(bob), label.clone(), accel);
            }
            self.push(Quantity::AngularVelocity(bob), label.clone(), d.angular_velocity);
        }

        trace!(label = %label, "Time series emission");
        label
    }

    /// Points of one quantity, oldest first. Empty for an unknown bob.
    pub fn window(&self, quantity: Quantity) -> &VecDeque<SeriesPoint> {
        quantity
            .index()
            .and_then(|i| self.windows.get(i))
            .unwrap_or(&EMPTY_WINDOW)
    }

    /// Most recent value of a quantity
    pub fn latest(&self, quantity: Quantity) -> Option<f64> {
        self.window(quantity).back().map(|p| p.value)
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }
}

fn format_label(t: f64) -> String {
    format!("{:.1}", t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Point2D;
    use crate::core::kinematics::BobDerivatives;

    fn derived(accel: Option<Point2D>, w: f64) -> Derivatives {
        let bob = BobDerivatives {
            velocity: Point2D::ZERO,
            acceleration: accel,
            angular_velocity: w,
        };
        Derivatives { bobs: [bob, bob] }
    }

    #[test]
    fn test_window_bounded_fifo() {
        let mut feed = TimeSeriesFeed::new(80, 0.5);
        for i in 0..200 {
            feed.push(Quantity::AngularVelocity(0), i.to_string(), i as f64);
            assert!(feed.window(Quantity::AngularVelocity(0)).len() <= 80);
        }
        let window = feed.window(Quantity::AngularVelocity(0));
        assert_eq!(window.len(), 80);
        assert_eq!(window.front().unwrap().label, "120");
        assert_eq!(window.back().unwrap().value, 199.0);
        // Other windows untouched
        assert!(feed.window(Quantity::Acceleration(0)).is_empty());
    }

    #[test]
    fn test_emit_labels_advance_by_step() {
        let mut feed = TimeSeriesFeed::new(80, 0.5);
        let d = derived(Some(Point2D::new(3.0, 4.0)), -1.25);

        assert_eq!(feed.emit(&d), "0.5");
        assert_eq!(feed.emit(&d), "1.0");
        assert_eq!(feed.emit(&d), "1.5");

        let accel = feed.window(Quantity::Acceleration(1));
        let labels: Vec<&str> = accel.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["0.5", "1.0", "1.5"]);
        assert_eq!(feed.latest(Quantity::Acceleration(0)), Some(5.0));
        assert_eq!(feed.latest(Quantity::AngularVelocity(1)), Some(-1.25));
    }

    #[test]
    fn test_emit_skips_missing_acceleration() {
        let mut feed = TimeSeriesFeed::new(80, 0.5);
        feed.emit(&derived(None, 2.0));
        assert!(feed.window(Quantity::Acceleration(0)).is_empty());
        assert_eq!(feed.window(Quantity::AngularVelocity(0)).len(), 1);
    }

    #[test]
    fn test_unknown_bob_is_ignored() {
        let mut feed = TimeSeriesFeed::new(80, 0.5);
        feed.push(Quantity::Acceleration(2), "0.5", 1.0);
        feed.push(Quantity::AngularVelocity(7), "0.5", 1.0);
        assert!(feed.window(Quantity::Acceleration(2)).is_empty());
        assert_eq!(feed.latest(Quantity::AngularVelocity(7)), None);
        for quantity in Quantity::ALL {
            assert!(feed.window(quantity).is_empty());
        }
    }

    #[test]
    fn test_zero_window_stays_empty() {
        let mut feed = TimeSeriesFeed::new(0, 0.5);
        feed.push(Quantity::AngularVelocity(0), "0.5", 1.0);
        feed.emit(&derived(Some(Point2D::new(1.0, 0.0)), 1.0));
        for quantity in Quantity::ALL {
            assert!(feed.window(quantity).is_empty());
        }
    }

    #[test]
    fn test_labels_after_many_steps() {
        let mut feed = TimeSeriesFeed::new(80, 0.5);
        let d = derived(None, 0.0);
        let mut last = String::new();
        for _ in 0..1000 {
            last = feed.emit(&d);
        }
        assert_eq!(last, "500.0");
    }
}
