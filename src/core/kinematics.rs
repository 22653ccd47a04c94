//! Derivative estimation from sampled bob positions
//!
//! Finite differences over a fixed nominal `dt` (the poll period, not the
//! measured spacing between samples):
//!
//! - velocity     = (p - p_prev) / dt
//! - acceleration = (v - v_prev) / dt
//! - angular velocity = (θ - θ_prev) / dt, where θ of bob 1 is measured from
//!   the pivot and θ of bob 2 from bob 1
//!
//! Angles are not unwrapped: a crossing of the ±π boundary shows up as a
//! spike of roughly ∓2π/dt in the angular velocity series.

use tracing::{debug, trace};

use super::geometry::Point2D;
use super::snapshot::{Snapshot, BOB_COUNT};

/// Retained per-bob state between samples
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KinematicSample {
    pub position: Point2D,
    /// Absent until two positions have been seen
    pub velocity: Option<Point2D>,
    pub angle: f64,
}

/// Estimator state. `None` until the first sample after a (re)start.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EstimatorState {
    bobs: Option<[KinematicSample; BOB_COUNT]>,
}

impl EstimatorState {
    pub fn is_seeded(&self) -> bool {
        self.bobs.is_some()
    }

    pub fn bob(&self, idx: usize) -> Option<&KinematicSample> {
        self.bobs.as_ref().and_then(|b| b.get(idx))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BobDerivatives {
    pub velocity: Point2D,
    /// Needs two velocities, so absent on the second sample
    pub acceleration: Option<Point2D>,
    /// Signed, rad/s
    pub angular_velocity: f64,
}

impl BobDerivatives {
    pub fn acceleration_magnitude(&self) -> Option<f64> {
        self.acceleration.map(Point2D::length)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Derivatives {
    pub bobs: [BobDerivatives; BOB_COUNT],
}

/// Angles of both links: bob 1 around the pivot, bob 2 around bob 1.
pub fn link_angles(sample: &Snapshot, pivot: Point2D) -> [f64; BOB_COUNT] {
    let [bob1, bob2] = sample.bobs;
    [bob1.angle_from(pivot), bob2.angle_from(bob1)]
}

/// Pure estimator step: `(previous state, new sample, dt) -> (new state, derivative)`.
///
/// The first sample only seeds the state and yields no derivative.
pub fn estimate(
    prev: &EstimatorState,
    sample: &Snapshot,
    pivot: Point2D,
    dt: f64,
) -> (EstimatorState, Option<Derivatives>) {
    let angles = link_angles(sample, pivot);

    let Some(prev_bobs) = prev.bobs else {
        let seeded = [0, 1].map(|i| KinematicSample {
            position: sample.bobs[i],
            velocity: None,
            angle: angles[i],
        });
        trace!("Estimator seeded");
        return (EstimatorState { bobs: Some(seeded) }, None);
    };

    let mut next = prev_bobs;
    let mut derived = [BobDerivatives {
        velocity: Point2D::ZERO,
        acceleration: None,
        angular_velocity: 0.0,
    }; BOB_COUNT];

    for i in 0..BOB_COUNT {
        let last = &prev_bobs[i];
        let position = sample.bobs[i];

        let velocity = (position - last.position) / dt;
        let acceleration = last.velocity.map(|v_prev| (velocity - v_prev) / dt);
        let angular_velocity = (angles[i] - last.angle) / dt;

        next[i] = KinematicSample {
            position,
            velocity: Some(velocity),
            angle: angles[i],
        };
        derived[i] = BobDerivatives {
            velocity,
            acceleration,
            angular_velocity,
        };
    }

    trace!(
        vx1 = derived[0].velocity.x,
        vy1 = derived[0].velocity.y,
        w1 = derived[0].angular_velocity,
        w2 = derived[1].angular_velocity,
        "Derivatives estimated"
    );

    (EstimatorState { bobs: Some(next) }, Some(Derivatives { bobs: derived }))
}

/// Enforces a minimum wall-clock spacing between emissions.
#[derive(Clone, Debug)]
pub struct EmissionThrottle {
    period: f64,
    last_emit: Option<f64>,
}

impl EmissionThrottle {
    pub fn new(period: f64) -> Self {
        Self {
            period,
            last_emit: None,
        }
    }

    /// True (and the period restarts) if at least one period has elapsed
    /// since the last emission.
    pub fn ready(&mut self, now: f64) -> bool {
        let due = self
            .last_emit
            .map_or(true, |last| now - last >= self.period);
        if due {
            self.last_emit = Some(now);
        }
        due
    }
}

/// Estimator plus throttled hand-off to the time-series feed.
///
/// Every new sample updates the state; only the most recent derivative is
/// held, and intermediate ones are overwritten, not averaged.
#[derive(Clone, Debug)]
pub struct DerivativeEstimator {
    state: EstimatorState,
    pending: Option<Derivatives>,
    latest: Option<Derivatives>,
    throttle: EmissionThrottle,
    dt: f64,
}

impl DerivativeEstimator {
    pub fn new(dt: f64, emit_period: f64) -> Self {
        Self {
            state: EstimatorState::default(),
            pending: None,
            latest: None,
            throttle: EmissionThrottle::new(emit_period),
            dt,
        }
    }

    /// Feed one new sample. Returns the derivative, if any was produced.
    pub fn observe(&mut self, sample: &Snapshot, pivot: Point2D) -> Option<Derivatives> {
        let (state, derived) = estimate(&self.state, sample, pivot, self.dt);
        self.state = state;
        if derived.is_some() {
            self.pending = derived;
            self.latest = derived;
        }
        derived
    }

    /// The held derivative if the throttle period has elapsed.
    pub fn poll_emission(&mut self, now: f64) -> Option<Derivatives> {
        if self.pending.is_none() || !self.throttle.ready(now) {
            return None;
        }
        self.pending.take()
    }

    /// Forget all history; the next sample seeds again.
    pub fn reseed(&mut self) {
        debug!("Estimator reseeded");
        self.state = EstimatorState::default();
        self.pending = None;
        self.latest = None;
    }

    pub fn state(&self) -> &EstimatorState {
        &self.state
    }

    /// Most recent derivative, regardless of throttling
    pub fn latest(&self) -> Option<&Derivatives> {
        self.latest.as_ref()
    }
}
