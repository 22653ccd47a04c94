//! Owned visualization state
//!
//! A single owner for the viewport, trails, latest snapshot, estimator and
//! time-series feed. The sampler writes through [`PendulumState::accept_poll`];
//! the animation tick consumes new snapshots with [`PendulumState::tick`].
//! Every time-dependent call takes `now` (app-relative seconds) explicitly.

use tracing::{debug, trace};

use super::config::VisConfig;
use super::control::ControlCommand;
use super::error::Result;
use super::geometry::Point2D;
use super::kinematics::{DerivativeEstimator, Derivatives};
use super::render::{compose_frame, Frame, Scene};
use super::series::TimeSeriesFeed;
use super::snapshot::{Snapshot, SnapshotSlot, BOB_COUNT};
use super::trail::TrailBuffer;
use super::viewport::Viewport;

/// What a single animation tick did
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickOutcome {
    /// A snapshot not seen before was consumed
    pub new_sample: bool,
    /// Label of the time-series emission, if one happened
    pub emitted: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollStats {
    pub accepted: u64,
    pub failed: u64,
}

pub struct PendulumState {
    config: VisConfig,
    pub viewport: Viewport,
    trails: [TrailBuffer; BOB_COUNT],
    slot: SnapshotSlot,
    /// Generation of the last snapshot consumed by `tick`
    seen_generation: u64,
    estimator: DerivativeEstimator,
    feed: TimeSeriesFeed,
    /// World position of the pivot (canvas centre at zoom 1)
    pivot_origin: Point2D,
    canvas_size: Point2D,
    poll_stats: PollStats,
}

impl PendulumState {
    pub fn new(config: VisConfig) -> Self {
        let config = config.validated();
        Self {
            viewport: Viewport::from_config(&config),
            trails: [
                TrailBuffer::new(config.trail_capacity),
                TrailBuffer::new(config.trail_capacity),
            ],
            slot: SnapshotSlot::new(),
            seen_generation: 0,
            estimator: DerivativeEstimator::new(config.sample_dt(), config.emit_period()),
            feed: TimeSeriesFeed::new(config.series_window, config.emit_period()),
            pivot_origin: Point2D::ZERO,
            canvas_size: Point2D::ZERO,
            poll_stats: PollStats::default(),
            config,
        }
    }

    /// Sampler side: fold one poll result into the latest-snapshot slot.
    pub fn accept_poll(&mut self, result: Result<Snapshot>) -> bool {
        let stored = self.slot.accept(result);
        if stored {
            self.poll_stats.accepted += 1;
        } else {
            self.poll_stats.failed += 1;
        }
        stored
    }

    /// Recompute the pivot origin for a resized canvas.
    ///
    /// Existing trail points keep their world positions.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        let size = Point2D::new(width, height);
        if size == self.canvas_size {
            return;
        }
        debug!(width, height, "Canvas resized");
        self.canvas_size = size;
        self.pivot_origin = size / 2.0;
    }

    /// Animation tick: consume the latest snapshot if it is new, extend the
    /// trails, update the estimator, and emit to the feed if the throttle
    /// allows.
    pub fn tick(&mut self, now: f64) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if let Some(snapshot) = self.slot.newer_than(self.seen_generation).cloned() {
            self.seen_generation = self.slot.generation();
            outcome.new_sample = true;

            for (trail, bob) in self.trails.iter_mut().zip(snapshot.bobs.iter()) {
                trail.push(self.pivot_origin + *bob, now);
            }
            // Snapshot positions are already pivot-relative
            self.estimator.observe(&snapshot, Point2D::ZERO);
        }

        if let Some(derived) = self.estimator.poll_emission(now) {
            outcome.emitted = Some(self.feed.emit(&derived));
        }

        trace!(?outcome, "Tick");
        outcome
    }

    /// Local effects of issuing a control command: clear both trails, start
    /// the trail quiet period, blank the canvas and reseed the estimator.
    pub fn apply_command(&mut self, command: &ControlCommand, now: f64) {
        debug!(command = command.name(), now, "Applying control command locally");
        let quiet = self.config.trail_quiet();
        for trail in &mut self.trails {
            trail.clear();
            trail.disable_for(quiet, now);
        }
        self.slot.clear();
        self.seen_generation = self.slot.generation();
        self.estimator.reseed();
    }

    pub fn frame(&self) -> Frame {
        let scene = Scene {
            viewport: &self.viewport,
            pivot: self.pivot_origin,
            snapshot: self.slot.latest(),
            trails: &self.trails,
            grid_size: self.config.grid_size,
        };
        compose_frame(&scene, self.canvas_size)
    }

    pub fn config(&self) -> &VisConfig {
        &self.config
    }

    pub fn trail(&self, bob: usize) -> &TrailBuffer {
        &self.trails[bob]
    }

    pub fn latest_snapshot(&self) -> Option<&Snapshot> {
        self.slot.latest()
    }

    pub fn latest_derivatives(&self) -> Option<&Derivatives> {
        self.estimator.latest()
    }

    pub fn feed(&self) -> &TimeSeriesFeed {
        &self.feed
    }

    pub fn pivot_origin(&self) -> Point2D {
        self.pivot_origin
    }

    pub fn poll_stats(&self) -> PollStats {
        self.poll_stats
    }
}
