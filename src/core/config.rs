//! Runtime configuration
//!
//! All timing and capacity constants live here. Defaults match the server's
//! 40ms cadence; a partial JSON object can override any subset of fields.

use serde::Deserialize;
use tracing::{debug, warn};

/// Default base URL of the simulation server (override with PENDULUM_SERVER)
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

pub const COORDS_PATH: &str = "/coords";
pub const UPDATE_PATH: &str = "/update";
pub const RESET_PATH: &str = "/reset";
pub const RESTART_PATH: &str = "/restart";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct VisConfig {
    /// Base URL prepended to endpoint paths. Empty means same-origin.
    pub server_url: String,
    /// Poll interval, also the nominal `dt` of the derivative estimator
    pub sample_period_ms: u64,
    /// Minimum spacing between time-series emissions
    pub emit_period_ms: u64,
    pub trail_capacity: usize,
    /// Trail quiet period after a control command
    pub trail_quiet_ms: u64,
    pub series_window: usize,
    pub zoom_step: f64,
    pub zoom_min: f64,
    pub zoom_max: f64,
    /// Background grid pitch in world units
    pub grid_size: f64,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            sample_period_ms: 40,
            emit_period_ms: 500,
            trail_capacity: 300,
            trail_quiet_ms: 500,
            series_window: 80,
            zoom_step: 1.1,
            zoom_min: 0.5,
            zoom_max: 5.0,
            grid_size: 20.0,
        }
    }
}

impl VisConfig {
    /// Parse a (possibly partial) JSON override on top of the defaults.
    ///
    /// Invalid JSON is logged and ignored so the caller always gets a usable
    /// config.
    pub fn from_json_overrides(json: &str) -> Self {
        match serde_json::from_str::<VisConfig>(json) {
            Ok(cfg) => {
                let cfg = cfg.validated();
                debug!(?cfg, "Config overrides applied");
                cfg
            }
            Err(e) => {
                warn!(error = %e, "Ignoring invalid config overrides");
                Self::default()
            }
        }
    }

    /// Replace out-of-range fields with their defaults.
    ///
    /// Periods, capacities and windows must be at least 1, the zoom step
    /// above 1, and the zoom bounds finite with `0 < min <= max`.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if self.sample_period_ms == 0 {
            warn!("sample_period_ms must be positive, using default");
            self.sample_period_ms = defaults.sample_period_ms;
        }
        if self.emit_period_ms == 0 {
            warn!("emit_period_ms must be positive, using default");
            self.emit_period_ms = defaults.emit_period_ms;
        }
        if self.trail_capacity == 0 {
            warn!("trail_capacity must be at least 1, using default");
            self.trail_capacity = defaults.trail_capacity;
        }
        if self.series_window == 0 {
            warn!("series_window must be at least 1, using default");
            self.series_window = defaults.series_window;
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            warn!(zoom_step = self.zoom_step, "zoom_step must exceed 1, using default");
            self.zoom_step = defaults.zoom_step;
        }
        let bounds_ok = self.zoom_min.is_finite()
            && self.zoom_max.is_finite()
            && self.zoom_min > 0.0
            && self.zoom_min <= self.zoom_max;
        if !bounds_ok {
            warn!(
                zoom_min = self.zoom_min,
                zoom_max = self.zoom_max,
                "Invalid zoom bounds, using defaults"
            );
            self.zoom_min = defaults.zoom_min;
            self.zoom_max = defaults.zoom_max;
        }
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            warn!(grid_size = self.grid_size, "grid_size must be positive, using default");
            self.grid_size = defaults.grid_size;
        }

        self
    }

    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    /// Full URL for an endpoint path such as [`COORDS_PATH`].
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.server_url.trim_end_matches('/'), path)
    }

    /// Nominal sample period in seconds
    pub fn sample_dt(&self) -> f64 {
        self.sample_period_ms as f64 / 1000.0
    }

    /// Sample period for browser timers, which take an `i32`.
    pub fn timer_period_ms(&self) -> i32 {
        i32::try_from(self.sample_period_ms).unwrap_or_else(|_| {
            let fallback = Self::default().sample_period_ms;
            warn!(
                sample_period_ms = self.sample_period_ms,
                fallback, "Sample period too large for a timer, using default"
            );
            fallback as i32
        })
    }

    pub fn emit_period(&self) -> f64 {
        self.emit_period_ms as f64 / 1000.0
    }

    pub fn trail_quiet(&self) -> f64 {
        self.trail_quiet_ms as f64 / 1000.0
    }
}
