//! Platform-agnostic core - shared between the browser front end and the CLI
//!
//! Nothing in here touches the network, a timer or a display; callers pass
//! poll results and the current time in.

pub mod config;
pub mod control;
pub mod error;
pub mod geometry;
pub mod kinematics;
pub mod render;
pub mod series;
pub mod snapshot;
pub mod state;
pub mod trail;
pub mod viewport;

pub use config::VisConfig;
pub use control::{CommandGate, ControlCommand, ParamsForm, PendulumParams};
pub use error::ClientError;
pub use geometry::Point2D;
pub use kinematics::{estimate, DerivativeEstimator, Derivatives, EstimatorState};
pub use render::Frame;
pub use series::{Quantity, TimeSeriesFeed};
pub use snapshot::{parse_snapshot, Snapshot, SnapshotSlot};
pub use state::{PendulumState, PollStats, TickOutcome};
pub use trail::TrailBuffer;
pub use viewport::Viewport;
