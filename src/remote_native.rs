//! Native HTTP client for the simulation server
//!
//! Blocking ureq calls run on tokio's blocking pool; the sampler ticks on a
//! tokio interval and never waits for an earlier poll to finish.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace};

use crate::core::config::COORDS_PATH;
use crate::core::control::ControlCommand;
use crate::core::error::{ClientError, Result};
use crate::core::snapshot::{parse_snapshot, Snapshot};
use crate::core::{PendulumState, VisConfig};

fn map_err(e: ureq::Error) -> ClientError {
    match e {
        ureq::Error::StatusCode(code) => ClientError::Status(code),
        other => ClientError::Network(other.to_string()),
    }
}

/// `GET /coords`, bypassing caches
pub fn fetch_snapshot(agent: &ureq::Agent, url: &str) -> Result<Snapshot> {
    let mut resp = agent
        .get(url)
        .header("Cache-Control", "no-cache")
        .call()
        .map_err(map_err)?;
    let body = resp.body_mut().read_to_string().map_err(map_err)?;
    parse_snapshot(&body)
}

/// POST a control command and return the (ignored) response body.
pub fn send_command(agent: &ureq::Agent, config: &VisConfig, command: &ControlCommand) -> Result<String> {
    let url = config.endpoint(command.path());
    debug!(url = %url, command = command.name(), "Sending control command");

    let request = agent.post(&url);
    let mut resp = match command.body()? {
        Some(body) => request
            .header("Content-Type", "application/json")
            .send(body.as_bytes()),
        None => request.send_empty(),
    }
    .map_err(map_err)?;
    resp.body_mut().read_to_string().map_err(map_err)
}

/// Spawn the fixed-interval sampler. Results are folded into `state`.
pub fn spawn_sampler(
    agent: ureq::Agent,
    config: &VisConfig,
    state: Arc<Mutex<PendulumState>>,
) -> JoinHandle<()> {
    let url = config.endpoint(COORDS_PATH);
    // tokio rejects a zero period
    let period = Duration::from_millis(config.sample_period_ms.max(1));
    info!(url = %url, period_ms = config.sample_period_ms, "Starting sampler");

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;

            let agent = agent.clone();
            let url = url.clone();
            let state = state.clone();
            tokio::spawn(async move {
                let result = tokio::task::spawn_blocking(move || fetch_snapshot(&agent, &url))
                    .await
                    .unwrap_or_else(|e| Err(ClientError::Network(e.to_string())));
                if let Err(e) = &result {
                    trace!(error = %e, "Poll failed");
                }
                state.lock().accept_poll(result);
            });
        }
    })
}
