//! Headless CLI for the pendulum visualization pipeline
//!
//! Run with: cargo run --features cli --bin pendulum-cli
//!
//! Without arguments it polls the server, runs the derivative estimator and
//! logs stats. `reset`, `restart` and `update <l1> <l2> <m1> <m2> <g>` send a
//! single control command and exit.

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use parking_lot::Mutex;
    use pendulum_vis::core::series::Quantity;
    use pendulum_vis::core::{ControlCommand, ParamsForm, PendulumState, VisConfig};
    use pendulum_vis::remote_native::{send_command, spawn_sampler};
    use pendulum_vis::time::now_seconds;
    use std::sync::Arc;
    use std::time::Duration;
    use tracing::{error, info};
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pendulum_vis=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let mut config = std::env::var("PENDULUM_CONFIG")
        .map(|json| VisConfig::from_json_overrides(&json))
        .unwrap_or_default();
    if let Ok(url) = std::env::var("PENDULUM_SERVER") {
        config = config.with_server_url(url);
    }
    info!(server = %config.server_url, "Config resolved");

    let agent = ureq::Agent::new_with_defaults();
    let args: Vec<String> = std::env::args().skip(1).collect();

    let command = match args.first().map(String::as_str) {
        None => None,
        Some("reset") => Some(ControlCommand::Reset),
        Some("restart") => Some(ControlCommand::Restart),
        Some("update") => {
            let field = |i: usize| args.get(i).cloned().unwrap_or_default();
            let form = ParamsForm {
                length_rod_1: field(1),
                length_rod_2: field(2),
                mass_bob_1: field(3),
                mass_bob_2: field(4),
                g: field(5),
            };
            Some(ControlCommand::Update(form.validate()?))
        }
        Some(other) => {
            error!(command = other, "Unknown command (expected reset, restart or update)");
            std::process::exit(2);
        }
    };

    if let Some(command) = command {
        let cfg = config.clone();
        let result =
            tokio::task::spawn_blocking(move || send_command(&agent, &cfg, &command)).await?;
        match result {
            Ok(body) => info!(response = %body, "Command sent"),
            Err(e) => error!(error = %e, "Command failed"),
        }
        return Ok(());
    }

    let state = Arc::new(Mutex::new(PendulumState::new(config.clone())));
    let _sampler = spawn_sampler(agent, &config, state.clone());

    // Stand-in for the display refresh that drives the tick in the browser
    let mut frame_interval = tokio::time::interval(Duration::from_millis(16));
    let mut stats_interval = tokio::time::interval(Duration::from_secs(5));
    let mut last_stats = state.lock().poll_stats();

    info!("Polling, press Ctrl-C to stop");

    loop {
        tokio::select! {
            _ = frame_interval.tick() => {
                let outcome = state.lock().tick(now_seconds());
                if let Some(label) = outcome.emitted {
                    let s = state.lock();
                    let feed = s.feed();
                    tracing::debug!(
                        t = %label,
                        a1 = ?feed.latest(Quantity::Acceleration(0)),
                        a2 = ?feed.latest(Quantity::Acceleration(1)),
                        w1 = ?feed.latest(Quantity::AngularVelocity(0)),
                        w2 = ?feed.latest(Quantity::AngularVelocity(1)),
                        "emission"
                    );
                }
            }
            _ = stats_interval.tick() => {
                let s = state.lock();
                let stats = s.poll_stats();
                info!(
                    polls_ok = stats.accepted,
                    polls_failed = stats.failed,
                    polls_per_sec = %format!("{:.1}", (stats.accepted - last_stats.accepted) as f64 / 5.0),
                    trail1 = s.trail(0).len(),
                    trail2 = s.trail(1).len(),
                    sim_time = s.feed().sim_time(),
                    "stats"
                );
                last_stats = stats;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping");
                break;
            }
        }
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
