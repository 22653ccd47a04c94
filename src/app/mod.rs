//! Browser front end
//!
//! egui app drawing the pendulum canvas and the derivative charts. The
//! sampler and the control requests share [`PendulumState`] with the app
//! through `Rc<RefCell<_>>`; everything runs on the browser's single thread.

mod canvas;
mod graphs;
mod header;

use eframe::egui;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{error, info, warn};

use crate::core::{ClientError, CommandGate, ControlCommand, ParamsForm, PendulumState, VisConfig};
use crate::remote_wasm::{self, Sampler};
use crate::theme::{colors, minimal_visuals};
use crate::time::now_seconds;

pub struct PendulumApp {
    pub(crate) state: Rc<RefCell<PendulumState>>,
    pub(crate) config: VisConfig,
    /// Released by the request future once the server answers
    gate: Rc<RefCell<CommandGate>>,
    /// Polling timer (kept alive)
    #[allow(dead_code)]
    sampler: Option<Sampler>,
    /// Raw text of the parameter inputs
    pub(crate) form: ParamsForm,
    pub(crate) fps_counter: header::FpsCounter,
    /// Snapshots accepted per second (computed each ~1s)
    pub(crate) samples_per_sec: f64,
    diag_last_accepted: u64,
    diag_last_tick: f64,
}

impl PendulumApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: VisConfig) -> Self {
        cc.egui_ctx.set_visuals(minimal_visuals());
        let config = config.validated();

        let state = Rc::new(RefCell::new(PendulumState::new(config.clone())));
        let sampler = match Sampler::start(&config, state.clone()) {
            Ok(sampler) => Some(sampler),
            Err(e) => {
                error!(error = ?e, "Failed to start sampler");
                None
            }
        };

        Self {
            state,
            config,
            gate: Rc::new(RefCell::new(CommandGate::default())),
            sampler,
            form: ParamsForm::with_defaults(),
            fps_counter: header::FpsCounter::new(),
            samples_per_sec: 0.0,
            diag_last_accepted: 0,
            diag_last_tick: now_seconds(),
        }
    }

    /// Issue a control command: local effects first, then the request.
    ///
    /// Dropped with a warning while another command is still in flight.
    pub(crate) fn issue_command(&mut self, command: ControlCommand) {
        if let Err(e) = self.gate.borrow_mut().begin(&command) {
            warn!(command = command.name(), error = %e, "Command dropped");
            return;
        }
        info!(command = command.name(), "Issuing control command");
        self.state.borrow_mut().apply_command(&command, now_seconds());
        remote_wasm::send_command(&self.config, command, self.gate.clone());
    }

    /// Validate the parameter form and issue an update, or alert the user.
    pub(crate) fn submit_update(&mut self) {
        match self.form.validate() {
            Ok(params) => self.issue_command(ControlCommand::Update(params)),
            Err(e @ (ClientError::MissingField(_) | ClientError::InvalidField(_))) => {
                warn!(error = %e, "Update rejected");
                let alerted = web_sys::window()
                    .map(|w| w.alert_with_message("Please enter valid numbers for all fields"));
                match alerted {
                    Some(Ok(())) => {}
                    Some(Err(js)) => warn!(error = ?js, "Failed to show alert"),
                    None => warn!("No window to show alert"),
                }
            }
            Err(e) => error!(error = %e, "Update rejected"),
        }
    }

    pub(crate) fn command_in_flight(&self) -> Option<&'static str> {
        self.gate.borrow().in_flight()
    }

    fn update_diagnostics(&mut self, now: f64) {
        if now - self.diag_last_tick < 1.0 {
            return;
        }
        let accepted = self.state.borrow().poll_stats().accepted;
        let elapsed = now - self.diag_last_tick;
        self.samples_per_sec = (accepted - self.diag_last_accepted) as f64 / elapsed;
        self.diag_last_accepted = accepted;
        self.diag_last_tick = now;
    }
}

impl eframe::App for PendulumApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Continuous animation
        ctx.request_repaint();

        let now = now_seconds();
        self.update_diagnostics(now);

        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::new().fill(colors::BG_PRIMARY).inner_margin(6.0))
            .show(ctx, |ui| {
                self.render_header(ui);
            });

        egui::SidePanel::right("graphs")
            .frame(egui::Frame::new().fill(colors::BG_PRIMARY).inner_margin(6.0))
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| {
                self.render_graphs(ui);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(colors::BG_PRIMARY))
            .show(ctx, |ui| {
                self.render_canvas(ui, now);
            });
    }
}
