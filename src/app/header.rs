//! Header bar: control commands, parameter inputs and status

use eframe::egui;
use crate::core::ControlCommand;
use crate::theme::colors;
use crate::time::now_seconds;
use super::PendulumApp;

impl PendulumApp {
    pub(crate) fn render_header(&mut self, ui: &mut egui::Ui) {
        self.fps_counter.tick();

        ui.horizontal(|ui| {
            if ui.button("Reset").clicked() {
                self.issue_command(ControlCommand::Reset);
            }
            if ui.button("Restart").clicked() {
                self.issue_command(ControlCommand::Restart);
            }

            ui.add_space(10.0);

            let fields: [(&str, &mut String); 5] = [
                ("L1", &mut self.form.length_rod_1),
                ("L2", &mut self.form.length_rod_2),
                ("m1", &mut self.form.mass_bob_1),
                ("m2", &mut self.form.mass_bob_2),
                ("g", &mut self.form.g),
            ];
            for (label, value) in fields {
                ui.label(egui::RichText::new(label).color(colors::TEXT_SECONDARY));
                ui.add(egui::TextEdit::singleline(value).desired_width(48.0));
            }
            if ui.button("Update").clicked() {
                self.submit_update();
            }

            ui.add_space(10.0);

            if ui.button("Reset view").clicked() {
                self.state.borrow_mut().viewport.reset();
            }

            // RIGHT: status (right-to-left order)
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(format!("{:.0} fps", self.fps_counter.fps()))
                        .color(colors::TEXT_SECONDARY)
                        .monospace(),
                );
                ui.label(egui::RichText::new("/").color(colors::TEXT_MUTED));
                ui.label(
                    egui::RichText::new(format!("{:.0} samples/s", self.samples_per_sec))
                        .color(colors::TEXT_MUTED)
                        .monospace(),
                );
                ui.label(egui::RichText::new("/").color(colors::TEXT_MUTED));
                let zoom = self.state.borrow().viewport.zoom();
                ui.label(
                    egui::RichText::new(format!("zoom {:.2}x", zoom))
                        .color(colors::TEXT_MUTED)
                        .monospace(),
                );
                if let Some(pending) = self.command_in_flight() {
                    ui.label(egui::RichText::new("/").color(colors::TEXT_MUTED));
                    ui.label(
                        egui::RichText::new(format!("{pending}..."))
                            .color(colors::TEXT_SECONDARY)
                            .monospace(),
                    );
                }
            });
        });
    }
}

pub struct FpsCounter {
    frames: Vec<f64>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frames: Vec::with_capacity(60),
        }
    }

    pub fn tick(&mut self) {
        let now = now_seconds() * 1000.0;
        self.frames.push(now);
        if self.frames.len() > 60 {
            self.frames.remove(0);
        }
    }

    pub fn fps(&self) -> f64 {
        let (Some(first), Some(last)) = (self.frames.first(), self.frames.last()) else {
            return 0.0;
        };
        let elapsed = last - first;
        if self.frames.len() < 2 || elapsed == 0.0 {
            return 0.0;
        }
        (self.frames.len() as f64 - 1.0) / (elapsed / 1000.0)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
