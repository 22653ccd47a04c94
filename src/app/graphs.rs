//! Derivative charts: one rolling line chart per plotted quantity

use eframe::egui;
use egui_plot::{GridMark, Line, Plot, PlotPoints};
use std::ops::RangeInclusive;
use crate::core::Quantity;
use crate::theme::{bob_color, colors};
use super::PendulumApp;

impl PendulumApp {
    pub(crate) fn render_graphs(&self, ui: &mut egui::Ui) {
        let available = ui.available_size();
        let count = Quantity::ALL.len() as f32;
        let graph_height = ((available.y - 8.0 * count) / count).max(40.0);

        for quantity in Quantity::ALL {
            ui.allocate_ui(egui::vec2(available.x, graph_height), |ui| {
                self.render_series(ui, quantity);
            });
            ui.add_space(4.0);
        }
    }

    fn render_series(&self, ui: &mut egui::Ui, quantity: Quantity) {
        let (labels, values): (Vec<String>, Vec<f64>) = {
            let state = self.state.borrow();
            state
                .feed()
                .window(quantity)
                .iter()
                .map(|p| (p.label.clone(), p.value))
                .unzip()
        };

        let title = match values.last() {
            Some(v) => format!("{} ({}): {:.2}", quantity.title(), quantity.unit(), v),
            None => format!("{} ({})", quantity.title(), quantity.unit()),
        };
        ui.label(egui::RichText::new(title).color(colors::TEXT_MUTED).size(12.0));

        let bob = match quantity {
            Quantity::Acceleration(bob) | Quantity::AngularVelocity(bob) => bob,
        };
        let window = self.config.series_window.max(1) as f64;

        // Points are plotted by index; the axis shows the sim-time label
        let axis_labels = labels.clone();
        Plot::new(("series", quantity.title()))
            .show_axes([true, true])
            .show_grid(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .show_background(false)
            .include_x(0.0)
            .include_x(window)
            .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                let idx = mark.value.round();
                if idx < 0.0 || idx != mark.value {
                    return String::new();
                }
                axis_labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .label_formatter(move |_name, value| {
                let idx = value.x.round();
                let t = if idx >= 0.0 {
                    labels.get(idx as usize).map(String::as_str).unwrap_or("")
                } else {
                    ""
                };
                format!("t={} {:.2}", t, value.y)
            })
            .show(ui, |plot_ui| {
                if values.len() < 2 {
                    return;
                }
                let points: PlotPoints = values
                    .iter()
                    .enumerate()
                    .map(|(x, &y)| [x as f64, y])
                    .collect();
                plot_ui.line(Line::new(points).color(bob_color(bob)).width(1.5));
            });
    }
}
