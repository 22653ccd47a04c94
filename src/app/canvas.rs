//! Pendulum canvas: zoom input, per-frame tick and painting

use eframe::egui;
use crate::core::render::Frame;
use crate::core::{Point2D, Viewport};
use crate::theme::{bob_color, colors, trail_color};
use super::PendulumApp;

impl PendulumApp {
    pub(crate) fn render_canvas(&mut self, ui: &mut egui::Ui, now: f64) {
        let available = ui.available_size();
        let (response, painter) = ui.allocate_painter(available, egui::Sense::hover());
        let rect = response.rect;

        let frame = {
            let mut state = self.state.borrow_mut();
            state.set_canvas_size(rect.width() as f64, rect.height() as f64);
            if response.hovered() {
                handle_zoom_input(ui, rect, &mut state.viewport);
            }
            state.tick(now);
            state.frame()
        };

        paint_frame(&painter, rect.min, &frame);
    }
}

/// Pinch takes precedence over the wheel within one frame.
fn handle_zoom_input(ui: &egui::Ui, rect: egui::Rect, viewport: &mut Viewport) {
    let (touch, scroll, hover) = ui.input(|i| {
        (
            i.multi_touch().map(|t| t.zoom_delta),
            i.raw_scroll_delta.y,
            i.pointer.hover_pos(),
        )
    });

    if let Some(ratio) = touch {
        if ratio != 1.0 {
            viewport.pinch(ratio as f64);
        }
        return;
    }

    if scroll != 0.0 {
        if let Some(pos) = hover {
            let cursor = Point2D::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);
            // Wheel up zooms in
            viewport.zoom_at(cursor, scroll.signum() as f64);
        }
    }
}

fn to_pos(origin: egui::Pos2, p: Point2D) -> egui::Pos2 {
    egui::pos2(origin.x + p.x as f32, origin.y + p.y as f32)
}

fn paint_frame(painter: &egui::Painter, origin: egui::Pos2, frame: &Frame) {
    let grid_stroke = egui::Stroke::new(1.0, colors::GRID);
    for line in &frame.grid {
        painter.line_segment([to_pos(origin, line.from), to_pos(origin, line.to)], grid_stroke);
    }

    for (bob, trail) in frame.trails.iter().enumerate() {
        if trail.len() < 2 {
            continue;
        }
        let points: Vec<egui::Pos2> = trail.iter().map(|&p| to_pos(origin, p)).collect();
        painter.add(egui::Shape::line(
            points,
            egui::Stroke::new(1.5, trail_color(bob)),
        ));
    }

    let arm_stroke = egui::Stroke::new(2.0, colors::ARM);
    for arm in &frame.arms {
        painter.line_segment([to_pos(origin, arm.from), to_pos(origin, arm.to)], arm_stroke);
    }

    painter.circle_filled(to_pos(origin, frame.pivot), 3.0, colors::PIVOT);

    for (bob, disc) in frame.bobs.iter().enumerate() {
        painter.circle_filled(to_pos(origin, disc.center), disc.radius as f32, bob_color(bob));
    }
}
