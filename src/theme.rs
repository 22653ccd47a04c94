//! Dark theme with a light grid, red/blue bobs and faded trails

use egui::Color32;

pub mod colors {
    use super::Color32;

    // === Backgrounds ===
    pub const BG_PRIMARY: Color32 = Color32::from_rgb(0, 0, 0);
    pub const BG_ELEVATED: Color32 = Color32::from_rgb(12, 12, 12);
    pub const BG_HOVER: Color32 = Color32::from_rgb(24, 24, 24);

    // === Text ===
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(255, 255, 255);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 160, 160);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(80, 80, 80);

    pub const BORDER: Color32 = Color32::from_rgb(40, 40, 40);

    // === Pendulum canvas ===
    pub const GRID: Color32 = Color32::from_rgb(28, 28, 28);
    pub const ARM: Color32 = Color32::from_rgb(200, 200, 200);
    pub const PIVOT: Color32 = Color32::from_rgb(120, 120, 120);
    pub const BOB_1: Color32 = Color32::from_rgb(220, 60, 60);
    pub const BOB_2: Color32 = Color32::from_rgb(70, 110, 230);
    /// Trails reuse the bob hue at this alpha
    pub const TRAIL_ALPHA: u8 = 110;
}

/// Trail colour for a bob
pub fn trail_color(bob: usize) -> Color32 {
    let base = bob_color(bob);
    Color32::from_rgba_unmultiplied(base.r(), base.g(), base.b(), colors::TRAIL_ALPHA)
}

pub fn bob_color(bob: usize) -> Color32 {
    if bob == 0 {
        colors::BOB_1
    } else {
        colors::BOB_2
    }
}

/// Create minimal dark egui Visuals
pub fn minimal_visuals() -> egui::Visuals {
    use colors::*;

    let mut visuals = egui::Visuals::dark();

    visuals.panel_fill = BG_PRIMARY;
    visuals.window_fill = BG_PRIMARY;
    visuals.extreme_bg_color = BG_ELEVATED;
    visuals.faint_bg_color = BG_ELEVATED;

    visuals.override_text_color = Some(TEXT_PRIMARY);

    visuals.widgets.noninteractive.bg_fill = BG_PRIMARY;
    visuals.widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, TEXT_MUTED);
    visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, BORDER);

    visuals.widgets.inactive.bg_fill = BG_PRIMARY;
    visuals.widgets.inactive.fg_stroke = egui::Stroke::new(1.0, TEXT_SECONDARY);
    visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.0, BORDER);
    visuals.widgets.inactive.weak_bg_fill = BG_PRIMARY;

    visuals.widgets.hovered.bg_fill = BG_ELEVATED;
    visuals.widgets.hovered.fg_stroke = egui::Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, TEXT_MUTED);
    visuals.widgets.hovered.weak_bg_fill = BG_ELEVATED;

    visuals.widgets.active.bg_fill = BG_HOVER;
    visuals.widgets.active.fg_stroke = egui::Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.active.bg_stroke = egui::Stroke::new(1.0, TEXT_SECONDARY);
    visuals.widgets.active.weak_bg_fill = BG_HOVER;

    visuals.selection.bg_fill = Color32::from_rgb(60, 60, 60);
    visuals.selection.stroke = egui::Stroke::new(1.0, TEXT_PRIMARY);

    // Flat
    visuals.window_shadow = egui::Shadow::NONE;
    visuals.popup_shadow = egui::Shadow::NONE;

    visuals
}
