//! egui `Visuals` built from a `ThemeColors` palette.

use eframe::egui::{self, Color32, Rounding, Stroke, Visuals};

use super::ThemeColors;

const WIDGET_ROUNDING: f32 = 4.0;
const WINDOW_ROUNDING: f32 = 8.0;

/// Create visuals for either palette; `colors.is_dark()` picks the egui base.
pub fn create_visuals(colors: &ThemeColors) -> Visuals {
    let dark = colors.is_dark();
    let mut visuals = if dark { Visuals::dark() } else { Visuals::light() };

    // ─────────────────────────────────────────────────────────────────────────
    // Backgrounds
    // ─────────────────────────────────────────────────────────────────────────
    visuals.panel_fill = colors.base.background;
    visuals.window_fill = colors.base.background;
    visuals.extreme_bg_color = colors.base.code_background;
    visuals.faint_bg_color = colors.base.surface;
    visuals.code_bg_color = colors.base.code_background;

    // ─────────────────────────────────────────────────────────────────────────
    // Text & Selection
    // ─────────────────────────────────────────────────────────────────────────
    visuals.override_text_color = None;
    visuals.warn_fg_color = colors.ui.warning;
    visuals.error_fg_color = colors.ui.error;
    visuals.hyperlink_color = colors.text.link;
    visuals.selection.bg_fill = colors.base.selection;
    visuals.selection.stroke = Stroke::new(1.0, colors.ui.accent);

    // ─────────────────────────────────────────────────────────────────────────
    // Widgets
    // ─────────────────────────────────────────────────────────────────────────
    let widgets = &mut visuals.widgets;

    widgets.noninteractive.bg_fill = colors.base.surface;
    widgets.noninteractive.weak_bg_fill = colors.base.code_background;
    widgets.noninteractive.bg_stroke = Stroke::new(1.0, colors.base.border_subtle);
    widgets.noninteractive.fg_stroke = Stroke::new(1.0, colors.text.primary);

    widgets.inactive.bg_fill = colors.base.surface;
    widgets.inactive.weak_bg_fill = colors.base.code_background;
    widgets.inactive.bg_stroke = Stroke::new(1.0, colors.base.border);
    widgets.inactive.fg_stroke = Stroke::new(1.0, colors.text.secondary);

    widgets.hovered.bg_fill = colors.base.hover;
    widgets.hovered.weak_bg_fill = colors.base.hover;
    widgets.hovered.bg_stroke = Stroke::new(1.0, colors.ui.accent);
    widgets.hovered.fg_stroke = Stroke::new(1.5, colors.text.primary);

    widgets.active.bg_fill = colors.ui.accent;
    widgets.active.weak_bg_fill = colors.base.selection;
    widgets.active.bg_stroke = Stroke::new(1.0, colors.ui.accent_hover);
    widgets.active.fg_stroke = Stroke::new(2.0, Color32::WHITE);

    widgets.open.bg_fill = colors.base.selection;
    widgets.open.weak_bg_fill = colors.base.selection;
    widgets.open.bg_stroke = Stroke::new(1.0, colors.ui.accent);
    widgets.open.fg_stroke = Stroke::new(1.0, colors.text.primary);

    for state in [
        &mut widgets.noninteractive,
        &mut widgets.inactive,
        &mut widgets.hovered,
        &mut widgets.active,
        &mut widgets.open,
    ] {
        state.rounding = Rounding::same(WIDGET_ROUNDING);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Windows & Popups
    // ─────────────────────────────────────────────────────────────────────────
    // shadows read heavier on the dark palette
    let shadow_alpha = if dark { 80 } else { 25 };
    visuals.window_rounding = Rounding::same(WINDOW_ROUNDING);
    visuals.window_shadow = egui::epaint::Shadow {
        offset: egui::vec2(0.0, 4.0),
        blur: 14.0,
        spread: 0.0,
        color: Color32::from_black_alpha(shadow_alpha),
    };
    visuals.window_stroke = Stroke::new(1.0, colors.base.border);
    visuals.popup_shadow = egui::epaint::Shadow {
        offset: egui::vec2(0.0, 4.0),
        blur: 12.0,
        spread: 0.0,
        color: Color32::from_black_alpha(shadow_alpha + 10),
    };
    visuals.menu_rounding = Rounding::same(WIDGET_ROUNDING);

    visuals.resize_corner_size = 12.0;
    visuals.button_frame = true;
    visuals.striped = true;
    visuals.interact_cursor = Some(egui::CursorIcon::PointingHand);
    visuals.dark_mode = dark;

    visuals
}
