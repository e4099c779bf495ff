use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Visuals};

pub const BG_PANEL: Color32 = Color32::from_rgb(18, 18, 22);
pub const BG_WIDGET: Color32 = Color32::from_rgb(28, 28, 34);
pub const BG_CANVAS: Color32 = Color32::from_rgb(0, 0, 0);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(190, 190, 195);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(115, 115, 122);

pub const ACCENT_GREEN: Color32 = Color32::from_rgb(60, 170, 80);
pub const ACCENT_RED: Color32 = Color32::from_rgb(200, 60, 60);
pub const ACCENT_ORANGE: Color32 = Color32::from_rgb(200, 140, 50);
pub const ACCENT_BLUE: Color32 = Color32::from_rgb(90, 150, 230);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(50, 50, 62);

// editor canvas
pub const AXIS_GRAY: Color32 = Color32::from_rgb(128, 128, 128);
pub const CURVE_WHITE: Color32 = Color32::WHITE;
pub const MARKER_COLOR: Color32 = Color32::from_rgb(255, 215, 60);

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.window_rounding = Rounding::same(6.0);
    visuals.extreme_bg_color = BG_CANVAS;
    visuals.selection.bg_fill = ACCENT_BLUE.gamma_multiply(0.4);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT_BLUE);
    visuals.warn_fg_color = ACCENT_ORANGE;
    visuals.error_fg_color = ACCENT_RED;

    for widget in [
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
    ] {
        widget.rounding = Rounding::same(4.0);
    }
    visuals.widgets.inactive.bg_fill = BG_WIDGET;
    visuals.widgets.inactive.weak_bg_fill = BG_WIDGET;
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT_BLUE);

    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
        style.spacing.slider_width = 180.0;
        style.text_styles = [
            (TextStyle::Small, FontId::new(11.0, FontFamily::Proportional)),
            (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
            (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
            (TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional)),
            (TextStyle::Monospace, FontId::new(13.0, FontFamily::Monospace)),
        ]
        .into();
    });
}
