//! The "XY Plane" profile editor.
//!
//! A square canvas spanning NDC `[-1, 1]²` with y up. A click adds a profile
//! point whose x is the radius and whose y is the height.

use egui::{Context, Pos2, Rect, RichText, Sense, Shape, Stroke};
use glam::Vec2;

use crate::math::{InterpolationMode, ProfileCurve, ProfilePoint};
use crate::ui::panels::UiActions;
use crate::ui::theme::*;

const MIN_CANVAS: f32 = 200.0;
const MARKER_RADIUS: f32 = 3.5;

pub fn screen_to_ndc(rect: Rect, pos: Pos2) -> Vec2 {
    let center = rect.center();
    Vec2::new(
        (pos.x - center.x) / (rect.width() * 0.5),
        (center.y - pos.y) / (rect.height() * 0.5),
    )
}

pub fn ndc_to_screen(rect: Rect, ndc: Vec2) -> Pos2 {
    let center = rect.center();
    Pos2::new(
        center.x + ndc.x * rect.width() * 0.5,
        center.y - ndc.y * rect.height() * 0.5,
    )
}

/// Points joined the way the tessellator reads them: by height for the
/// piecewise curve, in placement order for independent segments.
fn polyline(curve: &ProfileCurve, mode: InterpolationMode) -> Vec<ProfilePoint> {
    match mode {
        InterpolationMode::Piecewise => curve.knots(),
        InterpolationMode::Segments => curve.points().to_vec(),
    }
}

pub fn draw_editor(
    ctx: &Context,
    open: &mut bool,
    curve: &ProfileCurve,
    mode: InterpolationMode,
    actions: &mut UiActions,
) {
    egui::Window::new("XY Plane")
        .open(open)
        .default_pos(egui::pos2(16.0, 16.0))
        .default_size(egui::vec2(360.0, 400.0))
        .resizable(true)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Delete Last").clicked() {
                    actions.delete_last = true;
                }
                if ui.button("Clear All").clicked() {
                    actions.clear_points = true;
                }
                let hint = if curve.is_empty() {
                    "click to place points".to_string()
                } else {
                    format!("{} points", curve.len())
                };
                ui.label(RichText::new(hint).color(TEXT_MUTED).size(11.0));
            });
            ui.add_space(4.0);

            let side = ui.available_width().min(ui.available_height()).max(MIN_CANVAS);
            let (response, painter) = ui.allocate_painter(egui::vec2(side, side), Sense::click());
            let rect = response.rect;

            painter.rect_filled(rect, 0.0, BG_CANVAS);

            let axis = Stroke::new(1.0, AXIS_GRAY);
            painter.line_segment([ndc_to_screen(rect, Vec2::new(-1.0, 0.0)), ndc_to_screen(rect, Vec2::new(1.0, 0.0))], axis);
            painter.line_segment([ndc_to_screen(rect, Vec2::new(0.0, -1.0)), ndc_to_screen(rect, Vec2::new(0.0, 1.0))], axis);

            let screen: Vec<Pos2> = polyline(curve, mode)
                .iter()
                .map(|p| ndc_to_screen(rect, p.to_ndc()))
                .collect();
            if screen.len() >= 2 {
                painter.add(Shape::line(screen, Stroke::new(1.5, CURVE_WHITE)));
            }

            for point in curve.points() {
                painter.circle_filled(ndc_to_screen(rect, point.to_ndc()), MARKER_RADIUS, MARKER_COLOR);
            }

            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    actions.add_point = Some(ProfilePoint::from_ndc(screen_to_ndc(rect, pos)));
                }
            }
        });
}
