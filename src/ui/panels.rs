use egui::{Color32, Context, RichText, ScrollArea, Ui};

use crate::math::examples::PROFILE_PRESETS;
use crate::math::tessellate::{MAX_STEPS, MIN_STEPS};
use crate::math::{InterpolationMode, ProfilePoint};
use crate::ui::state::{ExportStatus, UiState};
use crate::ui::theme::*;

#[derive(Default)]
pub struct UiActions {
    pub add_point: Option<ProfilePoint>,
    pub delete_last: bool,
    pub clear_points: bool,
    pub save_obj: bool,
    pub load_preset: Option<usize>,
    pub reset_camera: bool,
}

/// Counts shown in the panel footer.
#[derive(Clone, Copy, Default)]
pub struct MeshSummary {
    pub points: usize,
    pub vertices: usize,
    pub triangles: usize,
}

pub fn draw_side_panel(ctx: &Context, state: &mut UiState, summary: MeshSummary) -> UiActions {
    let mut actions = UiActions::default();

    egui::SidePanel::right("control_panel")
        .min_width(280.0)
        .max_width(380.0)
        .default_width(300.0)
        .frame(egui::Frame::default().fill(BG_PANEL).inner_margin(16.0))
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.heading(RichText::new("Ruled Surface").strong());
                ui.add_space(4.0);
                ui.label(RichText::new("Surface of revolution about the vertical axis").color(TEXT_MUTED).size(11.0));
                ui.add_space(16.0);

                section_header(ui, "SCENE");
                ui.checkbox(&mut state.draw_scene, "Draw Scene");
                ui.horizontal(|ui| {
                    ui.checkbox(&mut state.show_wireframe, "Wireframe");
                    ui.checkbox(&mut state.show_points, "Points");
                    ui.checkbox(&mut state.show_axes, "Axes");
                });
                ui.checkbox(&mut state.show_editor, "XY Plane editor");
                ui.horizontal(|ui| {
                    ui.label("Color");
                    ui.color_edit_button_rgba_unmultiplied(&mut state.surface_color);
                });
                ui.add_space(16.0);

                section_header(ui, "TESSELLATION");
                ui.label("Mesh Subdivision");
                ui.add(egui::Slider::new(&mut state.steps, MIN_STEPS..=MAX_STEPS));
                ui.horizontal(|ui| {
                    ui.label("Profile:");
                    for mode in [InterpolationMode::Piecewise, InterpolationMode::Segments] {
                        if ui.selectable_label(state.mode == mode, mode.label()).clicked() {
                            state.mode = mode;
                        }
                    }
                });
                ui.add_space(16.0);

                section_header(ui, "PRESET");
                let selected_text = state
                    .selected_preset
                    .and_then(|i| PROFILE_PRESETS.get(i))
                    .map_or("Custom", |p| p.name);
                egui::ComboBox::from_id_salt("profile_presets")
                    .selected_text(selected_text)
                    .width(ui.available_width())
                    .show_ui(ui, |ui| {
                        for (i, preset) in PROFILE_PRESETS.iter().enumerate() {
                            if ui.selectable_label(state.selected_preset == Some(i), preset.name).clicked() {
                                actions.load_preset = Some(i);
                            }
                        }
                    });
                if let Some(preset) = state.selected_preset.and_then(|i| PROFILE_PRESETS.get(i)) {
                    ui.add_space(4.0);
                    ui.label(RichText::new(preset.description).color(TEXT_MUTED).size(11.0).italics());
                }
                ui.add_space(16.0);

                ui.separator();
                ui.add_space(12.0);

                section_header(ui, "EXPORT");
                ui.horizontal(|ui| {
                    ui.label("File:");
                    ui.text_edit_singleline(&mut state.export_path);
                });
                ui.add_space(4.0);
                let pending = matches!(state.export_status, ExportStatus::Pending(_));
                let save = egui::Button::new(RichText::new("Save OBJ").color(BG_PANEL))
                    .fill(ACCENT_GREEN)
                    .min_size(egui::vec2(ui.available_width(), 30.0));
                if ui.add_enabled(!pending && !state.export_path.trim().is_empty(), save).clicked() {
                    actions.save_obj = true;
                }
                export_status(ui, &state.export_status);
                ui.add_space(16.0);

                section_header(ui, "VIEW");
                ui.horizontal(|ui| {
                    ui.checkbox(&mut state.vsync_enabled, "VSync");
                    if ui.button("Reset camera").clicked() {
                        actions.reset_camera = true;
                    }
                });
                ui.add_space(16.0);

                mesh_summary(ui, summary);
            });
        });

    actions
}

fn section_header(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).color(TEXT_MUTED).size(11.0).strong());
    ui.add_space(4.0);
}

fn export_status(ui: &mut Ui, status: &ExportStatus) {
    let (text, color) = match status {
        ExportStatus::Idle => return,
        ExportStatus::Pending(path) => (format!("Saving {}...", path.display()), ACCENT_ORANGE),
        ExportStatus::Saved { path, faces } => (format!("Saved {} ({faces} faces)", path.display()), ACCENT_GREEN),
        ExportStatus::Failed { path, error } => (format!("Could not save {}\n{error}", path.display()), ACCENT_RED),
    };

    ui.add_space(6.0);
    egui::Frame::default()
        .fill(BG_WIDGET)
        .stroke(egui::Stroke::new(1.0, color))
        .rounding(4.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.label(RichText::new(text).color(color).size(11.0));
        });
}

fn mesh_summary(ui: &mut Ui, summary: MeshSummary) {
    section_header(ui, "MESH");
    egui::Frame::default()
        .fill(BG_WIDGET)
        .stroke(egui::Stroke::new(1.0, BORDER_SUBTLE))
        .rounding(6.0)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.style_mut().override_font_id = Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));
            egui::Grid::new("mesh_summary").num_columns(2).spacing([20.0, 4.0]).show(ui, |ui| {
                for (label, value) in [
                    ("Points", summary.points),
                    ("Vertices", summary.vertices),
                    ("Triangles", summary.triangles),
                ] {
                    ui.label(RichText::new(label).color(TEXT_MUTED));
                    ui.label(RichText::new(fmt_num(value)).color(TEXT_PRIMARY));
                    ui.end_row();
                }
            });
        });
}

pub fn draw_help_overlay(ctx: &Context) {
    egui::Area::new(egui::Id::new("help_overlay"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(12.0, -12.0))
        .show(ctx, |ui| {
            egui::Frame::default()
                .fill(Color32::from_black_alpha(180))
                .rounding(6.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.style_mut().override_font_id = Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));
                    ui.label(RichText::new("LMB - Rotate | MMB - Pan | RMB/Scroll - Zoom").color(TEXT_MUTED));
                    ui.label(RichText::new("Backspace - Delete last point | Delete - Clear all").color(TEXT_MUTED));
                });
        });
}

fn fmt_num(n: usize) -> String {
    if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        format!("{}", n)
    }
}
