use std::path::PathBuf;

use tracing::warn;

use crate::config::Args;
use crate::export::{DEFAULT_OBJ_PATH, ExportResult};
use crate::math::InterpolationMode;
use crate::math::tessellate::DEFAULT_STEPS;
use crate::renderer::SkippedLayers;

pub const DEFAULT_SURFACE_COLOR: [f32; 4] = [0.35, 0.6, 0.9, 1.0];

#[derive(Clone, Debug, PartialEq)]
pub enum ExportStatus {
    Idle,
    Pending(PathBuf),
    Saved { path: PathBuf, faces: usize },
    Failed { path: PathBuf, error: String },
}

pub struct UiState {
    pub draw_scene: bool,
    pub show_points: bool,
    pub show_wireframe: bool,
    pub show_axes: bool,
    pub show_editor: bool,
    pub surface_color: [f32; 4],

    pub steps: u32,
    pub mode: InterpolationMode,
    pub selected_preset: Option<usize>,

    pub export_path: String,
    pub export_status: ExportStatus,

    pub vsync_enabled: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            draw_scene: true,
            show_points: false,
            show_wireframe: true,
            show_axes: true,
            show_editor: true,
            surface_color: DEFAULT_SURFACE_COLOR,

            steps: DEFAULT_STEPS,
            mode: InterpolationMode::default(),
            selected_preset: None,

            export_path: DEFAULT_OBJ_PATH.to_string(),
            export_status: ExportStatus::Idle,

            vsync_enabled: false,
        }
    }
}

impl UiState {
    pub fn from_args(args: &Args) -> Self {
        Self {
            steps: args.steps,
            mode: args.mode,
            export_path: args.output.display().to_string(),
            vsync_enabled: args.vsync,
            ..Self::default()
        }
    }

    pub fn apply_export_result(&mut self, result: ExportResult) {
        self.export_status = match result {
            ExportResult::Saved { path, stats } => ExportStatus::Saved {
                path,
                faces: stats.faces,
            },
            ExportResult::Failed { path, error } => ExportStatus::Failed { path, error },
        };
    }

    /// Turns off the layers the GPU could not hold so the toggles match what
    /// is drawn. They can be switched back on once the mesh is smaller.
    pub fn hide_skipped_layers(&mut self, skipped: SkippedLayers) {
        if skipped.wireframe && self.show_wireframe {
            warn!("mesh too large for a wireframe buffer, wireframe turned off");
            self.show_wireframe = false;
        }
        if skipped.surface && (self.draw_scene || self.show_points) {
            warn!("mesh too large for a vertex buffer, surface and points turned off");
            self.draw_scene = false;
            self.show_points = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::obj::ObjStats;

    #[test]
    fn export_results_set_status() {
        let mut state = UiState::default();
        state.export_status = ExportStatus::Pending(PathBuf::from("a.obj"));

        state.apply_export_result(ExportResult::Saved {
            path: PathBuf::from("a.obj"),
            stats: ObjStats { vertices: 6, faces: 2 },
        });
        assert_eq!(
            state.export_status,
            ExportStatus::Saved {
                path: PathBuf::from("a.obj"),
                faces: 2
            }
        );

        state.apply_export_result(ExportResult::Failed {
            path: PathBuf::from("b.obj"),
            error: "disk full".to_string(),
        });
        assert_eq!(
            state.export_status,
            ExportStatus::Failed {
                path: PathBuf::from("b.obj"),
                error: "disk full".to_string()
            }
        );
    }

    #[test]
    fn oversized_wireframe_is_switched_off() {
        let mut state = UiState::default();
        state.hide_skipped_layers(SkippedLayers { surface: false, wireframe: true });

        assert!(!state.show_wireframe);
        assert!(state.draw_scene);
    }

    #[test]
    fn oversized_surface_hides_surface_and_points() {
        let mut state = UiState {
            show_points: true,
            ..UiState::default()
        };
        state.hide_skipped_layers(SkippedLayers { surface: true, wireframe: true });

        assert!(!state.draw_scene);
        assert!(!state.show_points);
        assert!(!state.show_wireframe);
        assert!(state.show_axes);
    }

    #[test]
    fn nothing_skipped_changes_nothing() {
        let mut state = UiState::default();
        state.hide_skipped_layers(SkippedLayers::default());
        assert!(state.draw_scene);
        assert!(state.show_wireframe);
    }
}
