pub mod editor;
pub mod panels;
pub mod state;
pub mod theme;

pub use editor::draw_editor;
pub use panels::{MeshSummary, UiActions, draw_help_overlay, draw_side_panel};
pub use state::{ExportStatus, UiState};
pub use theme::apply_theme;
