pub mod camera;
pub mod gpu;
pub mod mesh_buffers;

pub use camera::Camera;
pub use gpu::{GpuError, GpuState, SceneLayers, StyleUniform};
pub use mesh_buffers::SkippedLayers;
