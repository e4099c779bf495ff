pub mod engine;
pub mod obj;

pub use engine::{ExportEngine, ExportResult};
pub use obj::DEFAULT_OBJ_PATH;
