pub mod examples;
pub mod interpolate;
pub mod memo;
pub mod mesh;
pub mod profile;
pub mod tessellate;

pub use examples::PROFILE_PRESETS;
pub use interpolate::InterpolationMode;
pub use mesh::{RevolutionMesh, Triangle};
pub use profile::{ProfileCurve, ProfilePoint};
pub use tessellate::{Subdivision, tessellate};
