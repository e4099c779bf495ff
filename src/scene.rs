use tracing::debug;

use crate::math::examples::ProfilePreset;
use crate::math::memo::Memoized;
use crate::math::{InterpolationMode, ProfileCurve, ProfilePoint, RevolutionMesh, Subdivision, tessellate};

#[derive(Clone, PartialEq)]
struct MeshKey {
    points: Vec<ProfilePoint>,
    subdivision: Subdivision,
    mode: InterpolationMode,
}

/// Everything the tessellator reads, plus the mesh built from it.
pub struct Scene {
    profile: ProfileCurve,
    subdivision: Subdivision,
    mode: InterpolationMode,
    mesh: Memoized<MeshKey, RevolutionMesh>,
}

impl Scene {
    pub fn new(subdivision: Subdivision, mode: InterpolationMode) -> Self {
        Self {
            profile: ProfileCurve::new(),
            subdivision,
            mode,
            mesh: Memoized::new(),
        }
    }

    pub fn profile(&self) -> &ProfileCurve {
        &self.profile
    }

    pub fn subdivision(&self) -> Subdivision {
        self.subdivision
    }

    pub fn mode(&self) -> InterpolationMode {
        self.mode
    }

    pub fn add_point(&mut self, point: ProfilePoint) {
        debug!(height = point.height, radius = point.radius, "profile point added");
        self.profile.push(point);
    }

    pub fn remove_last_point(&mut self) {
        if let Some(point) = self.profile.remove_last() {
            debug!(height = point.height, radius = point.radius, "profile point removed");
        }
    }

    pub fn clear_points(&mut self) {
        debug!(count = self.profile.len(), "profile cleared");
        self.profile.clear();
    }

    pub fn load_preset(&mut self, preset: &ProfilePreset) {
        debug!(preset = preset.name, "profile preset loaded");
        self.profile.replace_with(preset.profile_points());
    }

    pub fn set_steps(&mut self, steps: u32) {
        self.subdivision = Subdivision::new(steps);
    }

    pub fn set_mode(&mut self, mode: InterpolationMode) {
        self.mode = mode;
    }

    /// Forces the next `mesh` call to rebuild, e.g. after GPU buffers were
    /// recreated and need a fresh upload.
    pub fn invalidate_mesh(&mut self) {
        self.mesh.invalidate();
    }

    /// Bumped on every rebuild. Stays put until the next `mesh` call that
    /// sees changed inputs.
    pub fn mesh_generation(&self) -> u64 {
        self.mesh.generation()
    }

    /// Current mesh, rebuilt from scratch if any input changed since the
    /// previous call. The flag tells whether a rebuild happened.
    pub fn mesh(&mut self) -> (&RevolutionMesh, bool) {
        let key = MeshKey {
            points: self.profile.points().to_vec(),
            subdivision: self.subdivision,
            mode: self.mode,
        };

        let (mesh, rebuilt) = self.mesh.get_or_build(&key, |key| {
            let profile = ProfileCurve::from_points(key.points.iter().copied());
            tessellate(&profile, key.subdivision, key.mode)
        });

        if rebuilt {
            debug!(
                steps = self.subdivision.steps(),
                mode = self.mode.label(),
                triangles = mesh.triangle_count(),
                "mesh rebuilt"
            );
        }

        (mesh, rebuilt)
    }
}
