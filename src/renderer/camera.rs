use glam::{Mat4, Quat, Vec2, Vec3};

const MIN_DISTANCE: f32 = 0.3;
const MAX_DISTANCE: f32 = 20.0;

/// Virtual trackball around the origin.
///
/// The model is rotated by `rotation`, then shifted by `pan` in view space,
/// and viewed from `distance` along +Z.
pub struct Camera {
    pub rotation: Quat,
    pub pan: Vec2,
    pub distance: f32,

    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    pub rotate_sensitivity: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,

    drag_anchor: Option<Vec3>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            rotation: Quat::from_rotation_x(20.0_f32.to_radians()),
            pan: Vec2::ZERO,
            distance: 3.0,

            fov: 45.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.01,
            far: 100.0,

            rotate_sensitivity: 1.2,
            pan_speed: 0.004,
            zoom_speed: 0.01,

            drag_anchor: None,
        }
    }
}

/// Maps a window position onto the unit trackball hemisphere. Points outside
/// the ball land on its rim.
pub fn project_to_sphere(cursor: Vec2, window: Vec2) -> Vec3 {
    let w = window.x.max(1.0);
    let h = window.y.max(1.0);
    let x = (2.0 * cursor.x - w) / w;
    let y = (h - 2.0 * cursor.y) / h;
    let d = (x * x + y * y).sqrt().min(1.0);
    Vec3::new(x, y, (1.001 - d * d).max(0.0).sqrt()).normalize()
}

impl Camera {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(self.pan.x, self.pan.y, -self.distance))
            * Mat4::from_quat(self.rotation)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Eye position in world space.
    pub fn position(&self) -> Vec3 {
        self.view_matrix().inverse().transform_point3(Vec3::ZERO)
    }

    pub fn begin_rotate(&mut self, cursor: Vec2, window: Vec2) {
        self.drag_anchor = Some(project_to_sphere(cursor, window));
    }

    pub fn end_rotate(&mut self) {
        self.drag_anchor = None;
    }

    pub fn rotate_to(&mut self, cursor: Vec2, window: Vec2) {
        let Some(last) = self.drag_anchor else {
            return;
        };

        let current = project_to_sphere(cursor, window);
        let axis = last.cross(current);
        if axis.length_squared() > 1e-12 {
            let angle = last.dot(current).clamp(-1.0, 1.0).acos() * self.rotate_sensitivity;
            // view-space axis, applied before the existing rotation
            self.rotation = (Quat::from_axis_angle(axis.normalize(), angle) * self.rotation).normalize();
        }
        self.drag_anchor = Some(current);
    }

    pub fn process_pan(&mut self, delta: Vec2) {
        let scale = self.pan_speed * self.distance / 3.0;
        self.pan += Vec2::new(delta.x, -delta.y) * scale;
    }

    /// Vertical drag in pixels, downward moves closer.
    pub fn process_zoom_drag(&mut self, delta_y: f32) {
        self.distance = (self.distance - delta_y * self.zoom_speed).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn process_scroll(&mut self, delta: f32) {
        self.distance = (self.distance * 0.9_f32.powf(delta)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn reset(&mut self) {
        let aspect = self.aspect;
        *self = Self {
            aspect,
            ..Self::default()
        };
    }

    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect = width / height;
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub _padding: f32,
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_pos: camera.position().to_array(),
            _padding: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn sphere_projection_is_unit_length() {
        for cursor in [Vec2::ZERO, Vec2::new(400.0, 300.0), Vec2::new(800.0, 0.0), Vec2::new(-50.0, 900.0)] {
            let p = project_to_sphere(cursor, WINDOW);
            assert!((p.length() - 1.0).abs() < 1e-5);
            assert!(p.z >= 0.0);
        }
    }

    #[test]
    fn window_center_faces_viewer() {
        let p = project_to_sphere(WINDOW / 2.0, WINDOW);
        assert!(p.abs_diff_eq(Vec3::Z, 1e-5));
    }

    #[test]
    fn drag_without_anchor_does_nothing() {
        let mut camera = Camera::default();
        let before = camera.rotation;
        camera.rotate_to(Vec2::new(10.0, 10.0), WINDOW);
        assert_eq!(camera.rotation, before);
    }

    #[test]
    fn horizontal_drag_spins_about_vertical_axis() {
        let mut camera = Camera {
            rotation: Quat::IDENTITY,
            ..Camera::default()
        };
        camera.begin_rotate(Vec2::new(400.0, 300.0), WINDOW);
        camera.rotate_to(Vec2::new(500.0, 300.0), WINDOW);

        let (axis, angle) = camera.rotation.to_axis_angle();
        assert!(angle > 0.0);
        assert!(axis.abs_diff_eq(Vec3::Y, 1e-4));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::default();
        camera.process_scroll(1000.0);
        assert_eq!(camera.distance, MIN_DISTANCE);
        camera.process_zoom_drag(-1e6);
        assert_eq!(camera.distance, MAX_DISTANCE);
    }

    #[test]
    fn eye_sits_on_view_axis() {
        let camera = Camera {
            rotation: Quat::IDENTITY,
            ..Camera::default()
        };
        assert!(camera.position().abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), 1e-5));
    }

    #[test]
    fn reset_keeps_aspect() {
        let mut camera = Camera::default();
        camera.set_aspect(1000.0, 500.0);
        camera.process_pan(Vec2::new(30.0, 10.0));
        camera.reset();
        assert_eq!(camera.pan, Vec2::ZERO);
        assert_eq!(camera.aspect, 2.0);
    }
}
