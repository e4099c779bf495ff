use glam::Vec3;
use std::f32::consts::TAU;

use crate::math::interpolate::{InterpolationMode, PiecewiseLinear, ProfileSampler, Segment};
use crate::math::mesh::{RevolutionMesh, Triangle};
use crate::math::profile::ProfileCurve;

pub const MIN_STEPS: u32 = 1;
pub const MAX_STEPS: u32 = 100;
pub const DEFAULT_STEPS: u32 = 12;

/// Number of axial and angular subdivisions, always in `MIN_STEPS..=MAX_STEPS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Subdivision(u32);

impl Subdivision {
    pub fn new(steps: u32) -> Self {
        Self(steps.clamp(MIN_STEPS, MAX_STEPS))
    }

    pub fn steps(self) -> u32 {
        self.0
    }
}

impl Default for Subdivision {
    fn default() -> Self {
        Self(DEFAULT_STEPS)
    }
}

/// Point on the surface of revolution: the profile point at `t` rotated
/// by `v` full turns around the y axis.
pub fn surface_point(profile: &impl ProfileSampler, t: f32, v: f32) -> Vec3 {
    let p = profile.sample(t);
    let angle = TAU * v;
    Vec3::new(p.radius * angle.sin(), p.height, p.radius * angle.cos())
}

/// Appends an `n x n` patch of the revolution of `profile` to `mesh`.
pub fn revolve_into(mesh: &mut RevolutionMesh, profile: &impl ProfileSampler, n: u32) {
    let step = 1.0 / n as f32;
    let at = |i: u32, j: u32| surface_point(profile, i as f32 * step, j as f32 * step);

    for i in 0..n {
        for j in 0..n {
            let p00 = at(i, j);
            let p10 = at(i + 1, j);
            let p11 = at(i + 1, j + 1);
            let p01 = at(i, j + 1);

            mesh.push(Triangle::new(p00, p10, p11));
            mesh.push(Triangle::new(p00, p11, p01));
        }
    }
}

pub fn tessellate(
    curve: &ProfileCurve,
    subdivision: Subdivision,
    mode: InterpolationMode,
) -> RevolutionMesh {
    let n = subdivision.steps();
    let cells = (n * n) as usize;

    match mode {
        InterpolationMode::Piecewise => {
            let profile = PiecewiseLinear::new(curve);
            if profile.knots().len() < 2 {
                return RevolutionMesh::default();
            }

            let mut mesh = RevolutionMesh::with_capacity(cells * 2);
            revolve_into(&mut mesh, &profile, n);
            mesh
        }
        InterpolationMode::Segments => {
            let segments = Segment::chain(curve);
            let mut mesh = RevolutionMesh::with_capacity(cells * 2 * segments.len());
            for segment in &segments {
                revolve_into(&mut mesh, segment, n);
            }
            mesh
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::profile::ProfilePoint;

    fn two_point_curve() -> ProfileCurve {
        ProfileCurve::from_points([ProfilePoint::new(0.0, 0.5), ProfilePoint::new(1.0, 0.2)])
    }

    #[test]
    fn subdivision_is_clamped() {
        assert_eq!(Subdivision::new(0).steps(), MIN_STEPS);
        assert_eq!(Subdivision::new(250).steps(), MAX_STEPS);
        assert_eq!(Subdivision::default().steps(), 12);
    }

    #[test]
    fn signed_zero_heights_give_empty_piecewise_mesh() {
        let curve = ProfileCurve::from_points([ProfilePoint::new(-0.0, 0.3), ProfilePoint::new(0.0, 0.7)]);
        let mesh = tessellate(&curve, Subdivision::new(2), InterpolationMode::Piecewise);
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn two_by_two_scenario() {
        let mesh = tessellate(&two_point_curve(), Subdivision::new(2), InterpolationMode::Piecewise);

        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.vertices.len(), 72);
        assert_eq!(mesh.normals.len(), 72);
        assert_eq!(mesh.triangle_count(), 8);
    }

    #[test]
    fn vertex_count_is_six_per_cell() {
        let curve = ProfileCurve::from_points([
            ProfilePoint::new(-0.6, 0.2),
            ProfilePoint::new(0.1, 0.7),
            ProfilePoint::new(0.8, 0.3),
        ]);

        for n in [1, 3, 12, 100] {
            let mesh = tessellate(&curve, Subdivision::new(n), InterpolationMode::Piecewise);
            assert_eq!(mesh.vertex_count(), (n * n * 6) as usize);
        }
    }

    #[test]
    fn fewer_than_two_points_gives_empty_mesh() {
        let mut curve = ProfileCurve::new();
        for mode in [InterpolationMode::Piecewise, InterpolationMode::Segments] {
            assert!(tessellate(&curve, Subdivision::new(8), mode).is_empty());
        }

        curve.push(ProfilePoint::new(0.2, 0.4));
        for mode in [InterpolationMode::Piecewise, InterpolationMode::Segments] {
            let mesh = tessellate(&curve, Subdivision::new(8), mode);
            assert_eq!(mesh.vertex_count(), 0);
        }
    }

    #[test]
    fn cleared_curve_gives_empty_mesh() {
        let mut curve = ProfileCurve::from_points(
            (0..5).map(|i| ProfilePoint::new(i as f32 * 0.2 - 0.5, 0.3)),
        );
        assert!(!tessellate(&curve, Subdivision::default(), InterpolationMode::Piecewise).is_empty());

        curve.clear();
        let mesh = tessellate(&curve, Subdivision::default(), InterpolationMode::Piecewise);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn segments_emit_one_patch_per_pair() {
        let curve = ProfileCurve::from_points([
            ProfilePoint::new(0.0, 0.5),
            ProfilePoint::new(0.5, 0.1),
            ProfilePoint::new(0.2, 0.8),
            ProfilePoint::new(0.9, 0.4),
        ]);

        let mesh = tessellate(&curve, Subdivision::new(4), InterpolationMode::Segments);
        assert_eq!(mesh.vertex_count(), 4 * 4 * 6 * 3);
    }

    #[test]
    fn both_modes_agree_on_two_points() {
        let curve = two_point_curve();
        let piecewise = tessellate(&curve, Subdivision::new(5), InterpolationMode::Piecewise);
        let segments = tessellate(&curve, Subdivision::new(5), InterpolationMode::Segments);

        assert_eq!(piecewise.vertex_count(), segments.vertex_count());
        for (a, b) in piecewise.vertices.iter().zip(&segments.vertices) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn flat_vertices_match_triangles() {
        let mesh = tessellate(&two_point_curve(), Subdivision::new(3), InterpolationMode::Piecewise);

        for (tri, chunk) in mesh.triangles.iter().zip(mesh.vertices.chunks_exact(9)) {
            let corners: Vec<f32> = tri.corners().iter().flat_map(|c| c.to_array()).collect();
            assert_eq!(corners.as_slice(), chunk);
        }
    }

    #[test]
    fn first_cell_uses_lower_then_upper_corner_order() {
        let curve = two_point_curve();
        let mesh = tessellate(&curve, Subdivision::new(4), InterpolationMode::Piecewise);
        let profile = PiecewiseLinear::new(&curve);

        let p00 = surface_point(&profile, 0.0, 0.0);
        let p10 = surface_point(&profile, 0.25, 0.0);
        let p11 = surface_point(&profile, 0.25, 0.25);
        let p01 = surface_point(&profile, 0.0, 0.25);

        assert_eq!(mesh.triangles[0], Triangle::new(p00, p10, p11));
        assert_eq!(mesh.triangles[1], Triangle::new(p00, p11, p01));
    }

    #[test]
    fn surface_points_lie_on_profile_radius() {
        let curve = two_point_curve();
        let profile = PiecewiseLinear::new(&curve);

        for v in [0.0, 0.1, 0.37, 0.5, 0.9] {
            let p = surface_point(&profile, 0.5, v);
            let radius = (p.x * p.x + p.z * p.z).sqrt();
            assert!((radius - 0.35).abs() < 1e-5);
            assert!((p.y - 0.5).abs() < 1e-6);
        }

        let start = surface_point(&profile, 0.0, 0.0);
        assert!((start - Vec3::new(0.0, 0.0, 0.5)).length() < 1e-6);
    }
}
