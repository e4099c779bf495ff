use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Right-handed unit normal of `a, b, c`, zero for degenerate faces.
    pub fn normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a).normalize_or_zero()
    }

    pub fn corners(&self) -> [Vec3; 3] {
        [self.a, self.b, self.c]
    }
}

/// Output of one tessellation pass. `vertices` and `normals` are flat
/// xyz streams with three vertices per triangle, in the same order as
/// `triangles`.
#[derive(Clone, Debug, Default)]
pub struct RevolutionMesh {
    pub vertices: Vec<f32>,
    pub normals: Vec<f32>,
    pub triangles: Vec<Triangle>,
}

impl RevolutionMesh {
    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(triangles * 9),
            normals: Vec::with_capacity(triangles * 9),
            triangles: Vec::with_capacity(triangles),
        }
    }

    pub fn push(&mut self, triangle: Triangle) {
        let normal = triangle.normal();
        for corner in triangle.corners() {
            self.vertices.extend_from_slice(&corner.to_array());
            self.normals.extend_from_slice(&normal.to_array());
        }
        self.triangles.push(triangle);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}
