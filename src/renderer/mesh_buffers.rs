use bytemuck::{Pod, Zeroable};

use crate::math::RevolutionMesh;

const AXIS_LENGTH: f32 = 1.5;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct AxisVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Allocation size for an upload of `size` bytes: the next power of two,
/// capped at the device's `max_buffer_size`. `None` when `size` alone is
/// over the limit.
pub fn buffer_capacity(size: u64, max_size: u64) -> Option<u64> {
    (size <= max_size).then(|| size.next_power_of_two().min(max_size))
}

/// Layers left empty by the last upload because their data did not fit in
/// one buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SkippedLayers {
    pub surface: bool,
    pub wireframe: bool,
}

/// Vertex buffer that grows on demand. The old buffer is destroyed when a
/// larger upload arrives; smaller uploads reuse it.
struct GrowableBuffer {
    label: &'static str,
    buffer: Option<wgpu::Buffer>,
    capacity: u64,
    len: u32,
}

impl GrowableBuffer {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            buffer: None,
            capacity: 0,
            len: 0,
        }
    }

    /// Uploads `data`, growing the buffer if needed. Returns false and
    /// leaves the layer empty when `data` is larger than `max_size`.
    fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[f32],
        floats_per_vertex: usize,
        max_size: u64,
    ) -> bool {
        self.len = 0;
        if data.is_empty() {
            return true;
        }

        let bytes: &[u8] = bytemuck::cast_slice(data);
        let size = bytes.len() as u64;

        if self.buffer.is_none() || size > self.capacity {
            let Some(capacity) = buffer_capacity(size, max_size) else {
                return false;
            };
            if let Some(old) = self.buffer.take() {
                old.destroy();
            }
            self.buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: capacity,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.capacity = capacity;
        }

        if let Some(buffer) = &self.buffer {
            queue.write_buffer(buffer, 0, bytes);
            self.len = (data.len() / floats_per_vertex) as u32;
        }
        true
    }

    fn clear(&mut self) {
        self.len = 0;
    }

    /// Buffer and vertex count, `None` when there is nothing to draw.
    fn drawable(&self) -> Option<(&wgpu::Buffer, u32)> {
        match &self.buffer {
            Some(buffer) if self.len > 0 => Some((buffer, self.len)),
            _ => None,
        }
    }
}

pub struct MeshBuffers {
    positions: GrowableBuffer,
    normals: GrowableBuffer,
    edges: GrowableBuffer,
    axes: wgpu::Buffer,
    axes_count: u32,
}

impl MeshBuffers {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let axes_data = axes_vertices();
        let axes = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Axes Vertex Buffer"),
            size: std::mem::size_of_val(axes_data.as_slice()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&axes, 0, bytemuck::cast_slice(&axes_data));

        Self {
            positions: GrowableBuffer::new("Surface Vertex Buffer"),
            normals: GrowableBuffer::new("Surface Normal Buffer"),
            edges: GrowableBuffer::new("Wireframe Vertex Buffer"),
            axes,
            axes_count: axes_data.len() as u32,
        }
    }

    pub fn upload_mesh(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, mesh: &RevolutionMesh) -> SkippedLayers {
        let max_size = device.limits().max_buffer_size;
        let mut skipped = SkippedLayers::default();

        let surface_fits = self.positions.upload(device, queue, &mesh.vertices, 3, max_size)
            && self.normals.upload(device, queue, &mesh.normals, 3, max_size);
        if !surface_fits {
            self.positions.clear();
            self.normals.clear();
            skipped.surface = true;
        }

        // two line vertices per triangle corner, checked before expanding
        let edge_bytes = (mesh.vertices.len() * 2 * std::mem::size_of::<f32>()) as u64;
        let wireframe_fits = buffer_capacity(edge_bytes, max_size).is_some()
            && self.edges.upload(device, queue, &wireframe_edges(&mesh.vertices), 3, max_size);
        if !wireframe_fits {
            self.edges.clear();
            skipped.wireframe = true;
        }

        skipped
    }

    pub fn surface(&self) -> Option<(&wgpu::Buffer, &wgpu::Buffer, u32)> {
        let (positions, count) = self.positions.drawable()?;
        let (normals, _) = self.normals.drawable()?;
        Some((positions, normals, count))
    }

    pub fn points(&self) -> Option<(&wgpu::Buffer, u32)> {
        self.positions.drawable()
    }

    pub fn wireframe(&self) -> Option<(&wgpu::Buffer, u32)> {
        self.edges.drawable()
    }

    pub fn axes(&self) -> (&wgpu::Buffer, u32) {
        (&self.axes, self.axes_count)
    }
}

/// Expands a flat triangle list into line-list pairs, three edges per
/// triangle.
pub fn wireframe_edges(vertices: &[f32]) -> Vec<f32> {
    let mut edges = Vec::with_capacity(vertices.len() * 2);
    for tri in vertices.chunks_exact(9) {
        let (a, b, c) = (&tri[0..3], &tri[3..6], &tri[6..9]);
        for (from, to) in [(a, b), (b, c), (c, a)] {
            edges.extend_from_slice(from);
            edges.extend_from_slice(to);
        }
    }
    edges
}

pub fn axes_vertices() -> Vec<AxisVertex> {
    let axes = [
        ([AXIS_LENGTH, 0.0, 0.0], [0.9, 0.3, 0.3]),
        ([0.0, AXIS_LENGTH, 0.0], [0.3, 0.9, 0.3]),
        ([0.0, 0.0, AXIS_LENGTH], [0.3, 0.5, 0.9]),
    ];

    axes.iter()
        .flat_map(|&(end, color)| {
            [
                AxisVertex {
                    position: [0.0; 3],
                    color,
                },
                AxisVertex { position: end, color },
            ]
        })
        .collect()
}

pub fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: 12,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    }
}

pub fn normal_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: 12,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        }],
    }
}

pub fn axis_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<AxisVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
        ],
    }
}
