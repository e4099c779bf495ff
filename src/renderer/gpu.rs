use std::sync::Arc;

use tracing::info;

use crate::math::RevolutionMesh;
use crate::renderer::camera::{Camera, CameraUniform};
use crate::renderer::mesh_buffers::{MeshBuffers, SkippedLayers, axis_layout, normal_layout, position_layout};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.08,
    g: 0.08,
    b: 0.1,
    a: 1.0,
};

#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("cannot create window surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no graphics adapter is compatible with the window surface")]
    NoAdapter,
    #[error("surface reports no supported texture format")]
    NoSurfaceFormat,
    #[error("cannot open graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StyleUniform {
    pub surface_color: [f32; 4],
    pub wire_color: [f32; 4],
    pub point_color: [f32; 4],
}

impl StyleUniform {
    pub fn new(surface_color: [f32; 4]) -> Self {
        Self {
            surface_color,
            wire_color: [0.9, 0.9, 0.9, 1.0],
            point_color: [1.0, 0.85, 0.2, 1.0],
        }
    }
}

/// Which parts of the 3D view to draw this frame.
#[derive(Clone, Copy, Debug)]
pub struct SceneLayers {
    pub surface: bool,
    pub wireframe: bool,
    pub points: bool,
    pub axes: bool,
}

pub struct GpuState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,

    pipeline_surface: wgpu::RenderPipeline,
    pipeline_wireframe: wgpu::RenderPipeline,
    pipeline_points: wgpu::RenderPipeline,
    pipeline_axes: wgpu::RenderPipeline,

    camera_buffer: wgpu::Buffer,
    style_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,

    pub mesh_buffers: MeshBuffers,

    depth_texture: wgpu::TextureView,
}

struct PipelineDesc<'a> {
    label: &'a str,
    vs_entry: &'a str,
    fs_entry: &'a str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    topology: wgpu::PrimitiveTopology,
    depth_compare: wgpu::CompareFunction,
    depth_bias: wgpu::DepthBiasState,
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    desc: PipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(desc.vs_entry),
            buffers: desc.buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(desc.fs_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: desc.depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: desc.depth_bias,
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

impl GpuState {
    pub async fn new(window: Arc<winit::window::Window>, vsync: bool) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        info!(adapter = %adapter_info.name, backend = ?adapter_info.backend, "graphics adapter selected");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders.wgsl").into()),
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let style_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Style Buffer"),
            size: std::mem::size_of::<StyleUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let scene_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: style_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&scene_bind_group_layout],
            push_constant_ranges: &[],
        });

        // surface is pushed back slightly so edges and points drawn on it win
        // the depth test
        let pipeline_surface = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            PipelineDesc {
                label: "Surface Render Pipeline",
                vs_entry: "vs_surface_main",
                fs_entry: "fs_surface_main",
                buffers: &[position_layout(), normal_layout()],
                topology: wgpu::PrimitiveTopology::TriangleList,
                depth_compare: wgpu::CompareFunction::Less,
                depth_bias: wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 1.0,
                    clamp: 0.0,
                },
            },
        );

        let pipeline_wireframe = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            PipelineDesc {
                label: "Wireframe Render Pipeline",
                vs_entry: "vs_line_main",
                fs_entry: "fs_wire_main",
                buffers: &[position_layout()],
                topology: wgpu::PrimitiveTopology::LineList,
                depth_compare: wgpu::CompareFunction::LessEqual,
                depth_bias: wgpu::DepthBiasState::default(),
            },
        );

        let pipeline_points = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            PipelineDesc {
                label: "Points Render Pipeline",
                vs_entry: "vs_line_main",
                fs_entry: "fs_points_main",
                buffers: &[position_layout()],
                topology: wgpu::PrimitiveTopology::PointList,
                depth_compare: wgpu::CompareFunction::LessEqual,
                depth_bias: wgpu::DepthBiasState::default(),
            },
        );

        let pipeline_axes = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            PipelineDesc {
                label: "Axes Render Pipeline",
                vs_entry: "vs_axes_main",
                fs_entry: "fs_axes_main",
                buffers: &[axis_layout()],
                topology: wgpu::PrimitiveTopology::LineList,
                depth_compare: wgpu::CompareFunction::Less,
                depth_bias: wgpu::DepthBiasState::default(),
            },
        );

        let mesh_buffers = MeshBuffers::new(&device, &queue);
        let depth_texture = Self::create_depth_texture(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            pipeline_surface,
            pipeline_wireframe,
            pipeline_points,
            pipeline_axes,
            camera_buffer,
            style_buffer,
            scene_bind_group,
            mesh_buffers,
            depth_texture,
        })
    }

    fn create_depth_texture(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = Self::create_depth_texture(&self.device, &self.config);
        }
    }

    pub fn update_camera(&self, camera: &Camera) {
        let uniform = CameraUniform::from_camera(camera);
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    pub fn update_style(&self, style: StyleUniform) {
        self.queue
            .write_buffer(&self.style_buffer, 0, bytemuck::cast_slice(&[style]));
    }

    pub fn upload_mesh(&mut self, mesh: &RevolutionMesh) -> SkippedLayers {
        self.mesh_buffers.upload_mesh(&self.device, &self.queue, mesh)
    }

    pub fn set_vsync(&mut self, enabled: bool) {
        self.config.present_mode = present_mode(enabled);
        self.surface.configure(&self.device, &self.config);
    }

    pub fn render_scene(&self, view: &wgpu::TextureView, encoder: &mut wgpu::CommandEncoder, layers: SceneLayers) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.scene_bind_group, &[]);

        if layers.axes {
            let (buffer, count) = self.mesh_buffers.axes();
            render_pass.set_pipeline(&self.pipeline_axes);
            render_pass.set_vertex_buffer(0, buffer.slice(..));
            render_pass.draw(0..count, 0..1);
        }

        if layers.surface {
            if let Some((positions, normals, count)) = self.mesh_buffers.surface() {
                render_pass.set_pipeline(&self.pipeline_surface);
                render_pass.set_vertex_buffer(0, positions.slice(..));
                render_pass.set_vertex_buffer(1, normals.slice(..));
                render_pass.draw(0..count, 0..1);
            }
        }

        if layers.wireframe {
            if let Some((edges, count)) = self.mesh_buffers.wireframe() {
                render_pass.set_pipeline(&self.pipeline_wireframe);
                render_pass.set_vertex_buffer(0, edges.slice(..));
                render_pass.draw(0..count, 0..1);
            }
        }

        if layers.points {
            if let Some((positions, count)) = self.mesh_buffers.points() {
                render_pass.set_pipeline(&self.pipeline_points);
                render_pass.set_vertex_buffer(0, positions.slice(..));
                render_pass.draw(0..count, 0..1);
            }
        }
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}
