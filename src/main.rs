use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use glam::Vec2;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

mod config;
mod export;
mod math;
mod renderer;
mod scene;
mod ui;

use config::Args;
use export::ExportEngine;
use math::examples::find_preset;
use math::{PROFILE_PRESETS, Subdivision};
use renderer::{Camera, GpuError, GpuState, SceneLayers, StyleUniform};
use scene::Scene;
use ui::{
    ExportStatus, MeshSummary, UiActions, UiState, apply_theme, draw_editor, draw_help_overlay,
    draw_side_panel,
};

#[derive(Default)]
struct MouseState {
    cursor: Vec2,
    rotating: bool,
    panning: bool,
    zooming: bool,
}

impl MouseState {
    fn release_all(&mut self) {
        self.rotating = false;
        self.panning = false;
        self.zooming = false;
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    egui_state: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    egui_ctx: egui::Context,

    camera: Camera,
    scene: Scene,
    export_engine: ExportEngine,
    ui_state: UiState,
    mouse: MouseState,

    summary: MeshSummary,
    uploaded_generation: Option<u64>,
    last_vsync_state: bool,
    exit_requested: bool,
}

impl App {
    fn new(args: &Args) -> Self {
        let mut scene = Scene::new(Subdivision::new(args.steps), args.mode);
        let mut ui_state = UiState::from_args(args);

        if let Some(name) = &args.preset {
            match find_preset(name) {
                Some(index) => {
                    scene.load_preset(&PROFILE_PRESETS[index]);
                    ui_state.selected_preset = Some(index);
                }
                None => warn!(preset = %name, "unknown preset, starting with an empty profile"),
            }
        }

        Self {
            window: None,
            gpu: None,
            egui_state: None,
            egui_renderer: None,
            egui_ctx: egui::Context::default(),

            camera: Camera::default(),
            scene,
            export_engine: ExportEngine::new(),
            ui_state,
            mouse: MouseState::default(),

            summary: MeshSummary::default(),
            uploaded_generation: None,
            last_vsync_state: args.vsync,
            exit_requested: false,
        }
    }

    fn init_gpu(&mut self, window: Arc<Window>) -> Result<(), GpuError> {
        let gpu = pollster::block_on(GpuState::new(window.clone(), self.ui_state.vsync_enabled))?;

        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            self.egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2048),
        );

        let egui_renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.config.format, None, 1, false);

        apply_theme(&self.egui_ctx);

        let size = window.inner_size();
        self.camera.set_aspect(size.width as f32, size.height as f32);

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.egui_state = Some(egui_state);
        self.egui_renderer = Some(egui_renderer);
        self.scene.invalidate_mesh();

        Ok(())
    }

    fn update(&mut self) {
        self.scene.set_steps(self.ui_state.steps);
        self.scene.set_mode(self.ui_state.mode);

        while let Some(result) = self.export_engine.try_recv_result() {
            self.ui_state.apply_export_result(result);
        }

        let points = self.scene.profile().len();
        let (mesh, _) = self.scene.mesh();
        self.summary = MeshSummary {
            points,
            vertices: mesh.vertex_count(),
            triangles: mesh.triangle_count(),
        };

        // rebuilds can also happen outside update, e.g. in save_obj
        let generation = self.scene.mesh_generation();
        if self.uploaded_generation != Some(generation) {
            if let Some(gpu) = &mut self.gpu {
                let (mesh, _) = self.scene.mesh();
                let skipped = gpu.upload_mesh(mesh);
                self.ui_state.hide_skipped_layers(skipped);
                self.uploaded_generation = Some(generation);
            }
        }
    }

    fn render(&mut self) {
        let (Some(window), Some(egui_state)) = (&self.window, &mut self.egui_state) else {
            return;
        };

        let raw_input = egui_state.take_egui_input(window);

        let summary = self.summary;
        let mut ui_actions = UiActions::default();

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            ui_actions = draw_side_panel(ctx, &mut self.ui_state, summary);
            draw_editor(
                ctx,
                &mut self.ui_state.show_editor,
                self.scene.profile(),
                self.scene.mode(),
                &mut ui_actions,
            );
            draw_help_overlay(ctx);
        });

        self.handle_ui_actions(ui_actions);

        let Some(gpu) = &mut self.gpu else { return };
        let Some(window) = &self.window else { return };
        let Some(egui_state) = &mut self.egui_state else {
            return;
        };
        let Some(egui_renderer) = &mut self.egui_renderer else {
            return;
        };

        egui_state.handle_platform_output(window, full_output.platform_output);

        if self.ui_state.vsync_enabled != self.last_vsync_state {
            gpu.set_vsync(self.ui_state.vsync_enabled);
            self.last_vsync_state = self.ui_state.vsync_enabled;
        }

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.resize(gpu.size);
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                return;
            }
            Err(e) => {
                error!("cannot acquire frame: {e}");
                self.exit_requested = true;
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.update_camera(&self.camera);
        gpu.update_style(StyleUniform::new(self.ui_state.surface_color));

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, delta) in full_output.textures_delta.set {
            egui_renderer.update_texture(&gpu.device, &gpu.queue, id, &delta);
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Main Encoder"),
            });

        egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        let draw = self.ui_state.draw_scene;
        gpu.render_scene(
            &view,
            &mut encoder,
            SceneLayers {
                surface: draw,
                wireframe: draw && self.ui_state.show_wireframe,
                points: draw && self.ui_state.show_points,
                axes: self.ui_state.show_axes,
            },
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        for id in full_output.textures_delta.free {
            egui_renderer.free_texture(&id);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        window.request_redraw();
    }

    fn handle_ui_actions(&mut self, actions: UiActions) {
        if let Some(point) = actions.add_point {
            self.scene.add_point(point);
            self.ui_state.selected_preset = None;
        }

        if actions.delete_last {
            self.scene.remove_last_point();
            self.ui_state.selected_preset = None;
        }

        if actions.clear_points {
            self.scene.clear_points();
            self.ui_state.selected_preset = None;
        }

        if let Some(index) = actions.load_preset {
            if let Some(preset) = PROFILE_PRESETS.get(index) {
                self.scene.load_preset(preset);
                self.ui_state.selected_preset = Some(index);
            }
        }

        if actions.save_obj {
            self.save_obj();
        }

        if actions.reset_camera {
            self.camera.reset();
        }
    }

    fn save_obj(&mut self) {
        let path = PathBuf::from(self.ui_state.export_path.trim());
        let (mesh, _) = self.scene.mesh();
        if mesh.is_empty() {
            warn!(path = %path.display(), "exporting an empty mesh, the profile needs at least two points");
        }
        debug!(path = %path.display(), triangles = mesh.triangle_count(), "export requested");

        self.ui_state.export_status = if self.export_engine.save(path.clone(), &mesh.triangles) {
            ExportStatus::Pending(path)
        } else {
            ExportStatus::Failed {
                error: self
                    .export_engine
                    .last_error()
                    .unwrap_or_else(|| "export worker is not running".to_string()),
                path,
            }
        };
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if !pressed {
            return;
        }

        match key {
            KeyCode::Backspace => {
                self.scene.remove_last_point();
                self.ui_state.selected_preset = None;
            }
            KeyCode::Delete => {
                self.scene.clear_points();
                self.ui_state.selected_preset = None;
            }
            _ => {}
        }
    }

    fn window_extent(&self) -> Vec2 {
        self.gpu
            .as_ref()
            .map(|gpu| Vec2::new(gpu.size.width as f32, gpu.size.height as f32))
            .unwrap_or(Vec2::ONE)
    }

    fn handle_cursor(&mut self, position: PhysicalPosition<f64>) {
        let cursor = Vec2::new(position.x as f32, position.y as f32);
        let delta = cursor - self.mouse.cursor;
        self.mouse.cursor = cursor;

        if self.mouse.rotating {
            let extent = self.window_extent();
            self.camera.rotate_to(cursor, extent);
        }
        if self.mouse.panning {
            self.camera.process_pan(delta);
        }
        if self.mouse.zooming {
            self.camera.process_zoom_drag(delta.y);
        }
    }

    fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => {
                self.mouse.rotating = pressed;
                if pressed {
                    let extent = self.window_extent();
                    self.camera.begin_rotate(self.mouse.cursor, extent);
                } else {
                    self.camera.end_rotate();
                }
            }
            MouseButton::Middle => self.mouse.panning = pressed,
            MouseButton::Right => self.mouse.zooming = pressed,
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("Ruled Surface")
            .with_inner_size(PhysicalSize::new(1280, 800));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("cannot create window: {e}");
                event_loop.exit();
                return;
            }
        };

        if let Err(e) = self.init_gpu(window) {
            error!("graphics initialization failed: {e}");
            event_loop.exit();
            return;
        }

        info!(
            steps = self.scene.subdivision().steps(),
            mode = self.scene.mode().label(),
            output = %self.ui_state.export_path,
            "ready"
        );
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        // a drag that ends over a panel must still end
        if let WindowEvent::MouseInput {
            state: ElementState::Released,
            ..
        } = event
        {
            self.mouse.release_all();
            self.camera.end_rotate();
        }

        if let Some(egui_state) = &mut self.egui_state {
            if let Some(window) = &self.window {
                let response = egui_state.on_window_event(window, &event);
                if response.consumed {
                    return;
                }
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.export_engine.stop();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size);
                    self.camera.set_aspect(size.width as f32, size.height as f32);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.handle_key(key, event.state == ElementState::Pressed);
                }
            }

            WindowEvent::CursorMoved { position, .. } => self.handle_cursor(position),

            WindowEvent::MouseInput { button, state, .. } => {
                self.handle_mouse_button(button, state == ElementState::Pressed);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
                };
                self.camera.process_scroll(scroll);
            }

            WindowEvent::RedrawRequested => {
                self.update();
                self.render();
                if self.exit_requested {
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> color_eyre::Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    debug!(?args, "configuration");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(&args);
    event_loop.run_app(&mut app)?;

    Ok(())
}
