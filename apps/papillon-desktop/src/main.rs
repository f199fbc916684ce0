use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use papillon_common::Resolution;
use papillon_render::{FrameClock, FrameTimer, Preset, RenderConfig};
use papillon_render_wgpu::{GpuContext, WgpuRenderer};
use papillon_scene::{Scene, SceneInspector};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Longest step the animation clock takes in one frame.
const MAX_FRAME_STEP: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "papillon-desktop", about = "Realtime butterfly raymarcher")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Built-in scene preset (meadow or lamppost)
    #[arg(short, long, default_value = "meadow")]
    preset: Preset,

    /// YAML or JSON render config; overrides --preset
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start with the animation paused
    #[arg(long)]
    paused: bool,
}

/// Application state.
struct AppState {
    config: RenderConfig,
    /// `None` when the config came from a file.
    preset: Option<Preset>,
    scene: Scene,
    clock: FrameClock,
    timer: FrameTimer,
    last_frame: Instant,
    show_panel: bool,
    rebuild_pipeline: bool,
    /// Backend and surface format, once the GPU is up.
    gpu_info: Option<String>,
}

impl AppState {
    fn new(config: RenderConfig, preset: Option<Preset>) -> Result<Self> {
        let scene = config.scene()?;
        Ok(Self {
            config,
            preset,
            scene,
            clock: FrameClock::new(),
            timer: FrameTimer::new(120),
            last_frame: Instant::now(),
            show_panel: true,
            rebuild_pipeline: false,
            gpu_info: None,
        })
    }

    /// Swap in a preset. The GPU pipeline is rebuilt before the next frame.
    fn select_preset(&mut self, preset: Preset) {
        if self.preset == Some(preset) {
            return;
        }
        let config = preset.config();
        match config.scene() {
            Ok(scene) => {
                self.config = config;
                self.scene = scene;
                self.preset = Some(preset);
                self.rebuild_pipeline = true;
                tracing::info!(%preset, "preset selected");
            }
            Err(e) => tracing::error!("failed to build {preset} scene: {e}"),
        }
    }

    fn tick(&mut self, now: Instant) {
        let dt = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.timer.record(dt);
        self.clock.advance(dt.min(MAX_FRAME_STEP));
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Space => {
                self.clock.toggle_pause();
                tracing::debug!(paused = self.clock.is_paused(), "pause toggled");
            }
            KeyCode::F1 => {
                self.show_panel = !self.show_panel;
            }
            KeyCode::Digit1 => self.select_preset(Preset::Meadow),
            KeyCode::Digit2 => self.select_preset(Preset::Lamppost),
            KeyCode::ArrowUp => self.clock.set_scale(self.clock.scale() * 2.0),
            KeyCode::ArrowDown => self.clock.set_scale(self.clock.scale() * 0.5),
            _ => {}
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_panel {
            return;
        }

        let time = self.clock.time();
        let summary = SceneInspector::summary(&self.scene, time);

        egui::SidePanel::left("papillon_panel")
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.heading("Papillon");
                ui.separator();
                ui.label(format!(
                    "Scene: {}  Butterflies: {}",
                    summary.variant, summary.instance_count
                ));
                ui.label(format!("Time: {time:.2}s"));
                if let Some(info) = &self.gpu_info {
                    ui.label(format!("GPU: {info}"));
                }
                ui.label(format!(
                    "Frame: {:.2} ms ({:.0} fps)",
                    self.timer.average().as_secs_f64() * 1000.0,
                    self.timer.fps()
                ));
                ui.separator();

                ui.heading("Preset");
                let mut selected = self.preset;
                ui.horizontal(|ui| {
                    for preset in Preset::ALL {
                        ui.selectable_value(&mut selected, Some(preset), preset.name());
                    }
                });
                if let Some(preset) = selected.filter(|p| Some(*p) != self.preset) {
                    self.select_preset(preset);
                }

                ui.separator();
                ui.heading("Animation");
                let label = if self.clock.is_paused() {
                    "Resume (Space)"
                } else {
                    "Pause (Space)"
                };
                if ui.button(label).clicked() {
                    self.clock.toggle_pause();
                }
                let mut scale = self.clock.scale();
                if ui
                    .add(egui::Slider::new(&mut scale, 0.0..=4.0).text("time scale"))
                    .changed()
                {
                    self.clock.set_scale(scale);
                }

                ui.separator();
                egui::CollapsingHeader::new("Butterflies").show(ui, |ui| {
                    for index in 0..self.scene.instance_count() {
                        if let Some(info) =
                            SceneInspector::inspect_instance(&self.scene, index, time)
                        {
                            ui.monospace(info.to_string());
                        }
                    }
                });

                ui.separator();
                ui.small("F1: Toggle Panel | 1/2: Preset | Up/Down: Speed");
            });
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            window: None,
            gpu: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let Resolution { width, height } = self.state.config.resolution;
        let attrs = Window::default_attributes()
            .with_title("Papillon")
            .with_inner_size(PhysicalSize::new(width.max(1), height.max(1)));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let gpu = GpuContext::new(window.clone())?;
        let renderer = WgpuRenderer::new(&gpu.device, gpu.format(), &self.state.config)?;
        self.state.gpu_info = Some(format!(
            "{} {:?}",
            gpu.backend.to_str(),
            renderer.surface_format()
        ));

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.format(), None, 1, false);

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn redraw(&mut self) {
        self.state.tick(Instant::now());

        let (Some(window), Some(gpu), Some(egui_winit), Some(egui_renderer)) = (
            &self.window,
            &self.gpu,
            &mut self.egui_winit,
            &mut self.egui_renderer,
        ) else {
            return;
        };

        if std::mem::take(&mut self.state.rebuild_pipeline) {
            match WgpuRenderer::new(&gpu.device, gpu.format(), &self.state.config) {
                Ok(renderer) => self.renderer = Some(renderer),
                Err(e) => tracing::error!("keeping previous pipeline: {e}"),
            }
        }

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.reconfigure();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let resolution = Resolution::new(gpu.config.width, gpu.config.height);
        if let Some(renderer) = &self.renderer {
            renderer.render(
                &gpu.device,
                &gpu.queue,
                &view,
                &self.state.clock.frame(resolution),
            );
        }

        let raw_input = egui_winit.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            self.state.draw_ui(ctx);
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            tracing::error!("failed to start renderer: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            if egui_winit.on_window_event(window, &event).consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.state.handle_key(key);
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let (config, preset) = match &cli.config {
        Some(path) => (RenderConfig::load(path)?, None),
        None => (cli.preset.config(), Some(cli.preset)),
    };
    let mut state = AppState::new(config, preset)?;
    state.clock.set_paused(cli.paused);

    tracing::info!(scene = state.scene.variant().name(), "papillon-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meadow_state() -> AppState {
        AppState::new(RenderConfig::meadow(), Some(Preset::Meadow)).unwrap()
    }

    #[test]
    fn preset_switch_requests_pipeline_rebuild() {
        let mut state = meadow_state();
        assert!(!state.rebuild_pipeline);

        state.handle_key(KeyCode::Digit2);
        assert_eq!(state.preset, Some(Preset::Lamppost));
        assert_eq!(state.scene.variant().name(), "radial");
        assert!(state.rebuild_pipeline);

        state.rebuild_pipeline = false;
        state.select_preset(Preset::Lamppost);
        assert!(!state.rebuild_pipeline);
    }

    #[test]
    fn space_pauses_the_clock() {
        let mut state = meadow_state();
        state.handle_key(KeyCode::Space);
        assert!(state.clock.is_paused());

        let start = state.last_frame;
        state.tick(start + Duration::from_millis(50));
        assert_eq!(state.clock.time(), 0.0);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut state = meadow_state();
        let start = state.last_frame;
        state.tick(start + Duration::from_secs(5));
        assert!((state.clock.time() - MAX_FRAME_STEP.as_secs_f32()).abs() < 1e-4);
    }
}
