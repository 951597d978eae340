//! Orator: a lit, textured speaker solid spinning over a floor, with its
//! planar shadow.

mod config;
mod events;
mod frame;
mod state;

use anyhow::Result;
use config::ViewerConfig;
use engine_core::AnimationClock;
use frame::FramePlan;
use glam::{Mat4, Vec3, Vec4};
use input::InputState;
use procgen::{PatchResolutions, ShadowProjection, SpeakerMesh, Strip, SurfacePatch, SurfaceProfile};
use renderer::{Camera, MeshData, Renderer};
use state::SceneState;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

/// Viewer state: GPU resources plus the scene they draw.
pub struct ViewerState {
    renderer: Renderer,
    camera: Camera,
    input: InputState,
    clock: AnimationClock,
    scene: SceneState,
    profile: SurfaceProfile,
    resolutions: PatchResolutions,
    shadow: ShadowProjection,
    shadow_offset: Vec3,
    light: Vec4,
}

impl ViewerState {
    async fn new(window: Arc<Window>, config: &ViewerConfig) -> Result<Self> {
        let profile = config.profile()?;
        let resolutions = config.resolutions()?;

        let texture = config.texture()?;
        log::info!(
            "Speaker needs {} vertices per frame",
            SpeakerMesh::vertex_count_for(&profile, &resolutions)
        );

        // The first build fixes the index buffer; later frames only rewrite vertices.
        let mesh = SpeakerMesh::build(&profile, &resolutions, &Mat4::IDENTITY);
        for patch in SurfacePatch::ALL {
            log::debug!(
                "{}: {} strips, {} triangles",
                patch.name(),
                mesh.strips_for(patch).count(),
                mesh.strips_for(patch).map(Strip::triangle_count).sum::<usize>()
            );
        }
        let solid = MeshData::from_strips(&mesh.strips);
        let floor = MeshData::floor(config.floor_half_extent, config.floor_z);

        let renderer = Renderer::new(window, config.vsync, &texture, &floor, &solid).await?;
        let (width, height) = renderer.dimensions();

        Ok(Self {
            renderer,
            camera: Camera::new(width, height),
            input: InputState::new(),
            clock: AnimationClock::new(config.tick()),
            scene: SceneState::new(config.pose(), config.orbit_step),
            profile,
            resolutions,
            shadow: config.shadow(),
            shadow_offset: config.shadow_offset(),
            light: Vec4::from_array(config.light),
        })
    }

    /// Consume this frame's input, then run the due animation ticks.
    fn update(&mut self) {
        self.scene.apply_input(&self.input);
        self.input.begin_frame();

        let ticks = self.clock.update();
        self.scene.advance(ticks, self.clock.tick_seconds());
    }

    /// Tessellate once in model space and upload; the lit and shadow draws
    /// both read this frame's vertices under their own model matrices.
    fn render(&mut self) -> Result<()> {
        let mesh = SpeakerMesh::build(&self.profile, &self.resolutions, &Mat4::IDENTITY);
        self.renderer.upload_solid(&MeshData::strip_vertices(&mesh.strips))?;

        let plan = FramePlan::new(&self.camera, &self.scene.pose, &self.shadow, self.shadow_offset);
        self.renderer.update_scene(&plan.scene_uniform(self.light));
        let toggles = self.scene.toggles;
        self.renderer
            .render_frame(&plan.draws(&toggles), toggles.shading, toggles.depth_test)?;
        Ok(())
    }
}

/// Application handler for winit.
struct App {
    config: ViewerConfig,
    state: Option<ViewerState>,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        Self { config, state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title(self.config.window_title.clone())
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.window_width,
                    self.config.window_height,
                ));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            match pollster::block_on(ViewerState::new(window.clone(), &self.config)) {
                Ok(s) => {
                    self.state = Some(s);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize viewer: {:#}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) {
                log::info!("Exiting after {} frames", state.clock.frame_count());
                event_loop.exit();
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Orator controls:");
    println!("  Arrow keys  - orbit camera");
    println!("  Left drag   - rotate the speaker");
    println!("  Mouse wheel - zoom");
    println!("  T / S / D   - toggle texture / smooth shading / depth test");
    println!("  Escape      - quit");

    let config = ViewerConfig::load();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
