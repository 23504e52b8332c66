use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::WINDOW_SIZE;
use crate::gpu::{GpuContext, GridBuffers, TissueRenderer};
use crate::simulation::{Notice, Simulation};

/// Application state: the running experiment and the window showing it
pub struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    grid_buffers: Option<GridBuffers>,
    renderer: Option<TissueRenderer>,
    simulation: Simulation,
    frame_interval: Duration,
    last_step: Instant,
    paused: bool,
    /// Advance once on the next frame even while paused
    single_step: bool,
    notice: Option<Notice>,
}

impl App {
    pub fn new(simulation: Simulation, frame_interval: Duration) -> Self {
        Self {
            window: None,
            gpu: None,
            grid_buffers: None,
            renderer: None,
            simulation,
            frame_interval,
            last_step: Instant::now(),
            paused: false,
            single_step: false,
            notice: None,
        }
    }

    /// Step the simulation if a frame is due; returns true when the grid changed
    fn tick(&mut self) -> bool {
        if self.simulation.is_finished() {
            return false;
        }
        let due = !self.paused && self.last_step.elapsed() >= self.frame_interval;
        if !due && !self.single_step {
            return false;
        }
        self.single_step = false;
        self.last_step = Instant::now();

        if let Some(notice) = self.simulation.advance() {
            self.notice = Some(notice);
        }
        true
    }

    fn render(&self) {
        let (Some(gpu), Some(renderer)) = (&self.gpu, &self.renderer) else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        renderer.draw(&mut encoder, &view);

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    fn upload(&self) {
        if let (Some(gpu), Some(buffers)) = (&self.gpu, &self.grid_buffers) {
            buffers.upload(&gpu.queue, self.simulation.grid());
        }
    }

    fn update_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        let mut title = format!(
            "{} - Time step: {}",
            self.simulation.config().experiment.name(),
            self.simulation.time()
        );
        if let Some(Notice::Defibrillated { time }) = self.notice {
            title.push_str(&format!(" - Defibrillated at {}", time));
        }
        if self.paused {
            title.push_str(" [paused]");
        }
        window.set_title(&title);
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        match key_code {
            KeyCode::Space => {
                self.paused = !self.paused;
                log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
            }
            KeyCode::KeyN => {
                if self.paused {
                    self.single_step = true;
                }
            }
            KeyCode::KeyR => {
                let seed: u64 = rand::random();
                log::info!("Restarting with seed {}", seed);
                self.simulation.restart(seed);
                self.notice = None;
                self.upload();
            }
            _ => {}
        }
        self.update_title();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title(self.simulation.config().experiment.name())
            .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_SIZE, WINDOW_SIZE));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        log::info!("Creating GPU context...");
        let gpu = pollster::block_on(GpuContext::new(window.clone()))?;

        let grid_buffers = GridBuffers::new(&gpu.device, &gpu.queue, self.simulation.grid());
        let renderer = TissueRenderer::new(&gpu.device, gpu.format(), &grid_buffers);

        log::info!("Controls:");
        log::info!("  Space: Pause/resume");
        log::info!("  N: Single step while paused");
        log::info!("  R: Restart with a new seed");
        log::info!("  Escape: Quit");

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.grid_buffers = Some(grid_buffers);
        self.renderer = Some(renderer);
        self.last_step = Instant::now();
        self.update_title();
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("Failed to open viewer: {:#}", e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    if let PhysicalKey::Code(key_code) = event.physical_key {
                        if key_code == KeyCode::Escape {
                            log::info!("Escape pressed, exiting...");
                            event_loop.exit();
                        } else {
                            self.handle_key(key_code);
                        }
                    }
                }
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size);
                }
            }
            WindowEvent::RedrawRequested => {
                if self.tick() {
                    self.upload();
                    self.update_title();
                }
                self.render();

                if self.simulation.is_finished() {
                    log::info!("Run complete after {} steps", self.simulation.time());
                    event_loop.exit();
                } else if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
