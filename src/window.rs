//! Windowed host: winit event loop driving a [`Scheduler`] and a GPU
//! [`Presenter`].

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::backdrop::Backdrop;
use crate::error::{OrbitfieldError, PresentError};
use crate::gpu::Presenter;
use crate::raster::Canvas;
use crate::scheduler::{FrameRequest, Scheduler};
use crate::surface::SurfaceSize;
use crate::time::Time;

/// Open a window for `backdrop` and block until it closes.
pub fn run(backdrop: Backdrop) -> Result<(), OrbitfieldError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(backdrop);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App {
    backdrop: Backdrop,
    scheduler: Scheduler<Canvas>,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    pending: Option<FrameRequest>,
    error: Option<OrbitfieldError>,
}

impl App {
    fn new(backdrop: Backdrop) -> Self {
        let scheduler = backdrop.scheduler(Time::new());
        Self {
            backdrop,
            scheduler,
            window: None,
            presenter: None,
            pending: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), OrbitfieldError> {
        let window_config = &self.backdrop.config().window;
        let attrs = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(window_config.width, window_config.height));

        let window = Arc::new(event_loop.create_window(attrs).map_err(PresentError::from)?);
        let presenter = pollster::block_on(Presenter::new(window.clone()))?;

        let canvas = Canvas::new(presenter.size(), self.backdrop.config().background);
        self.pending = self.scheduler.start(Some(canvas));

        window.request_redraw();
        self.window = Some(window);
        self.presenter = Some(presenter);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: OrbitfieldError) {
        tracing::error!(error = %err, "shutting down");
        self.scheduler.stop();
        self.pending = None;
        self.error = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(request) = self.pending.take() {
            self.pending = self.scheduler.run_frame(request);
        }
        let (Some(presenter), Some(canvas)) = (&mut self.presenter, self.scheduler.surface()) else {
            return;
        };

        match presenter.present(canvas) {
            Ok(()) => {}
            Err(PresentError::Acquire(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                tracing::debug!("surface lost, reconfiguring");
                presenter.reconfigure();
            }
            Err(PresentError::Acquire(wgpu::SurfaceError::OutOfMemory)) => {
                self.fail(event_loop, PresentError::Acquire(wgpu::SurfaceError::OutOfMemory).into());
                return;
            }
            Err(err) => tracing::warn!(error = %err, "frame dropped"),
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.init(event_loop) {
                self.fail(event_loop, err);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if self.scheduler.handle_event(&event) {
            return;
        }
        match event {
            WindowEvent::CloseRequested => {
                self.scheduler.stop();
                self.pending = None;
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                let size = SurfaceSize::new(physical_size.width, physical_size.height);
                self.scheduler.on_resize(size.width, size.height);
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(physical_size);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Space => {
                    let time = self.scheduler.time_mut();
                    time.toggle_pause();
                    tracing::info!(paused = time.is_paused(), "pause toggled");
                }
                KeyCode::Escape => {
                    self.scheduler.stop();
                    self.pending = None;
                    event_loop.exit();
                }
                _ => {}
            },
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.scheduler.stop();
    }
}
