//! Frame scheduling and lifecycle.
//!
//! The [`Scheduler`] owns the drawing surface, the layers and the pointer
//! state. The host calls [`Scheduler::start`] once a surface exists, then
//! feeds every [`FrameRequest`] it gets back into [`Scheduler::run_frame`]
//! when it is time to paint. Each handle is good for exactly one frame:
//! after [`Scheduler::stop`] (or once a newer handle exists) old handles are
//! ignored, so nothing can update or draw after `stop` returns.
//!
//! ```
//! use orbitfield::prelude::*;
//!
//! let mut scheduler = Backdrop::new()
//!     .with_seed(1)
//!     .scheduler::<Recorder>(Time::with_clock(FixedStepClock::sixty_hz()));
//! let mut next = scheduler.start(Some(Recorder::new(SurfaceSize::new(320, 240))));
//! for _ in 0..3 {
//!     next = next.and_then(|request| scheduler.run_frame(request));
//! }
//! scheduler.stop();
//! assert!(next.and_then(|request| scheduler.run_frame(request)).is_none());
//! ```

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::event::WindowEvent;

use crate::context::FrameContext;
use crate::input::PointerState;
use crate::layer::{Layer, LayerSpawner};
use crate::surface::{Surface, SurfaceSize};
use crate::time::Time;

/// Handle for one scheduled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Running { pending: Option<u64> },
    Stopped,
}

/// Drives update-then-draw for a stack of layers on one surface.
pub struct Scheduler<S: Surface> {
    spawners: Vec<LayerSpawner>,
    layers: Vec<Box<dyn Layer>>,
    surface: Option<S>,
    pointer: PointerState,
    time: Time,
    seed: u64,
    state: State,
    next_request: u64,
}

impl<S: Surface> Scheduler<S> {
    pub fn new(time: Time, seed: u64) -> Self {
        Self {
            spawners: Vec::new(),
            layers: Vec::new(),
            surface: None,
            pointer: PointerState::new(),
            time,
            seed,
            state: State::Idle,
            next_request: 0,
        }
    }

    /// Add a layer, drawn above every layer added before it.
    pub fn with_layer<F>(mut self, spawner: F) -> Self
    where
        F: Fn(SurfaceSize, &mut StdRng) -> Box<dyn Layer> + 'static,
    {
        self.spawners.push(Box::new(spawner));
        self
    }

    /// Take ownership of `surface`, build the layers and schedule the first
    /// frame.
    ///
    /// Without a surface this logs a warning and returns `None`; nothing is
    /// built and the scheduler stays idle. Calling `start` while running is a
    /// no-op.
    pub fn start(&mut self, surface: Option<S>) -> Option<FrameRequest> {
        if matches!(self.state, State::Running { .. }) {
            tracing::warn!("scheduler already running, start ignored");
            return None;
        }
        let Some(mut surface) = surface else {
            tracing::warn!("no drawing surface, animation not started");
            return None;
        };

        let mut size = surface.size();
        if size.is_degenerate() {
            tracing::warn!(width = size.width, height = size.height, "degenerate surface clamped");
            size = size.clamped();
            surface.resize(size);
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        self.layers = self.spawners.iter().map(|spawn| spawn(size, &mut rng)).collect();
        self.surface = Some(surface);
        self.pointer.attach();
        self.time.reset();

        tracing::info!(
            width = size.width,
            height = size.height,
            seed = self.seed,
            layers = ?self.layers.iter().map(|l| l.name()).collect::<Vec<_>>(),
            "scheduler started"
        );
        Some(self.schedule())
    }

    fn schedule(&mut self) -> FrameRequest {
        self.next_request += 1;
        self.state = State::Running {
            pending: Some(self.next_request),
        };
        FrameRequest(self.next_request)
    }

    /// Run the frame for `request`: clear, update every layer, draw every
    /// layer. Returns the handle for the next frame.
    ///
    /// Stale handles and handles issued before [`Scheduler::stop`] do
    /// nothing and return `None`.
    pub fn run_frame(&mut self, request: FrameRequest) -> Option<FrameRequest> {
        match self.state {
            State::Running { pending: Some(id) } if id == request.0 => {}
            _ => {
                tracing::trace!(request = request.0, "ignoring stale frame request");
                return None;
            }
        }
        let surface = self.surface.as_mut()?;

        let pointer = self.pointer.snapshot();
        let size = surface.size();
        let (elapsed, delta) = self.time.update();
        let ctx = FrameContext::new(pointer, size, elapsed, delta, self.time.frame());

        surface.clear();
        for layer in &mut self.layers {
            layer.update(&ctx);
        }
        for layer in &self.layers {
            layer.draw(surface);
        }
        tracing::trace!(frame = ctx.frame, "frame drawn");

        Some(self.schedule())
    }

    /// Resize the surface and let every layer adapt. Each side is brought
    /// into `1..=SurfaceSize::MAX_SIDE`. Animation state is kept.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        let new = SurfaceSize::new(width, height);
        if new.is_degenerate() {
            tracing::debug!(width, height, "degenerate resize clamped");
        }
        let new = new.clamped();
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let old = surface.size();
        if old == new {
            return;
        }
        surface.resize(new);
        for layer in &mut self.layers {
            layer.resize(old, new);
        }
        tracing::info!(width = new.width, height = new.height, "surface resized");
    }

    /// Cancel the pending frame, detach input and drop the layers.
    /// Safe to call more than once.
    pub fn stop(&mut self) {
        if !matches!(self.state, State::Running { .. }) {
            return;
        }
        self.state = State::Stopped;
        self.pointer.detach();
        self.layers.clear();
        tracing::info!(frames = self.time.frame(), "scheduler stopped");
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        self.pointer.move_to(position);
    }

    pub fn pointer_left(&mut self) {
        self.pointer.leave();
    }

    /// Forward a winit event to the pointer state.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        self.pointer.handle_event(event)
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running { .. })
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn time_mut(&mut self) -> &mut Time {
        &mut self.time
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, Recorder};
    use crate::time::FixedStepClock;
    use crate::visuals::Color;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Draws one disc at the pointer and remembers what it saw.
    struct Tracker {
        seen: Rc<RefCell<Vec<FrameContext>>>,
        resized: Rc<RefCell<Vec<SurfaceSize>>>,
    }

    impl Layer for Tracker {
        fn name(&self) -> &'static str {
            "tracker"
        }

        fn update(&mut self, ctx: &FrameContext) {
            self.seen.borrow_mut().push(*ctx);
        }

        fn draw(&self, surface: &mut dyn Surface) {
            surface.fill_circle(Vec2::ZERO, 1.0, Color::WHITE);
        }

        fn resize(&mut self, _old: SurfaceSize, new: SurfaceSize) {
            self.resized.borrow_mut().push(new);
        }
    }

    type Seen = Rc<RefCell<Vec<FrameContext>>>;
    type Resized = Rc<RefCell<Vec<SurfaceSize>>>;

    fn tracking_scheduler() -> (Scheduler<Recorder>, Seen, Resized) {
        let seen: Seen = Rc::default();
        let resized: Resized = Rc::default();
        let (s, r) = (seen.clone(), resized.clone());
        let scheduler = Scheduler::new(Time::with_clock(FixedStepClock::sixty_hz()), 0).with_layer(
            move |_, _| {
                Box::new(Tracker {
                    seen: s.clone(),
                    resized: r.clone(),
                }) as Box<dyn Layer>
            },
        );
        (scheduler, seen, resized)
    }

    #[test]
    fn test_start_without_surface_is_noop() {
        let (mut scheduler, seen, _) = tracking_scheduler();
        assert!(scheduler.start(None).is_none());
        assert!(!scheduler.is_running());
        assert!(scheduler.layers().is_empty());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_frame_clears_then_updates_then_draws() {
        let (mut scheduler, seen, _) = tracking_scheduler();
        let request = scheduler.start(Some(Recorder::new(SurfaceSize::new(100, 50)))).unwrap();
        scheduler.pointer_moved(Vec2::new(10.0, 20.0));
        let next = scheduler.run_frame(request);
        assert!(next.is_some());

        let commands = scheduler.surface().unwrap().commands();
        assert_eq!(commands[0], DrawCommand::Clear);
        assert_eq!(commands.len(), 2);

        let ctx = seen.borrow()[0];
        assert_eq!(ctx.pointer.position, Vec2::new(10.0, 20.0));
        assert_eq!(ctx.size, SurfaceSize::new(100, 50));
        assert_eq!(ctx.frame, 1);
    }

    #[test]
    fn test_stale_request_ignored() {
        let (mut scheduler, seen, _) = tracking_scheduler();
        let first = scheduler.start(Some(Recorder::new(SurfaceSize::new(10, 10)))).unwrap();
        let second = scheduler.run_frame(first).unwrap();
        assert!(scheduler.run_frame(first).is_none());
        assert_eq!(seen.borrow().len(), 1);
        assert!(scheduler.run_frame(second).is_some());
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_stop_is_idempotent_and_final() {
        let (mut scheduler, seen, _) = tracking_scheduler();
        let request = scheduler.start(Some(Recorder::new(SurfaceSize::new(10, 10)))).unwrap();
        let pending = scheduler.run_frame(request).unwrap();
        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_running());

        let before = scheduler.surface().unwrap().commands().len();
        assert!(scheduler.run_frame(pending).is_none());
        assert_eq!(scheduler.surface().unwrap().commands().len(), before);
        assert_eq!(seen.borrow().len(), 1);

        // Input after stop goes nowhere.
        scheduler.pointer_moved(Vec2::new(5.0, 5.0));
        assert!(!scheduler.pointer.snapshot().present);
    }

    #[test]
    fn test_degenerate_surface_and_resize_clamped() {
        let (mut scheduler, _, resized) = tracking_scheduler();
        scheduler.start(Some(Recorder::new(SurfaceSize::new(0, 0)))).unwrap();
        assert_eq!(scheduler.surface().unwrap().size(), SurfaceSize::new(1, 1));

        scheduler.on_resize(0, 300);
        assert_eq!(scheduler.surface().unwrap().size(), SurfaceSize::new(1, 300));
        scheduler.on_resize(1, 300);
        assert_eq!(resized.borrow().as_slice(), &[SurfaceSize::new(1, 300)]);

        let max = SurfaceSize::MAX_SIDE;
        scheduler.on_resize(70_000, 70_000);
        assert_eq!(scheduler.surface().unwrap().size(), SurfaceSize::new(max, max));
    }

    #[test]
    fn test_pointer_sampled_once_per_frame() {
        let (mut scheduler, seen, _) = tracking_scheduler();
        let request = scheduler.start(Some(Recorder::new(SurfaceSize::new(10, 10)))).unwrap();
        scheduler.pointer_moved(Vec2::new(1.0, 1.0));
        scheduler.pointer_moved(Vec2::new(2.0, 3.0));
        let request = scheduler.run_frame(request).unwrap();
        scheduler.pointer_left();
        scheduler.run_frame(request);

        let seen = seen.borrow();
        assert_eq!(seen[0].pointer.position, Vec2::new(2.0, 3.0));
        assert!(!seen[1].pointer.present);
    }
}
