//! Pointer input.
//!
//! The host writes the latest pointer position into a [`PointerState`]
//! whenever an event arrives; the scheduler takes one [`PointerSnapshot`] at
//! the start of each frame and every layer reads that copy. Both coordinates
//! are written together, so a frame can never observe half an update.
//!
//! Until the first real event (and again after the pointer leaves the
//! surface) the position sits at an off-surface sentinel, far enough away
//! that no attraction applies.

use glam::Vec2;
use winit::event::WindowEvent;

use crate::surface::SurfaceSize;

/// Position reported while no pointer is over the surface.
pub const OFF_SURFACE: Vec2 = Vec2::new(-1000.0, -1000.0);

/// The pointer as seen by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSnapshot {
    /// Surface pixels, or [`OFF_SURFACE`] when absent.
    pub position: Vec2,
    pub present: bool,
}

impl PointerSnapshot {
    pub const ABSENT: Self = Self {
        position: OFF_SURFACE,
        present: false,
    };

    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            present: true,
        }
    }

    /// Position mapped to `[-1, 1]` on both axes, y pointing down.
    /// Zero when the pointer is absent.
    pub fn normalized(&self, size: SurfaceSize) -> Vec2 {
        if !self.present {
            return Vec2::ZERO;
        }
        let size = size.clamped().as_vec2();
        ((self.position / size - 0.5) * 2.0).clamp(Vec2::NEG_ONE, Vec2::ONE)
    }

    /// Offset from the surface center as a fraction of the surface size,
    /// in `[-0.5, 0.5]` while over the surface. Zero when absent.
    pub fn centered_offset(&self, size: SurfaceSize) -> Vec2 {
        if !self.present {
            return Vec2::ZERO;
        }
        let size = size.clamped();
        (self.position - size.center()) / size.as_vec2()
    }
}

impl Default for PointerSnapshot {
    fn default() -> Self {
        Self::ABSENT
    }
}

/// Latest pointer position written by input events.
#[derive(Debug, Clone)]
pub struct PointerState {
    current: PointerSnapshot,
    attached: bool,
}

impl PointerState {
    pub fn new() -> Self {
        Self {
            current: PointerSnapshot::ABSENT,
            attached: true,
        }
    }

    pub fn move_to(&mut self, position: Vec2) {
        if self.attached && position.is_finite() {
            self.current = PointerSnapshot::at(position);
        }
    }

    /// Back to the off-surface sentinel.
    pub fn leave(&mut self) {
        self.current = PointerSnapshot::ABSENT;
    }

    pub fn snapshot(&self) -> PointerSnapshot {
        self.current
    }

    /// Stop accepting events and forget the last position.
    pub fn detach(&mut self) {
        self.attached = false;
        self.leave();
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// Process a winit window event. Returns true if it was a pointer event.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.move_to(Vec2::new(position.x as f32, position.y as f32));
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.leave();
                true
            }
            _ => false,
        }
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new()
    }
}
