//! Per-frame inputs shared by every layer.

use glam::Vec2;

use crate::input::PointerSnapshot;
use crate::surface::SurfaceSize;

/// Reference tick rate the per-tick constants are tuned for.
pub const REFERENCE_HZ: f32 = 60.0;

/// Everything a layer may read during one update.
///
/// Built once per frame by the scheduler from the pointer snapshot, the
/// surface size and the clock. Layers never see the live pointer state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub pointer: PointerSnapshot,
    pub size: SurfaceSize,
    /// Seconds since start.
    pub elapsed: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
    /// `delta` in reference ticks; 1.0 at 60 Hz.
    pub step: f32,
    pub frame: u64,
}

impl FrameContext {
    pub fn new(pointer: PointerSnapshot, size: SurfaceSize, elapsed: f32, delta: f32, frame: u64) -> Self {
        Self {
            pointer,
            size,
            elapsed,
            delta,
            step: delta * REFERENCE_HZ,
            frame,
        }
    }

    /// A context one reference tick long with no pointer, at time zero.
    pub fn tick(size: SurfaceSize) -> Self {
        Self {
            pointer: PointerSnapshot::ABSENT,
            size,
            elapsed: 0.0,
            delta: 1.0 / REFERENCE_HZ,
            step: 1.0,
            frame: 0,
        }
    }

    pub fn with_pointer(mut self, position: Vec2) -> Self {
        self.pointer = PointerSnapshot::at(position);
        self
    }

    pub fn with_elapsed(mut self, elapsed: f32) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self.delta = step / REFERENCE_HZ;
        self
    }

    /// Pointer in `[-1, 1]`, zero when absent.
    pub fn pointer_normalized(&self) -> Vec2 {
        self.pointer.normalized(self.size)
    }

    /// Pointer offset from the surface center as a fraction of its size.
    pub fn pointer_offset(&self) -> Vec2 {
        self.pointer.centered_offset(self.size)
    }
}
