//! Frame timing.
//!
//! [`Time`] turns readings from a [`Clock`] into elapsed time, delta time,
//! frame count and FPS. The clock is injectable: windows run on
//! [`SystemClock`], while tests and headless snapshots use
//! [`FixedStepClock`] so every tick is reproducible.
//!
//! # Example
//!
//! ```
//! use orbitfield::time::{FixedStepClock, Time};
//! use std::time::Duration;
//!
//! let mut time = Time::with_clock(FixedStepClock::new(Duration::from_millis(20)));
//! let (elapsed, delta) = time.update();
//! assert!((delta - 0.02).abs() < 1e-6);
//! assert_eq!(elapsed, delta);
//! ```

use std::fmt;
use std::time::{Duration, Instant};

/// Longest delta a single frame may report, in seconds. A stalled window
/// (dragged, minimized, debugger break) resumes smoothly instead of jumping.
pub const MAX_DELTA: f32 = 0.1;

/// A monotonic time source.
pub trait Clock: fmt::Debug {
    /// Time since the clock's origin.
    fn now(&mut self) -> Duration;
}

/// Wall-clock time from [`Instant`].
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that advances by a fixed step every time it is read.
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    current: Duration,
    step: Duration,
}

impl FixedStepClock {
    pub fn new(step: Duration) -> Self {
        Self {
            current: Duration::ZERO,
            step,
        }
    }

    /// A 60 Hz clock.
    pub fn sixty_hz() -> Self {
        Self::new(Duration::from_secs_f64(1.0 / 60.0))
    }
}

impl Clock for FixedStepClock {
    fn now(&mut self) -> Duration {
        let reading = self.current;
        self.current += self.step;
        reading
    }
}

/// Time tracking for the frame loop.
#[derive(Debug)]
pub struct Time {
    clock: Box<dyn Clock>,
    /// Clock reading at the last update.
    last: Duration,
    /// Scaled seconds accumulated over unpaused frames.
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_window_start: Duration,
    fps_update_interval: Duration,
    paused: bool,
    fixed_delta: Option<f32>,
    time_scale: f32,
}

impl Time {
    /// Time driven by the wall clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        let mut clock: Box<dyn Clock> = Box::new(clock);
        let now = clock.now();
        Self {
            clock,
            last: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_window_start: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            fixed_delta: None,
            time_scale: 1.0,
        }
    }

    /// Update timing values. Call once per frame.
    ///
    /// Returns `(elapsed_time, delta_time)` for convenience.
    pub fn update(&mut self) -> (f32, f32) {
        let now = self.clock.now();
        let raw_delta = now.saturating_sub(self.last).as_secs_f32().min(MAX_DELTA);
        self.last = now;

        if self.paused {
            self.delta_secs = 0.0;
            return (self.elapsed_secs, self.delta_secs);
        }

        self.delta_secs = self.fixed_delta.unwrap_or(raw_delta) * self.time_scale;
        self.elapsed_secs += self.delta_secs;
        self.frame_count += 1;

        let window = now.saturating_sub(self.fps_window_start);
        if window >= self.fps_update_interval {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = frames as f32 / window.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_window_start = now;
        }

        (self.elapsed_secs, self.delta_secs)
    }

    /// Total scaled seconds since start, pauses excluded.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Seconds since the previous frame.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// While paused, `delta()` is 0 and `elapsed()` stops increasing.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Use a fixed delta instead of the measured one. `None` restores real
    /// frame timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// - `1.0` = normal speed
    /// - `0.5` = half speed
    /// - `2.0` = double speed
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Reset counters. The clock keeps running.
    pub fn reset(&mut self) {
        let now = self.clock.now();
        self.last = now;
        self.elapsed_secs = 0.0;
        self.delta_secs = 0.0;
        self.frame_count = 0;
        self.fps = 0.0;
        self.fps_frame_count = 0;
        self.fps_window_start = now;
        self.paused = false;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
