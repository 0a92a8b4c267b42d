//! Shooting stars streaking across the starfield.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::MeteorConfig;
use crate::context::FrameContext;
use crate::surface::{Surface, SurfaceSize};

/// One streak. Inactive until its delay has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct Meteor {
    /// Head of the streak.
    pub position: Vec2,
    pub length: f32,
    /// Pixels per reference tick along each axis.
    pub speed: f32,
    pub width: f32,
    pub opacity: f32,
    pub active: bool,
    /// Seconds to wait after `launched_at`.
    pub delay: f32,
    pub launched_at: f32,
}

impl Meteor {
    /// Tail end of the streak, up and to the right of the head.
    pub fn tail(&self) -> Vec2 {
        self.position + Vec2::new(self.length, -self.length)
    }

    fn is_gone(&self, size: SurfaceSize) -> bool {
        self.position.x < -self.length || self.position.y > size.height as f32 + self.length
    }
}

/// A small fixed pool of meteors, recycled as they leave the surface.
#[derive(Debug, Clone)]
pub struct MeteorShower {
    config: MeteorConfig,
    meteors: Vec<Meteor>,
    size: SurfaceSize,
    rng: StdRng,
}

impl MeteorShower {
    pub fn new<R: Rng + ?Sized>(config: &MeteorConfig, size: SurfaceSize, rng: &mut R) -> Self {
        let mut shower = Self {
            config: config.clone(),
            meteors: Vec::with_capacity(config.count),
            size: size.clamped(),
            rng: StdRng::seed_from_u64(rng.gen()),
        };
        for _ in 0..config.count {
            let meteor = shower.launch(0.0);
            shower.meteors.push(meteor);
        }
        shower
    }

    /// A shower with explicit meteors.
    pub fn with_meteors(config: &MeteorConfig, size: SurfaceSize, meteors: Vec<Meteor>, seed: u64) -> Self {
        Self {
            config: config.clone(),
            meteors,
            size: size.clamped(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn launch(&mut self, now: f32) -> Meteor {
        let config = &self.config;
        let rng = &mut self.rng;
        Meteor {
            position: Vec2::new(rng.gen_range(0.0..self.size.width as f32), 0.0),
            length: config.length.sample(rng),
            speed: config.speed.sample(rng),
            width: config.width.sample(rng),
            opacity: 0.0,
            active: false,
            delay: if config.max_delay > 0.0 {
                rng.gen_range(0.0..config.max_delay)
            } else {
                0.0
            },
            launched_at: now,
        }
    }

    pub fn meteors(&self) -> &[Meteor] {
        &self.meteors
    }

    pub fn update(&mut self, ctx: &FrameContext) {
        for i in 0..self.meteors.len() {
            let m = &mut self.meteors[i];
            if !m.active {
                if ctx.elapsed - m.launched_at >= m.delay {
                    m.active = true;
                }
                continue;
            }
            m.position += Vec2::new(-m.speed, m.speed) * ctx.step;
            m.opacity += self.config.fade_in * ctx.step;
            if m.is_gone(self.size) {
                self.meteors[i] = self.launch(ctx.elapsed);
            }
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        for m in self.meteors.iter().filter(|m| m.active) {
            let alpha = m.opacity.min(self.config.max_alpha);
            surface.line(m.position, m.tail(), self.config.color.with_alpha(alpha), m.width);
        }
    }

    /// Meteors in flight keep their position; new launches use the new width.
    pub fn resize(&mut self, new: SurfaceSize) {
        self.size = new.clamped();
    }
}
