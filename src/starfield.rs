//! Starfield particles with pointer attraction.
//!
//! Each particle rests at a base position. Inside the attraction radius the
//! pointer pulls it in with a force that falls off linearly to zero at the
//! radius; outside, it relaxes back toward its base. Opacity oscillates
//! between two bounds forever.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{Span, StarfieldConfig};
use crate::context::FrameContext;
use crate::math::{relax_vec2, MIN_DISTANCE};
use crate::surface::{Surface, SurfaceSize};
use crate::visuals::Color;

/// One starfield point.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Rest position.
    pub base: Vec2,
    pub radius: f32,
    /// Radius used by the last draw, enlarged while attracted.
    pub drawn_radius: f32,
    pub color: Color,
    pub opacity: f32,
    /// Opacity change per reference tick. The sign is the fade direction.
    pub fade_velocity: f32,
    /// Susceptibility to the pointer.
    pub density: f32,
}

impl Particle {
    pub fn new(position: Vec2, radius: f32, color: Color) -> Self {
        Self {
            position,
            base: position,
            radius,
            drawn_radius: radius,
            color,
            opacity: 1.0,
            fade_velocity: 0.0,
            density: 1.0,
        }
    }

    pub fn with_opacity(mut self, opacity: f32, fade_velocity: f32) -> Self {
        self.opacity = opacity;
        self.fade_velocity = fade_velocity;
        self
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }
}

/// Pull from `from` toward `to` for an attraction radius of `radius`.
///
/// Returns the unit direction and the force, `(radius - d) / radius` for
/// `d < radius` and exactly 0 beyond. Coincident points give a zero direction.
pub fn attraction(from: Vec2, to: Vec2, radius: f32) -> (Vec2, f32) {
    let delta = to - from;
    let distance = delta.length();
    if !(distance < radius) {
        return (Vec2::ZERO, 0.0);
    }
    let force = (radius - distance) / radius;
    (delta / distance.max(MIN_DISTANCE), force)
}

/// The full set of starfield particles.
#[derive(Debug, Clone)]
pub struct ParticleField {
    config: StarfieldConfig,
    particles: Vec<Particle>,
    size: SurfaceSize,
    rng: StdRng,
}

impl ParticleField {
    /// Number of particles for a surface: one per `area_per_particle` px².
    pub fn particle_count(config: &StarfieldConfig, size: SurfaceSize) -> usize {
        (size.area() / config.area_per_particle.max(1.0)).floor() as usize
    }

    /// Populate a field sized to `size`.
    pub fn initialize<R: Rng + ?Sized>(config: &StarfieldConfig, size: SurfaceSize, rng: &mut R) -> Self {
        let size = size.clamped();
        let count = Self::particle_count(config, size);
        let mut field = Self {
            config: config.clone(),
            particles: Vec::with_capacity(count),
            size,
            rng: StdRng::seed_from_u64(rng.gen()),
        };
        for _ in 0..count {
            let position = field.random_position();
            let particle = field.random_particle(position);
            field.particles.push(particle);
        }
        tracing::debug!(count, width = size.width, height = size.height, "starfield initialized");
        field
    }

    /// A field with explicit particles.
    pub fn with_particles(config: &StarfieldConfig, size: SurfaceSize, particles: Vec<Particle>, seed: u64) -> Self {
        Self {
            config: config.clone(),
            particles,
            size: size.clamped(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn random_position(&mut self) -> Vec2 {
        let extent = self.size.as_vec2();
        Vec2::new(
            self.rng.gen_range(0.0..extent.x),
            self.rng.gen_range(0.0..extent.y),
        )
    }

    fn random_particle(&mut self, position: Vec2) -> Particle {
        let config = &self.config;
        let rng = &mut self.rng;
        let color = match config.palette.len() {
            0 => Color::WHITE,
            n => config.palette[rng.gen_range(0..n)],
        };
        let radius = config.radius.sample(rng);
        Particle {
            position,
            base: position,
            radius,
            drawn_radius: radius,
            color,
            opacity: Span::new(config.opacity_min, config.opacity_max).sample(rng),
            fade_velocity: config.fade_speed.sample(rng),
            density: config.density.sample(rng),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn config(&self) -> &StarfieldConfig {
        &self.config
    }

    /// Advance every particle by `ctx.step` reference ticks.
    pub fn update(&mut self, ctx: &FrameContext) {
        let step = ctx.step;
        let radius = self.config.attraction_radius;
        let gain = self.config.attraction_gain;
        let boost = self.config.size_boost;
        let return_rate = self.config.return_rate;
        let (min, max) = (self.config.opacity_min, self.config.opacity_max);
        let pointer = ctx.pointer.present.then_some(ctx.pointer.position);

        for i in 0..self.particles.len() {
            let p = &mut self.particles[i];
            let (direction, force) = match pointer {
                Some(target) => attraction(p.position, target, radius),
                None => (Vec2::ZERO, 0.0),
            };
            if force > 0.0 {
                p.position += direction * force * p.density * gain * step;
                p.drawn_radius = p.radius * (1.0 + force * boost);
            } else {
                p.position = relax_vec2(p.position, p.base, return_rate, step);
                p.drawn_radius = p.radius;
            }

            p.opacity += p.fade_velocity * step;
            if p.opacity >= max {
                p.opacity = max;
                p.fade_velocity = -p.fade_velocity.abs();
            } else if p.opacity <= min {
                p.opacity = min;
                p.fade_velocity = p.fade_velocity.abs();
                if self.config.reseed_on_fade {
                    let base = self.random_position();
                    let p = &mut self.particles[i];
                    p.base = base;
                    p.position = base;
                }
            }
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        for p in &self.particles {
            surface.fill_circle(p.position, p.drawn_radius, p.color.with_alpha(p.opacity));
        }
    }

    /// Rescale positions to a new surface size, keeping each particle's
    /// position relative to the surface. The particle count is unchanged.
    pub fn resize(&mut self, old: SurfaceSize, new: SurfaceSize) {
        let scale = new.clamped().as_vec2() / old.clamped().as_vec2();
        for p in &mut self.particles {
            p.position *= scale;
            p.base *= scale;
        }
        self.size = new.clamped();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(seed: u64, size: SurfaceSize) -> ParticleField {
        let mut rng = StdRng::seed_from_u64(seed);
        ParticleField::initialize(&StarfieldConfig::default(), size, &mut rng)
    }

    #[test]
    fn test_count_follows_area() {
        let config = StarfieldConfig::default();
        assert_eq!(ParticleField::particle_count(&config, SurfaceSize::new(800, 600)), 48);
        assert_eq!(ParticleField::particle_count(&config, SurfaceSize::new(99, 99)), 0);
        assert_eq!(field(1, SurfaceSize::new(1920, 1080)).len(), 207);
    }

    #[test]
    fn test_initial_particles_in_bounds() {
        let size = SurfaceSize::new(800, 600);
        for p in field(2, size).particles() {
            assert!(p.position.x >= 0.0 && p.position.x < 800.0);
            assert!(p.position.y >= 0.0 && p.position.y < 600.0);
            assert!((0.2..=1.0).contains(&p.opacity));
            assert!(p.radius >= 0.5 && p.radius < 2.0);
        }
    }

    #[test]
    fn test_inverted_opacity_bounds_still_initialize() {
        let config = StarfieldConfig {
            opacity_min: 0.9,
            opacity_max: 0.5,
            ..StarfieldConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(4);
        let field = ParticleField::initialize(&config, SurfaceSize::new(400, 400), &mut rng);
        assert!(!field.is_empty());
        assert!(field.particles().iter().all(|p| p.opacity == 0.9));
    }

    #[test]
    fn test_same_seed_same_field() {
        let size = SurfaceSize::new(640, 480);
        assert_eq!(field(9, size).particles(), field(9, size).particles());
    }

    #[test]
    fn test_attraction_falloff() {
        let r = 400.0;
        let (dir, force) = attraction(Vec2::ZERO, Vec2::new(100.0, 0.0), r);
        assert_eq!(dir, Vec2::X);
        assert!((force - 0.75).abs() < 1e-6);
        assert_eq!(attraction(Vec2::ZERO, Vec2::new(400.0, 0.0), r).1, 0.0);
        assert_eq!(attraction(Vec2::ZERO, Vec2::new(0.0, 900.0), r).1, 0.0);
    }

    #[test]
    fn test_zero_distance_is_finite() {
        let (dir, force) = attraction(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0), 400.0);
        assert_eq!(dir, Vec2::ZERO);
        assert_eq!(force, 1.0);

        let size = SurfaceSize::new(200, 200);
        let particle = Particle::new(Vec2::new(50.0, 50.0), 1.0, Color::WHITE);
        let mut field = ParticleField::with_particles(&StarfieldConfig::default(), size, vec![particle], 0);
        field.update(&FrameContext::tick(size).with_pointer(Vec2::new(50.0, 50.0)));
        let p = &field.particles()[0];
        assert!(p.position.is_finite());
        assert_eq!(p.drawn_radius, 4.0);
    }

    #[test]
    fn test_attracted_particle_moves_toward_pointer_then_returns() {
        let size = SurfaceSize::new(1000, 1000);
        let particle = Particle::new(Vec2::new(100.0, 100.0), 1.0, Color::WHITE).with_density(10.0);
        let mut field = ParticleField::with_particles(&StarfieldConfig::default(), size, vec![particle], 0);

        field.update(&FrameContext::tick(size).with_pointer(Vec2::new(300.0, 100.0)));
        // force 0.5, density 10, gain 0.5
        assert!((field.particles()[0].position.x - 102.5).abs() < 1e-4);

        field.update(&FrameContext::tick(size));
        let p = &field.particles()[0];
        assert!((p.position.x - (102.5 - 2.5 / 20.0)).abs() < 1e-4);
        assert_eq!(p.drawn_radius, p.radius);
    }

    #[test]
    fn test_opacity_stays_in_bounds_and_flips_at_bounds() {
        let size = SurfaceSize::new(100, 100);
        let particle = Particle::new(Vec2::ZERO, 1.0, Color::WHITE).with_opacity(0.95, 0.04);
        let mut field = ParticleField::with_particles(&StarfieldConfig::default(), size, vec![particle], 0);

        field.update(&FrameContext::tick(size));
        assert!((field.particles()[0].opacity - 0.99).abs() < 1e-6);
        assert!(field.particles()[0].fade_velocity > 0.0);

        field.update(&FrameContext::tick(size));
        assert_eq!(field.particles()[0].opacity, 1.0);
        assert!(field.particles()[0].fade_velocity < 0.0);

        for _ in 0..500 {
            field.update(&FrameContext::tick(size).with_step(1.7));
            let p = &field.particles()[0];
            assert!((0.2..=1.0).contains(&p.opacity), "opacity {}", p.opacity);
        }
    }

    #[test]
    fn test_reseed_on_fade_moves_base() {
        let size = SurfaceSize::new(500, 500);
        let config = StarfieldConfig {
            reseed_on_fade: true,
            ..StarfieldConfig::default()
        };
        let particle = Particle::new(Vec2::new(-50.0, -50.0), 1.0, Color::WHITE).with_opacity(0.21, -0.05);
        let mut field = ParticleField::with_particles(&config, size, vec![particle], 3);
        field.update(&FrameContext::tick(size));
        let p = &field.particles()[0];
        assert_eq!(p.opacity, 0.2);
        assert!(p.base.x >= 0.0 && p.base.y >= 0.0);
        assert_eq!(p.position, p.base);
    }

    #[test]
    fn test_resize_keeps_relative_positions() {
        let small = SurfaceSize::new(800, 600);
        let large = SurfaceSize::new(1600, 1200);
        let mut field = field(4, small);
        let before: Vec<Vec2> = field.particles().iter().map(|p| p.position / small.as_vec2()).collect();
        field.resize(small, large);
        assert_eq!(field.len(), before.len());
        for (p, rel) in field.particles().iter().zip(before) {
            assert!((p.position / large.as_vec2() - rel).length() < 1e-5);
        }
    }

    #[test]
    fn test_draw_one_disc_per_particle() {
        let size = SurfaceSize::new(400, 300);
        let field = field(5, size);
        let mut recorder = crate::surface::Recorder::new(size);
        field.draw(&mut recorder);
        assert_eq!(recorder.circles().count(), field.len());
    }
}
