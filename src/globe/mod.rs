//! The dotted globe.
//!
//! A [`GlobeScene`] is a sphere of static dots, a latitude/longitude grid,
//! arcs growing between dot pairs and a couple of orbiting satellites. All of
//! it shares one [`GlobeRotation`]:
//!
//! - yaw spins continuously, nudged by the pointer's horizontal position;
//! - pitch eases toward a target set by the pointer's vertical position.
//!
//! Yaw is applied as a longitude offset to the static dot angles and pitch as
//! an X rotation, so the sphere goes through the same [`rotate`] as the
//! wireframe shapes.
//!
//! Projection happens in `update`; `draw` only paints the cached results,
//! back to front.

mod arcs;
mod grid;
mod orbiters;

use std::f32::consts::TAU;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use arcs::Arc;
pub use grid::Grid;
pub use orbiters::{trace_ring, Orbiter, OrbiterSprite};

use crate::config::GlobeConfig;
use crate::context::FrameContext;
use crate::math::{relax, rotate, spherical_to_cartesian, Projected, Projection, Rotation};
use crate::surface::{GradientStop, Polylines, Surface, SurfaceSize};
use crate::visuals::Color;

/// One point on the sphere. Angles never change after creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    /// Longitude in radians.
    pub theta: f32,
    /// Polar angle from the +Y pole in radians.
    pub phi: f32,
    pub size: f32,
    pub color: Color,
    pub pulse_offset: f32,
}

impl Dot {
    pub fn new(theta: f32, phi: f32, size: f32, color: Color, pulse_offset: f32) -> Self {
        Self {
            theta,
            phi,
            size,
            color,
            pulse_offset,
        }
    }
}

/// A visible dot after projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotSprite {
    pub index: usize,
    pub screen: Vec2,
    pub z: f32,
    pub scale: f32,
}

/// Shared yaw and pitch, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobeRotation {
    pub yaw: f32,
    pub pitch: f32,
}

impl GlobeRotation {
    /// One update. `pointer` is the pointer normalized to `[-1, 1]`.
    ///
    /// Yaw integrates; pitch relaxes toward `pointer.y × max_tilt` and never
    /// accumulates.
    pub fn advance(&mut self, config: &GlobeConfig, pointer: Vec2, step: f32) {
        self.yaw += (config.base_spin + pointer.x * config.yaw_sensitivity) * step;
        self.pitch = relax(
            self.pitch,
            pointer.y * config.max_tilt,
            config.tilt_relaxation,
            step,
        );
    }
}

/// Camera for one projection pass over the sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobeView {
    pub projection: Projection,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl GlobeView {
    pub fn new(center: Vec2, radius: f32, focal: f32, cull_fraction: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            projection: Projection::new(focal, center).with_cull_depth(radius * cull_fraction),
            radius,
            yaw,
            pitch,
        }
    }

    /// The same camera with a different yaw.
    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    /// Project the sphere point at `(theta, phi)` on a sphere of radius `r`.
    pub fn project(&self, theta: f32, phi: f32, r: f32) -> Projected {
        let local = spherical_to_cartesian(theta - self.yaw, phi, r);
        self.projection
            .project(rotate(local, Rotation::new(self.pitch, 0.0, 0.0)))
    }
}

/// The whole globe.
#[derive(Debug, Clone)]
pub struct GlobeScene {
    config: GlobeConfig,
    dots: Vec<Dot>,
    grid: Grid,
    arcs: Vec<Arc>,
    orbiters: Vec<Orbiter>,
    rotation: GlobeRotation,
    center: Vec2,
    elapsed: f32,
    rng: StdRng,
    // Per-frame caches, reused.
    sprites: Vec<DotSprite>,
    grid_lines: Polylines,
    arc_lines: Polylines,
    ring: Polylines,
    orbiter_sprites: Vec<OrbiterSprite>,
}

impl GlobeScene {
    pub fn new<R: Rng + ?Sized>(config: &GlobeConfig, size: SurfaceSize, rng: &mut R) -> Self {
        let dots: Vec<Dot> = (0..config.dot_count)
            .map(|i| {
                let color = if i % 5 == 0 {
                    config.dot_highlight
                } else if i % 7 == 0 {
                    config.dot_accent
                } else {
                    config.dot_color
                };
                Dot {
                    theta: rng.gen_range(0.0..TAU),
                    // Uniform over the sphere's area.
                    phi: (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos(),
                    size: config.dot_size.sample(rng),
                    color,
                    pulse_offset: rng.gen_range(0.0..TAU),
                }
            })
            .collect();
        let arcs = (0..config.arc_count)
            .map(|_| {
                let speed = config.arc_speed.sample(rng);
                Arc::random(rng, dots.len(), speed)
            })
            .collect();

        let mut scene = Self {
            grid: Grid::new(
                config.meridians,
                config.meridian_points,
                config.parallels,
                config.parallel_points,
            ),
            orbiters: config.orbiters.iter().map(Orbiter::from).collect(),
            rotation: GlobeRotation {
                yaw: 0.0,
                pitch: config.initial_pitch,
            },
            center: config.anchor * size.clamped().as_vec2(),
            elapsed: 0.0,
            rng: StdRng::seed_from_u64(rng.gen()),
            sprites: Vec::with_capacity(dots.len()),
            grid_lines: Polylines::new(),
            arc_lines: Polylines::new(),
            ring: Polylines::new(),
            orbiter_sprites: Vec::with_capacity(config.orbiters.len()),
            config: config.clone(),
            dots,
            arcs,
        };
        scene.reproject();
        tracing::debug!(
            dots = scene.dots.len(),
            arcs = scene.arcs.len(),
            orbiters = scene.orbiters.len(),
            "globe initialized"
        );
        scene
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    pub fn orbiters(&self) -> &[Orbiter] {
        &self.orbiters
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rotation(&self) -> GlobeRotation {
        self.rotation
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Visible dots from the last update, farthest first.
    pub fn sprites(&self) -> &[DotSprite] {
        &self.sprites
    }

    pub fn view(&self) -> GlobeView {
        GlobeView::new(
            self.center,
            self.config.radius,
            self.config.focal,
            self.config.cull_fraction,
            self.rotation.yaw,
            self.rotation.pitch,
        )
    }

    pub fn update(&mut self, ctx: &FrameContext) {
        self.elapsed = ctx.elapsed;
        self.rotation
            .advance(&self.config, ctx.pointer_normalized(), ctx.step);

        for arc in &mut self.arcs {
            if arc.advance(ctx.step) && self.config.reroute_arcs {
                arc.reroute(&mut self.rng, self.dots.len());
            }
        }
        for orbiter in &mut self.orbiters {
            orbiter.advance(ctx.step);
        }
        self.reproject();
    }

    fn reproject(&mut self) {
        let view = self.view();
        let radius = self.config.radius;

        self.sprites.clear();
        self.sprites
            .extend(self.dots.iter().enumerate().filter_map(|(index, dot)| {
                let p = view.project(dot.theta, dot.phi, radius);
                p.visible.then_some(DotSprite {
                    index,
                    screen: p.screen,
                    z: p.z,
                    scale: p.scale,
                })
            }));
        // Painter's order: larger z is farther away and goes first.
        self.sprites.sort_unstable_by(|a, b| b.z.total_cmp(&a.z));

        let grid_view = view.with_yaw(self.rotation.yaw * self.config.grid_spin_factor);
        self.grid.trace(&grid_view, &mut self.grid_lines);

        self.arc_lines.clear();
        for arc in &self.arcs {
            arc.trace(
                &self.dots,
                &view,
                self.config.arc_segments,
                self.config.arc_lift,
                &mut self.arc_lines,
            );
        }

        let ring_tilt = self.orbiters.first().map_or(0.0, |o| o.tilt);
        trace_ring(
            &view,
            self.config.ring_radius,
            ring_tilt,
            self.config.ring_segments,
            &mut self.ring,
        );

        self.orbiter_sprites.clear();
        for (index, orbiter) in self.orbiters.iter().enumerate() {
            let p = orbiter.project(&view);
            if !Orbiter::is_occluded(&p, &view) {
                self.orbiter_sprites.push(OrbiterSprite {
                    index,
                    screen: p.screen,
                    z: p.z,
                });
            }
        }
    }

    /// Grid, arcs, dots, ring, orbiters, then the center glow.
    pub fn draw(&self, surface: &mut dyn Surface) {
        let config = &self.config;
        let radius = config.radius;

        self.grid_lines
            .draw(surface, config.color.with_alpha(config.grid_alpha), 0.5);
        self.arc_lines
            .draw(surface, config.color.with_alpha(config.arc_alpha), 1.0);

        for sprite in &self.sprites {
            let dot = &self.dots[sprite.index];
            let pulse = (self.elapsed * 2.0 + dot.pulse_offset).sin() * 0.3 + 0.7;
            let drawn = dot.size * sprite.scale * pulse;
            let alpha = ((sprite.z + radius) / (radius * 2.0) * 0.6 + 0.1).clamp(0.0, 1.0);
            surface.fill_circle(sprite.screen, drawn, dot.color.with_alpha(alpha));
            if dot.size > 1.5 {
                surface.fill_radial_gradient(
                    sprite.screen,
                    drawn * 3.0,
                    &[
                        GradientStop::new(0.0, dot.color.with_alpha(0.15 * alpha)),
                        GradientStop::new(1.0, dot.color.with_alpha(0.0)),
                    ],
                );
            }
        }

        self.ring
            .draw(surface, config.color.with_alpha(config.ring_alpha), 1.0);

        for sprite in &self.orbiter_sprites {
            let orbiter = &self.orbiters[sprite.index];
            surface.fill_radial_gradient(
                sprite.screen,
                orbiter.size * 5.0,
                &[
                    GradientStop::new(0.0, orbiter.color.with_alpha(0.3)),
                    GradientStop::new(1.0, orbiter.color.with_alpha(0.0)),
                ],
            );
            surface.fill_circle(sprite.screen, orbiter.size, orbiter.color.with_alpha(0.9));
        }

        surface.fill_radial_gradient(
            self.center,
            radius,
            &[
                GradientStop::new(0.0, config.color.with_alpha(0.03)),
                GradientStop::new(0.5, config.color.with_alpha(0.01)),
                GradientStop::new(1.0, config.color.with_alpha(0.0)),
            ],
        );
    }

    /// Recenter on the new surface. Rotation, arcs and orbiters carry over.
    pub fn resize(&mut self, new: SurfaceSize) {
        self.center = self.config.anchor * new.clamped().as_vec2();
        self.reproject();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, Recorder};

    fn scene(seed: u64) -> GlobeScene {
        let mut rng = StdRng::seed_from_u64(seed);
        GlobeScene::new(&GlobeConfig::default(), SurfaceSize::new(400, 400), &mut rng)
    }

    #[test]
    fn test_dot_colors_follow_index() {
        let scene = scene(1);
        let config = GlobeConfig::default();
        assert_eq!(scene.dots().len(), 200);
        assert_eq!(scene.dots()[0].color, config.dot_highlight);
        assert_eq!(scene.dots()[7].color, config.dot_accent);
        assert_eq!(scene.dots()[35].color, config.dot_highlight);
        assert_eq!(scene.dots()[1].color, config.dot_color);
    }

    #[test]
    fn test_sprites_sorted_far_to_near_and_visible() {
        let mut scene = scene(2);
        scene.update(&FrameContext::tick(SurfaceSize::new(400, 400)));
        let sprites = scene.sprites();
        assert!(!sprites.is_empty());
        assert!(sprites.len() < 200);
        for pair in sprites.windows(2) {
            assert!(pair[0].z >= pair[1].z);
        }
        let cull = -130.0 * 0.3;
        assert!(sprites.iter().all(|s| s.z > cull));
    }

    #[test]
    fn test_dot_angles_never_change() {
        let mut scene = scene(3);
        let before = scene.dots().to_vec();
        for _ in 0..30 {
            scene.update(&FrameContext::tick(SurfaceSize::new(400, 400)).with_pointer(Vec2::new(50.0, 350.0)));
        }
        assert_eq!(scene.dots(), &before[..]);
    }

    #[test]
    fn test_pitch_eases_toward_pointer() {
        let config = GlobeConfig::default();
        let mut rotation = GlobeRotation { yaw: 0.0, pitch: 0.3 };
        rotation.advance(&config, Vec2::new(0.0, -1.0), 1.0);
        // One tick covers 2% of the way from 0.3 to -0.3.
        assert!((rotation.pitch - (0.3 - 0.6 * 0.02)).abs() < 1e-6);
        assert!((rotation.yaw - 0.003).abs() < 1e-7);

        for _ in 0..2000 {
            rotation.advance(&config, Vec2::new(1.0, -1.0), 1.0);
        }
        assert!((rotation.pitch + 0.3).abs() < 1e-4);
        assert!(rotation.pitch >= -0.3 - 1e-6);
    }

    #[test]
    fn test_draw_order() {
        let mut scene = scene(4);
        scene.update(&FrameContext::tick(SurfaceSize::new(400, 400)));
        let mut recorder = Recorder::new(SurfaceSize::new(400, 400));
        scene.draw(&mut recorder);
        let commands = recorder.commands();
        // The center glow is painted last.
        match commands.last() {
            Some(DrawCommand::RadialGradient { center, radius, .. }) => {
                assert_eq!(*center, Vec2::new(200.0, 200.0));
                assert_eq!(*radius, 130.0);
            }
            other => panic!("unexpected last command {other:?}"),
        }
        // Grid lines come before any dot.
        let first_circle = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Circle { .. }))
            .unwrap();
        assert!(matches!(commands[0], DrawCommand::Line { .. }));
        assert!(first_circle > 0);
    }

    #[test]
    fn test_resize_recenters_and_keeps_rotation() {
        let mut scene = scene(5);
        for _ in 0..20 {
            scene.update(&FrameContext::tick(SurfaceSize::new(400, 400)));
        }
        let rotation = scene.rotation();
        scene.resize(SurfaceSize::new(800, 600));
        assert_eq!(scene.center(), Vec2::new(400.0, 300.0));
        assert_eq!(scene.rotation(), rotation);
    }

    #[test]
    fn test_reroute_changes_endpoints_on_wrap() {
        let config = GlobeConfig {
            reroute_arcs: true,
            arc_count: 1,
            arc_speed: crate::config::Span::new(0.6, 0.6),
            ..GlobeConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(6);
        let mut scene = GlobeScene::new(&config, SurfaceSize::new(400, 400), &mut rng);
        let mut pairs = std::collections::HashSet::new();
        for _ in 0..40 {
            scene.update(&FrameContext::tick(SurfaceSize::new(400, 400)));
            pairs.insert((scene.arcs()[0].from, scene.arcs()[0].to));
        }
        assert!(pairs.len() > 1);
    }
}
