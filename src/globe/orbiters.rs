//! Satellites circling the globe and the ring that marks their orbit.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use super::GlobeView;
use crate::config::OrbiterSpec;
use crate::math::{rotate, Projected, Rotation};
use crate::surface::Polylines;
use crate::visuals::Color;

/// Point on a circle of `radius` in the XZ plane, inclined about X by `tilt`.
fn orbit_point(angle: f32, radius: f32, tilt: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    rotate(Vec3::new(cos * radius, 0.0, sin * radius), Rotation::new(tilt, 0.0, 0.0))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Orbiter {
    pub angle: f32,
    /// Radians per reference tick.
    pub speed: f32,
    pub radius: f32,
    pub tilt: f32,
    pub size: f32,
    pub color: Color,
}

impl Orbiter {
    pub fn advance(&mut self, step: f32) {
        self.angle = (self.angle + self.speed * step).rem_euclid(TAU);
    }

    /// Project through the globe view. The orbit plane follows the globe's
    /// pitch but not its spin.
    pub fn project(&self, view: &GlobeView) -> Projected {
        view.projection
            .project(orbit_point(self.angle, self.radius, self.tilt + view.pitch))
    }

    /// True when the orbiter is behind the sphere's projected disc.
    pub fn is_occluded(projected: &Projected, view: &GlobeView) -> bool {
        projected.z > 0.0 && projected.screen.distance(view.projection.anchor) < view.radius
    }
}

impl From<&OrbiterSpec> for Orbiter {
    fn from(spec: &OrbiterSpec) -> Self {
        Self {
            angle: spec.angle,
            speed: spec.speed,
            radius: spec.radius,
            tilt: spec.tilt,
            size: spec.size,
            color: spec.color,
        }
    }
}

/// An orbiter ready to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbiterSprite {
    pub index: usize,
    pub screen: Vec2,
    pub z: f32,
}

/// Closed ring of `radius` inclined by `tilt` plus the view pitch.
pub fn trace_ring(view: &GlobeView, radius: f32, tilt: f32, segments: usize, out: &mut Polylines) {
    out.clear();
    let segments = segments.max(3);
    for i in 0..=segments {
        let angle = i as f32 / segments as f32 * TAU;
        let p = view
            .projection
            .project(orbit_point(angle, radius, tilt + view.pitch));
        out.push(p.screen);
    }
    out.end_run();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visuals::palette;

    fn view(pitch: f32) -> GlobeView {
        GlobeView::new(Vec2::new(200.0, 200.0), 130.0, 400.0, 0.3, 0.0, pitch)
    }

    fn orbiter(angle: f32) -> Orbiter {
        Orbiter {
            angle,
            speed: 0.008,
            radius: 165.0,
            tilt: 0.0,
            size: 3.0,
            color: palette::SKY,
        }
    }

    #[test]
    fn test_orbit_stays_at_radius() {
        for i in 0..16 {
            let p = orbit_point(i as f32 * 0.4, 165.0, 0.35);
            assert!((p.length() - 165.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_far_side_inside_disc_is_occluded() {
        let view = view(0.0);
        // Angle π/2 puts the orbiter straight behind the center.
        let behind = orbiter(std::f32::consts::FRAC_PI_2);
        let p = behind.project(&view);
        assert!(p.z > 0.0);
        assert!(Orbiter::is_occluded(&p, &view));

        let front = orbiter(-std::f32::consts::FRAC_PI_2);
        assert!(!Orbiter::is_occluded(&front.project(&view), &view));

        // At the side it is outside the disc even though z is zero.
        let side = orbiter(0.0);
        assert!(!Orbiter::is_occluded(&side.project(&view), &view));
    }

    #[test]
    fn test_advance_wraps() {
        let mut o = orbiter(6.28);
        o.advance(1.0);
        assert!(o.angle < 0.01);
    }

    #[test]
    fn test_ring_closed() {
        let mut out = Polylines::new();
        trace_ring(&view(0.3), 165.0, 0.18, 100, &mut out);
        let run = out.runs().next().unwrap();
        assert_eq!(run.len(), 101);
        assert!((run[0] - run[100]).length() < 1e-3);
    }
}
