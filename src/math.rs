//! Rotation and perspective projection.
//!
//! Everything here is plain arithmetic over [`glam`] vectors. Callers supply
//! finite inputs; the only guards are the minimum clamps that keep a single
//! degenerate frame (zero distance, a point sitting on the focal plane) from
//! producing NaN or infinity.
//!
//! Rotations are always applied in the same order: X, then Y, then Z. The
//! wireframe shapes and the globe both go through [`rotate`], so the two
//! scenes agree on handedness and order.

use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// Smallest distance used when normalizing a direction vector.
pub const MIN_DISTANCE: f32 = 1e-4;

/// Smallest perspective denominator (`focal + z + depth_offset`).
const MIN_DEPTH: f32 = 1e-3;

/// Euler angles in radians, applied X then Y then Z.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Rotation {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Accumulate `speed` radians per reference tick, `step` ticks at a time.
    ///
    /// Angles are wrapped into `[0, TAU)` so very long runs do not lose
    /// precision. Trig makes the wrap invisible.
    pub fn advance(&mut self, speed: Vec3, step: f32) {
        self.x = (self.x + speed.x * step).rem_euclid(TAU);
        self.y = (self.y + speed.y * step).rem_euclid(TAU);
        self.z = (self.z + speed.z * step).rem_euclid(TAU);
    }
}

/// Rotate `p` about X, then Y, then Z.
pub fn rotate(p: Vec3, rotation: Rotation) -> Vec3 {
    let (sx, cx) = rotation.x.sin_cos();
    let (sy, cy) = rotation.y.sin_cos();
    let (sz, cz) = rotation.z.sin_cos();

    // X
    let y1 = p.y * cx - p.z * sx;
    let z1 = p.y * sx + p.z * cx;
    // Y
    let x2 = p.x * cy + z1 * sy;
    let z2 = -p.x * sy + z1 * cy;
    // Z
    let x3 = x2 * cz - y1 * sz;
    let y3 = x2 * sz + y1 * cz;

    Vec3::new(x3, y3, z2)
}

/// A point after projection to screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Screen coordinates in surface pixels.
    pub screen: Vec2,
    /// Post-rotation depth. Larger is farther from the viewer.
    pub z: f32,
    /// Perspective scale `focal / (focal + z + depth_offset)`.
    pub scale: f32,
    /// `z > -cull_depth`.
    pub visible: bool,
}

/// Perspective camera parameters shared by one object.
///
/// `scale = focal / (focal + z + depth_offset)`,
/// `screen = xy * size * scale + anchor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub focal: f32,
    pub depth_offset: f32,
    /// Multiplier applied to x/y only. Depth stays in local units.
    pub size: f32,
    pub anchor: Vec2,
    /// Points with `z <= -cull_depth` are flagged invisible.
    pub cull_depth: f32,
}

impl Projection {
    pub fn new(focal: f32, anchor: Vec2) -> Self {
        Self {
            focal,
            depth_offset: 0.0,
            size: 1.0,
            anchor,
            cull_depth: f32::INFINITY,
        }
    }

    pub fn with_depth_offset(mut self, depth_offset: f32) -> Self {
        self.depth_offset = depth_offset;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_cull_depth(mut self, cull_depth: f32) -> Self {
        self.cull_depth = cull_depth;
        self
    }

    /// Perspective scale for a point at depth `z`.
    pub fn scale_at(&self, z: f32) -> f32 {
        let denom = (self.focal + z + self.depth_offset).max(MIN_DEPTH);
        self.focal / denom
    }

    /// Project an already-rotated point.
    pub fn project(&self, p: Vec3) -> Projected {
        let scale = self.scale_at(p.z);
        Projected {
            screen: Vec2::new(p.x, p.y) * self.size * scale + self.anchor,
            z: p.z,
            scale,
            visible: p.z > -self.cull_depth,
        }
    }

    /// Rotate then project a local-space point.
    pub fn project_rotated(&self, p: Vec3, rotation: Rotation) -> Projected {
        self.project(rotate(p, rotation))
    }
}

/// Point on a sphere of radius `r` from azimuth `theta` and polar angle `phi`.
///
/// `phi = 0` is the +Y pole.
pub fn spherical_to_cartesian(theta: f32, phi: f32, r: f32) -> Vec3 {
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    Vec3::new(r * sin_phi * cos_theta, r * cos_phi, r * sin_phi * sin_theta)
}

/// Fraction of the remaining distance covered after `step` reference ticks
/// when each tick covers `rate` of it.
pub fn relax_factor(rate: f32, step: f32) -> f32 {
    let rate = rate.clamp(0.0, 1.0);
    if step == 1.0 {
        return rate;
    }
    1.0 - (1.0 - rate).powf(step.max(0.0))
}

/// Ease `current` toward `target`.
pub fn relax(current: f32, target: f32, rate: f32, step: f32) -> f32 {
    current + (target - current) * relax_factor(rate, step)
}

/// Ease a 2D point toward `target`.
pub fn relax_vec2(current: Vec2, target: Vec2, rate: f32, step: f32) -> Vec2 {
    current + (target - current) * relax_factor(rate, step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_origin_projects_to_anchor() {
        let projection = Projection::new(300.0, Vec2::new(640.0, 360.0)).with_size(30.0);
        let p = projection.project_rotated(Vec3::ZERO, Rotation::IDENTITY);
        assert_eq!(p.screen, Vec2::new(640.0, 360.0));
        assert_eq!(p.scale, 1.0);
    }

    #[test]
    fn test_scale_decreases_with_depth() {
        let projection = Projection::new(400.0, Vec2::ZERO);
        let mut last = f32::INFINITY;
        for i in -20..20 {
            let z = i as f32 * 15.0;
            let scale = projection.project(Vec3::new(10.0, 10.0, z)).scale;
            assert!(scale < last, "scale {scale} at z={z} not below {last}");
            last = scale;
        }
    }

    #[test]
    fn test_rotation_order_is_x_then_y() {
        // X by 90° sends +Y to +Z; Y by 90° then sends +Z to +X.
        let r = rotate(Vec3::Y, Rotation::new(FRAC_PI_2, FRAC_PI_2, 0.0));
        assert!(approx(r, Vec3::X), "got {r}");

        // The reverse order would leave +Y on the Y axis before tilting it.
        let only_y = rotate(Vec3::Y, Rotation::new(0.0, FRAC_PI_2, 0.0));
        assert!(approx(only_y, Vec3::Y));
    }

    #[test]
    fn test_z_rotation_applied_last() {
        let r = rotate(Vec3::X, Rotation::new(0.0, 0.0, FRAC_PI_2));
        assert!(approx(r, Vec3::Y), "got {r}");
    }

    #[test]
    fn test_rotation_preserves_length() {
        let p = Vec3::new(1.0, -2.0, 3.0);
        let r = rotate(p, Rotation::new(0.3, 1.7, -2.2));
        assert!((r.length() - p.length()).abs() < 1e-5);
    }

    #[test]
    fn test_visibility_threshold() {
        let projection = Projection::new(400.0, Vec2::ZERO).with_cull_depth(39.0);
        assert!(projection.project(Vec3::new(0.0, 0.0, -38.0)).visible);
        assert!(!projection.project(Vec3::new(0.0, 0.0, -39.0)).visible);
        assert!(projection.project(Vec3::new(0.0, 0.0, 130.0)).visible);
    }

    #[test]
    fn test_degenerate_depth_is_finite() {
        let projection = Projection::new(100.0, Vec2::ZERO);
        let p = projection.project(Vec3::new(1.0, 1.0, -100.0));
        assert!(p.scale.is_finite());
        assert!(p.screen.is_finite());
    }

    #[test]
    fn test_spherical_poles_and_equator() {
        assert!(approx(spherical_to_cartesian(1.234, 0.0, 2.0), Vec3::new(0.0, 2.0, 0.0)));
        assert!(approx(spherical_to_cartesian(0.0, FRAC_PI_2, 1.0), Vec3::X));
        assert!(approx(spherical_to_cartesian(FRAC_PI_2, FRAC_PI_2, 1.0), Vec3::Z));
        assert!(approx(spherical_to_cartesian(0.0, PI, 1.0), Vec3::NEG_Y));
    }

    #[test]
    fn test_relax_single_tick_is_exact_rate() {
        assert_eq!(relax_factor(0.05, 1.0), 0.05);
        assert_eq!(relax(0.0, 20.0, 0.05, 1.0), 1.0);
    }

    #[test]
    fn test_relax_two_half_ticks_match_one_tick() {
        let once = relax(0.0, 1.0, 0.2, 1.0);
        let half = relax(relax(0.0, 1.0, 0.2, 0.5), 1.0, 0.2, 0.5);
        assert!((once - half).abs() < 1e-5);
    }

    #[test]
    fn test_advance_wraps_angles() {
        let mut r = Rotation::new(6.2, 0.0, 0.0);
        r.advance(Vec3::new(0.2, 0.0, 0.0), 1.0);
        assert!(r.x >= 0.0 && r.x < TAU);
        assert!((r.x - (6.4 - TAU)).abs() < 1e-4);
    }
}
