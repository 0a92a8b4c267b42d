//! Proximity edges between starfield particles.
//!
//! Every unordered pair closer than the threshold gets one line whose alpha
//! falls linearly to zero at the threshold. The pass is a plain O(n²) scan;
//! particle count is bounded by surface area, and the visual density of the
//! web depends on every pair being considered.

use crate::config::ConnectionConfig;
use crate::starfield::Particle;
use crate::surface::Surface;

/// One edge between particles `a < b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
    /// Unscaled strength, `1 - distance / threshold`.
    pub strength: f32,
}

/// `1 - distance / threshold` below the threshold, 0 at or beyond it.
pub fn edge_strength(distance: f32, threshold: f32) -> f32 {
    if distance < threshold {
        1.0 - distance / threshold
    } else {
        0.0
    }
}

/// All edges shorter than `threshold`, each unordered pair at most once.
pub fn connections(particles: &[Particle], threshold: f32) -> impl Iterator<Item = Connection> + '_ {
    let n = particles.len();
    (0..n).flat_map(move |a| {
        (a + 1..n).filter_map(move |b| {
            let distance = particles[a].position.distance(particles[b].position);
            (distance < threshold).then(|| Connection {
                a,
                b,
                distance,
                strength: edge_strength(distance, threshold),
            })
        })
    })
}

/// Draw every edge as a thin line.
pub fn draw_connections(particles: &[Particle], config: &ConnectionConfig, surface: &mut dyn Surface) {
    for edge in connections(particles, config.threshold) {
        surface.line(
            particles[edge.a].position,
            particles[edge.b].position,
            config.color.with_alpha(edge.strength * config.max_alpha),
            config.width,
        );
    }
}
