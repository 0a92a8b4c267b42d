//! Arcs that draw themselves between pairs of globe dots.

use std::f32::consts::PI;

use rand::Rng;

use super::{Dot, GlobeView};
use crate::surface::Polylines;

/// A growing arc from dot `from` to dot `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub from: usize,
    pub to: usize,
    /// Drawn fraction in `[0, 1)`.
    pub progress: f32,
    /// Progress per reference tick.
    pub speed: f32,
}

impl Arc {
    pub fn new(from: usize, to: usize, speed: f32) -> Self {
        Self {
            from,
            to,
            progress: 0.0,
            speed,
        }
    }

    /// Random endpoints among `dot_count` dots.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, dot_count: usize, speed: f32) -> Self {
        let mut arc = Self::new(0, 0, speed);
        arc.reroute(rng, dot_count);
        arc
    }

    /// Advance by `step` ticks. Past 1 the progress wraps and keeps the
    /// remainder, so `0.98 + 0.05` lands on `0.03`. Returns true on wrap.
    pub fn advance(&mut self, step: f32) -> bool {
        self.progress += self.speed * step;
        if self.progress >= 1.0 {
            self.progress = self.progress.fract();
            true
        } else {
            false
        }
    }

    pub fn reroute<R: Rng + ?Sized>(&mut self, rng: &mut R, dot_count: usize) {
        if dot_count == 0 {
            return;
        }
        self.from = rng.gen_range(0..dot_count);
        self.to = rng.gen_range(0..dot_count);
    }

    /// Append the drawn part of the arc to `out`, lifted off the surface by
    /// `sin(t·π)·lift` and broken at hidden points.
    pub fn trace(&self, dots: &[Dot], view: &GlobeView, segments: usize, lift: f32, out: &mut Polylines) {
        let (Some(a), Some(b)) = (dots.get(self.from), dots.get(self.to)) else {
            return;
        };
        let segments = segments.max(1);
        for i in 0..=segments {
            let t = i as f32 / segments as f32;
            if t > self.progress {
                break;
            }
            let theta = a.theta + (b.theta - a.theta) * t;
            let phi = a.phi + (b.phi - a.phi) * t;
            let p = view.project(theta, phi, view.radius + (t * PI).sin() * lift);
            if p.visible {
                out.push(p.screen);
            } else {
                out.end_run();
            }
        }
        out.end_run();
    }
}
