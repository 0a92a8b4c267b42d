//! Latitude/longitude grid on the globe.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use super::GlobeView;
use crate::surface::Polylines;

/// Static grid lines, each a list of `(theta, phi)` angles.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    lines: Vec<Vec<Vec2>>,
}

impl Grid {
    /// `meridians` pole-to-pole lines, then `parallels` rings strictly
    /// between the poles.
    pub fn new(meridians: usize, meridian_points: usize, parallels: usize, parallel_points: usize) -> Self {
        let mut lines = Vec::with_capacity(meridians + parallels);
        let meridian_spans = meridian_points.saturating_sub(1).max(1);
        for i in 0..meridians {
            let theta = i as f32 / meridians as f32 * TAU;
            lines.push(
                (0..=meridian_spans)
                    .map(|j| Vec2::new(theta, j as f32 / meridian_spans as f32 * PI))
                    .collect(),
            );
        }
        let parallel_spans = parallel_points.saturating_sub(1).max(1);
        for i in 1..=parallels {
            let phi = i as f32 / (parallels + 1) as f32 * PI;
            lines.push(
                (0..=parallel_spans)
                    .map(|j| Vec2::new(j as f32 / parallel_spans as f32 * TAU, phi))
                    .collect(),
            );
        }
        Self { lines }
    }

    pub fn lines(&self) -> &[Vec<Vec2>] {
        &self.lines
    }

    /// Project every line, breaking it wherever a point is hidden.
    pub fn trace(&self, view: &GlobeView, out: &mut Polylines) {
        out.clear();
        for line in &self.lines {
            for angles in line {
                let p = view.project(angles.x, angles.y, view.radius);
                if p.visible {
                    out.push(p.screen);
                } else {
                    out.end_run();
                }
            }
            out.end_run();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_shape() {
        let grid = Grid::new(12, 41, 5, 61);
        assert_eq!(grid.lines().len(), 17);
        assert!(grid.lines()[..12].iter().all(|l| l.len() == 41));
        assert!(grid.lines()[12..].iter().all(|l| l.len() == 61));

        // Parallels never sit on a pole.
        for line in &grid.lines()[12..] {
            let phi = line[0].y;
            assert!(phi > 0.0 && phi < PI);
        }
    }

    #[test]
    fn test_hidden_points_break_lines() {
        let grid = Grid::new(12, 41, 5, 61);
        let view = GlobeView::new(glam::Vec2::new(200.0, 200.0), 130.0, 400.0, 0.3, 0.0, 0.3);
        let mut out = Polylines::new();
        grid.trace(&view, &mut out);
        // Part of every meridian dips below the cull depth, so there are more
        // runs than lines.
        assert!(out.run_count() > grid.lines().len());
    }
}
