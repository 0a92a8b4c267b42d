//! The drawing surface the scenes render onto.
//!
//! A [`Surface`] exposes only the primitives the scenes need: clear, line,
//! filled disc and radial gradient. [`crate::raster::Canvas`] is the pixel
//! implementation; [`Recorder`] captures the calls instead, which is what the
//! tests and golden-output checks use.

use glam::Vec2;

use crate::visuals::Color;

/// Pixel dimensions of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    /// Largest side a surface may have; wgpu's default 2D texture limit.
    pub const MAX_SIDE: u32 = 8192;

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero or above [`Self::MAX_SIDE`].
    pub fn is_degenerate(&self) -> bool {
        *self != self.clamped()
    }

    /// Size with both sides brought into `1..=MAX_SIDE`.
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.clamp(1, Self::MAX_SIDE),
            height: self.height.clamp(1, Self::MAX_SIDE),
        }
    }

    /// Number of pixels, computed in `usize`.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    pub fn area(&self) -> f32 {
        self.width as f32 * self.height as f32
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn center(&self) -> Vec2 {
        self.as_vec2() * 0.5
    }
}

impl std::str::FromStr for SurfaceSize {
    type Err = String;

    /// Parses `"WIDTHxHEIGHT"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
        let width = w.trim().parse().map_err(|e| format!("bad width {w:?}: {e}"))?;
        let height = h.trim().parse().map_err(|e| format!("bad height {h:?}: {e}"))?;
        let size = Self::new(width, height);
        if size.is_degenerate() {
            return Err(format!(
                "size {width}x{height} out of range, each side must be within 1..={}",
                Self::MAX_SIDE
            ));
        }
        Ok(size)
    }
}

/// One color stop of a radial gradient. `offset` runs from the center (0) to
/// the rim (1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Sample a stop list at `t` in `0.0..=1.0`. Stops must be sorted by offset.
pub fn sample_gradient(stops: &[GradientStop], t: f32) -> Color {
    let Some(first) = stops.first() else {
        return Color::TRANSPARENT;
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = (b.offset - a.offset).max(f32::EPSILON);
            return a.color.lerp(b.color, (t - a.offset) / span);
        }
    }
    stops[stops.len() - 1].color
}

/// A mutable 2D drawing target.
pub trait Surface {
    fn size(&self) -> SurfaceSize;

    /// Change the pixel dimensions. Contents after a resize are unspecified
    /// until the next [`Surface::clear`].
    fn resize(&mut self, size: SurfaceSize);

    fn clear(&mut self);

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]);

    /// Connected line segments through `points`.
    fn polyline(&mut self, points: &[Vec2], color: Color, width: f32) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], color, width);
        }
    }
}

/// A set of polylines stored back to back, reused between frames.
///
/// Globe grid lines and arcs break wherever a point is hidden, so one logical
/// line becomes several runs.
#[derive(Debug, Clone, Default)]
pub struct Polylines {
    points: Vec<Vec2>,
    runs: Vec<(usize, usize)>,
    open: Option<usize>,
}

impl Polylines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.runs.clear();
        self.open = None;
    }

    /// Append to the current run, starting one if needed.
    pub fn push(&mut self, point: Vec2) {
        if self.open.is_none() {
            self.open = Some(self.points.len());
        }
        self.points.push(point);
    }

    /// Close the current run. Runs of fewer than two points are dropped.
    pub fn end_run(&mut self) {
        if let Some(start) = self.open.take() {
            let end = self.points.len();
            if end - start >= 2 {
                self.runs.push((start, end));
            } else {
                self.points.truncate(start);
            }
        }
    }

    pub fn runs(&self) -> impl Iterator<Item = &[Vec2]> + '_ {
        self.runs.iter().map(|&(start, end)| &self.points[start..end])
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    pub fn draw(&self, surface: &mut dyn Surface, color: Color, width: f32) {
        for run in self.runs() {
            surface.polyline(run, color, width);
        }
    }
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
        width: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    RadialGradient {
        center: Vec2,
        radius: f32,
        stops: Vec<GradientStop>,
    },
}

/// A surface that records calls instead of drawing them.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    size: SurfaceSize,
    commands: Vec<DrawCommand>,
}

impl Recorder {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop everything recorded so far.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of drawing calls, clears excluded.
    pub fn draw_calls(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| !matches!(c, DrawCommand::Clear))
            .count()
    }

    pub fn clears(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Clear))
            .count()
    }

    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2, Color)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Line { from, to, color, .. } => Some((*from, *to, *color)),
            _ => None,
        })
    }

    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f32, Color)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => Some((*center, *radius, *color)),
            _ => None,
        })
    }
}

impl Surface for Recorder {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        self.commands.push(DrawCommand::RadialGradient {
            center,
            radius,
            stops: stops.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_parse() {
        assert_eq!("800x600".parse::<SurfaceSize>().unwrap(), SurfaceSize::new(800, 600));
        assert_eq!("1920X1080".parse::<SurfaceSize>().unwrap(), SurfaceSize::new(1920, 1080));
        assert!("800".parse::<SurfaceSize>().is_err());
        assert!("axb".parse::<SurfaceSize>().is_err());
        assert!("0x600".parse::<SurfaceSize>().is_err());
        assert!("70000x70000".parse::<SurfaceSize>().is_err());
    }

    #[test]
    fn test_degenerate_size_clamps_to_one_pixel() {
        let size = SurfaceSize::new(0, 0);
        assert!(size.is_degenerate());
        assert_eq!(size.clamped(), SurfaceSize::new(1, 1));
    }

    #[test]
    fn test_oversized_size_clamps_to_max_side() {
        let size = SurfaceSize::new(70_000, 70_000);
        assert!(size.is_degenerate());
        let max = SurfaceSize::MAX_SIDE;
        assert_eq!(size.clamped(), SurfaceSize::new(max, max));
        assert_eq!(size.clamped().pixel_count(), max as usize * max as usize);
    }

    #[test]
    fn test_sample_gradient() {
        let stops = [
            GradientStop::new(0.0, Color::WHITE),
            GradientStop::new(1.0, Color::WHITE.with_alpha(0.0)),
        ];
        assert_eq!(sample_gradient(&stops, 0.0).a, 1.0);
        assert!((sample_gradient(&stops, 0.5).a - 0.5).abs() < 1e-6);
        assert_eq!(sample_gradient(&stops, 2.0).a, 0.0);
        assert_eq!(sample_gradient(&[], 0.5), Color::TRANSPARENT);
    }

    #[test]
    fn test_polylines_break_runs() {
        let mut lines = Polylines::new();
        lines.push(Vec2::new(0.0, 0.0));
        lines.push(Vec2::new(1.0, 0.0));
        lines.end_run();
        // A single hidden-neighbour point never becomes a run.
        lines.push(Vec2::new(5.0, 5.0));
        lines.end_run();
        lines.push(Vec2::new(2.0, 0.0));
        lines.push(Vec2::new(3.0, 0.0));
        lines.push(Vec2::new(4.0, 0.0));
        lines.end_run();

        let runs: Vec<_> = lines.runs().map(|r| r.len()).collect();
        assert_eq!(runs, vec![2, 3]);

        let mut recorder = Recorder::new(SurfaceSize::new(10, 10));
        lines.draw(&mut recorder, Color::WHITE, 1.0);
        assert_eq!(recorder.lines().count(), 3);
    }

    #[test]
    fn test_recorder_counts() {
        let mut recorder = Recorder::new(SurfaceSize::new(10, 10));
        recorder.clear();
        recorder.fill_circle(Vec2::ONE, 1.0, Color::WHITE);
        recorder.line(Vec2::ZERO, Vec2::ONE, Color::WHITE, 1.0);
        assert_eq!(recorder.clears(), 1);
        assert_eq!(recorder.draw_calls(), 2);
        assert_eq!(recorder.take().len(), 3);
        assert_eq!(recorder.draw_calls(), 0);
    }
}
