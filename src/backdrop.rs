//! The assembled backdrop: starfield, floating shapes and globe.
//!
//! ```no_run
//! use orbitfield::Backdrop;
//!
//! Backdrop::new().with_seed(7).run().unwrap();
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;
use rand::rngs::StdRng;

use crate::config::SceneConfig;
use crate::error::{OrbitfieldError, SnapshotError};
use crate::globe::GlobeScene;
use crate::layer::{Layer, StarfieldLayer};
use crate::raster::Canvas;
use crate::scheduler::Scheduler;
use crate::surface::{Surface, SurfaceSize};
use crate::time::{FixedStepClock, Time};
use crate::wireframe::ShapeSet;

type SharedSpawner = Arc<dyn Fn(SurfaceSize, &mut StdRng) -> Box<dyn Layer>>;

/// Builder for a full backdrop.
#[derive(Clone, Default)]
pub struct Backdrop {
    config: SceneConfig,
    seed: Option<u64>,
    extra_layers: Vec<SharedSpawner>,
}

impl fmt::Debug for Backdrop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backdrop")
            .field("config", &self.config)
            .field("seed", &self.seed)
            .field("extra_layers", &self.extra_layers.len())
            .finish()
    }
}

impl Backdrop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: SceneConfig) -> Self {
        self.config = config;
        self
    }

    /// Fix the random seed. Overrides the seed in the config.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Add a custom layer drawn above the built-in ones.
    pub fn with_layer<F>(mut self, spawner: F) -> Self
    where
        F: Fn(SurfaceSize, &mut StdRng) -> Box<dyn Layer> + 'static,
    {
        self.extra_layers.push(Arc::new(spawner));
        self
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Seed used for layer setup: the explicit one, then the config's, then
    /// one from the OS.
    pub fn seed(&self) -> u64 {
        self.seed
            .or(self.config.seed)
            .unwrap_or_else(rand::random)
    }

    /// A scheduler carrying every enabled layer, bottom to top: starfield,
    /// shapes, globe, then any custom layers.
    ///
    /// A config that fails [`SceneConfig::validate`] is replaced by the
    /// defaults, with a warning.
    pub fn scheduler<S: Surface>(&self, time: Time) -> Scheduler<S> {
        let seed = self.seed();
        let mut scheduler = Scheduler::new(time, seed);

        let fallback;
        let cfg = match self.config.validate() {
            Ok(()) => &self.config,
            Err(err) => {
                tracing::warn!(error = %err, "invalid scene config, using defaults");
                fallback = SceneConfig::default();
                &fallback
            }
        };
        if cfg.starfield.enabled || cfg.meteors.enabled {
            let (starfield, meteors, connections) =
                (cfg.starfield.clone(), cfg.meteors.clone(), cfg.connections.clone());
            scheduler = scheduler.with_layer(move |size, rng| {
                Box::new(StarfieldLayer::new(&starfield, &meteors, &connections, size, rng)) as Box<dyn Layer>
            });
        }
        if cfg.shapes.enabled {
            let shapes = cfg.shapes.clone();
            scheduler = scheduler
                .with_layer(move |size, rng| Box::new(ShapeSet::new(&shapes, size, rng)) as Box<dyn Layer>);
        }
        if cfg.globe.enabled {
            let globe = cfg.globe.clone();
            scheduler = scheduler
                .with_layer(move |size, rng| Box::new(GlobeScene::new(&globe, size, rng)) as Box<dyn Layer>);
        }
        for spawner in &self.extra_layers {
            let spawner = Arc::clone(spawner);
            scheduler = scheduler.with_layer(move |size, rng| spawner(size, rng));
        }
        scheduler
    }

    /// Render `frames` frames at a fixed 60 Hz into an offscreen canvas and
    /// return the last one.
    pub fn snapshot(&self, size: SurfaceSize, frames: u32) -> Result<RgbaImage, SnapshotError> {
        let mut scheduler = self.scheduler::<Canvas>(Time::with_clock(FixedStepClock::sixty_hz()));
        let mut next = scheduler.start(Some(Canvas::new(size, self.config.background)));
        for _ in 0..frames.max(1) {
            next = next.and_then(|request| scheduler.run_frame(request));
        }
        scheduler.stop();

        let canvas = scheduler.surface().ok_or(SnapshotError::NoSurface)?;
        tracing::info!(
            width = canvas.size().width,
            height = canvas.size().height,
            frames,
            "snapshot rendered"
        );
        Ok(canvas.to_image())
    }

    /// Render a snapshot and write it as PNG.
    pub fn save_snapshot(&self, path: impl AsRef<Path>, size: SurfaceSize, frames: u32) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        self.snapshot(size, frames)?.save(path)?;
        tracing::info!(path = %path.display(), "snapshot saved");
        Ok(())
    }

    /// Open a window and animate until it is closed.
    pub fn run(self) -> Result<(), OrbitfieldError> {
        crate::window::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Recorder;

    #[test]
    fn test_layer_order_follows_enabled_flags() {
        let mut config = SceneConfig::default();
        config.shapes.enabled = false;
        let mut scheduler = Backdrop::new()
            .with_config(config)
            .with_seed(3)
            .scheduler::<Recorder>(Time::with_clock(FixedStepClock::sixty_hz()));
        scheduler.start(Some(Recorder::new(SurfaceSize::new(400, 300))));
        let names: Vec<_> = scheduler.layers().iter().map(|l| l.name()).collect();
        assert_eq!(names, ["starfield", "globe"]);
    }

    struct Marker;

    impl Layer for Marker {
        fn name(&self) -> &'static str {
            "marker"
        }
        fn update(&mut self, _ctx: &crate::context::FrameContext) {}
        fn draw(&self, _surface: &mut dyn Surface) {}
        fn resize(&mut self, _old: SurfaceSize, _new: SurfaceSize) {}
    }

    #[test]
    fn test_custom_layers_go_on_top() {
        let mut scheduler = Backdrop::new()
            .with_seed(3)
            .with_layer(|_, _| Box::new(Marker) as Box<dyn Layer>)
            .scheduler::<Recorder>(Time::with_clock(FixedStepClock::sixty_hz()));
        scheduler.start(Some(Recorder::new(SurfaceSize::new(400, 300))));
        let names: Vec<_> = scheduler.layers().iter().map(|l| l.name()).collect();
        assert_eq!(names, ["starfield", "shapes", "globe", "marker"]);
    }

    #[test]
    fn test_explicit_seed_wins() {
        let config = SceneConfig {
            seed: Some(1),
            ..SceneConfig::default()
        };
        assert_eq!(Backdrop::new().with_config(config.clone()).seed(), 1);
        assert_eq!(Backdrop::new().with_config(config).with_seed(9).seed(), 9);
    }

    #[test]
    fn test_snapshot_is_deterministic() {
        let backdrop = Backdrop::new().with_seed(42);
        let size = SurfaceSize::new(160, 120);
        let a = backdrop.snapshot(size, 5).unwrap();
        let b = backdrop.snapshot(size, 5).unwrap();
        assert_eq!(a.dimensions(), (160, 120));
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let mut config = SceneConfig::default();
        config.starfield.opacity_min = 0.9;
        config.starfield.opacity_max = 0.5;
        config.meteors.max_delay = f32::INFINITY;
        let backdrop = Backdrop::new().with_config(config).with_seed(1);

        let image = backdrop.snapshot(SurfaceSize::new(200, 200), 1).unwrap();
        assert_eq!(image.dimensions(), (200, 200));
        let expected = Backdrop::new().with_seed(1).snapshot(SurfaceSize::new(200, 200), 1).unwrap();
        assert_eq!(image.as_raw(), expected.as_raw());
    }

    #[test]
    fn test_snapshot_paints_over_background() {
        let image = Backdrop::new()
            .with_seed(5)
            .snapshot(SurfaceSize::new(320, 240), 2)
            .unwrap();
        let bg = crate::visuals::palette::NIGHT.to_rgba8();
        assert!(image.pixels().any(|p| p.0 != bg));
    }
}
