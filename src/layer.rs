//! Scene layers driven by the scheduler.
//!
//! Each layer owns its state and paints onto the shared surface. The
//! scheduler calls `update` on every layer, then `draw` on every layer, in
//! the order they were added; earlier layers end up underneath.

use rand::rngs::StdRng;

use crate::config::{ConnectionConfig, MeteorConfig, StarfieldConfig};
use crate::connections::draw_connections;
use crate::context::FrameContext;
use crate::globe::GlobeScene;
use crate::meteors::MeteorShower;
use crate::starfield::ParticleField;
use crate::surface::{Surface, SurfaceSize};
use crate::wireframe::ShapeSet;

/// Something the scheduler updates and draws every frame.
pub trait Layer {
    fn name(&self) -> &'static str;

    fn update(&mut self, ctx: &FrameContext);

    fn draw(&self, surface: &mut dyn Surface);

    /// The surface changed size. Animation state must survive.
    fn resize(&mut self, old: SurfaceSize, new: SurfaceSize);
}

/// Builds a layer once the surface size is known.
pub type LayerSpawner = Box<dyn Fn(SurfaceSize, &mut StdRng) -> Box<dyn Layer>>;

/// Particles, shooting stars and the proximity web.
pub struct StarfieldLayer {
    field: Option<ParticleField>,
    meteors: Option<MeteorShower>,
    connections: Option<ConnectionConfig>,
}

impl StarfieldLayer {
    pub fn new(
        starfield: &StarfieldConfig,
        meteors: &MeteorConfig,
        connections: &ConnectionConfig,
        size: SurfaceSize,
        rng: &mut StdRng,
    ) -> Self {
        let field = starfield
            .enabled
            .then(|| ParticleField::initialize(starfield, size, rng));
        let meteors = meteors
            .enabled
            .then(|| MeteorShower::new(meteors, size, rng));
        Self {
            connections: (field.is_some() && connections.enabled).then(|| connections.clone()),
            field,
            meteors,
        }
    }

    pub fn field(&self) -> Option<&ParticleField> {
        self.field.as_ref()
    }

    pub fn meteors(&self) -> Option<&MeteorShower> {
        self.meteors.as_ref()
    }
}

impl Layer for StarfieldLayer {
    fn name(&self) -> &'static str {
        "starfield"
    }

    fn update(&mut self, ctx: &FrameContext) {
        if let Some(field) = &mut self.field {
            field.update(ctx);
        }
        if let Some(meteors) = &mut self.meteors {
            meteors.update(ctx);
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        if let Some(field) = &self.field {
            field.draw(surface);
        }
        if let Some(meteors) = &self.meteors {
            meteors.draw(surface);
        }
        if let (Some(field), Some(config)) = (&self.field, &self.connections) {
            draw_connections(field.particles(), config, surface);
        }
    }

    fn resize(&mut self, old: SurfaceSize, new: SurfaceSize) {
        if let Some(field) = &mut self.field {
            field.resize(old, new);
        }
        if let Some(meteors) = &mut self.meteors {
            meteors.resize(new);
        }
    }
}

impl Layer for ShapeSet {
    fn name(&self) -> &'static str {
        "shapes"
    }

    fn update(&mut self, ctx: &FrameContext) {
        ShapeSet::update(self, ctx);
    }

    fn draw(&self, surface: &mut dyn Surface) {
        ShapeSet::draw(self, surface);
    }

    fn resize(&mut self, _old: SurfaceSize, new: SurfaceSize) {
        ShapeSet::resize(self, new);
    }
}

impl Layer for GlobeScene {
    fn name(&self) -> &'static str {
        "globe"
    }

    fn update(&mut self, ctx: &FrameContext) {
        GlobeScene::update(self, ctx);
    }

    fn draw(&self, surface: &mut dyn Surface) {
        GlobeScene::draw(self, surface);
    }

    fn resize(&mut self, _old: SurfaceSize, new: SurfaceSize) {
        GlobeScene::resize(self, new);
    }
}
