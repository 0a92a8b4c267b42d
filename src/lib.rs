//! # orbitfield
//!
//! Procedural animated backgrounds: a drifting starfield that reacts to the
//! pointer, floating wireframe polyhedra and a rotating dotted globe.
//!
//! Everything is simulated and projected on the CPU and painted through the
//! [`Surface`] trait. The windowed host blits a [`Canvas`] to the screen with
//! wgpu; tests draw into a [`Recorder`] and assert on the calls.
//!
//! ## Quick Start
//!
//! ```no_run
//! use orbitfield::prelude::*;
//!
//! fn main() -> Result<(), OrbitfieldError> {
//!     Backdrop::new()
//!         .with_seed(42)
//!         .run()
//! }
//! ```
//!
//! ## Headless
//!
//! ```
//! use orbitfield::prelude::*;
//!
//! let image = Backdrop::new()
//!     .with_seed(42)
//!     .snapshot(SurfaceSize::new(320, 180), 30)
//!     .unwrap();
//! assert_eq!(image.dimensions(), (320, 180));
//! ```
//!
//! ## Layers
//!
//! | Layer | Contents |
//! |-------|----------|
//! | `starfield` | [`ParticleField`], [`MeteorShower`], proximity web from [`connections`] |
//! | `shapes` | [`ShapeSet`]: projected [`WireframeMesh`]es and a halo ring |
//! | `globe` | [`GlobeScene`]: dots, grid, arcs, orbiters |
//!
//! Each frame the [`Scheduler`] samples the pointer once, clears the surface,
//! updates every layer and then draws every layer bottom to top.

pub mod backdrop;
pub mod config;
pub mod connections;
pub mod context;
pub mod error;
pub mod globe;
mod gpu;
pub mod input;
pub mod layer;
pub mod math;
pub mod meteors;
pub mod raster;
pub mod scheduler;
pub mod starfield;
pub mod surface;
pub mod time;
pub mod visuals;
mod window;
pub mod wireframe;

pub use backdrop::Backdrop;
pub use config::{SceneConfig, Span};
pub use context::FrameContext;
pub use error::{ConfigError, OrbitfieldError, PresentError, SnapshotError};
pub use glam::{Vec2, Vec3};
pub use globe::GlobeScene;
pub use layer::{Layer, StarfieldLayer};
pub use math::{Projected, Projection, Rotation};
pub use meteors::MeteorShower;
pub use raster::Canvas;
pub use scheduler::{FrameRequest, Scheduler};
pub use starfield::{Particle, ParticleField};
pub use surface::{Recorder, Surface, SurfaceSize};
pub use visuals::Color;
pub use wireframe::{ShapeSet, WireframeMesh};

/// Convenient re-exports for common usage.
///
/// ```
/// use orbitfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::backdrop::Backdrop;
    pub use crate::config::SceneConfig;
    pub use crate::context::FrameContext;
    pub use crate::error::OrbitfieldError;
    pub use crate::layer::Layer;
    pub use crate::raster::Canvas;
    pub use crate::scheduler::{FrameRequest, Scheduler};
    pub use crate::surface::{Recorder, Surface, SurfaceSize};
    pub use crate::time::{FixedStepClock, Time};
    pub use crate::visuals::{palette, Color};
    pub use crate::{Vec2, Vec3};
}
