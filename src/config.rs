//! Scene configuration.
//!
//! Every value has a default that reproduces the stock backdrop, and every
//! struct is `#[serde(default)]`, so a JSON file only needs the keys it
//! changes:
//!
//! ```json
//! { "seed": 7, "globe": { "enabled": false }, "starfield": { "attraction_radius": 250 } }
//! ```

use std::fs;
use std::path::Path;

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::visuals::{palette, Color};
use crate::wireframe::MeshKind;

/// A closed range sampled uniformly at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Uniform sample in `min..max`. An empty or non-finite span yields `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.min < self.max && (self.max - self.min).is_finite() {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }

    fn check(&self, field: &str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ConfigError::invalid(field, "bounds must be finite"));
        }
        if self.min > self.max {
            return Err(ConfigError::invalid(field, "min is greater than max"));
        }
        Ok(())
    }
}

/// Complete backdrop configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for all random initialization. `None` picks one at startup.
    pub seed: Option<u64>,
    pub background: Color,
    pub starfield: StarfieldConfig,
    pub connections: ConnectionConfig,
    pub meteors: MeteorConfig,
    pub shapes: ShapeSetConfig,
    pub globe: GlobeConfig,
    pub window: WindowConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: None,
            background: palette::NIGHT,
            starfield: StarfieldConfig::default(),
            connections: ConnectionConfig::default(),
            meteors: MeteorConfig::default(),
            shapes: ShapeSetConfig::default(),
            globe: GlobeConfig::default(),
            window: WindowConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), "loaded scene config");
        Ok(config)
    }

    /// Parse and validate a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the scenes cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.starfield.validate()?;
        self.connections.validate()?;
        self.meteors.validate()?;
        self.shapes.validate()?;
        self.globe.validate()?;
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::invalid("window", "size must be non-zero"));
        }
        Ok(())
    }
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive, got {value}")))
    }
}

fn unit(field: &str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be within [0, 1], got {value}")))
    }
}

/// Starfield particles and pointer attraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    pub enabled: bool,
    /// Surface area, in px², per particle.
    pub area_per_particle: f32,
    pub radius: Span,
    pub attraction_radius: f32,
    /// Displacement gain applied to `force × density`.
    pub attraction_gain: f32,
    pub density: Span,
    /// Drawn radius multiplier at full force: `radius × (1 + force × size_boost)`.
    pub size_boost: f32,
    /// Fraction of the distance back to base covered per reference tick.
    pub return_rate: f32,
    pub opacity_min: f32,
    pub opacity_max: f32,
    pub fade_speed: Span,
    pub palette: Vec<Color>,
    /// Move a particle to a fresh random base when it fades to the minimum.
    pub reseed_on_fade: bool,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            area_per_particle: 10_000.0,
            radius: Span::new(0.5, 2.0),
            attraction_radius: 400.0,
            attraction_gain: 0.5,
            density: Span::new(1.0, 31.0),
            size_boost: 3.0,
            return_rate: 1.0 / 20.0,
            opacity_min: 0.2,
            opacity_max: 1.0,
            fade_speed: Span::new(0.002, 0.012),
            palette: palette::STARS.to_vec(),
            reseed_on_fade: false,
        }
    }
}

impl StarfieldConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("starfield.area_per_particle", self.area_per_particle)?;
        positive("starfield.attraction_radius", self.attraction_radius)?;
        unit("starfield.return_rate", self.return_rate)?;
        unit("starfield.opacity_min", self.opacity_min)?;
        unit("starfield.opacity_max", self.opacity_max)?;
        if self.opacity_min >= self.opacity_max {
            return Err(ConfigError::invalid(
                "starfield.opacity_min",
                "must be below opacity_max",
            ));
        }
        self.radius.check("starfield.radius")?;
        self.density.check("starfield.density")?;
        self.fade_speed.check("starfield.fade_speed")?;
        positive("starfield.fade_speed", self.fade_speed.min)?;
        if self.palette.is_empty() {
            return Err(ConfigError::invalid("starfield.palette", "needs at least one color"));
        }
        Ok(())
    }
}

/// Proximity edges between starfield particles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub enabled: bool,
    pub threshold: f32,
    pub max_alpha: f32,
    pub color: Color,
    pub width: f32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 120.0,
            max_alpha: 0.15,
            color: palette::DEEP_VIOLET,
            width: 0.5,
        }
    }
}

impl ConnectionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("connections.threshold", self.threshold)?;
        unit("connections.max_alpha", self.max_alpha)
    }
}

/// Shooting stars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeteorConfig {
    pub enabled: bool,
    pub count: usize,
    pub length: Span,
    /// Pixels per reference tick along each axis.
    pub speed: Span,
    pub width: Span,
    /// Longest wait, in seconds, before a meteor appears.
    pub max_delay: f32,
    pub max_alpha: f32,
    pub fade_in: f32,
    pub color: Color,
}

impl Default for MeteorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 2,
            length: Span::new(10.0, 90.0),
            speed: Span::new(5.0, 15.0),
            width: Span::new(0.5, 1.5),
            max_delay: 5.0,
            max_alpha: 0.5,
            fade_in: 0.05,
            color: Color::WHITE,
        }
    }
}

impl MeteorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.length.check("meteors.length")?;
        self.speed.check("meteors.speed")?;
        self.width.check("meteors.width")?;
        if self.speed.min <= 0.0 {
            return Err(ConfigError::invalid("meteors.speed", "must be positive"));
        }
        if !(self.max_delay >= 0.0) {
            return Err(ConfigError::invalid("meteors.max_delay", "must not be negative"));
        }
        unit("meteors.max_alpha", self.max_alpha)
    }
}

/// One floating polyhedron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeSpec {
    pub mesh: MeshKind,
    /// Base position as a fraction of the surface size.
    pub anchor: Vec2,
    pub depth_offset: f32,
    pub size: f32,
    pub color: Color,
    /// Radians per reference tick about X, Y and Z.
    pub spin: Vec3,
}

impl ShapeSpec {
    pub fn new(mesh: MeshKind, anchor: Vec2, depth_offset: f32, size: f32, color: Color, spin: Vec3) -> Self {
        Self {
            mesh,
            anchor,
            depth_offset,
            size,
            color,
            spin,
        }
    }
}

/// The faint rotating ellipse drawn with the shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HaloConfig {
    pub enabled: bool,
    pub center: Vec2,
    pub radii: Vec2,
    /// Radians per second.
    pub spin: f32,
    pub alpha: f32,
    pub segments: usize,
    pub color: Color,
}

impl Default for HaloConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            center: Vec2::new(0.5, 0.4),
            radii: Vec2::new(250.0, 80.0),
            spin: 0.1,
            alpha: 0.06,
            segments: 64,
            color: palette::VIOLET,
        }
    }
}

/// Floating wireframe polyhedra.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeSetConfig {
    pub enabled: bool,
    pub focal: f32,
    pub edge_alpha: f32,
    pub edge_width: f32,
    pub vertex_alpha: f32,
    pub vertex_radius: f32,
    /// Horizontal and vertical float amplitude in pixels.
    pub float_amplitude: Vec2,
    /// Horizontal and vertical float rate in radians per second.
    pub float_rate: Vec2,
    /// Pixels of shift at the surface edge.
    pub parallax: f32,
    pub halo: HaloConfig,
    pub shapes: Vec<ShapeSpec>,
}

impl Default for ShapeSetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            focal: 300.0,
            edge_alpha: 0.15,
            edge_width: 0.8,
            vertex_alpha: 0.25,
            vertex_radius: 1.5,
            float_amplitude: Vec2::new(10.0, 15.0),
            float_rate: Vec2::new(0.3, 0.5),
            parallax: 20.0,
            halo: HaloConfig::default(),
            shapes: vec![
                ShapeSpec::new(
                    MeshKind::Icosahedron,
                    Vec2::new(0.85, 0.25),
                    50.0,
                    30.0,
                    palette::VIOLET,
                    Vec3::new(0.003, 0.005, 0.002),
                ),
                ShapeSpec::new(
                    MeshKind::Octahedron,
                    Vec2::new(0.12, 0.7),
                    30.0,
                    45.0,
                    palette::SKY,
                    Vec3::new(0.005, 0.003, 0.004),
                ),
                ShapeSpec::new(
                    MeshKind::Cube,
                    Vec2::new(0.75, 0.8),
                    80.0,
                    25.0,
                    palette::EMERALD,
                    Vec3::new(0.004, 0.006, 0.003),
                ),
                ShapeSpec::new(
                    MeshKind::Icosahedron,
                    Vec2::new(0.2, 0.2),
                    100.0,
                    20.0,
                    palette::LAVENDER,
                    Vec3::new(0.002, 0.004, 0.005),
                ),
                ShapeSpec::new(
                    MeshKind::Octahedron,
                    Vec2::new(0.5, 0.9),
                    60.0,
                    35.0,
                    palette::VIOLET,
                    Vec3::new(0.004, 0.002, 0.003),
                ),
            ],
        }
    }
}

impl ShapeSetConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("shapes.focal", self.focal)?;
        unit("shapes.edge_alpha", self.edge_alpha)?;
        unit("shapes.vertex_alpha", self.vertex_alpha)?;
        for (i, shape) in self.shapes.iter().enumerate() {
            positive(&format!("shapes.shapes[{i}].size"), shape.size)?;
            if self.focal + shape.depth_offset <= 0.0 {
                return Err(ConfigError::invalid(
                    &format!("shapes.shapes[{i}].depth_offset"),
                    "places the shape behind the camera",
                ));
            }
        }
        Ok(())
    }
}

/// One satellite circling the globe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbiterSpec {
    /// Starting angle in radians.
    pub angle: f32,
    /// Radians per reference tick.
    pub speed: f32,
    pub radius: f32,
    /// Inclination of the orbit plane about X, in radians.
    pub tilt: f32,
    pub size: f32,
    pub color: Color,
}

/// The dotted globe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub enabled: bool,
    /// Center as a fraction of the surface size.
    pub anchor: Vec2,
    pub radius: f32,
    pub focal: f32,
    pub dot_count: usize,
    pub dot_size: Span,
    pub dot_color: Color,
    /// Color of every fifth dot.
    pub dot_highlight: Color,
    /// Color of every seventh dot that is not also a fifth.
    pub dot_accent: Color,
    pub arc_count: usize,
    pub arc_speed: Span,
    pub arc_segments: usize,
    pub arc_lift: f32,
    pub arc_alpha: f32,
    /// Pick a new endpoint pair each time an arc completes.
    pub reroute_arcs: bool,
    pub meridians: usize,
    pub meridian_points: usize,
    pub parallels: usize,
    pub parallel_points: usize,
    pub grid_alpha: f32,
    /// Grid longitude drifts at this fraction of the dot spin.
    pub grid_spin_factor: f32,
    /// Yaw radians per reference tick.
    pub base_spin: f32,
    pub yaw_sensitivity: f32,
    pub max_tilt: f32,
    pub tilt_relaxation: f32,
    pub initial_pitch: f32,
    /// Points deeper than `-radius × cull_fraction` are hidden.
    pub cull_fraction: f32,
    pub ring_radius: f32,
    pub ring_segments: usize,
    pub ring_alpha: f32,
    pub color: Color,
    pub orbiters: Vec<OrbiterSpec>,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            anchor: Vec2::new(0.5, 0.5),
            radius: 130.0,
            focal: 400.0,
            dot_count: 200,
            dot_size: Span::new(0.5, 2.5),
            dot_color: palette::VIOLET,
            dot_highlight: palette::SKY,
            dot_accent: palette::EMERALD,
            arc_count: 8,
            arc_speed: Span::new(0.005, 0.015),
            arc_segments: 20,
            arc_lift: 20.0,
            arc_alpha: 0.2,
            reroute_arcs: false,
            meridians: 12,
            meridian_points: 41,
            parallels: 5,
            parallel_points: 61,
            grid_alpha: 0.06,
            grid_spin_factor: 0.5,
            base_spin: 0.003,
            yaw_sensitivity: 0.001,
            max_tilt: 0.3,
            tilt_relaxation: 0.02,
            initial_pitch: 0.3,
            cull_fraction: 0.3,
            ring_radius: 165.0,
            ring_segments: 100,
            ring_alpha: 0.08,
            color: palette::VIOLET,
            orbiters: vec![
                OrbiterSpec {
                    angle: 0.0,
                    speed: 0.008,
                    radius: 165.0,
                    tilt: 0.184,
                    size: 3.0,
                    color: palette::SKY,
                },
                OrbiterSpec {
                    angle: std::f32::consts::PI,
                    speed: 0.005,
                    radius: 155.0,
                    tilt: 0.103,
                    size: 2.0,
                    color: palette::VIOLET,
                },
            ],
        }
    }
}

impl GlobeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("globe.radius", self.radius)?;
        positive("globe.focal", self.focal)?;
        if self.focal <= self.radius + self.arc_lift {
            return Err(ConfigError::invalid(
                "globe.focal",
                "must exceed radius plus arc_lift",
            ));
        }
        self.dot_size.check("globe.dot_size")?;
        self.arc_speed.check("globe.arc_speed")?;
        if self.arc_count > 0 && self.dot_count == 0 {
            return Err(ConfigError::invalid("globe.arc_count", "arcs need at least one dot"));
        }
        if self.arc_speed.min < 0.0 {
            return Err(ConfigError::invalid("globe.arc_speed", "must not be negative"));
        }
        if self.arc_segments == 0 {
            return Err(ConfigError::invalid("globe.arc_segments", "must be non-zero"));
        }
        unit("globe.tilt_relaxation", self.tilt_relaxation)?;
        unit("globe.grid_alpha", self.grid_alpha)?;
        unit("globe.arc_alpha", self.arc_alpha)?;
        unit("globe.ring_alpha", self.ring_alpha)?;
        Ok(())
    }
}

/// Window host settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "orbitfield".into(),
            width: 1280,
            height: 720,
        }
    }
}
