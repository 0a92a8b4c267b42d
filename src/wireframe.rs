//! Floating wireframe polyhedra.
//!
//! A [`ShapeSet`] holds a handful of rigid meshes. Each one spins about all
//! three axes, bobs on two sine waves and shifts slightly with the pointer.
//! Vertices are projected during `update`, so `draw` and tests read the same
//! cached screen coordinates.
//!
//! # Meshes
//!
//! ```
//! use orbitfield::wireframe::WireframeMesh;
//!
//! let ico = WireframeMesh::icosahedron();
//! assert_eq!((ico.vertices().len(), ico.edges().len()), (12, 30));
//! ```

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{HaloConfig, ShapeSetConfig, ShapeSpec};
use crate::context::FrameContext;
use crate::math::{Projected, Projection, Rotation};
use crate::surface::{Surface, SurfaceSize};
use crate::visuals::Color;

/// Built-in mesh catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshKind {
    Icosahedron,
    Octahedron,
    Cube,
}

impl MeshKind {
    pub fn mesh(self) -> WireframeMesh {
        match self {
            MeshKind::Icosahedron => WireframeMesh::icosahedron(),
            MeshKind::Octahedron => WireframeMesh::octahedron(),
            MeshKind::Cube => WireframeMesh::cube(),
        }
    }
}

/// An edge that names a vertex the mesh does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("edge {edge} references vertex {index}, but the mesh has {vertex_count} vertices")]
pub struct InvalidEdge {
    pub edge: usize,
    pub index: usize,
    pub vertex_count: usize,
}

/// Local-space vertices plus edges as index pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct WireframeMesh {
    vertices: Vec<Vec3>,
    edges: Vec<[usize; 2]>,
}

impl WireframeMesh {
    /// Build a mesh, rejecting edges that point past the vertex list.
    pub fn new(vertices: Vec<Vec3>, edges: Vec<[usize; 2]>) -> Result<Self, InvalidEdge> {
        for (edge, pair) in edges.iter().enumerate() {
            if let Some(&index) = pair.iter().find(|&&i| i >= vertices.len()) {
                return Err(InvalidEdge {
                    edge,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }
        Ok(Self { vertices, edges })
    }

    fn from_tables(vertices: &[[f32; 3]], edges: &[[usize; 2]]) -> Self {
        Self {
            vertices: vertices.iter().map(|&v| Vec3::from_array(v)).collect(),
            edges: edges.to_vec(),
        }
    }

    /// Icosahedron (12 vertices, 30 edges, edge length 2).
    pub fn icosahedron() -> Self {
        const P: f32 = 1.618_034;
        Self::from_tables(
            &[
                [-1.0, P, 0.0],
                [1.0, P, 0.0],
                [-1.0, -P, 0.0],
                [1.0, -P, 0.0],
                [0.0, -1.0, P],
                [0.0, 1.0, P],
                [0.0, -1.0, -P],
                [0.0, 1.0, -P],
                [P, 0.0, -1.0],
                [P, 0.0, 1.0],
                [-P, 0.0, -1.0],
                [-P, 0.0, 1.0],
            ],
            &[
                [0, 1], [0, 5], [0, 7], [0, 10], [0, 11], [1, 5], [1, 7], [1, 8], [1, 9],
                [2, 3], [2, 4], [2, 6], [2, 10], [2, 11], [3, 4], [3, 6], [3, 8], [3, 9],
                [4, 5], [4, 9], [4, 11], [5, 9], [5, 11], [6, 7], [6, 8], [6, 10],
                [7, 8], [7, 10], [8, 9], [10, 11],
            ],
        )
    }

    /// Octahedron (6 vertices, 12 edges).
    pub fn octahedron() -> Self {
        Self::from_tables(
            &[
                [0.0, 1.0, 0.0],
                [0.0, -1.0, 0.0],
                [1.0, 0.0, 0.0],
                [-1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0],
                [0.0, 0.0, -1.0],
            ],
            &[
                [0, 2], [0, 3], [0, 4], [0, 5], [1, 2], [1, 3], [1, 4], [1, 5],
                [2, 4], [4, 3], [3, 5], [5, 2],
            ],
        )
    }

    /// Cube (8 vertices, 12 edges) spanning -1..1.
    pub fn cube() -> Self {
        Self::from_tables(
            &[
                [-1.0, -1.0, -1.0],
                [1.0, -1.0, -1.0],
                [1.0, 1.0, -1.0],
                [-1.0, 1.0, -1.0],
                [-1.0, -1.0, 1.0],
                [1.0, -1.0, 1.0],
                [1.0, 1.0, 1.0],
                [-1.0, 1.0, 1.0],
            ],
            &[
                [0, 1], [1, 2], [2, 3], [3, 0], [4, 5], [5, 6], [6, 7], [7, 4],
                [0, 4], [1, 5], [2, 6], [3, 7],
            ],
        )
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn edges(&self) -> &[[usize; 2]] {
        &self.edges
    }
}

/// One rigid polyhedron instance.
#[derive(Debug, Clone)]
pub struct WireframeShape {
    mesh: WireframeMesh,
    pub rotation: Rotation,
    /// Radians per reference tick about X, Y and Z.
    pub spin: Vec3,
    /// Rest position as a fraction of the surface size.
    pub anchor: Vec2,
    /// Rest position in pixels.
    pub base: Vec2,
    /// Current float and parallax displacement from `base`.
    pub offset: Vec2,
    pub phase: f32,
    pub depth_offset: f32,
    pub size: f32,
    pub color: Color,
    projected: Vec<Projected>,
}

impl WireframeShape {
    pub fn new(spec: &ShapeSpec, rotation: Rotation, phase: f32, size: SurfaceSize) -> Self {
        let mesh = spec.mesh.mesh();
        Self {
            projected: Vec::with_capacity(mesh.vertices.len()),
            mesh,
            rotation,
            spin: spec.spin,
            anchor: spec.anchor,
            base: spec.anchor * size.as_vec2(),
            offset: Vec2::ZERO,
            phase,
            depth_offset: spec.depth_offset,
            size: spec.size,
            color: spec.color,
        }
    }

    pub fn mesh(&self) -> &WireframeMesh {
        &self.mesh
    }

    pub fn position(&self) -> Vec2 {
        self.base + self.offset
    }

    /// Screen-space vertices from the last projection.
    pub fn projected(&self) -> &[Projected] {
        &self.projected
    }

    fn projection(&self, focal: f32) -> Projection {
        Projection::new(focal, self.position())
            .with_depth_offset(self.depth_offset)
            .with_size(self.size)
    }

    fn reproject(&mut self, focal: f32) {
        let projection = self.projection(focal);
        let rotation = self.rotation;
        self.projected.clear();
        self.projected.extend(
            self.mesh
                .vertices
                .iter()
                .map(|&v| projection.project_rotated(v, rotation)),
        );
    }
}

/// The faint ellipse that turns slowly behind the shapes.
#[derive(Debug, Clone)]
pub struct HaloRing {
    config: HaloConfig,
    pub angle: f32,
    points: Vec<Vec2>,
}

impl HaloRing {
    pub fn new(config: &HaloConfig) -> Self {
        Self {
            config: config.clone(),
            angle: 0.0,
            points: Vec::with_capacity(config.segments + 1),
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    fn update(&mut self, elapsed: f32, size: SurfaceSize) {
        self.angle = elapsed * self.config.spin;
        let center = self.config.center * size.as_vec2();
        let rotation = Vec2::from_angle(self.angle);
        let segments = self.config.segments.max(3);
        self.points.clear();
        for i in 0..=segments {
            let t = i as f32 / segments as f32 * TAU;
            let local = Vec2::new(t.cos(), t.sin()) * self.config.radii;
            self.points.push(center + rotation.rotate(local));
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        if self.config.enabled {
            surface.polyline(&self.points, self.config.color.with_alpha(self.config.alpha), 1.0);
        }
    }
}

/// The floating polyhedra plus their halo.
#[derive(Debug, Clone)]
pub struct ShapeSet {
    config: ShapeSetConfig,
    shapes: Vec<WireframeShape>,
    halo: HaloRing,
    size: SurfaceSize,
}

impl ShapeSet {
    /// Instantiate every configured shape with a random starting rotation in
    /// `[0, π)` per axis and a random float phase.
    pub fn new<R: Rng + ?Sized>(config: &ShapeSetConfig, size: SurfaceSize, rng: &mut R) -> Self {
        let size = size.clamped();
        let shapes = config
            .shapes
            .iter()
            .map(|spec| {
                let rotation = Rotation::new(
                    rng.gen_range(0.0..PI),
                    rng.gen_range(0.0..PI),
                    rng.gen_range(0.0..PI),
                );
                let phase = rng.gen_range(0.0..TAU);
                WireframeShape::new(spec, rotation, phase, size)
            })
            .collect();
        let mut set = Self {
            config: config.clone(),
            shapes,
            halo: HaloRing::new(&config.halo),
            size,
        };
        set.reproject();
        set.halo.update(0.0, size);
        set
    }

    pub fn shapes(&self) -> &[WireframeShape] {
        &self.shapes
    }

    pub fn halo(&self) -> &HaloRing {
        &self.halo
    }

    fn reproject(&mut self) {
        let focal = self.config.focal;
        for shape in &mut self.shapes {
            shape.reproject(focal);
        }
    }

    /// Spin, float and parallax, then project.
    pub fn update(&mut self, ctx: &FrameContext) {
        let t = ctx.elapsed;
        let amplitude = self.config.float_amplitude;
        let rate = self.config.float_rate;
        let parallax = ctx.pointer_offset() * self.config.parallax;

        for shape in &mut self.shapes {
            shape.rotation.advance(shape.spin, ctx.step);
            let float = Vec2::new(
                (t * rate.x + shape.phase + 1.0).sin() * amplitude.x,
                (t * rate.y + shape.phase).sin() * amplitude.y,
            );
            shape.offset = float + parallax;
        }
        self.reproject();
        self.halo.update(t, self.size);
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        let config = &self.config;
        for shape in &self.shapes {
            let edge_color = shape.color.with_alpha(config.edge_alpha);
            for &[a, b] in shape.mesh.edges() {
                surface.line(
                    shape.projected[a].screen,
                    shape.projected[b].screen,
                    edge_color,
                    config.edge_width,
                );
            }
            let vertex_color = shape.color.with_alpha(config.vertex_alpha);
            for p in &shape.projected {
                surface.fill_circle(p.screen, config.vertex_radius, vertex_color);
            }
        }
        self.halo.draw(surface);
    }

    /// Move anchors to the new size. Rotation, phase and the current float
    /// offset carry over.
    pub fn resize(&mut self, new: SurfaceSize) {
        self.size = new.clamped();
        let extent = self.size.as_vec2();
        for shape in &mut self.shapes {
            shape.base = shape.anchor * extent;
        }
        self.reproject();
    }
}
