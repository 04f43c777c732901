//! In-memory mesh model
//!
//! A [`Mesh`] is the immutable hand-off between a source parser and the
//! binary writer: a deduplicated vertex list, a triangle list indexing into
//! it, and the bounding box of every referenced position.

use glam::{Vec2, Vec3};

/// One unique (position, uv, normal) combination
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self {
            position,
            uv,
            normal,
        }
    }
}

/// One triangle, as three indices into the vertex list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face(pub [u32; 3]);

impl Face {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self([a, b, c])
    }
}

/// Axis-aligned bounds, grown one position at a time
///
/// Starts at `max = -inf`, `min = +inf` on every axis. A box that never
/// saw a position keeps those sentinels; that is a valid (empty) state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub max: Vec3,
    pub min: Vec3,
}

impl BoundingBox {
    pub const EMPTY: Self = Self {
        max: Vec3::NEG_INFINITY,
        min: Vec3::INFINITY,
    };

    /// Grow the box component-wise to contain `p`
    ///
    /// A NaN component in `p` makes that axis NaN for good.
    #[inline]
    pub fn include(&mut self, p: Vec3) {
        self.max = componentwise(self.max, p, f32::max);
        self.min = componentwise(self.min, p, f32::min);
    }

    /// True until the first position has been included
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }
}

/// Apply `op` per axis, returning NaN if either side is NaN
fn componentwise(a: Vec3, b: Vec3, op: fn(f32, f32) -> f32) -> Vec3 {
    let pick = |x: f32, y: f32| if x.is_nan() || y.is_nan() { f32::NAN } else { op(x, y) };
    Vec3::new(pick(a.x, b.x), pick(a.y, b.y), pick(a.z, b.z))
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Indexed triangle mesh ready for encoding
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
    bounds: BoundingBox,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, faces: Vec<Face>, bounds: BoundingBox) -> Self {
        Self {
            vertices,
            faces,
            bounds,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of triangle-list indices (3 per face)
    pub fn index_count(&self) -> usize {
        self.faces.len() * 3
    }

    /// Vertices in assigned-index order
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Faces in encounter order
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Flattened triangle-list indices
    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.faces.iter().flat_map(|f| f.0)
    }
}
