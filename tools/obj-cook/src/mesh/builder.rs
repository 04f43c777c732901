//! Vertex deduplication and bounds accumulation

use cooked_mesh::{BoundingBox, Face, Mesh, Vertex};
use hashbrown::HashMap;

/// Identity of a face corner: indices into the raw attribute arrays.
///
/// Two corners are the same vertex only if they reference the same
/// declared records; numerically equal but separately declared
/// attributes stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexKey {
    pub position: usize,
    pub tex_coord: usize,
    pub normal: usize,
}

/// Accumulates unique vertices, triangles and bounds during a parse
#[derive(Debug, Default)]
pub struct MeshBuilder {
    vertices: Vec<Vertex>,
    lookup: HashMap<VertexKey, u32>,
    faces: Vec<Face>,
    bounds: BoundingBox,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a face corner and return its output index.
    ///
    /// The bounds grow on every call, hit or miss. New keys get the next
    /// index in encounter order.
    pub fn push(&mut self, key: VertexKey, vertex: Vertex) -> u32 {
        self.bounds.include(vertex.position);

        let next = self.vertices.len() as u32;
        *self.lookup.entry(key).or_insert_with(|| {
            self.vertices.push(vertex);
            next
        })
    }

    pub fn push_face(&mut self, indices: [u32; 3]) {
        self.faces.push(Face(indices));
    }

    pub fn finish(self) -> Mesh {
        Mesh::new(self.vertices, self.faces, self.bounds)
    }
}
