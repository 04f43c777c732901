//! obj-cook library
//!
//! Provides OBJ parsing and conversion functions for use by other tools
//! (e.g., asset packers that want cooked bytes in memory).

pub mod manifest;
pub mod mesh;

// Re-export the cooked format from cooked-mesh
pub use cooked_mesh::{
    write_cooked_mesh, BoundingBox, Endian, Face, IndexWidth, Mesh, MeshHeader, MeshReader,
    MeshWriter, PrimitiveMode, Vertex, VertexField, COOKED_MESH_EXT, VERTEX_STRIDE,
};

// Re-export key types for mesh conversion
pub use mesh::{
    convert_obj, convert_obj_to_memory, load_obj, parse_obj, ConvertedMesh, ObjParser, ParseError,
};
