//! Cooked mesh model and binary format
//!
//! This crate provides the pieces shared between:
//! - `obj-cook` (asset pipeline, OBJ -> cooked mesh)
//! - runtime loaders and inspection tools
//!
//! # Modules
//!
//! - [`types`] - Deduplicated, indexed in-memory mesh ([`Mesh`])
//! - [`formats`] - Cooked mesh binary layout (header, field flags, byte order)
//! - [`binary`] - Endian-aware writer and reader for the cooked layout

pub mod binary;
pub mod formats;
pub mod types;

pub use binary::{write_cooked_mesh, MeshReader, MeshWriter};
pub use formats::{
    Endian, IndexWidth, MeshHeader, PrimitiveMode, VertexField, COOKED_MESH_EXT, VERTEX_STRIDE,
};
pub use types::{BoundingBox, Face, Mesh, Vertex};
