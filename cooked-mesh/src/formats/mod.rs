//! Cooked binary mesh format
//!
//! A POD layout meant to be memcpy'd into GPU buffers by the loader.
//! No magic bytes and no version field; the layout itself is the contract.
//! Byte order is chosen by whoever writes the file and must be known by
//! whoever reads it.

pub mod mesh;

pub use mesh::*;
