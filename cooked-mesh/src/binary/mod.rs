//! Binary cooked mesh encoding
//!
//! # File Structure
//!
//! ```text
//! +--------------------------------------+
//! | Header (46 bytes, see MeshHeader)    |
//! +--------------------------------------+
//! | Vertices (vertex_count * 32 bytes)   |
//! |   pos f32x3 | uv f32x2 | normal f32x3 |
//! +--------------------------------------+
//! | Indices (index_count * index_width)  |
//! +--------------------------------------+
//! ```

mod reader;
mod writer;

pub use reader::MeshReader;
pub use writer::{write_cooked_mesh, MeshWriter};
