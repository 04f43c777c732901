//! Mesh converter (OBJ -> cooked .mesh)

mod builder;
mod convert;
mod error;
mod obj;

// Re-export public API
pub use builder::{MeshBuilder, VertexKey};
pub use convert::{convert_obj, convert_obj_to_memory, load_obj, ConvertedMesh};
pub use error::{Attribute, ParseError};
pub use obj::{parse_obj, ObjParser, QUAD_SPLIT};
