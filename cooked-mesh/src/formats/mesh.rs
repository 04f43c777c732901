//! Cooked mesh binary format (.mesh)
//!
//! # Layout
//! ```text
//! 0x00: index_width u8        (1 or 2 bytes per index)
//! 0x01: primitive_mode u8     (always 1 = triangle list)
//! 0x02: field flags [u8; 12]  (one per VertexField, 0 or 1)
//! 0x0E: bounds max [f32; 3]
//! 0x1A: bounds min [f32; 3]
//! 0x26: vertex_count i32
//! 0x2A: index_count i32
//! 0x2E: vertex_data (vertex_count * 32 bytes: pos f32x3, uv f32x2, normal f32x3)
//! var:  index_data (index_count * index_width bytes)
//! ```
//!
//! Every multi-byte field uses the byte order picked by the writer.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use glam::Vec3;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::types::BoundingBox;

/// File extension for cooked meshes
pub const COOKED_MESH_EXT: &str = "mesh";

/// Bytes per interleaved vertex record (8 x f32)
pub const VERTEX_STRIDE: usize = 32;

/// Byte order for every multi-byte value in a cooked file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endian {
    #[serde(alias = "be")]
    Big,
    #[default]
    #[serde(alias = "le")]
    Little,
}

impl Endian {
    pub fn write_f32(self, buf: &mut [u8], v: f32) {
        match self {
            Endian::Big => BigEndian::write_f32(buf, v),
            Endian::Little => LittleEndian::write_f32(buf, v),
        }
    }

    pub fn write_i32(self, buf: &mut [u8], v: i32) {
        match self {
            Endian::Big => BigEndian::write_i32(buf, v),
            Endian::Little => LittleEndian::write_i32(buf, v),
        }
    }

    pub fn read_f32(self, buf: &[u8]) -> f32 {
        match self {
            Endian::Big => BigEndian::read_f32(buf),
            Endian::Little => LittleEndian::read_f32(buf),
        }
    }

    pub fn read_i32(self, buf: &[u8]) -> i32 {
        match self {
            Endian::Big => BigEndian::read_i32(buf),
            Endian::Little => LittleEndian::read_i32(buf),
        }
    }
}

impl FromStr for Endian {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "big" | "be" => Ok(Endian::Big),
            "little" | "le" => Ok(Endian::Little),
            other => Err(format!(
                "unknown byte order {other:?} (expected big, be, little or le)"
            )),
        }
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endian::Big => f.write_str("big"),
            Endian::Little => f.write_str("little"),
        }
    }
}

/// Bytes per index in the index section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IndexWidth {
    U8 = 1,
    U16 = 2,
}

impl IndexWidth {
    /// Pick the width from the total index count.
    ///
    /// The threshold is on the index count, not the vertex count, so a mesh
    /// with few triangles but more than 256 vertices still gets 8-bit
    /// indices and they wrap. Loaders depend on this exact rule.
    pub fn for_index_count(index_count: usize) -> Self {
        if index_count < 0xff {
            IndexWidth::U8
        } else {
            IndexWidth::U16
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            1 => Some(IndexWidth::U8),
            2 => Some(IndexWidth::U16),
            _ => None,
        }
    }

    pub fn bytes(self) -> usize {
        self as usize
    }

    /// Whether every index below `vertex_count` survives this width
    pub fn can_address(self, vertex_count: usize) -> bool {
        match self {
            IndexWidth::U8 => vertex_count <= 0x100,
            IndexWidth::U16 => vertex_count <= 0x1_0000,
        }
    }
}

/// How the index list is assembled into triangles
///
/// Cooked meshes are always triangle lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PrimitiveMode {
    List = 1,
}

impl PrimitiveMode {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            1 => Some(PrimitiveMode::List),
            _ => None,
        }
    }
}

/// Vertex attribute slots, in flag-byte order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum VertexField {
    Position2D = 0,
    Position3D = 1,
    Uv0 = 2,
    Uv1 = 3,
    Uv2 = 4,
    Uv3 = 5,
    Uv4 = 6,
    Uv5 = 7,
    Uv6 = 8,
    Uv7 = 9,
    Color = 10,
    Normal = 11,
}

impl VertexField {
    pub const COUNT: usize = 12;

    /// The only field set this format's encoder produces
    pub const COOKED: [VertexField; 3] =
        [VertexField::Position3D, VertexField::Uv0, VertexField::Normal];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Fixed-size header preceding vertex and index data (46 bytes)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshHeader {
    pub index_width: IndexWidth,
    pub primitive_mode: PrimitiveMode,
    pub fields: [u8; VertexField::COUNT],
    pub bounds: BoundingBox,
    pub vertex_count: i32,
    pub index_count: i32,
}

impl MeshHeader {
    pub const SIZE: usize = 2 + VertexField::COUNT + 24 + 4 + 4;

    /// Header for a triangle list with the cooked field set
    pub fn new(vertex_count: usize, index_count: usize, bounds: BoundingBox) -> Self {
        let mut fields = [0u8; VertexField::COUNT];
        for field in VertexField::COOKED {
            fields[field.index()] = 1;
        }

        Self {
            index_width: IndexWidth::for_index_count(index_count),
            primitive_mode: PrimitiveMode::List,
            fields,
            bounds,
            vertex_count: vertex_count as i32,
            index_count: index_count as i32,
        }
    }

    pub fn has_field(&self, field: VertexField) -> bool {
        self.fields[field.index()] != 0
    }

    /// True when the flags are exactly the cooked field set
    pub fn has_cooked_fields(&self) -> bool {
        (0..VertexField::COUNT).all(|i| {
            let expected = VertexField::COOKED.iter().any(|f| f.index() == i);
            (self.fields[i] != 0) == expected
        })
    }

    /// Size of the vertex + index sections that follow the header
    pub fn payload_size(&self) -> usize {
        self.vertex_count.max(0) as usize * VERTEX_STRIDE
            + self.index_count.max(0) as usize * self.index_width.bytes()
    }

    /// Write header to bytes
    pub fn to_bytes(&self, endian: Endian) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0] = self.index_width as u8;
        bytes[1] = self.primitive_mode as u8;
        bytes[2..14].copy_from_slice(&self.fields);

        let floats = self.bounds.max.to_array().into_iter().chain(self.bounds.min.to_array());
        for (i, f) in floats.enumerate() {
            let at = 14 + i * 4;
            endian.write_f32(&mut bytes[at..at + 4], f);
        }

        endian.write_i32(&mut bytes[38..42], self.vertex_count);
        endian.write_i32(&mut bytes[42..46], self.index_count);
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8], endian: Endian) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }

        let index_width = IndexWidth::from_byte(bytes[0])?;
        let primitive_mode = PrimitiveMode::from_byte(bytes[1])?;
        let mut fields = [0u8; VertexField::COUNT];
        fields.copy_from_slice(&bytes[2..14]);

        let vec3 = |at: usize| {
            Vec3::new(
                endian.read_f32(&bytes[at..at + 4]),
                endian.read_f32(&bytes[at + 4..at + 8]),
                endian.read_f32(&bytes[at + 8..at + 12]),
            )
        };

        Some(Self {
            index_width,
            primitive_mode,
            fields,
            bounds: BoundingBox {
                max: vec3(14),
                min: vec3(26),
            },
            vertex_count: endian.read_i32(&bytes[38..42]),
            index_count: endian.read_i32(&bytes[42..46]),
        })
    }
}
