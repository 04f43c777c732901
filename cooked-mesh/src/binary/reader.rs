//! Cooked mesh reader
//!
//! Decodes exactly what [`MeshWriter`](super::MeshWriter) produces. Used for
//! inspection and round-trip checks; files with other field sets or
//! primitive modes are rejected.

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use glam::{Vec2, Vec3};
use std::io::{self, Read};

use crate::formats::{Endian, IndexWidth, MeshHeader};
use crate::types::{Face, Mesh, Vertex};

/// Reader for the cooked mesh format
pub struct MeshReader<R: Read> {
    reader: R,
    endian: Endian,
}

impl<R: Read> MeshReader<R> {
    /// Create a new mesh reader
    pub fn new(reader: R, endian: Endian) -> Self {
        Self { reader, endian }
    }

    /// Read and validate the 46-byte header
    pub fn read_header(&mut self) -> io::Result<MeshHeader> {
        let mut bytes = [0u8; MeshHeader::SIZE];
        self.reader.read_exact(&mut bytes)?;

        let header = MeshHeader::from_bytes(&bytes, self.endian)
            .ok_or_else(|| invalid("unknown index width or primitive mode"))?;

        if !header.has_cooked_fields() {
            return Err(invalid("unsupported vertex field set"));
        }
        if header.vertex_count < 0 || header.index_count < 0 {
            return Err(invalid("negative element count"));
        }
        if header.index_count % 3 != 0 {
            return Err(invalid("index count is not a multiple of 3"));
        }

        Ok(header)
    }

    /// Read a complete mesh
    pub fn read_mesh(&mut self) -> io::Result<(MeshHeader, Mesh)> {
        let header = self.read_header()?;

        // Counts are untrusted until the data is actually there
        let mut vertices = Vec::new();
        for _ in 0..header.vertex_count {
            let position = self.read_vec3()?;
            let uv = Vec2::new(self.read_f32()?, self.read_f32()?);
            let normal = self.read_vec3()?;
            vertices.push(Vertex::new(position, uv, normal));
        }

        let triangle_count = header.index_count as usize / 3;
        let mut faces = Vec::new();
        for _ in 0..triangle_count {
            let a = self.read_index(header.index_width)?;
            let b = self.read_index(header.index_width)?;
            let c = self.read_index(header.index_width)?;
            faces.push(Face::new(a, b, c));
        }

        Ok((header, Mesh::new(vertices, faces, header.bounds)))
    }

    fn read_index(&mut self, width: IndexWidth) -> io::Result<u32> {
        let index = match width {
            IndexWidth::U8 => self.reader.read_u8()? as u32,
            IndexWidth::U16 => {
                let v = match self.endian {
                    Endian::Big => self.reader.read_i16::<BigEndian>()?,
                    Endian::Little => self.reader.read_i16::<LittleEndian>()?,
                };
                v as u16 as u32
            }
        };
        Ok(index)
    }

    fn read_vec3(&mut self) -> io::Result<Vec3> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    fn read_f32(&mut self) -> io::Result<f32> {
        match self.endian {
            Endian::Big => self.reader.read_f32::<BigEndian>(),
            Endian::Little => self.reader.read_f32::<LittleEndian>(),
        }
    }
}

fn invalid(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, format!("cooked mesh: {msg}"))
}
