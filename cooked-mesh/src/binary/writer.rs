//! Cooked mesh writer
//!
//! Single pass, no seeking. Every multi-byte value goes through the
//! writer's [`Endian`]; a failed write aborts the rest and is returned
//! as-is (the caller owns cleanup of the partial sink).

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use std::io::{self, Write};

use crate::formats::{Endian, IndexWidth, MeshHeader};
use crate::types::Mesh;

/// Writer for the cooked mesh format
pub struct MeshWriter<W: Write> {
    writer: W,
    endian: Endian,
}

impl<W: Write> MeshWriter<W> {
    /// Create a new mesh writer
    pub fn new(writer: W, endian: Endian) -> Self {
        Self { writer, endian }
    }

    /// Write a complete mesh: header, vertices, indices
    pub fn write_mesh(&mut self, mesh: &Mesh) -> io::Result<()> {
        let header = MeshHeader::new(mesh.vertex_count(), mesh.index_count(), mesh.bounds());

        if !header.index_width.can_address(mesh.vertex_count()) {
            tracing::warn!(
                "{} vertices but only {} indices: index width {:?} cannot address every vertex, indices will wrap",
                mesh.vertex_count(),
                mesh.index_count(),
                header.index_width
            );
        }

        self.write_header(&header)?;
        self.write_vertices(mesh)?;
        self.write_indices(mesh, header.index_width)?;
        Ok(())
    }

    /// Write the 46-byte header
    pub fn write_header(&mut self, header: &MeshHeader) -> io::Result<()> {
        self.writer.write_all(&header.to_bytes(self.endian))
    }

    /// Write the interleaved vertex records
    fn write_vertices(&mut self, mesh: &Mesh) -> io::Result<()> {
        for v in mesh.vertices() {
            for f in v.position.to_array() {
                self.write_f32(f)?;
            }
            for f in v.uv.to_array() {
                self.write_f32(f)?;
            }
            for f in v.normal.to_array() {
                self.write_f32(f)?;
            }
        }
        Ok(())
    }

    /// Write the triangle list
    ///
    /// Indices are trusted; narrowing casts wrap exactly like the loader expects.
    fn write_indices(&mut self, mesh: &Mesh, width: IndexWidth) -> io::Result<()> {
        for index in mesh.indices() {
            match width {
                IndexWidth::U8 => self.writer.write_u8(index as u8)?,
                IndexWidth::U16 => self.write_i16(index as i16)?,
            }
        }
        Ok(())
    }

    fn write_f32(&mut self, v: f32) -> io::Result<()> {
        match self.endian {
            Endian::Big => self.writer.write_f32::<BigEndian>(v),
            Endian::Little => self.writer.write_f32::<LittleEndian>(v),
        }
    }

    fn write_i16(&mut self, v: i16) -> io::Result<()> {
        match self.endian {
            Endian::Big => self.writer.write_i16::<BigEndian>(v),
            Endian::Little => self.writer.write_i16::<LittleEndian>(v),
        }
    }
}

/// Write a complete cooked mesh file
pub fn write_cooked_mesh<W: Write>(w: &mut W, mesh: &Mesh, endian: Endian) -> io::Result<()> {
    MeshWriter::new(w, endian).write_mesh(mesh)
}
