//! File-level OBJ conversion

use anyhow::{Context, Result};
use cooked_mesh::{write_cooked_mesh, Endian, IndexWidth, Mesh, MeshHeader};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::obj::parse_obj;

/// Result of in-memory mesh conversion
pub struct ConvertedMesh {
    /// Number of unique vertices
    pub vertex_count: u32,
    /// Number of triangle-list indices
    pub index_count: u32,
    /// Bytes per index in `data`
    pub index_width: IndexWidth,
    /// Byte order used for `data`
    pub endian: Endian,
    /// Complete cooked file (header + vertices + indices)
    pub data: Vec<u8>,
}

/// Parse an OBJ file into a mesh
pub fn load_obj(input: &Path) -> Result<Mesh> {
    let file = File::open(input).with_context(|| format!("Failed to open OBJ: {:?}", input))?;
    parse_obj(BufReader::new(file)).with_context(|| format!("Failed to parse OBJ: {:?}", input))
}

/// Convert an OBJ file to cooked mesh bytes (for packing without touching disk)
pub fn convert_obj_to_memory(input: &Path, endian: Endian) -> Result<ConvertedMesh> {
    let mesh = load_obj(input)?;

    let mut data = Vec::with_capacity(
        MeshHeader::SIZE
            + mesh.vertex_count() * cooked_mesh::VERTEX_STRIDE
            + mesh.index_count() * 2,
    );
    write_cooked_mesh(&mut data, &mesh, endian)?;

    Ok(ConvertedMesh {
        vertex_count: mesh.vertex_count() as u32,
        index_count: mesh.index_count() as u32,
        index_width: IndexWidth::for_index_count(mesh.index_count()),
        endian,
        data,
    })
}

/// Convert an OBJ file to a cooked mesh file
pub fn convert_obj(input: &Path, output: &Path, endian: Endian) -> Result<()> {
    let mesh = load_obj(input)?;

    if mesh.index_count() == 0 {
        tracing::warn!("{:?} has no faces, writing an empty mesh", input);
    }

    // Write output
    let file =
        File::create(output).with_context(|| format!("Failed to create output: {:?}", output))?;
    let mut writer = BufWriter::new(file);

    write_cooked_mesh(&mut writer, &mesh, endian)
        .and_then(|_| writer.flush())
        .with_context(|| format!("Failed to write mesh: {:?}", output))?;

    tracing::info!(
        "Converted OBJ mesh: {} vertices, {} indices, index_width={}, endian={}",
        mesh.vertex_count(),
        mesh.index_count(),
        IndexWidth::for_index_count(mesh.index_count()).bytes(),
        endian
    );

    Ok(())
}
