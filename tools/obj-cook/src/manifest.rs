//! cook.toml manifest parsing and batch builds
//!
//! ```toml
//! [output]
//! dir = "build"
//! endian = "little"
//!
//! [[meshes]]
//! id = "crate"
//! path = "models/crate.obj"
//! endian = "big"
//! ```
//!
//! Relative paths resolve against the manifest's directory.

use anyhow::{bail, Context, Result};
use cooked_mesh::{Endian, COOKED_MESH_EXT};
use hashbrown::HashSet;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::mesh;

/// cook.toml manifest structure
#[derive(Debug, Default, Deserialize)]
pub struct CookManifest {
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub meshes: Vec<MeshEntry>,
}

/// Output configuration section
#[derive(Debug, Deserialize)]
pub struct OutputSection {
    /// Output directory, relative to the manifest.
    /// Default: "."
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Byte order for every mesh without its own override.
    /// Default: little
    #[serde(default)]
    pub endian: Endian,

    /// File extension for cooked meshes.
    /// Default: "mesh"
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            endian: Endian::default(),
            extension: default_extension(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_extension() -> String {
    COOKED_MESH_EXT.to_string()
}

/// Single mesh entry
#[derive(Debug, Deserialize)]
pub struct MeshEntry {
    pub id: String,
    pub path: PathBuf,

    /// Per-mesh byte order override
    #[serde(default)]
    pub endian: Option<Endian>,
}

impl CookManifest {
    /// Byte order for one entry, falling back to the output default
    pub fn endian_for(&self, entry: &MeshEntry) -> Endian {
        entry.endian.unwrap_or(self.output.endian)
    }

    /// Where the cooked file for `entry` lands
    pub fn output_path(&self, entry: &MeshEntry, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}.{}", entry.id, self.output.extension))
    }
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<CookManifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    parse_manifest(&content).with_context(|| format!("Failed to parse manifest: {:?}", path))
}

/// Parse manifest text
pub fn parse_manifest(content: &str) -> Result<CookManifest> {
    Ok(toml::from_str(content)?)
}

/// Check ids and source paths without converting anything
pub fn validate(manifest: &CookManifest, base_dir: &Path) -> Result<()> {
    if manifest.meshes.is_empty() {
        tracing::warn!("Manifest declares no meshes");
    }

    let mut seen = HashSet::new();
    for entry in &manifest.meshes {
        if entry.id.trim().is_empty() {
            bail!("Mesh entry for {:?} has an empty id", entry.path);
        }
        if !seen.insert(entry.id.as_str()) {
            bail!("Duplicate mesh id: {}", entry.id);
        }

        let is_obj = entry
            .path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("obj"));
        if !is_obj {
            bail!("Mesh '{}': {:?} is not an .obj file", entry.id, entry.path);
        }

        let source = base_dir.join(&entry.path);
        if !source.is_file() {
            bail!("Mesh '{}': source not found: {:?}", entry.id, source);
        }
    }

    Ok(())
}

/// Convert every mesh in the manifest
///
/// `output_override` replaces `[output] dir` when given. Returns the
/// written paths in manifest order.
pub fn build_all(
    manifest: &CookManifest,
    base_dir: &Path,
    output_override: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    validate(manifest, base_dir)?;

    let output_dir = match output_override {
        Some(dir) => dir.to_path_buf(),
        None => base_dir.join(&manifest.output.dir),
    };
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let mut written = Vec::with_capacity(manifest.meshes.len());
    for entry in &manifest.meshes {
        let input = base_dir.join(&entry.path);
        let output = manifest.output_path(entry, &output_dir);
        let endian = manifest.endian_for(entry);

        tracing::info!("Cooking '{}': {:?} -> {:?} ({})", entry.id, input, output, endian);
        mesh::convert_obj(&input, &output, endian)
            .with_context(|| format!("Failed to cook mesh '{}'", entry.id))?;
        written.push(output);
    }

    Ok(written)
}
