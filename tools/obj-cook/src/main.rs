//! obj-cook - OBJ mesh cooker
//!
//! Converts Wavefront OBJ meshes to the cooked binary mesh format (.mesh)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

// Use modules from library
use obj_cook::{manifest, mesh, Endian, MeshReader, VertexField, COOKED_MESH_EXT};

#[derive(Parser)]
#[command(name = "obj-cook")]
#[command(about = "OBJ to cooked mesh converter")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single OBJ file
    Mesh {
        /// Input OBJ file
        input: PathBuf,

        /// Output .mesh file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Byte order (big, little)
        #[arg(short, long, default_value = "little")]
        endian: Endian,
    },

    /// Build meshes from a manifest file
    Build {
        /// Path to cook.toml manifest
        #[arg(default_value = "cook.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate manifest without building
    Check {
        /// Path to cook.toml manifest
        #[arg(default_value = "cook.toml")]
        manifest: PathBuf,
    },

    /// Print the header of a cooked mesh
    Info {
        /// Cooked .mesh file
        input: PathBuf,

        /// Byte order the file was written with
        #[arg(short, long, default_value = "little")]
        endian: Endian,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Mesh {
            input,
            output,
            endian,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension(COOKED_MESH_EXT));
            tracing::info!("Converting {:?} -> {:?}", input, output);
            mesh::convert_obj(&input, &output, endian)?;
            tracing::info!("Done!");
        }

        Commands::Build {
            manifest,
            output,
            verbose,
        } => {
            if verbose {
                tracing::info!("Building meshes from {:?}", manifest);
            }
            let config = manifest::load_manifest(&manifest)?;
            let written = manifest::build_all(&config, manifest_dir(&manifest), output.as_deref())?;
            tracing::info!("Build complete! {} meshes cooked", written.len());
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config, manifest_dir(&manifest))?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Info { input, endian } => print_info(&input, endian)?,
    }

    Ok(())
}

fn manifest_dir(manifest: &Path) -> &Path {
    manifest.parent().unwrap_or(Path::new("."))
}

fn print_info(input: &Path, endian: Endian) -> Result<()> {
    let file = File::open(input).with_context(|| format!("Failed to open mesh: {:?}", input))?;
    let (header, mesh) = MeshReader::new(BufReader::new(file), endian)
        .read_mesh()
        .with_context(|| format!("Failed to read mesh {:?} as {}-endian", input, endian))?;

    let fields: Vec<String> = [
        VertexField::Position2D,
        VertexField::Position3D,
        VertexField::Uv0,
        VertexField::Color,
        VertexField::Normal,
    ]
    .into_iter()
    .filter(|f| header.has_field(*f))
    .map(|f| format!("{f:?}"))
    .collect();

    println!("{}", input.display());
    println!("  byte order:     {endian}");
    println!("  index width:    {} byte(s)", header.index_width.bytes());
    println!("  primitive mode: {:?}", header.primitive_mode);
    println!("  fields:         {}", fields.join(", "));
    println!("  vertices:       {}", mesh.vertex_count());
    println!("  indices:        {}", mesh.index_count());
    println!("  bounds max:     {}", header.bounds.max);
    println!("  bounds min:     {}", header.bounds.min);
    Ok(())
}
