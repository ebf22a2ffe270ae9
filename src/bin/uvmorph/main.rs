//! uvmorph CLI - inspect UV alignment and export morph frames.
//!
//! Usage: uvmorph <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `uvmorph --help` for available commands. Set `RUST_LOG=debug` to see
//! the alignment details and any degenerate-geometry fallbacks.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use uvmorph::algo::area::{surface_area, uv_area};
use uvmorph::algo::{AlignOptions, Anchor, MorphOptions, Morpher};
use uvmorph::io;
use uvmorph::mesh::{primitives, UvMesh};

#[derive(Parser)]
#[command(name = "uvmorph")]
#[command(author, version, about = "Morph textured meshes into their UV layout", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh and alignment information
    Info {
        /// Input mesh file (.obj, .gltf, .glb)
        input: PathBuf,

        /// Triangles with area at or below this count as degenerate
        #[arg(long, default_value = "0.0")]
        degenerate_area: f64,
    },

    /// Write one morph frame
    Morph {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file (.obj)
        output: PathBuf,

        /// Morph parameter: 0 is the 3D shape, 1 the flat UV layout
        #[arg(short, long, allow_negative_numbers = true)]
        t: f64,

        #[command(flatten)]
        morph: MorphArgs,
    },

    /// Write evenly spaced frames from t=0 to t=1
    Frames {
        /// Input mesh file
        input: PathBuf,

        /// Directory for the frame files (created if missing)
        output_dir: PathBuf,

        /// Number of frames
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,

        #[command(flatten)]
        morph: MorphArgs,
    },

    /// Write a procedural mesh
    Primitive {
        /// Kind of mesh
        #[arg(value_enum)]
        kind: PrimitiveKind,

        /// Output mesh file (.obj)
        output: PathBuf,

        /// Segments around the cylinder
        #[arg(short, long, default_value = "32")]
        segments: usize,
    },
}

#[derive(clap::Args)]
struct MorphArgs {
    /// Placement of the rotated 3D shape
    #[arg(long, value_enum, default_value = "origin")]
    anchor: AnchorArg,

    /// Mirror the flat pose horizontally
    #[arg(long)]
    flip_u: bool,

    /// Use single-threaded execution (for benchmarking)
    #[arg(long)]
    sequential: bool,
}

impl MorphArgs {
    fn options(&self) -> MorphOptions {
        let anchor = match self.anchor {
            AnchorArg::Origin => Anchor::Origin,
            AnchorArg::Centroid => Anchor::Centroid,
        };
        MorphOptions::default()
            .with_anchor(anchor)
            .with_flip_u(self.flip_u)
            .with_parallel(!self.sequential)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum AnchorArg {
    /// Rotate about the model origin
    Origin,
    /// Rotate about the surface centroid and overlay the UV centroid
    Centroid,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PrimitiveKind {
    /// Open cylinder with a UV seam
    Cylinder,
    /// Flat square ground plane
    Plane,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info {
            input,
            degenerate_area,
        } => {
            cmd_info(&input, degenerate_area)?;
        }

        Commands::Morph {
            input,
            output,
            t,
            morph,
        } => {
            cmd_morph(&input, &output, t, morph.options())?;
        }

        Commands::Frames {
            input,
            output_dir,
            count,
            morph,
        } => {
            cmd_frames(&input, &output_dir, count, morph.options())?;
        }

        Commands::Primitive {
            kind,
            output,
            segments,
        } => {
            cmd_primitive(kind, &output, segments)?;
        }
    }

    Ok(())
}

fn load_morpher(input: &Path, options: MorphOptions) -> Result<Morpher, Box<dyn std::error::Error>> {
    let mesh: UvMesh = io::load(input)?;
    println!("Loaded: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());
    Ok(Morpher::with_options(mesh, &AlignOptions::default(), options))
}

fn cmd_info(input: &Path, degenerate_area: f64) -> Result<(), Box<dyn std::error::Error>> {
    let options = AlignOptions::default().with_degenerate_area(degenerate_area);
    options.validate()?;

    let mesh: UvMesh = io::load(input)?;
    let morpher = Morpher::with_options(mesh, &options, MorphOptions::default());
    let mesh = morpher.mesh();
    let a = morpher.alignment();

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());
    println!("Surface area: {:.6}", surface_area(mesh));
    println!("UV area: {:.6}", uv_area(mesh));

    let c = a.centroid_3d;
    let cuv = a.centroid_uv;
    println!("Centroid (3D): ({:.4}, {:.4}, {:.4})", c.x, c.y, c.z);
    println!("Centroid (UV): ({:.4}, {:.4})", cuv.x, cuv.y);
    println!("Average UV scaling: {:.6}", a.average_scaling);
    if a.degenerate_uv_faces > 0 {
        println!("Degenerate UV faces: {}", a.degenerate_uv_faces);
    }

    println!("Best rotation:");
    for row in a.best_rotation.row_iter() {
        println!("  [{:>9.5} {:>9.5} {:>9.5}]", row[0], row[1], row[2]);
    }

    let s = &a.bounding_sphere;
    println!(
        "Bounding sphere: center ({:.4}, {:.4}, {:.4}), radius {:.6}",
        s.center.x, s.center.y, s.center.z, s.radius
    );

    if a.is_clean() {
        println!("Degeneracies: none");
    } else {
        println!("Degeneracies:");
        for d in &a.degeneracies {
            println!("  - {}", d);
        }
    }

    Ok(())
}

fn cmd_morph(
    input: &Path,
    output: &Path,
    t: f64,
    options: MorphOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let morpher = load_morpher(input, options)?;

    let start = Instant::now();
    let frame = morpher.interpolate(t);
    let elapsed = start.elapsed();

    io::save(&frame, output)?;
    println!("Saved: {} (t={}, {:.2?})", output.display(), t, elapsed);

    Ok(())
}

fn cmd_frames(
    input: &Path,
    output_dir: &Path,
    count: usize,
    options: MorphOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    if count == 0 {
        return Err(uvmorph::error::MeshError::invalid_param("count", count, "must be at least 1").into());
    }

    let morpher = load_morpher(input, options)?;
    std::fs::create_dir_all(output_dir)?;

    let start = Instant::now();
    for i in 0..count {
        let t = if count == 1 {
            0.0
        } else {
            i as f64 / (count - 1) as f64
        };
        let path = output_dir.join(format!("frame_{:04}.obj", i));
        io::save(&morpher.interpolate(t), &path)?;
        log::debug!("wrote {} (t={:.4})", path.display(), t);
    }

    println!(
        "Saved {} frames to {} ({:.2?})",
        count,
        output_dir.display(),
        start.elapsed()
    );

    Ok(())
}

fn cmd_primitive(
    kind: PrimitiveKind,
    output: &Path,
    segments: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = match kind {
        PrimitiveKind::Cylinder => primitives::cylinder(segments, 1.0, 2.0)?,
        PrimitiveKind::Plane => primitives::plane(1.0, 0.0)?,
    };

    io::save(&mesh, output)?;
    println!(
        "Saved: {} ({} vertices, {} faces)",
        output.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );

    Ok(())
}
