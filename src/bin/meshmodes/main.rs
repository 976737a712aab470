//! meshmodes CLI - Laplacian export and spectral mode visualization.
//!
//! Usage: meshmodes <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `meshmodes --help` for available commands. Set `RUST_LOG=debug` for
//! per-stage counts.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use meshmodes::io;
use meshmodes::mesh::Mesh;
use meshmodes::operator::{OperatorOptions, WeightScheme};
use meshmodes::pipeline::{Pipeline, PipelineVariant, SpectralSource};
use meshmodes::serialize;
use meshmodes::spectral::FunctionData;
use meshmodes::view::{self, VisualMode};

#[derive(Parser)]
#[command(name = "meshmodes")]
#[command(author, version, about = "Mesh Laplacian and spectral mode CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,

        /// Also assemble the operator and report its size
        #[arg(long)]
        operator: bool,

        /// Weighting scheme used with --operator
        #[arg(short, long, value_enum, default_value = "uniform")]
        scheme: Scheme,
    },

    /// Write a Laplacian in the binary sparse matrix format
    Laplacian {
        /// Input mesh file
        input: PathBuf,

        /// Output matrix file
        output: PathBuf,

        /// Which Laplacian to export
        #[arg(short, long, value_enum, default_value = "interior")]
        variant: Variant,

        /// Weighting scheme
        #[arg(short, long, value_enum, default_value = "uniform")]
        scheme: Scheme,

        /// Also write the closure-sized mass diagonal as a function file
        #[arg(long)]
        mass: Option<PathBuf>,

        /// Evaluate face weights in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Color a mesh by a mode or diagnostic and write a vertex-colored PLY
    Show {
        /// Input mesh file
        input: PathBuf,

        /// Output PLY file
        output: PathBuf,

        /// Mode file written by the eigensolver
        #[arg(long, conflicts_with = "function")]
        modes: Option<PathBuf>,

        /// Per-vertex function file
        #[arg(long)]
        function: Option<PathBuf>,

        /// Mode index to display
        #[arg(short, long, default_value = "0")]
        mode: usize,

        /// Diagnostic overlay shown instead of spectral data
        #[arg(long, value_enum, conflicts_with_all = ["modes", "function"])]
        view: Option<Overlay>,

        /// Variant the spectral data was computed for
        #[arg(short, long, value_enum, default_value = "interior")]
        variant: Variant,

        /// Weighting scheme
        #[arg(short, long, value_enum, default_value = "uniform")]
        scheme: Scheme,
    },

    /// Convert a mesh between formats
    Convert {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Variant {
    /// Full Laplacian over every vertex
    Full,
    /// Interior Laplacian
    Interior,
    /// Mass-normalized interior Laplacian
    Symmetrized,
}

impl From<Variant> for PipelineVariant {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Full => PipelineVariant::Full,
            Variant::Interior => PipelineVariant::Interior,
            Variant::Symmetrized => PipelineVariant::Symmetrized,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Scheme {
    /// Graph weights (1 per interior edge, 1/2 per boundary edge)
    Uniform,
    /// Cotangent weights with area mass
    Cotangent,
}

impl From<Scheme> for WeightScheme {
    fn from(scheme: Scheme) -> Self {
        match scheme {
            Scheme::Uniform => WeightScheme::Uniform,
            Scheme::Cotangent => WeightScheme::Cotangent,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Overlay {
    /// Boundary vertices
    Boundary,
    /// Per-vertex mass
    Mass,
    /// Laplacian diagonal
    Lapdiag,
}

impl From<Overlay> for VisualMode {
    fn from(overlay: Overlay) -> Self {
        match overlay {
            Overlay::Boundary => VisualMode::Boundary,
            Overlay::Mass => VisualMode::Mass,
            Overlay::Lapdiag => VisualMode::LaplacianDiagonal,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Info {
            input,
            operator,
            scheme,
        } => {
            cmd_info(&input, operator, scheme)?;
        }

        Commands::Laplacian {
            input,
            output,
            variant,
            scheme,
            mass,
            parallel,
        } => {
            cmd_laplacian(&input, &output, variant, scheme, mass.as_deref(), parallel)?;
        }

        Commands::Show {
            input,
            output,
            modes,
            function,
            mode,
            view,
            variant,
            scheme,
        } => {
            let source = match (modes, function) {
                (Some(path), _) => Some(SpectralSource::Modes(path)),
                (None, Some(path)) => Some(SpectralSource::Function(path)),
                (None, None) => None,
            };
            cmd_show(&input, &output, source, mode, view, variant, scheme)?;
        }

        Commands::Convert { input, output } => {
            let mesh = io::load(&input)?;
            io::save(&mesh, &output)?;
            println!("Saved: {}", output.display());
        }
    }

    Ok(())
}

fn load_mesh(input: &Path) -> Result<Mesh, Box<dyn Error>> {
    let mesh = io::load(input)?;
    println!(
        "Loaded: {} vertices, {} faces ({} boundary vertices)",
        mesh.num_vertices(),
        mesh.num_faces(),
        mesh.num_boundary_vertices()
    );
    Ok(mesh)
}

fn pipeline(variant: Variant, scheme: Scheme, parallel: bool) -> Pipeline {
    let options = OperatorOptions::default()
        .with_scheme(scheme.into())
        .with_parallel(parallel);
    Pipeline::new(variant.into()).with_options(options)
}

fn cmd_info(input: &Path, show_operator: bool, scheme: Scheme) -> Result<(), Box<dyn Error>> {
    let mesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());
    println!("Edges: {}", mesh.num_edges());
    println!("Surface area: {:.6}", mesh.surface_area());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }

    if mesh.has_boundary() {
        println!(
            "Topology: Open ({} boundary vertices)",
            mesh.num_boundary_vertices()
        );
    } else {
        println!("Topology: Closed (no boundary)");
    }

    if show_operator {
        // The summary above stays valid if assembly fails
        let operator = match pipeline(Variant::Full, scheme, false).build_operator(&mesh) {
            Ok(operator) => operator,
            Err(e) => {
                eprintln!("Operator: failed ({})", e);
                return Ok(());
            }
        };
        println!("\nOperator:");
        println!("  Full Laplacian: {} nonzeros", operator.full_laplacian().nnz());
        println!(
            "  Interior Laplacian: {}x{}, {} nonzeros",
            operator.interior_laplacian().nrows(),
            operator.interior_laplacian().ncols(),
            operator.interior_laplacian().nnz()
        );
        println!(
            "  Degenerate faces skipped: {}",
            operator.weights().degenerate_faces()
        );
    }

    Ok(())
}

fn cmd_laplacian(
    input: &Path,
    output: &Path,
    variant: Variant,
    scheme: Scheme,
    mass: Option<&Path>,
    parallel: bool,
) -> Result<(), Box<dyn Error>> {
    let mesh = load_mesh(input)?;
    let pipeline = pipeline(variant, scheme, parallel);

    let start = Instant::now();
    let operator = pipeline.build_operator(&mesh)?;
    println!(
        "Assembled: {} interior, {} boundary vertices ({:.2?})",
        operator.index_map().interior_len(),
        operator.index_map().boundary_len(),
        start.elapsed()
    );

    let matrix = pipeline
        .export_laplacian(&operator, output)
        .map_err(|e| format!("writing {}: {}", output.display(), e))?;
    println!(
        "Saved: {} ({}x{}, {} nonzeros)",
        output.display(),
        matrix.nrows(),
        matrix.ncols(),
        matrix.nnz()
    );

    if let Some(path) = mass {
        let function = FunctionData::new(operator.mass().diagonal().clone());
        serialize::save_function(path, &function)
            .map_err(|e| format!("writing {}: {}", path.display(), e))?;
        println!("Saved: {}", path.display());
    }

    Ok(())
}

fn cmd_show(
    input: &Path,
    output: &Path,
    source: Option<SpectralSource>,
    mode: usize,
    overlay: Option<Overlay>,
    variant: Variant,
    scheme: Scheme,
) -> Result<(), Box<dyn Error>> {
    let mesh = load_mesh(input)?;
    let pipeline = pipeline(variant, scheme, false);
    let operator = pipeline.build_operator(&mesh)?;

    let modes = match &source {
        Some(source) => {
            let modes = pipeline
                .load_spectral(&operator, source)
                .map_err(|e| format!("reading {}: {}", source.path().display(), e))?;
            println!("Spectral data: {} modes", modes.count());
            Some(modes)
        }
        None => None,
    };

    let visual = match (overlay, &modes) {
        (Some(overlay), _) => overlay.into(),
        (None, Some(_)) => VisualMode::Modes { index: mode },
        (None, None) => VisualMode::Mesh,
    };

    let scalars = view::export_visual(&mesh, &operator, modes.as_ref(), visual, output)?;
    if let Some(eigenvalue) = scalars.and_then(|s| s.eigenvalue) {
        println!("Mode {}: eigenvalue {:.6}", mode, eigenvalue);
    }
    println!("Saved: {}", output.display());

    Ok(())
}
