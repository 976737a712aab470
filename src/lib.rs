//! # meshmodes
//!
//! Discrete Laplacians and spectral modes on triangle meshes.
//!
//! meshmodes builds the sparse Laplacian of a surface mesh, splits it into its
//! interior and boundary blocks, normalizes it against a lumped mass matrix, and
//! writes the result in a compact binary format for an external eigensolver.
//! Eigenvectors that come back are mapped onto the mesh and colored for display.
//!
//! ## Features
//!
//! - **Operators**: full and interior Laplacian, boundary coupling block, mass
//!   normalization, uniform or cotangent weights
//! - **Sparse storage**: CSR matrices assembled from summed triplets
//! - **Binary formats**: sparse matrices, mode sets and per-vertex functions
//! - **Mesh files**: STL, PLY and glTF input; STL and PLY output
//! - **Visualization**: diverging colormaps, diagnostic overlays, an orbit camera
//!   state machine
//!
//! ## Quick Start
//!
//! ```no_run
//! use meshmodes::prelude::*;
//!
//! let mesh = meshmodes::io::load("model.ply").unwrap();
//!
//! // Export the normalized interior Laplacian for an eigensolver
//! let pipeline = Pipeline::new(PipelineVariant::Symmetrized);
//! let operator = pipeline.build_operator(&mesh).unwrap();
//! pipeline.export_laplacian(&operator, "laplacian.bin").unwrap();
//!
//! // Read the eigenvectors back and paint the second mode
//! let source = SpectralSource::Modes("modes.bin".into());
//! let modes = pipeline.load_spectral(&operator, &source).unwrap();
//! meshmodes::view::export_visual(
//!     &mesh,
//!     &operator,
//!     Some(&modes),
//!     VisualMode::Modes { index: 1 },
//!     "mode1.ply",
//! )
//! .unwrap();
//! ```
//!
//! ## Building Operators Directly
//!
//! ```
//! use meshmodes::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2], [0, 2, 3]];
//! let mesh = Mesh::new(vertices, faces).unwrap();
//!
//! let operator = MeshOperator::build(&mesh, &OperatorOptions::default()).unwrap();
//! let laplacian = operator.full_laplacian();
//!
//! // The shared diagonal collects weight from both triangles
//! assert_eq!(laplacian.get(0, 2), -1.0);
//! assert!(laplacian.is_symmetric(0.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod io;
pub mod mesh;
pub mod operator;
pub mod pipeline;
pub mod serialize;
pub mod sparse;
pub mod spectral;
pub mod view;

/// Prelude module for convenient imports.
///
/// ```
/// use meshmodes::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ModesError, Result};
    pub use crate::mesh::Mesh;
    pub use crate::operator::{
        EdgeWeighting, InteriorIndexMap, MassMatrix, MeshOperator, OperatorOptions, WeightScheme,
    };
    pub use crate::pipeline::{Pipeline, PipelineVariant, SpectralData, SpectralSource};
    pub use crate::sparse::CsrMatrix;
    pub use crate::spectral::{FunctionData, ModeData};
    pub use crate::view::VisualMode;
}

// Re-export nalgebra types for convenience
pub use nalgebra;
