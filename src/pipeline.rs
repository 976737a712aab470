//! Named pipeline variants and stage orchestration.
//!
//! A [`Pipeline`] fixes once which Laplacian is exported and how spectral data that
//! comes back from the eigensolver is mapped onto the mesh:
//!
//! | Variant | Exported operator | Mode rows | Mapping to the mesh |
//! |---------|-------------------|-----------|---------------------|
//! | [`Full`](PipelineVariant::Full) | full Laplacian | all vertices | none |
//! | [`Interior`](PipelineVariant::Interior) | interior Laplacian | interior vertices | lift |
//! | [`Symmetrized`](PipelineVariant::Symmetrized) | `M^{-1/2} L_I M^{-1/2}` | interior vertices | `M^{-1/2}`, then lift |
//!
//! Function data is never mass scaled; it is only lifted for the interior variants.
//!
//! # Example
//!
//! ```
//! use meshmodes::mesh::Mesh;
//! use meshmodes::pipeline::{Pipeline, PipelineVariant, SpectralData};
//! use meshmodes::spectral::FunctionData;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh = Mesh::new(vertices, vec![[0, 1, 2]]).unwrap();
//!
//! let pipeline = Pipeline::new(PipelineVariant::Full);
//! let operator = pipeline.build_operator(&mesh).unwrap();
//! assert_eq!(pipeline.laplacian(&operator).unwrap().nrows(), 3);
//!
//! let function = FunctionData::from(vec![1.0, 2.0, 3.0]);
//! let modes = pipeline.resolve(&operator, SpectralData::Function(function)).unwrap();
//! assert_eq!(modes.eigenvalues()[0], 0.0);
//! ```

use std::path::{Path, PathBuf};

use nalgebra::DMatrix;

use crate::error::{ModesError, Result};
use crate::mesh::Mesh;
use crate::operator::{MeshOperator, OperatorOptions};
use crate::serialize;
use crate::sparse::CsrMatrix;
use crate::spectral::{FunctionData, ModeData};

/// Which Laplacian is handed to the eigensolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineVariant {
    /// Full closure-sized Laplacian.
    Full,
    /// Interior Laplacian; boundary vertices are excluded.
    #[default]
    Interior,
    /// Mass-normalized interior Laplacian.
    Symmetrized,
}

impl PipelineVariant {
    /// Whether spectral data is indexed by interior vertices.
    pub fn is_interior(self) -> bool {
        !matches!(self, PipelineVariant::Full)
    }
}

/// Where spectral data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpectralSource {
    /// A mode data file.
    Modes(PathBuf),
    /// A function data file.
    Function(PathBuf),
}

impl SpectralSource {
    /// Read the file.
    pub fn load(&self) -> Result<SpectralData> {
        match self {
            SpectralSource::Modes(path) => serialize::load_modes(path).map(SpectralData::Modes),
            SpectralSource::Function(path) => {
                serialize::load_function(path).map(SpectralData::Function)
            }
        }
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        match self {
            SpectralSource::Modes(path) | SpectralSource::Function(path) => path,
        }
    }
}

/// Spectral data as read, before mapping to the mesh.
#[derive(Debug, Clone, PartialEq)]
pub enum SpectralData {
    /// Eigenvectors with eigenvalues.
    Modes(ModeData),
    /// A single per-vertex function.
    Function(FunctionData),
}

/// Operator export and spectral import for one variant.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    variant: PipelineVariant,
    options: OperatorOptions,
}

impl Pipeline {
    /// Create a pipeline with default operator options.
    pub fn new(variant: PipelineVariant) -> Self {
        Self {
            variant,
            options: OperatorOptions::default(),
        }
    }

    /// Use the given operator options.
    pub fn with_options(mut self, options: OperatorOptions) -> Self {
        self.options = options;
        self
    }

    /// The selected variant.
    #[inline]
    pub fn variant(&self) -> PipelineVariant {
        self.variant
    }

    /// The operator options.
    #[inline]
    pub fn options(&self) -> &OperatorOptions {
        &self.options
    }

    /// Assemble the operators for `mesh`.
    pub fn build_operator(&self, mesh: &Mesh) -> Result<MeshOperator> {
        log::info!("assembling {:?} weights", self.options.scheme);
        MeshOperator::build(mesh, &self.options)
    }

    /// The Laplacian selected by the variant.
    pub fn laplacian(&self, operator: &MeshOperator) -> Result<CsrMatrix> {
        match self.variant {
            PipelineVariant::Full => Ok(operator.full_laplacian().clone()),
            PipelineVariant::Interior => Ok(operator.interior_laplacian().clone()),
            PipelineVariant::Symmetrized => operator.symmetrized_laplacian(),
        }
    }

    /// Write the selected Laplacian to `path`.
    pub fn export_laplacian<P: AsRef<Path>>(
        &self,
        operator: &MeshOperator,
        path: P,
    ) -> Result<CsrMatrix> {
        let laplacian = self.laplacian(operator)?;
        serialize::save_matrix(path.as_ref(), &laplacian)?;
        log::info!(
            "wrote {}x{} Laplacian ({} entries) to {}",
            laplacian.nrows(),
            laplacian.ncols(),
            laplacian.nnz(),
            path.as_ref().display()
        );
        Ok(laplacian)
    }

    /// Map spectral data onto the mesh vertices.
    pub fn resolve(&self, operator: &MeshOperator, data: SpectralData) -> Result<ModeData> {
        match data {
            SpectralData::Modes(modes) => {
                let mapped = self.map_modes(operator, modes.modes())?;
                modes.with_modes(mapped)
            }
            SpectralData::Function(function) => {
                let values = if self.variant.is_interior() {
                    operator.index_map().lift_vector(function.values())?
                } else {
                    check_len(function.len(), operator.index_map().closure_len())?;
                    function.values().clone()
                };
                Ok(ModeData::from_function(&FunctionData::new(values)))
            }
        }
    }

    /// Load spectral data and map it onto the mesh vertices.
    pub fn load_spectral(
        &self,
        operator: &MeshOperator,
        source: &SpectralSource,
    ) -> Result<ModeData> {
        let data = source.load()?;
        let modes = self.resolve(operator, data)?;
        log::info!(
            "loaded {} modes from {}",
            modes.count(),
            source.path().display()
        );
        Ok(modes)
    }

    fn map_modes(&self, operator: &MeshOperator, modes: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        match self.variant {
            PipelineVariant::Full => {
                check_len(modes.nrows(), operator.index_map().closure_len())?;
                Ok(modes.clone())
            }
            PipelineVariant::Interior => operator.index_map().lift_matrix(modes),
            PipelineVariant::Symmetrized => operator.modes_to_closure(modes),
        }
    }
}

fn check_len(actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(ModesError::dimension("spectral data", expected, actual));
    }
    Ok(())
}
