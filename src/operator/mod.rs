//! Discrete operators over mesh vertices.
//!
//! This module turns a [`Mesh`] into the matrices that are handed to an external
//! eigensolver:
//!
//! - **Weights**: per-edge weights and per-vertex mass ([`EdgeWeights`])
//! - **Laplacian**: the full Laplacian and its interior block
//! - **Mass**: mass normalization and the inverse transform for modes
//! - **Index map**: interior/closure index conversion ([`InteriorIndexMap`])
//!
//! [`MeshOperator`] bundles all of them for one mesh.
//!
//! # Example
//!
//! ```
//! use meshmodes::mesh::Mesh;
//! use meshmodes::operator::{MeshOperator, OperatorOptions};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh = Mesh::new(vertices, vec![[0, 1, 2]]).unwrap();
//!
//! let op = MeshOperator::build(&mesh, &OperatorOptions::default()).unwrap();
//! assert_eq!(op.full_laplacian().nrows(), 3);
//! assert_eq!(op.interior_laplacian().nrows(), 0);
//! ```

pub mod index_map;
pub mod laplacian;
pub mod mass;
pub mod weights;

pub use index_map::InteriorIndexMap;
pub use mass::MassMatrix;
pub use weights::{EdgeWeighting, EdgeWeights, OperatorOptions, WeightScheme};

use nalgebra::{DMatrix, DVector};

use crate::error::{ModesError, Result};
use crate::mesh::Mesh;
use crate::sparse::CsrMatrix;

/// Operators derived from one mesh.
///
/// Built once and read-only afterwards; a changed mesh needs a new operator.
#[derive(Debug, Clone)]
pub struct MeshOperator {
    weights: EdgeWeights,
    full: CsrMatrix,
    index_map: InteriorIndexMap,
    interior: CsrMatrix,
    mass: MassMatrix,
    interior_mass: MassMatrix,
}

impl MeshOperator {
    /// Assemble weights, Laplacians and mass for `mesh`.
    pub fn build(mesh: &Mesh, options: &OperatorOptions) -> Result<Self> {
        let weights = EdgeWeights::compute(mesh, options);
        let full = laplacian::full_laplacian(&weights)?;

        let index_map = InteriorIndexMap::from_boundary_flags(mesh.boundary_flags());
        let interior = laplacian::interior_laplacian(&full, &index_map)?;

        let mass = MassMatrix::new(weights.mass().clone());
        let interior_mass = mass.restrict(&index_map)?;

        log::debug!(
            "operator: {} vertices ({} interior, {} boundary), {} edges, nnz {} / {}",
            index_map.closure_len(),
            index_map.interior_len(),
            index_map.boundary_len(),
            weights.num_edges(),
            full.nnz(),
            interior.nnz()
        );

        Ok(Self {
            weights,
            full,
            index_map,
            interior,
            mass,
            interior_mass,
        })
    }

    /// Accumulated edge weights.
    #[inline]
    pub fn weights(&self) -> &EdgeWeights {
        &self.weights
    }

    /// Closure-sized Laplacian.
    #[inline]
    pub fn full_laplacian(&self) -> &CsrMatrix {
        &self.full
    }

    /// Laplacian restricted to interior vertices.
    #[inline]
    pub fn interior_laplacian(&self) -> &CsrMatrix {
        &self.interior
    }

    /// Entries of the full Laplacian that couple interior rows to boundary columns.
    pub fn boundary_coupling(&self) -> Result<CsrMatrix> {
        laplacian::boundary_coupling(&self.full, &self.index_map)
    }

    /// Interior/closure index map.
    #[inline]
    pub fn index_map(&self) -> &InteriorIndexMap {
        &self.index_map
    }

    /// Closure-sized mass matrix.
    #[inline]
    pub fn mass(&self) -> &MassMatrix {
        &self.mass
    }

    /// Mass restricted to interior vertices.
    #[inline]
    pub fn interior_mass(&self) -> &MassMatrix {
        &self.interior_mass
    }

    /// Diagonal of the full Laplacian, one value per vertex.
    pub fn laplacian_diagonal(&self) -> DVector<f64> {
        laplacian::laplacian_diagonal(&self.full)
    }

    /// Interior Laplacian normalized by the interior mass.
    pub fn symmetrized_laplacian(&self) -> Result<CsrMatrix> {
        mass::symmetrize(&self.interior, &self.interior_mass).map_err(|e| self.closure_error(e))
    }

    /// Map interior modes of the symmetrized Laplacian to closure-indexed modes.
    pub fn modes_to_closure(&self, modes: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        let unscaled = mass::unsymmetrize_modes(modes, &self.interior_mass)
            .map_err(|e| self.closure_error(e))?;
        self.index_map.lift_matrix(&unscaled)
    }

    /// Report mass errors with closure vertex indices.
    fn closure_error(&self, error: ModesError) -> ModesError {
        match error {
            ModesError::NonPositiveMass { vertex, mass } => ModesError::NonPositiveMass {
                vertex: self.index_map.closure_index(vertex).unwrap_or(vertex),
                mass,
            },
            other => other,
        }
    }
}
