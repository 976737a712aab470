//! Mapping between interior vertex indices and closure (full mesh) indices.

use nalgebra::{DMatrix, DVector};

use crate::error::{ModesError, Result};
use crate::sparse::CsrMatrix;

/// Order-preserving bijection between interior vertices and `0..k`.
///
/// Interior index `i` belongs to the `i`-th non-boundary vertex in closure order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteriorIndexMap {
    to_interior: Vec<Option<usize>>,
    to_closure: Vec<usize>,
    boundary: Vec<usize>,
}

impl InteriorIndexMap {
    /// Build the map from per-vertex boundary flags.
    pub fn from_boundary_flags(boundary: &[bool]) -> Self {
        let mut to_interior = Vec::with_capacity(boundary.len());
        let mut to_closure = Vec::new();
        let mut boundary_vertices = Vec::new();
        for (v, &is_boundary) in boundary.iter().enumerate() {
            if is_boundary {
                to_interior.push(None);
                boundary_vertices.push(v);
            } else {
                to_interior.push(Some(to_closure.len()));
                to_closure.push(v);
            }
        }
        Self {
            to_interior,
            to_closure,
            boundary: boundary_vertices,
        }
    }

    /// Size of the closure index space.
    #[inline]
    pub fn closure_len(&self) -> usize {
        self.to_interior.len()
    }

    /// Number of interior vertices.
    #[inline]
    pub fn interior_len(&self) -> usize {
        self.to_closure.len()
    }

    /// Number of boundary vertices.
    #[inline]
    pub fn boundary_len(&self) -> usize {
        self.closure_len() - self.interior_len()
    }

    /// Interior index of closure vertex `v`, or `None` on the boundary.
    #[inline]
    pub fn interior_index(&self, v: usize) -> Option<usize> {
        self.to_interior.get(v).copied().flatten()
    }

    /// Closure index of interior vertex `i`.
    #[inline]
    pub fn closure_index(&self, i: usize) -> Option<usize> {
        self.to_closure.get(i).copied()
    }

    /// Closure indices of all interior vertices, ascending.
    #[inline]
    pub fn interior_vertices(&self) -> &[usize] {
        &self.to_closure
    }

    /// Closure indices of all boundary vertices, ascending.
    #[inline]
    pub fn boundary_vertices(&self) -> &[usize] {
        &self.boundary
    }

    /// Position of closure vertex `v` among the boundary vertices.
    pub fn boundary_index(&self, v: usize) -> Option<usize> {
        self.boundary.binary_search(&v).ok()
    }

    /// Scatter an interior-indexed vector into closure size; boundary entries are zero.
    pub fn lift_vector(&self, values: &DVector<f64>) -> Result<DVector<f64>> {
        if values.len() != self.interior_len() {
            return Err(ModesError::dimension("lift", self.interior_len(), values.len()));
        }
        let mut lifted = DVector::zeros(self.closure_len());
        for (i, &v) in self.to_closure.iter().enumerate() {
            lifted[v] = values[i];
        }
        Ok(lifted)
    }

    /// Scatter the rows of an interior-indexed matrix into closure size.
    pub fn lift_matrix(&self, values: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        if values.nrows() != self.interior_len() {
            return Err(ModesError::dimension("lift", self.interior_len(), values.nrows()));
        }
        let mut lifted = DMatrix::zeros(self.closure_len(), values.ncols());
        for (i, &v) in self.to_closure.iter().enumerate() {
            lifted.set_row(v, &values.row(i));
        }
        Ok(lifted)
    }

    /// Gather the interior entries of a closure-indexed vector.
    pub fn restrict_vector(&self, values: &DVector<f64>) -> Result<DVector<f64>> {
        if values.len() != self.closure_len() {
            return Err(ModesError::dimension("restrict", self.closure_len(), values.len()));
        }
        Ok(DVector::from_iterator(
            self.interior_len(),
            self.to_closure.iter().map(|&v| values[v]),
        ))
    }

    /// Gather the interior rows of a closure-indexed matrix.
    pub fn restrict_matrix(&self, values: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        if values.nrows() != self.closure_len() {
            return Err(ModesError::dimension("restrict", self.closure_len(), values.nrows()));
        }
        Ok(values.select_rows(self.to_closure.iter()))
    }

    /// The embedding as a `closure x interior` 0/1 matrix.
    pub fn to_sparse(&self) -> Result<CsrMatrix> {
        let triplets = self
            .to_closure
            .iter()
            .enumerate()
            .map(|(i, &v)| (v, i, 1.0))
            .collect();
        CsrMatrix::from_triplets(self.closure_len(), self.interior_len(), triplets)
    }
}
