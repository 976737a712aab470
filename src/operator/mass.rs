//! Diagonal mass matrix and mass normalization of the Laplacian.
//!
//! The symmetrized Laplacian `M^{-1/2} L M^{-1/2}` has the same eigenvalues as the
//! generalized problem `L x = lambda M x`. Its eigenvectors `y` map back to
//! generalized eigenvectors through `x = M^{-1/2} y`.

use nalgebra::{DMatrix, DVector};

use super::index_map::InteriorIndexMap;
use crate::error::{ModesError, Result};
use crate::sparse::CsrMatrix;

/// Diagonal mass matrix stored as its diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct MassMatrix {
    diagonal: DVector<f64>,
}

impl MassMatrix {
    /// Create a mass matrix from per-vertex values.
    pub fn new(diagonal: DVector<f64>) -> Self {
        Self { diagonal }
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.diagonal.len()
    }

    /// Returns true if the matrix is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.diagonal.is_empty()
    }

    /// Per-vertex mass values.
    #[inline]
    pub fn diagonal(&self) -> &DVector<f64> {
        &self.diagonal
    }

    /// Keep only the interior entries.
    pub fn restrict(&self, map: &InteriorIndexMap) -> Result<Self> {
        Ok(Self::new(map.restrict_vector(&self.diagonal)?))
    }

    /// Entries `1 / sqrt(m_i)` of `M^{-1/2}`.
    ///
    /// Fails if any mass is non-positive or not finite.
    pub fn half_inverse(&self) -> Result<DVector<f64>> {
        if let Some((vertex, &mass)) = self
            .diagonal
            .iter()
            .enumerate()
            .find(|(_, m)| !(m.is_finite() && **m > 0.0))
        {
            return Err(ModesError::NonPositiveMass { vertex, mass });
        }
        Ok(self.diagonal.map(|m| 1.0 / m.sqrt()))
    }

    /// The mass matrix in sparse form.
    pub fn to_sparse(&self) -> CsrMatrix {
        CsrMatrix::from_diagonal(&self.diagonal)
    }
}

/// Compute `M^{-1/2} L M^{-1/2}`.
pub fn symmetrize(laplacian: &CsrMatrix, mass: &MassMatrix) -> Result<CsrMatrix> {
    if laplacian.nrows() != mass.len() {
        return Err(ModesError::dimension("symmetrize", laplacian.nrows(), mass.len()));
    }
    laplacian.scale_symmetric(&mass.half_inverse()?)
}

/// Map modes of the symmetrized Laplacian back with one left multiplication by `M^{-1/2}`.
pub fn unsymmetrize_modes(modes: &DMatrix<f64>, mass: &MassMatrix) -> Result<DMatrix<f64>> {
    if modes.nrows() != mass.len() {
        return Err(ModesError::dimension("unsymmetrize", mass.len(), modes.nrows()));
    }
    let half_inverse = mass.half_inverse()?;
    let mut scaled = modes.clone();
    for (mut row, &s) in scaled.row_iter_mut().zip(half_inverse.iter()) {
        row *= s;
    }
    Ok(scaled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures;
    use crate::operator::laplacian::{full_laplacian, interior_laplacian};
    use crate::operator::weights::{EdgeWeights, OperatorOptions, WeightScheme};

    fn grid_interior(scheme: WeightScheme) -> (CsrMatrix, MassMatrix) {
        let mesh = fixtures::grid(4);
        let options = OperatorOptions::default().with_scheme(scheme);
        let weights = EdgeWeights::compute(&mesh, &options);
        let map = InteriorIndexMap::from_boundary_flags(mesh.boundary_flags());
        let l = interior_laplacian(&full_laplacian(&weights).unwrap(), &map).unwrap();
        let mass = MassMatrix::new(weights.mass().clone()).restrict(&map).unwrap();
        (l, mass)
    }

    #[test]
    fn test_unit_mass_is_identity() {
        let (l, mass) = grid_interior(WeightScheme::Uniform);
        let ones = MassMatrix::new(DVector::from_element(mass.len(), 1.0));

        let s = symmetrize(&l, &ones).unwrap();
        assert_eq!(s, l);
    }

    #[test]
    fn test_symmetrized_is_symmetric() {
        let (l, mass) = grid_interior(WeightScheme::Cotangent);
        let s = symmetrize(&l, &mass).unwrap();

        assert!(s.is_symmetric(1e-12));
        assert_eq!(s.nnz(), l.nnz());
        // Interior grid vertices carry six faces of area 1/2, so their mass is 1
        assert!((mass.diagonal()[0] - 1.0).abs() < 1e-12);
        assert!((s.get(0, 0) - l.get(0, 0)).abs() < 1e-10);
    }

    #[test]
    fn test_symmetrize_scales_entries() {
        let triplets = vec![(0, 0, 2.0), (0, 1, -2.0), (1, 0, -2.0), (1, 1, 2.0)];
        let l = CsrMatrix::from_triplets(2, 2, triplets).unwrap();
        let mass = MassMatrix::new(DVector::from_vec(vec![1.0, 4.0]));

        let s = symmetrize(&l, &mass).unwrap();
        assert!((s.get(0, 0) - 2.0).abs() < 1e-12);
        assert!((s.get(0, 1) + 1.0).abs() < 1e-12);
        assert!((s.get(1, 1) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_non_positive_mass() {
        let l = CsrMatrix::zeros(3, 3);
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mass = MassMatrix::new(DVector::from_vec(vec![1.0, bad, 1.0]));
            assert!(matches!(
                symmetrize(&l, &mass),
                Err(ModesError::NonPositiveMass { vertex: 1, .. })
            ));
        }
    }

    #[test]
    fn test_unsymmetrize_modes() {
        let mass = MassMatrix::new(DVector::from_vec(vec![4.0, 1.0, 0.25]));
        let modes = DMatrix::from_element(3, 2, 1.0);

        let mapped = unsymmetrize_modes(&modes, &mass).unwrap();
        for j in 0..2 {
            assert!((mapped[(0, j)] - 0.5).abs() < 1e-12);
            assert!((mapped[(1, j)] - 1.0).abs() < 1e-12);
            assert!((mapped[(2, j)] - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_generalized_eigenpair_round_trip() {
        // y = M^{1/2} x must be an eigenvector of the symmetrized matrix when
        // x solves L x = lambda M x
        let triplets = vec![(0, 0, 1.0), (0, 1, -1.0), (1, 0, -1.0), (1, 1, 1.0)];
        let l = CsrMatrix::from_triplets(2, 2, triplets).unwrap();
        let mass = MassMatrix::new(DVector::from_vec(vec![1.0, 4.0]));
        let s = symmetrize(&l, &mass).unwrap();

        let x = DMatrix::from_column_slice(2, 1, &[1.0, 1.0]);
        let y = DMatrix::from_column_slice(2, 1, &[1.0, 2.0]);
        let sy = s.mul_dense(&y).unwrap();
        assert!(sy.norm() < 1e-12);
        assert_eq!(unsymmetrize_modes(&y, &mass).unwrap(), x);
    }
}
