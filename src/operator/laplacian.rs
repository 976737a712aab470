//! Laplacian assembly from accumulated edge weights.
//!
//! The full Laplacian has `L[i,i] = sum_j w(i,j)` and `L[i,j] = -w(i,j)` for every
//! weighted edge, so each row sums to zero. The interior Laplacian is its
//! principal block on the non-boundary vertices.

use nalgebra::DVector;

use super::index_map::InteriorIndexMap;
use super::weights::EdgeWeights;
use crate::error::{ModesError, Result};
use crate::sparse::CsrMatrix;

/// Assemble the closure-sized Laplacian.
pub fn full_laplacian(weights: &EdgeWeights) -> Result<CsrMatrix> {
    let n = weights.num_vertices();
    let mut triplets = Vec::with_capacity(4 * weights.num_edges());

    for (i, j, w) in weights.edges() {
        triplets.push((i, i, w));
        triplets.push((j, j, w));
        triplets.push((i, j, -w));
        triplets.push((j, i, -w));
    }

    CsrMatrix::from_triplets(n, n, triplets)
}

/// Extract the principal block of `laplacian` on the interior vertices.
///
/// Entries that couple an interior vertex to a boundary vertex are dropped;
/// diagonal entries keep their full value.
pub fn interior_laplacian(laplacian: &CsrMatrix, map: &InteriorIndexMap) -> Result<CsrMatrix> {
    if laplacian.nrows() != map.closure_len() || !laplacian.is_square() {
        return Err(ModesError::dimension(
            "interior block",
            map.closure_len(),
            laplacian.nrows(),
        ));
    }

    let triplets = laplacian
        .triplet_iter()
        .filter_map(|(r, c, v)| Some((map.interior_index(r)?, map.interior_index(c)?, v)))
        .collect();

    let k = map.interior_len();
    CsrMatrix::from_triplets(k, k, triplets)
}

/// Extract the `interior x boundary` block of `laplacian`.
///
/// These are the entries dropped from the interior Laplacian; columns follow
/// [`InteriorIndexMap::boundary_vertices`].
pub fn boundary_coupling(laplacian: &CsrMatrix, map: &InteriorIndexMap) -> Result<CsrMatrix> {
    if laplacian.nrows() != map.closure_len() || !laplacian.is_square() {
        return Err(ModesError::dimension(
            "boundary coupling",
            map.closure_len(),
            laplacian.nrows(),
        ));
    }

    let triplets = laplacian
        .triplet_iter()
        .filter_map(|(r, c, v)| Some((map.interior_index(r)?, map.boundary_index(c)?, v)))
        .collect();

    CsrMatrix::from_triplets(map.interior_len(), map.boundary_len(), triplets)
}

/// Diagonal of a Laplacian as a per-vertex array.
pub fn laplacian_diagonal(laplacian: &CsrMatrix) -> DVector<f64> {
    laplacian.diagonal()
}
