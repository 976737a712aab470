//! Compressed sparse row matrix used for the mesh operators.
//!
//! Matrices are assembled from `(row, col, value)` triplets. Triplets that hit the
//! same coordinate are summed, so element contributions can be pushed in any
//! order. Explicit zero values are stored like any other entry.

use nalgebra::{DMatrix, DVector};

use crate::error::{ModesError, Result};

/// Compressed Sparse Row (CSR) matrix.
///
/// Column indices inside each row are strictly increasing, which makes two
/// matrices with the same entries compare equal.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    /// Number of rows.
    rows: usize,
    /// Number of columns.
    cols: usize,
    /// Row pointers: row_ptr[i] is the index in col_idx/values where row i starts.
    /// Length is rows + 1, with row_ptr[rows] = nnz.
    row_ptr: Vec<usize>,
    /// Column indices for each stored value.
    col_idx: Vec<usize>,
    /// Stored values.
    values: Vec<f64>,
}

impl CsrMatrix {
    /// Create a matrix without stored entries.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            row_ptr: vec![0; rows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Create a square diagonal matrix.
    pub fn from_diagonal(diagonal: &DVector<f64>) -> Self {
        let n = diagonal.len();
        Self {
            rows: n,
            cols: n,
            row_ptr: (0..=n).collect(),
            col_idx: (0..n).collect(),
            values: diagonal.iter().copied().collect(),
        }
    }

    /// Create a CSR matrix from triplets (row, col, value).
    ///
    /// Duplicate entries at the same (row, col) are summed. Fails if any entry
    /// lies outside of the `rows` x `cols` shape, or if the row pointers for
    /// `rows` cannot be allocated.
    pub fn from_triplets(
        rows: usize,
        cols: usize,
        mut triplets: Vec<(usize, usize, f64)>,
    ) -> Result<Self> {
        if let Some(&(row, col, _)) = triplets.iter().find(|t| t.0 >= rows || t.1 >= cols) {
            return Err(ModesError::EntryOutOfBounds {
                row,
                col,
                nrows: rows,
                ncols: cols,
            });
        }

        let mut row_ptr = row_pointers(rows, cols)?;

        if triplets.is_empty() {
            return Ok(Self {
                rows,
                cols,
                row_ptr,
                col_idx: Vec::new(),
                values: Vec::new(),
            });
        }

        // Stable sort keeps the summation order of duplicates fixed
        triplets.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut col_idx = Vec::with_capacity(triplets.len());
        let mut values: Vec<f64> = Vec::with_capacity(triplets.len());

        let mut prev: Option<(usize, usize)> = None;

        for (row, col, val) in triplets {
            match (prev, values.last_mut()) {
                (Some(p), Some(last)) if p == (row, col) => *last += val,
                _ => {
                    col_idx.push(col);
                    values.push(val);
                    // Rows after the previous one (and up to this one) start here
                    let first = prev.map_or(0, |(r, _)| r + 1);
                    for ptr in &mut row_ptr[first..=row] {
                        *ptr = col_idx.len() - 1;
                    }
                    prev = Some((row, col));
                }
            }
        }

        let nnz = col_idx.len();
        let last_row = prev.map_or(0, |(r, _)| r + 1);
        for ptr in &mut row_ptr[last_row..=rows] {
            *ptr = nnz;
        }

        Ok(Self {
            rows,
            cols,
            row_ptr,
            col_idx,
            values,
        })
    }

    /// Get the number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows
    }

    /// Get the number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// Get the number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Whether the matrix is square.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Stored `(col, value)` pairs of row `r`.
    pub fn row(&self, r: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.row_ptr[r]..self.row_ptr[r + 1];
        self.col_idx[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Iterate over stored entries in row-major order.
    pub fn triplet_iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.rows).flat_map(move |r| self.row(r).map(move |(c, v)| (r, c, v)))
    }

    /// Value at `(r, c)`; zero when no entry is stored.
    pub fn get(&self, r: usize, c: usize) -> f64 {
        let range = self.row_ptr[r]..self.row_ptr[r + 1];
        match self.col_idx[range.clone()].binary_search(&c) {
            Ok(k) => self.values[range.start + k],
            Err(_) => 0.0,
        }
    }

    /// Whether an entry is stored at `(r, c)`, even if its value is zero.
    pub fn contains(&self, r: usize, c: usize) -> bool {
        let range = self.row_ptr[r]..self.row_ptr[r + 1];
        self.col_idx[range].binary_search(&c).is_ok()
    }

    /// The main diagonal.
    pub fn diagonal(&self) -> DVector<f64> {
        DVector::from_iterator(
            self.rows.min(self.cols),
            (0..self.rows.min(self.cols)).map(|i| self.get(i, i)),
        )
    }

    /// Sum of each row.
    pub fn row_sums(&self) -> DVector<f64> {
        DVector::from_iterator(self.rows, (0..self.rows).map(|r| self.row(r).map(|(_, v)| v).sum()))
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Self {
        let mut row_ptr = vec![0usize; self.cols + 1];
        for &c in &self.col_idx {
            row_ptr[c + 1] += 1;
        }
        for c in 0..self.cols {
            row_ptr[c + 1] += row_ptr[c];
        }

        let mut next = row_ptr.clone();
        let mut col_idx = vec![0usize; self.nnz()];
        let mut values = vec![0.0; self.nnz()];
        for (r, c, v) in self.triplet_iter() {
            let k = next[c];
            col_idx[k] = r;
            values[k] = v;
            next[c] += 1;
        }

        Self {
            rows: self.cols,
            cols: self.rows,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Whether `A[i,j]` and `A[j,i]` agree within `tolerance` for every stored entry.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        self.is_square()
            && self
                .triplet_iter()
                .all(|(r, c, v)| (v - self.get(c, r)).abs() <= tolerance)
    }

    /// Compute `D A D` for a diagonal `D` given by its entries.
    ///
    /// The sparsity pattern is unchanged.
    pub fn scale_symmetric(&self, diagonal: &DVector<f64>) -> Result<Self> {
        if !self.is_square() || diagonal.len() != self.rows {
            return Err(ModesError::dimension("diagonal scaling", self.rows, diagonal.len()));
        }
        let mut scaled = self.clone();
        for r in 0..self.rows {
            for k in self.row_ptr[r]..self.row_ptr[r + 1] {
                scaled.values[k] *= diagonal[r] * diagonal[self.col_idx[k]];
            }
        }
        Ok(scaled)
    }

    /// Multiply matrix by vector: y = A * x.
    pub fn mul_vec(&self, x: &DVector<f64>) -> Result<DVector<f64>> {
        if x.len() != self.cols {
            return Err(ModesError::dimension("matrix-vector product", self.cols, x.len()));
        }

        let mut y = DVector::zeros(self.rows);
        for i in 0..self.rows {
            y[i] = self.row(i).map(|(c, v)| v * x[c]).sum();
        }
        Ok(y)
    }

    /// Multiply matrix by a dense matrix: Y = A * X.
    pub fn mul_dense(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        if x.nrows() != self.cols {
            return Err(ModesError::dimension("matrix-matrix product", self.cols, x.nrows()));
        }

        let mut y = DMatrix::zeros(self.rows, x.ncols());
        for (r, c, v) in self.triplet_iter() {
            for j in 0..x.ncols() {
                y[(r, j)] += v * x[(c, j)];
            }
        }
        Ok(y)
    }

    /// Dense copy of the matrix.
    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut dense = DMatrix::zeros(self.rows, self.cols);
        for (r, c, v) in self.triplet_iter() {
            dense[(r, c)] += v;
        }
        dense
    }
}

/// Zeroed row pointers for `rows` rows.
///
/// Both dimensions must leave room for a trailing pointer, which a transpose
/// needs for `cols`. Allocation failure is reported instead of aborting.
fn row_pointers(rows: usize, cols: usize) -> Result<Vec<usize>> {
    let too_large = || ModesError::MatrixTooLarge { rows, cols };
    let len = rows.checked_add(1).ok_or_else(too_large)?;
    cols.checked_add(1).ok_or_else(too_large)?;

    let mut row_ptr = Vec::new();
    row_ptr.try_reserve_exact(len).map_err(|_| too_large())?;
    row_ptr.resize(len, 0);
    Ok(row_ptr)
}
