//! Spectral data read back from an external eigensolver.

use nalgebra::{DMatrix, DVector};

use crate::error::{ModesError, Result};

/// A set of modes: one column per mode, paired with its eigenvalue.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeData {
    modes: DMatrix<f64>,
    eigenvalues: DVector<f64>,
}

impl ModeData {
    /// Pair mode columns with eigenvalues.
    ///
    /// Fails unless there is exactly one eigenvalue per column.
    pub fn new(modes: DMatrix<f64>, eigenvalues: DVector<f64>) -> Result<Self> {
        if modes.ncols() != eigenvalues.len() {
            return Err(ModesError::EigenvalueCount {
                columns: modes.ncols(),
                eigenvalues: eigenvalues.len(),
            });
        }
        Ok(Self { modes, eigenvalues })
    }

    /// Treat a single function as one mode with eigenvalue zero.
    pub fn from_function(function: &FunctionData) -> Self {
        let len = function.len();
        Self {
            modes: DMatrix::from_column_slice(len, 1, function.values().as_slice()),
            eigenvalues: DVector::zeros(1),
        }
    }

    /// Number of entries per mode.
    #[inline]
    pub fn len(&self) -> usize {
        self.modes.nrows()
    }

    /// Returns true if the modes have no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.modes.nrows() == 0
    }

    /// Number of modes.
    #[inline]
    pub fn count(&self) -> usize {
        self.modes.ncols()
    }

    /// The mode matrix, one column per mode.
    #[inline]
    pub fn modes(&self) -> &DMatrix<f64> {
        &self.modes
    }

    /// Eigenvalues in mode order.
    #[inline]
    pub fn eigenvalues(&self) -> &DVector<f64> {
        &self.eigenvalues
    }

    /// Mode `index` and its eigenvalue.
    pub fn mode(&self, index: usize) -> Result<(DVector<f64>, f64)> {
        if index >= self.count() {
            return Err(ModesError::ModeIndexOutOfRange {
                index,
                count: self.count(),
            });
        }
        Ok((self.modes.column(index).into_owned(), self.eigenvalues[index]))
    }

    /// Replace the mode matrix, keeping eigenvalues.
    pub(crate) fn with_modes(self, modes: DMatrix<f64>) -> Result<Self> {
        Self::new(modes, self.eigenvalues)
    }
}

/// A single scalar value per vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionData {
    values: DVector<f64>,
}

impl FunctionData {
    /// Wrap per-vertex values.
    pub fn new(values: DVector<f64>) -> Self {
        Self { values }
    }

    /// Number of values.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The values.
    #[inline]
    pub fn values(&self) -> &DVector<f64> {
        &self.values
    }
}

impl From<Vec<f64>> for FunctionData {
    fn from(values: Vec<f64>) -> Self {
        Self::new(DVector::from_vec(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eigenvalue_count_checked() {
        let result = ModeData::new(DMatrix::zeros(4, 2), DVector::zeros(3));
        assert!(matches!(
            result,
            Err(ModesError::EigenvalueCount { columns: 2, eigenvalues: 3 })
        ));
    }

    #[test]
    fn test_mode_lookup() {
        let modes = DMatrix::from_row_slice(3, 2, &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        let data = ModeData::new(modes, DVector::from_vec(vec![0.0, 0.5])).unwrap();

        assert_eq!(data.len(), 3);
        assert_eq!(data.count(), 2);
        let (mode, eigenvalue) = data.mode(1).unwrap();
        assert_eq!(mode, DVector::from_vec(vec![4.0, 5.0, 6.0]));
        assert_eq!(eigenvalue, 0.5);
        assert!(matches!(
            data.mode(2),
            Err(ModesError::ModeIndexOutOfRange { index: 2, count: 2 })
        ));
    }

    #[test]
    fn test_from_function() {
        let function = FunctionData::from(vec![1.0, 2.0, 3.0]);
        let data = ModeData::from_function(&function);

        assert_eq!(data.count(), 1);
        assert_eq!(data.eigenvalues(), &DVector::from_vec(vec![0.0]));
        let (mode, eigenvalue) = data.mode(0).unwrap();
        assert_eq!(mode, DVector::from_vec(vec![1.0, 2.0, 3.0]));
        assert_eq!(eigenvalue, 0.0);
    }

    #[test]
    fn test_empty_modes() {
        let data = ModeData::new(DMatrix::zeros(5, 0), DVector::zeros(0)).unwrap();
        assert_eq!(data.count(), 0);
        assert!(data.mode(0).is_err());
    }
}
