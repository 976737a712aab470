//! Error types for meshmodes.
//!
//! Every fallible operation in the crate returns [`Result`], so a failure in one
//! pipeline stage can be reported by the caller without tearing down the others.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`ModesError`].
pub type Result<T> = std::result::Result<T, ModesError>;

/// Errors that can occur while building operators or reading/writing spectral data.
#[derive(Error, Debug)]
pub enum ModesError {
    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex} (mesh has {num_vertices} vertices)")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
        /// Number of vertices in the mesh.
        num_vertices: usize,
    },

    /// Supplied boundary flags do not cover the vertex set.
    #[error("expected {expected} boundary flags, got {actual}")]
    BoundaryFlagCount {
        /// Number of vertices in the mesh.
        expected: usize,
        /// Number of flags supplied.
        actual: usize,
    },

    /// A vertex used in normalization has a non-positive (or non-finite) mass.
    #[error("vertex {vertex} has non-positive mass {mass}")]
    NonPositiveMass {
        /// Closure index of the offending vertex.
        vertex: usize,
        /// The mass value.
        mass: f64,
    },

    /// A matrix entry lies outside of the matrix shape.
    #[error("entry ({row}, {col}) outside of {nrows}x{ncols} matrix")]
    EntryOutOfBounds {
        /// Row of the entry.
        row: usize,
        /// Column of the entry.
        col: usize,
        /// Number of rows of the matrix.
        nrows: usize,
        /// Number of columns of the matrix.
        ncols: usize,
    },

    /// Matrix dimensions cannot be represented or allocated.
    #[error("matrix of {rows}x{cols} is too large")]
    MatrixTooLarge {
        /// Requested number of rows.
        rows: usize,
        /// Requested number of columns.
        cols: usize,
    },

    /// Two operands have incompatible sizes.
    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// What was being combined.
        context: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Mode matrix and eigenvalue vector disagree on the number of modes.
    #[error("{columns} mode columns but {eigenvalues} eigenvalues")]
    EigenvalueCount {
        /// Number of mode columns.
        columns: usize,
        /// Number of eigenvalues.
        eigenvalues: usize,
    },

    /// A mode index outside of the loaded mode set was requested.
    #[error("mode index {index} out of range ({count} modes)")]
    ModeIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of available modes.
        count: usize,
    },

    /// A mode was requested before any spectral data was loaded.
    #[error("no spectral data loaded")]
    NoSpectralData,

    /// A data file does not start with the expected tag.
    #[error("not a {expected} file (found tag {found:?})")]
    BadMagic {
        /// Human readable name of the expected format.
        expected: &'static str,
        /// The four bytes found at the start of the file.
        found: [u8; 4],
    },

    /// A data file ended before its declared payload.
    #[error("{format} data is truncated")]
    Truncated {
        /// Name of the format being read.
        format: &'static str,
    },

    /// A data file is structurally invalid.
    #[error("malformed {format} data: {details}")]
    Malformed {
        /// Name of the format being read.
        format: &'static str,
        /// Description of the problem.
        details: String,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },
}

impl ModesError {
    /// Create a malformed-data error.
    pub fn malformed<T: std::fmt::Display>(format: &'static str, details: T) -> Self {
        ModesError::Malformed {
            format,
            details: details.to_string(),
        }
    }

    /// Create a dimension mismatch error.
    pub fn dimension(context: &'static str, expected: usize, actual: usize) -> Self {
        ModesError::DimensionMismatch {
            context,
            expected,
            actual,
        }
    }
}
