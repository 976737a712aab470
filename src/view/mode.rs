//! Visual modes: which per-vertex scalar is shown on the mesh.

use nalgebra::DVector;

use super::colormap;
use crate::error::{ModesError, Result};
use crate::mesh::Mesh;
use crate::operator::MeshOperator;
use crate::spectral::ModeData;

/// What is painted on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualMode {
    /// Plain mesh, no scalar field.
    #[default]
    Mesh,
    /// One mode of the loaded spectral data.
    Modes {
        /// Column of the mode data.
        index: usize,
    },
    /// Boundary vertices marked with 1, interior with 0.
    Boundary,
    /// Per-vertex mass (the degree for uniform weights).
    Mass,
    /// Diagonal of the full Laplacian.
    LaplacianDiagonal,
}

/// Per-vertex scalars handed to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexScalars {
    /// One value per vertex.
    pub values: DVector<f64>,
    /// Eigenvalue of the displayed mode.
    pub eigenvalue: Option<f64>,
    /// Index of the displayed mode.
    pub mode_index: Option<usize>,
}

impl VertexScalars {
    fn overlay(values: DVector<f64>) -> Self {
        Self {
            values,
            eigenvalue: None,
            mode_index: None,
        }
    }

    /// Colors for the values, centered on zero for modes.
    pub fn colors(&self) -> Vec<[u8; 3]> {
        let values = self.values.as_slice();
        let range = if self.mode_index.is_some() {
            colormap::symmetric_range(values)
        } else {
            colormap::robust_range(values)
        };
        colormap::colorize(values, range)
    }
}

impl VisualMode {
    /// Scalars for this mode, or `None` for the plain mesh.
    ///
    /// `modes` must be closure-indexed; it is only needed for [`VisualMode::Modes`].
    pub fn scalars(
        &self,
        mesh: &Mesh,
        operator: &MeshOperator,
        modes: Option<&ModeData>,
    ) -> Result<Option<VertexScalars>> {
        let scalars = match *self {
            VisualMode::Mesh => return Ok(None),
            VisualMode::Modes { index } => {
                let modes = modes.ok_or(ModesError::NoSpectralData)?;
                if modes.len() != mesh.num_vertices() {
                    return Err(ModesError::dimension("mode", mesh.num_vertices(), modes.len()));
                }
                let (values, eigenvalue) = modes.mode(index)?;
                VertexScalars {
                    values,
                    eigenvalue: Some(eigenvalue),
                    mode_index: Some(index),
                }
            }
            VisualMode::Boundary => VertexScalars::overlay(DVector::from_iterator(
                mesh.num_vertices(),
                mesh.boundary_flags().iter().map(|&b| if b { 1.0 } else { 0.0 }),
            )),
            VisualMode::Mass => VertexScalars::overlay(operator.mass().diagonal().clone()),
            VisualMode::LaplacianDiagonal => VertexScalars::overlay(operator.laplacian_diagonal()),
        };
        Ok(Some(scalars))
    }
}

/// Cycles through the modes of a loaded mode set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeCursor {
    index: usize,
    count: usize,
}

impl ModeCursor {
    /// Cursor on the first of `count` modes.
    pub fn new(count: usize) -> Self {
        Self { index: 0, count }
    }

    /// Current mode index.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Visual mode for the current index.
    pub fn visual_mode(&self) -> VisualMode {
        VisualMode::Modes { index: self.index }
    }

    /// Jump to `index`, failing if it is out of range.
    pub fn select(&mut self, index: usize) -> Result<()> {
        if index >= self.count {
            return Err(ModesError::ModeIndexOutOfRange {
                index,
                count: self.count,
            });
        }
        self.index = index;
        Ok(())
    }

    /// Advance to the next mode, wrapping around.
    pub fn next(&mut self) {
        if self.count > 0 {
            self.index = (self.index + 1) % self.count;
        }
    }

    /// Go back to the previous mode, wrapping around.
    pub fn prev(&mut self) {
        if self.count > 0 {
            self.index = (self.index + self.count - 1) % self.count;
        }
    }
}
