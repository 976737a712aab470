//! Visualization adapter.
//!
//! Turns closure-indexed spectral data and diagnostic overlays into per-vertex
//! colors, and exports them as a vertex-colored PLY that any mesh viewer can open.
//! The orbit camera controller lives here as a pure state machine so an
//! interactive front end only needs to forward input.
//!
//! # Example
//!
//! ```
//! use meshmodes::mesh::Mesh;
//! use meshmodes::operator::{MeshOperator, OperatorOptions};
//! use meshmodes::view::VisualMode;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh = Mesh::new(vertices, vec![[0, 1, 2]]).unwrap();
//! let operator = MeshOperator::build(&mesh, &OperatorOptions::default()).unwrap();
//!
//! let scalars = VisualMode::Mass.scalars(&mesh, &operator, None).unwrap().unwrap();
//! assert_eq!(scalars.colors().len(), 3);
//! ```

pub mod camera;
pub mod colormap;
pub mod mode;

pub use camera::{CameraController, CameraInput, CameraState, OrbitCamera};
pub use mode::{ModeCursor, VertexScalars, VisualMode};

use std::path::Path;

use crate::error::Result;
use crate::io::ply;
use crate::mesh::Mesh;
use crate::operator::MeshOperator;
use crate::spectral::ModeData;

/// Write `mesh` as PLY, colored by `visual` when it carries scalars.
pub fn export_visual<P: AsRef<Path>>(
    mesh: &Mesh,
    operator: &MeshOperator,
    modes: Option<&ModeData>,
    visual: VisualMode,
    path: P,
) -> Result<Option<VertexScalars>> {
    let scalars = visual.scalars(mesh, operator, modes)?;
    match &scalars {
        Some(scalars) => {
            if let (Some(index), Some(eigenvalue)) = (scalars.mode_index, scalars.eigenvalue) {
                log::info!("mode {}: eigenvalue {}", index, eigenvalue);
            }
            ply::save_colored(mesh, &scalars.colors(), path)?;
        }
        None => ply::save(mesh, path)?,
    }
    Ok(scalars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures;
    use crate::operator::OperatorOptions;

    #[test]
    fn test_export_visual() {
        let dir = std::env::temp_dir().join(format!("meshmodes-view-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mesh = fixtures::grid(2);
        let operator = MeshOperator::build(&mesh, &OperatorOptions::default()).unwrap();

        let colored = dir.join("boundary.ply");
        let scalars = export_visual(&mesh, &operator, None, VisualMode::Boundary, &colored)
            .unwrap()
            .unwrap();
        assert_eq!(scalars.values.len(), 9);
        let text = std::fs::read_to_string(&colored).unwrap();
        assert!(text.contains("property uchar red"));

        let plain = dir.join("plain.ply");
        assert!(export_visual(&mesh, &operator, None, VisualMode::Mesh, &plain)
            .unwrap()
            .is_none());
        let text = std::fs::read_to_string(&plain).unwrap();
        assert!(!text.contains("property uchar red"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
