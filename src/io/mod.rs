//! Mesh file I/O.
//!
//! The loaders hand a finished [`Mesh`] to the operator pipeline; boundary flags
//! are derived from the loaded faces.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | STL | `.stl` | ✓ | ✓ | Binary and ASCII |
//! | PLY | `.ply` | ✓ | ✓ | Stanford polygon format, optional vertex colors |
//! | glTF | `.gltf`, `.glb` | ✓ | ✗ | All triangle primitives merged |
//!
//! # Usage
//!
//! ```no_run
//! use meshmodes::io::{load, save};
//!
//! // Load with automatic format detection
//! let mesh = load("model.ply").unwrap();
//!
//! // Save with automatic format detection
//! save(&mesh, "output.stl").unwrap();
//! ```

pub mod gltf;
pub mod ply;
pub mod stl;

use std::path::Path;

use crate::error::{ModesError, Result};
use crate::mesh::Mesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// STL (stereolithography) format.
    Stl,
    /// PLY (Stanford polygon) format.
    Ply,
    /// glTF format.
    Gltf,
    /// glTF binary format.
    Glb,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "stl" => Some(Format::Stl),
            "ply" => Some(Format::Ply),
            "gltf" => Some(Format::Gltf),
            "glb" => Some(Format::Glb),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Format> {
        let path = path.as_ref();
        let extension = path.extension().and_then(|ext| ext.to_str());
        extension
            .and_then(Format::from_extension)
            .ok_or_else(|| ModesError::UnsupportedFormat {
                extension: extension.unwrap_or("(none)").to_string(),
            })
    }
}

/// Load a mesh from a file with automatic format detection.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let mesh = match Format::from_path(path)? {
        Format::Stl => stl::load(path)?,
        Format::Ply => ply::load(path)?,
        Format::Gltf | Format::Glb => gltf::load(path)?,
    };
    log::info!(
        "loaded {}: {} vertices, {} faces",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(mesh)
}

/// Save a mesh to a file with automatic format detection.
pub fn save<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match Format::from_path(path)? {
        Format::Stl => stl::save(mesh, path),
        Format::Ply => ply::save(mesh, path),
        Format::Gltf | Format::Glb => Err(ModesError::SaveError {
            path: path.to_path_buf(),
            message: "glTF saving is not supported".to_string(),
        }),
    }
}
