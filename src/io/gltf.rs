//! glTF format support (load only).
//!
//! All triangle primitives of all meshes in the file are merged into one mesh.

use std::path::Path;

use ::gltf::mesh::Mode;
use nalgebra::Point3;

use crate::error::{ModesError, Result};
use crate::mesh::Mesh;

/// Load a mesh from a glTF or GLB file.
///
/// # Example
///
/// ```no_run
/// use meshmodes::io::gltf;
///
/// let mesh = gltf::load("model.glb").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();

    let (document, buffers, _images) = ::gltf::import(path).map_err(|e| ModesError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut faces: Vec<[usize; 3]> = Vec::new();

    for mesh in document.meshes() {
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
            let Some(positions) = reader.read_positions() else {
                continue;
            };

            let offset = vertices.len();
            vertices.extend(positions.map(|p| Point3::new(p[0] as f64, p[1] as f64, p[2] as f64)));

            let indices: Vec<usize> = match reader.read_indices() {
                Some(indices) => indices.into_u32().map(|i| i as usize + offset).collect(),
                None => (offset..vertices.len()).collect(),
            };
            triangulate(primitive.mode(), &indices, &mut faces);
        }
    }

    Mesh::new(vertices, faces)
}

/// Append the triangles of one primitive; point and line primitives add nothing.
fn triangulate(mode: Mode, indices: &[usize], faces: &mut Vec<[usize; 3]>) {
    match mode {
        Mode::Triangles => {
            faces.extend(indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]));
        }
        Mode::TriangleStrip => {
            for i in 0..indices.len().saturating_sub(2) {
                // Odd triangles flip winding
                if i % 2 == 0 {
                    faces.push([indices[i], indices[i + 1], indices[i + 2]]);
                } else {
                    faces.push([indices[i], indices[i + 2], indices[i + 1]]);
                }
            }
        }
        Mode::TriangleFan => {
            for i in 1..indices.len().saturating_sub(1) {
                faces.push([indices[0], indices[i], indices[i + 1]]);
            }
        }
        _ => {}
    }
}
