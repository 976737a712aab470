//! STL (stereolithography) format support.
//!
//! Both binary and ASCII files are read. `stl_io` merges identical corner
//! positions, which turns the triangle soup into a connected mesh so boundary
//! detection sees shared edges.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{ModesError, Result};
use crate::mesh::Mesh;

/// Load a mesh from an STL file.
///
/// # Example
///
/// ```no_run
/// use meshmodes::io::stl;
///
/// let mesh = stl::load("model.stl").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let stl = stl_io::read_stl(&mut file).map_err(|e| ModesError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let vertices = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();
    let faces = stl.faces.iter().map(|tri| tri.vertices).collect();

    Mesh::new(vertices, faces)
}

/// Save a mesh to a binary STL file.
pub fn save<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);

    stl_io::write_stl(&mut writer, triangles(mesh).iter()).map_err(|e| ModesError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    writer.flush()?;
    Ok(())
}

fn triangles(mesh: &Mesh) -> Vec<stl_io::Triangle> {
    let vertex = |p: &Point3<f64>| stl_io::Vertex::new([p.x as f32, p.y as f32, p.z as f32]);

    (0..mesh.num_faces())
        .map(|f| {
            let n = mesh.face_normal(f);
            let [p0, p1, p2] = mesh.face_positions(f);
            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [vertex(&p0), vertex(&p1), vertex(&p2)],
            }
        })
        .collect()
}
