//! PLY (Stanford polygon) format support.
//!
//! Meshes are read with `ply-rs`; polygons with more than three corners are fan
//! triangulated. Output is ASCII, optionally with one RGB color per vertex.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{ModesError, Result};
use crate::mesh::Mesh;

/// Load a mesh from a PLY file.
///
/// # Example
///
/// ```no_run
/// use meshmodes::io::ply;
///
/// let mesh = ply::load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);

    let (vertices, faces) = parse(&mut reader).map_err(|message| ModesError::LoadError {
        path: path.to_path_buf(),
        message,
    })?;
    Mesh::new(vertices, faces)
}

type FaceVertex = (Vec<Point3<f64>>, Vec<[usize; 3]>);

fn parse<R: BufRead>(reader: &mut R) -> std::result::Result<FaceVertex, String> {
    let parser = Parser::<DefaultElement>::new();
    let ply = parser.read_ply(reader).map_err(|e| e.to_string())?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or("PLY file has no vertex element")?;

    let mut vertices = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let coord = |name: &str| {
            get_float_property(vertex, name).ok_or(format!("vertex missing {name} coordinate"))
        };
        vertices.push(Point3::new(coord("x")?, coord("y")?, coord("z")?));
    }

    let mut faces = Vec::new();
    for face in ply.payload.get("face").into_iter().flatten() {
        let indices = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or("face missing vertex_indices property")?;

        if indices.len() >= 3 {
            for i in 1..indices.len() - 1 {
                faces.push([indices[0], indices[i], indices[i + 1]]);
            }
        }
    }

    Ok((vertices, faces))
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

/// Save a mesh to a PLY file (ASCII format).
pub fn save<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    save_impl(mesh, None, path.as_ref())
}

/// Save a mesh with one RGB color per vertex.
pub fn save_colored<P: AsRef<Path>>(mesh: &Mesh, colors: &[[u8; 3]], path: P) -> Result<()> {
    save_impl(mesh, Some(colors), path.as_ref())
}

fn save_impl(mesh: &Mesh, colors: Option<&[[u8; 3]]>, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer, mesh, colors)?;
    writer.flush()?;
    Ok(())
}

/// Write a mesh as ASCII PLY, with vertex colors if given.
pub fn write<W: Write>(writer: &mut W, mesh: &Mesh, colors: Option<&[[u8; 3]]>) -> Result<()> {
    if let Some(colors) = colors {
        if colors.len() != mesh.num_vertices() {
            return Err(ModesError::dimension(
                "vertex colors",
                mesh.num_vertices(),
                colors.len(),
            ));
        }
    }

    // Write header
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by meshmodes")?;
    writeln!(writer, "element vertex {}", mesh.num_vertices())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    if colors.is_some() {
        writeln!(writer, "property uchar red")?;
        writeln!(writer, "property uchar green")?;
        writeln!(writer, "property uchar blue")?;
    }
    writeln!(writer, "element face {}", mesh.num_faces())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for (i, v) in mesh.positions().iter().enumerate() {
        match colors {
            Some(colors) => {
                let [r, g, b] = colors[i];
                writeln!(writer, "{} {} {} {} {} {}", v.x, v.y, v.z, r, g, b)?
            }
            None => writeln!(writer, "{} {} {}", v.x, v.y, v.z)?,
        }
    }

    for f in mesh.faces() {
        writeln!(writer, "3 {} {} {}", f[0], f[1], f[2])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures;

    #[test]
    fn test_write_then_parse() {
        let mesh = fixtures::split_quad();
        let mut buffer = Vec::new();
        write(&mut buffer, &mesh, None).unwrap();

        let (vertices, faces) = parse(&mut buffer.as_slice()).unwrap();
        assert_eq!(vertices.len(), 4);
        assert_eq!(faces, mesh.faces());
        assert!((vertices[2] - Point3::new(1.0, 1.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_colored_output() {
        let mesh = fixtures::single_triangle();
        let colors = [[255, 0, 0], [0, 255, 0], [0, 0, 255]];
        let mut buffer = Vec::new();
        write(&mut buffer, &mesh, Some(&colors)).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("property uchar red"));
        assert!(text.contains("1 0 0 0 255 0"));

        // Colors are ignored by the mesh parser
        let (vertices, faces) = parse(&mut text.as_bytes()).unwrap();
        assert_eq!(vertices.len(), 3);
        assert_eq!(faces.len(), 1);
    }

    #[test]
    fn test_color_count_mismatch() {
        let mesh = fixtures::single_triangle();
        let result = write(&mut Vec::new(), &mesh, Some(&[[0, 0, 0]]));
        assert!(matches!(result, Err(ModesError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_polygon_fan_triangulation() {
        let text = "ply\nformat ascii 1.0\nelement vertex 4\nproperty float x\nproperty float y\n\
                    property float z\nelement face 1\nproperty list uchar int vertex_indices\n\
                    end_header\n0 0 0\n1 0 0\n1 1 0\n0 1 0\n4 0 1 2 3\n";
        let (_, faces) = parse(&mut text.as_bytes()).unwrap();
        assert_eq!(faces, vec![[0, 1, 2], [0, 2, 3]]);
    }
}
