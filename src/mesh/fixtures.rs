//! Small meshes shared by unit tests.

use nalgebra::Point3;

use super::Mesh;

/// One triangle; every vertex is on the boundary.
pub fn single_triangle() -> Mesh {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    Mesh::new(vertices, vec![[0, 1, 2]]).expect("valid triangle")
}

/// Unit square split along the 0-2 diagonal.
pub fn split_quad() -> Mesh {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    Mesh::new(vertices, vec![[0, 1, 2], [0, 2, 3]]).expect("valid quad")
}

/// Closed tetrahedron, no boundary.
pub fn tetrahedron() -> Mesh {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.5, 1.0, 0.0),
        Point3::new(0.5, 0.5, 1.0),
    ];
    let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
    Mesh::new(vertices, faces).expect("valid tetrahedron")
}

/// Flat `n`x`n` grid of unit squares, each split into two triangles.
pub fn grid(n: usize) -> Mesh {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);

    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    Mesh::new(vertices, faces).expect("valid grid")
}
