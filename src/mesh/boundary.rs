//! Degenerate faces and boundary classification.
//!
//! A face is degenerate when it repeats a vertex index or its area is at most a
//! threshold. An edge is a boundary edge when exactly one non-degenerate face
//! uses it. A vertex is a boundary vertex when it is an endpoint of at least one
//! boundary edge.

use std::collections::HashMap;

use nalgebra::Point3;

/// Default area at or below which a face counts as degenerate.
pub const DEGENERATE_AREA: f64 = 1e-12;

/// Sorted vertex pair identifying an undirected edge.
pub(crate) type EdgeKey = (usize, usize);

/// Make an undirected edge key from two vertex indices.
#[inline]
pub(crate) fn edge_key(a: usize, b: usize) -> EdgeKey {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Returns true if the face repeats a vertex index.
#[inline]
fn has_repeated_vertex(face: &[usize; 3]) -> bool {
    face[0] == face[1] || face[1] == face[2] || face[0] == face[2]
}

/// Area of the triangle spanned by three points.
#[inline]
pub(crate) fn triangle_area(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> f64 {
    0.5 * (p1 - p0).cross(&(p2 - p0)).norm()
}

/// Flag every face that repeats a vertex or has an area at or below `max_area`.
///
/// Face indices must be valid for `positions`.
pub(crate) fn degenerate_faces(
    positions: &[Point3<f64>],
    faces: &[[usize; 3]],
    max_area: f64,
) -> Vec<bool> {
    faces
        .iter()
        .map(|face| {
            if has_repeated_vertex(face) {
                return true;
            }
            let [a, b, c] = *face;
            let area = triangle_area(&positions[a], &positions[b], &positions[c]);
            area.is_nan() || area <= max_area
        })
        .collect()
}

/// Count how many non-degenerate faces use each undirected edge.
pub(crate) fn edge_face_counts(
    faces: &[[usize; 3]],
    degenerate: &[bool],
) -> HashMap<EdgeKey, usize> {
    let mut counts: HashMap<EdgeKey, usize> = HashMap::with_capacity(faces.len() * 2);
    for (face, _) in faces.iter().zip(degenerate).filter(|(_, &d)| !d) {
        for k in 0..3 {
            let key = edge_key(face[k], face[(k + 1) % 3]);
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    counts
}

/// Flag every vertex that touches a boundary edge.
pub(crate) fn boundary_flags(
    num_vertices: usize,
    faces: &[[usize; 3]],
    degenerate: &[bool],
) -> Vec<bool> {
    let mut flags = vec![false; num_vertices];
    for (&(a, b), &count) in &edge_face_counts(faces, degenerate) {
        if count == 1 {
            flags[a] = true;
            flags[b] = true;
        }
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(positions: &[Point3<f64>], faces: &[[usize; 3]]) -> Vec<bool> {
        let degenerate = degenerate_faces(positions, faces, DEGENERATE_AREA);
        boundary_flags(positions.len(), faces, &degenerate)
    }

    fn tetrahedron(apex: Point3<f64>) -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            apex,
        ]
    }

    const TETRAHEDRON_FACES: [[usize; 3]; 4] = [[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];

    #[test]
    fn test_single_triangle_all_boundary() {
        let mut positions = tetrahedron(Point3::new(0.5, 0.5, 1.0));
        positions.truncate(3);
        assert_eq!(classify(&positions, &[[0, 1, 2]]), vec![true, true, true]);
    }

    #[test]
    fn test_closed_tetrahedron_has_no_boundary() {
        let positions = tetrahedron(Point3::new(0.5, 0.5, 1.0));
        let flags = classify(&positions, &TETRAHEDRON_FACES);
        assert!(flags.iter().all(|&b| !b));
    }

    #[test]
    fn test_zero_area_face_opens_its_edges() {
        // Apex on edge 0-1 flattens face [0, 1, 3]
        let positions = tetrahedron(Point3::new(0.5, 0.0, 0.0));
        let degenerate = degenerate_faces(&positions, &TETRAHEDRON_FACES, DEGENERATE_AREA);
        assert_eq!(degenerate, vec![false, true, false, false]);

        let flags = boundary_flags(4, &TETRAHEDRON_FACES, &degenerate);
        assert_eq!(flags, vec![true, true, false, true]);
    }

    #[test]
    fn test_area_threshold() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.1, 0.0),
        ];
        assert_eq!(degenerate_faces(&positions, &[[0, 1, 2]], DEGENERATE_AREA), vec![false]);
        assert_eq!(degenerate_faces(&positions, &[[0, 1, 2]], 0.05), vec![true]);
    }

    #[test]
    fn test_fan_center_is_interior() {
        // Closed fan of 4 triangles around vertex 4
        let positions = vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
        ];
        let faces = [[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]];
        assert_eq!(classify(&positions, &faces), vec![true, true, true, true, false]);
    }

    #[test]
    fn test_repeated_vertex_face_is_ignored() {
        let positions = tetrahedron(Point3::new(0.5, 0.5, 1.0));
        let faces = [[0, 1, 2], [0, 0, 1]];
        let degenerate = degenerate_faces(&positions, &faces, DEGENERATE_AREA);
        let counts = edge_face_counts(&faces, &degenerate);
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[&(0, 1)], 1);
    }

    #[test]
    fn test_unreferenced_vertex_is_not_boundary() {
        let positions = tetrahedron(Point3::new(0.5, 0.5, 1.0));
        let flags = classify(&positions, &[[0, 1, 2]]);
        assert!(!flags[3]);
    }
}
