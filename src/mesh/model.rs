//! Face-vertex triangle mesh with boundary classification.

use nalgebra::{Point3, Vector3};

use super::boundary::{self, DEGENERATE_AREA};
use crate::error::{ModesError, Result};

/// A triangle mesh as handed over by the acquisition step.
///
/// Vertices and faces are stored in their original order; the closure index of a
/// vertex is its position in [`Mesh::positions`]. The mesh is immutable once
/// built.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    positions: Vec<Point3<f64>>,
    faces: Vec<[usize; 3]>,
    degenerate: Vec<bool>,
    boundary: Vec<bool>,
}

impl Mesh {
    /// Build a mesh and derive its boundary flags from the faces.
    ///
    /// # Example
    /// ```
    /// use meshmodes::mesh::Mesh;
    /// use nalgebra::Point3;
    ///
    /// let vertices = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.5, 1.0, 0.0),
    /// ];
    /// let mesh = Mesh::new(vertices, vec![[0, 1, 2]]).unwrap();
    /// assert_eq!(mesh.num_boundary_vertices(), 3);
    /// ```
    pub fn new(positions: Vec<Point3<f64>>, faces: Vec<[usize; 3]>) -> Result<Self> {
        Self::with_degenerate_area(positions, faces, DEGENERATE_AREA)
    }

    /// Build a mesh, treating faces with an area at or below `max_area` as degenerate.
    ///
    /// Degenerate faces take no part in boundary classification or operator
    /// assembly.
    pub fn with_degenerate_area(
        positions: Vec<Point3<f64>>,
        faces: Vec<[usize; 3]>,
        max_area: f64,
    ) -> Result<Self> {
        validate_faces(positions.len(), &faces)?;
        let degenerate = boundary::degenerate_faces(&positions, &faces, max_area.max(0.0));
        let boundary = boundary::boundary_flags(positions.len(), &faces, &degenerate);
        Ok(Self {
            positions,
            faces,
            degenerate,
            boundary,
        })
    }

    /// Build a mesh with boundary flags supplied by the caller.
    pub fn with_boundary(
        positions: Vec<Point3<f64>>,
        faces: Vec<[usize; 3]>,
        boundary: Vec<bool>,
    ) -> Result<Self> {
        validate_faces(positions.len(), &faces)?;
        if boundary.len() != positions.len() {
            return Err(ModesError::BoundaryFlagCount {
                expected: positions.len(),
                actual: boundary.len(),
            });
        }
        let degenerate = boundary::degenerate_faces(&positions, &faces, DEGENERATE_AREA);
        Ok(Self {
            positions,
            faces,
            degenerate,
            boundary,
        })
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Returns true if the mesh has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Vertex positions in closure order.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Face vertex triples.
    #[inline]
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// Per-vertex boundary flags.
    #[inline]
    pub fn boundary_flags(&self) -> &[bool] {
        &self.boundary
    }

    /// Whether vertex `v` lies on the boundary.
    #[inline]
    pub fn is_boundary_vertex(&self, v: usize) -> bool {
        self.boundary[v]
    }

    /// Number of boundary vertices.
    pub fn num_boundary_vertices(&self) -> usize {
        self.boundary.iter().filter(|&&b| b).count()
    }

    /// Whether the mesh has at least one boundary vertex.
    pub fn has_boundary(&self) -> bool {
        self.boundary.iter().any(|&b| b)
    }

    /// Whether face `f` repeats a vertex or has (near) zero area.
    #[inline]
    pub fn is_degenerate_face(&self, f: usize) -> bool {
        self.degenerate[f]
    }

    /// Number of degenerate faces.
    pub fn num_degenerate_faces(&self) -> usize {
        self.degenerate.iter().filter(|&&d| d).count()
    }

    /// Positions of the three corners of face `f`.
    pub fn face_positions(&self, f: usize) -> [Point3<f64>; 3] {
        let [a, b, c] = self.faces[f];
        [self.positions[a], self.positions[b], self.positions[c]]
    }

    /// Area of face `f`.
    pub fn face_area(&self, f: usize) -> f64 {
        let [p0, p1, p2] = self.face_positions(f);
        boundary::triangle_area(&p0, &p1, &p2)
    }

    /// Unit normal of face `f`, or zero for a degenerate face.
    pub fn face_normal(&self, f: usize) -> Vector3<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        (p1 - p0)
            .cross(&(p2 - p0))
            .try_normalize(1e-15)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f64 {
        (0..self.faces.len()).map(|f| self.face_area(f)).sum()
    }

    /// Number of undirected edges used by at least one non-degenerate face.
    pub fn num_edges(&self) -> usize {
        boundary::edge_face_counts(&self.faces, &self.degenerate).len()
    }

    /// Axis-aligned bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.positions.first()?;
        let mut min = first;
        let mut max = first;
        for p in &self.positions {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        Some((min, max))
    }
}

fn validate_faces(num_vertices: usize, faces: &[[usize; 3]]) -> Result<()> {
    for (fi, face) in faces.iter().enumerate() {
        for &vi in face {
            if vi >= num_vertices {
                return Err(ModesError::InvalidVertexIndex {
                    face: fi,
                    vertex: vi,
                    num_vertices,
                });
            }
        }
    }
    Ok(())
}
