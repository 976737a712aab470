//! Mesh model consumed by the operator pipeline.
//!
//! The primary type is [`Mesh`]: vertex positions, triangle faces as vertex index
//! triples, and one boundary flag per vertex. Meshes come from the
//! [`io`](crate::io) loaders or are built directly from face-vertex lists:
//!
//! ```
//! use meshmodes::mesh::Mesh;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2], [0, 2, 3]];
//!
//! let mesh = Mesh::new(vertices, faces).unwrap();
//! assert_eq!(mesh.num_edges(), 5);
//! ```
//!
//! # Boundary
//!
//! A vertex is on the boundary iff it is an endpoint of an edge used by exactly
//! one non-degenerate face. A face is degenerate when it repeats a vertex index
//! or its area is at most [`DEGENERATE_AREA`] (or the threshold passed to
//! [`Mesh::with_degenerate_area`]). The operator assembly skips the same faces.

mod boundary;
#[cfg(test)]
pub(crate) mod fixtures;
mod model;

pub use boundary::DEGENERATE_AREA;
pub(crate) use boundary::{edge_key, EdgeKey};
pub use model::Mesh;
