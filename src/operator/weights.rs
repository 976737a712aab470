//! Per-edge weights and per-vertex mass accumulated over mesh faces.
//!
//! Every non-degenerate face hands out one weight to each of its three edges and
//! one mass share to each of its corners. A [`EdgeWeighting`] decides the values;
//! [`WeightScheme`] covers the uniform graph weights and the cotangent weights.

use std::collections::BTreeMap;

use nalgebra::{DVector, Point3};
use rayon::prelude::*;

use crate::mesh::{edge_key, EdgeKey, Mesh};

/// Strategy producing the contribution of a single triangle.
///
/// Corners are given in face order. Edge `k` of the result is the edge opposite
/// corner `k`, i.e. `(v1, v2)`, `(v2, v0)` and `(v0, v1)`.
pub trait EdgeWeighting: Sync {
    /// Weights added to the three edges of a triangle.
    fn edge_weights(&self, corners: &[Point3<f64>; 3]) -> [f64; 3];

    /// Mass added to each corner of a triangle with the given area.
    fn corner_mass(&self, corners: &[Point3<f64>; 3], area: f64) -> f64;
}

/// Built-in weighting schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeightScheme {
    /// Every face adds 1/2 to each of its edges and 1/3 to each corner's mass.
    ///
    /// An edge shared by two faces ends up with weight 1, so on a closed mesh the
    /// result is the unit-weight graph Laplacian and the mass is the incident face
    /// count divided by three.
    #[default]
    Uniform,
    /// Every face adds half the cotangent of the angle opposite each edge;
    /// mass is the barycentric lumped area.
    Cotangent,
}

impl EdgeWeighting for WeightScheme {
    fn edge_weights(&self, corners: &[Point3<f64>; 3]) -> [f64; 3] {
        match self {
            WeightScheme::Uniform => [0.5; 3],
            WeightScheme::Cotangent => {
                let [p0, p1, p2] = corners;
                [
                    0.5 * cotangent_angle(p0, p1, p2),
                    0.5 * cotangent_angle(p1, p2, p0),
                    0.5 * cotangent_angle(p2, p0, p1),
                ]
            }
        }
    }

    fn corner_mass(&self, _corners: &[Point3<f64>; 3], area: f64) -> f64 {
        match self {
            WeightScheme::Uniform => 1.0 / 3.0,
            WeightScheme::Cotangent => area / 3.0,
        }
    }
}

/// Compute the cotangent of the angle at vertex `a` in triangle (a, b, c).
fn cotangent_angle(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let ab = b - a;
    let ac = c - a;

    let cross_len = ab.cross(&ac).norm();
    if cross_len < 1e-12 {
        0.0
    } else {
        ab.dot(&ac) / cross_len
    }
}

/// Options for operator assembly.
#[derive(Debug, Clone)]
pub struct OperatorOptions {
    /// Weighting scheme for edges and mass.
    pub scheme: WeightScheme,

    /// Whether to evaluate faces in parallel (default: false).
    pub parallel: bool,
}

impl Default for OperatorOptions {
    fn default() -> Self {
        Self {
            scheme: WeightScheme::Uniform,
            parallel: false,
        }
    }
}

impl OperatorOptions {
    /// Use the given weighting scheme.
    pub fn with_scheme(mut self, scheme: WeightScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Contribution of one face, indexed by closure vertex.
struct FaceContribution {
    vertices: [usize; 3],
    edge_weights: [f64; 3],
    corner_mass: f64,
}

/// Accumulated edge weights and vertex mass of a mesh.
#[derive(Debug, Clone)]
pub struct EdgeWeights {
    edges: BTreeMap<EdgeKey, f64>,
    mass: DVector<f64>,
    degenerate_faces: usize,
}

impl EdgeWeights {
    /// Accumulate weights with the scheme selected in `options`.
    pub fn compute(mesh: &Mesh, options: &OperatorOptions) -> Self {
        Self::compute_with(mesh, &options.scheme, options)
    }

    /// Accumulate weights with a custom weighting strategy.
    ///
    /// `options.scheme` is ignored; the other options still apply.
    pub fn compute_with<W: EdgeWeighting>(
        mesh: &Mesh,
        weighting: &W,
        options: &OperatorOptions,
    ) -> Self {
        let evaluate = |f: usize| face_contribution(mesh, f, weighting);

        // Both paths yield contributions in face order
        let contributions: Vec<Option<FaceContribution>> = if options.parallel {
            (0..mesh.num_faces()).into_par_iter().map(evaluate).collect()
        } else {
            (0..mesh.num_faces()).map(evaluate).collect()
        };

        let mut edges = BTreeMap::new();
        let mut mass = DVector::zeros(mesh.num_vertices());
        let mut degenerate_faces = 0;

        for contribution in contributions {
            let Some(c) = contribution else {
                degenerate_faces += 1;
                continue;
            };
            let [v0, v1, v2] = c.vertices;
            for (k, (a, b)) in [(v1, v2), (v2, v0), (v0, v1)].into_iter().enumerate() {
                *edges.entry(edge_key(a, b)).or_insert(0.0) += c.edge_weights[k];
            }
            for v in c.vertices {
                mass[v] += c.corner_mass;
            }
        }

        if degenerate_faces > 0 {
            log::debug!("skipped {} degenerate faces", degenerate_faces);
        }

        Self {
            edges,
            mass,
            degenerate_faces,
        }
    }

    /// Number of vertices covered, equal to the mesh vertex count.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.mass.len()
    }

    /// Number of weighted edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Accumulated weight of edge `(a, b)` in either orientation.
    pub fn weight(&self, a: usize, b: usize) -> Option<f64> {
        self.edges.get(&edge_key(a, b)).copied()
    }

    /// Edges as `(low, high, weight)` in ascending index order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.edges.iter().map(|(&(a, b), &w)| (a, b, w))
    }

    /// Per-vertex mass.
    #[inline]
    pub fn mass(&self) -> &DVector<f64> {
        &self.mass
    }

    /// Number of faces that were skipped as degenerate.
    #[inline]
    pub fn degenerate_faces(&self) -> usize {
        self.degenerate_faces
    }
}

fn face_contribution<W: EdgeWeighting>(
    mesh: &Mesh,
    f: usize,
    weighting: &W,
) -> Option<FaceContribution> {
    if mesh.is_degenerate_face(f) {
        return None;
    }
    let vertices = mesh.faces()[f];
    let area = mesh.face_area(f);
    let corners = mesh.face_positions(f);
    Some(FaceContribution {
        vertices,
        edge_weights: weighting.edge_weights(&corners),
        corner_mass: weighting.corner_mass(&corners, area),
    })
}
