//! Sample lattices of triangles and quads.
//!
//! A face of resolution `r` places its samples on a regular lattice whose
//! corners are the face's vertices, whose border nodes are the interior
//! samples of its edges, and whose inner nodes are the face's own samples.

use crate::error::{InterpolationError, TexelError};
use crate::math::TOLERANCE;
use crate::operations::query::Boundary;
use crate::topology::EntityRef;

/// Which stored sample a lattice node refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatticeNode {
    /// Corner vertex `i` of the boundary walk.
    Corner(usize),
    /// The `step`-th interior sample of boundary side `side`, counted from
    /// the side's walk start.
    Side { side: usize, step: usize },
    /// Face-owned sample.
    Interior(usize),
}

impl LatticeNode {
    /// Resolves the node to `(entity, local texel index)` through the face boundary.
    #[must_use]
    pub fn texel_ref(self, boundary: &Boundary) -> (EntityRef, usize) {
        match self {
            Self::Corner(i) => (EntityRef::Vertex(boundary.sides[i].from), 0),
            Self::Side { side, step } => {
                let s = &boundary.sides[side];
                (
                    EntityRef::Edge(s.edge.edge),
                    s.edge.interior_texel(step, s.samples),
                )
            }
            Self::Interior(index) => (boundary.face.into(), index),
        }
    }
}

fn mismatch(message: String) -> TexelError {
    TexelError::LayoutMismatch(message)
}

/// Lattice of a triangle whose edges are split into `resolution` segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleLattice {
    resolution: usize,
}

impl TriangleLattice {
    /// Derives the lattice from the sample counts of the bounding edges and
    /// the face.
    ///
    /// # Errors
    ///
    /// Returns [`TexelError::LayoutMismatch`] if the edges disagree or the
    /// face sample count does not fill the lattice interior.
    pub fn from_sample_counts(edges: [usize; 3], face: usize) -> Result<Self, TexelError> {
        let n = edges[0];
        if edges.iter().any(|&c| c != n) {
            return Err(mismatch(format!(
                "triangle edges carry {edges:?} samples, expected equal counts"
            )));
        }
        let lattice = Self { resolution: n + 1 };
        if lattice.interior_samples() != face {
            return Err(mismatch(format!(
                "triangle of resolution {} needs {} face samples, got {face}",
                lattice.resolution,
                lattice.interior_samples()
            )));
        }
        Ok(lattice)
    }

    /// Number of segments per edge.
    #[must_use]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Number of face-owned samples.
    #[must_use]
    pub fn interior_samples(&self) -> usize {
        let n = self.resolution - 1;
        n * n.saturating_sub(1) / 2
    }

    /// Maps lattice coordinates `(a, b)`, `a + b <= resolution`, to a node.
    ///
    /// Corner 0 sits at `(0, 0)`, corner 1 at `(r, 0)`, corner 2 at `(0, r)`.
    #[must_use]
    pub fn node(&self, a: usize, b: usize) -> LatticeNode {
        let r = self.resolution;
        match (a, b) {
            (0, 0) => LatticeNode::Corner(0),
            (a, 0) if a == r => LatticeNode::Corner(1),
            (0, b) if b == r => LatticeNode::Corner(2),
            (a, 0) => LatticeNode::Side { side: 0, step: a },
            (a, b) if a + b == r => LatticeNode::Side { side: 1, step: b },
            (0, b) => LatticeNode::Side {
                side: 2,
                step: r - b,
            },
            (a, b) => LatticeNode::Interior((b - 1) * (r - 1) - (b - 1) * b / 2 + (a - 1)),
        }
    }

    /// Lattice coordinates of face sample `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TexelError::OutOfRange`] if the face has fewer samples.
    pub fn interior_coords(&self, index: usize) -> Result<(usize, usize), TexelError> {
        let r = self.resolution;
        let mut remaining = index;
        for b in 1..r.saturating_sub(1) {
            let row = r - 1 - b;
            if remaining < row {
                return Ok((remaining + 1, b));
            }
            remaining -= row;
        }
        Err(TexelError::OutOfRange {
            index,
            count: self.interior_samples(),
        })
    }

    /// Barycentric weights of the three corners at lattice coordinates `(a, b)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn corner_weights(&self, a: usize, b: usize) -> [f64; 3] {
        let r = self.resolution as f64;
        let wa = a as f64 / r;
        let wb = b as f64 / r;
        [1.0 - wa - wb, wa, wb]
    }

    /// Lattice nodes and weights blending to the point at barycentric
    /// parameters `(u, v)`, measured towards corners 1 and 2.
    ///
    /// # Errors
    ///
    /// Returns [`InterpolationError::OutsideDomain`] if `(u, v)` is outside
    /// the triangle.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn contributions(&self, u: f64, v: f64) -> Result<Vec<(LatticeNode, f64)>, InterpolationError> {
        if u < -TOLERANCE || v < -TOLERANCE || u + v > 1.0 + TOLERANCE {
            return Err(InterpolationError::OutsideDomain { u, v });
        }
        let (mut u, mut v) = (u.max(0.0), v.max(0.0));
        if u + v > 1.0 {
            let s = u + v;
            u /= s;
            v /= s;
        }

        let r = self.resolution;
        let x = u * r as f64;
        let y = v * r as f64;
        let mut i = (x.floor() as usize).min(r - 1);
        let mut j = (y.floor() as usize).min(r - 1);
        if i + j > r - 1 {
            if i >= j {
                i -= 1;
            } else {
                j -= 1;
            }
        }
        let fx = x - i as f64;
        let fy = y - j as f64;

        let weighted = if fx + fy > 1.0 && i + j + 2 <= r {
            vec![
                (self.node(i + 1, j + 1), fx + fy - 1.0),
                (self.node(i, j + 1), 1.0 - fx),
                (self.node(i + 1, j), 1.0 - fy),
            ]
        } else {
            vec![
                (self.node(i, j), 1.0 - fx - fy),
                (self.node(i + 1, j), fx),
                (self.node(i, j + 1), fy),
            ]
        };
        Ok(weighted)
    }
}

/// Lattice of a quad split into `ru` segments along edges 0 and 2 and `rv`
/// segments along edges 1 and 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadLattice {
    ru: usize,
    rv: usize,
}

impl QuadLattice {
    /// Derives the lattice from the sample counts of the bounding edges and
    /// the face.
    ///
    /// # Errors
    ///
    /// Returns [`TexelError::LayoutMismatch`] if opposite edges disagree or the
    /// face sample count does not fill the lattice interior.
    pub fn from_sample_counts(edges: [usize; 4], face: usize) -> Result<Self, TexelError> {
        if edges[0] != edges[2] || edges[1] != edges[3] {
            return Err(mismatch(format!(
                "quad edges carry {edges:?} samples, opposite edges must match"
            )));
        }
        let lattice = Self {
            ru: edges[0] + 1,
            rv: edges[1] + 1,
        };
        if lattice.interior_samples() != face {
            return Err(mismatch(format!(
                "quad of resolution {}x{} needs {} face samples, got {face}",
                lattice.ru,
                lattice.rv,
                lattice.interior_samples()
            )));
        }
        Ok(lattice)
    }

    /// Segments along the `u` and `v` directions.
    #[must_use]
    pub fn resolution(&self) -> (usize, usize) {
        (self.ru, self.rv)
    }

    /// Number of face-owned samples.
    #[must_use]
    pub fn interior_samples(&self) -> usize {
        (self.ru - 1) * (self.rv - 1)
    }

    /// Maps lattice coordinates `(a, b)`, `a <= ru`, `b <= rv`, to a node.
    ///
    /// Corners 0 to 3 sit at `(0, 0)`, `(ru, 0)`, `(ru, rv)`, `(0, rv)`.
    #[must_use]
    pub fn node(&self, a: usize, b: usize) -> LatticeNode {
        let (ru, rv) = (self.ru, self.rv);
        match (a, b) {
            (0, 0) => LatticeNode::Corner(0),
            (a, 0) if a == ru => LatticeNode::Corner(1),
            (a, b) if a == ru && b == rv => LatticeNode::Corner(2),
            (0, b) if b == rv => LatticeNode::Corner(3),
            (a, 0) => LatticeNode::Side { side: 0, step: a },
            (a, b) if a == ru => LatticeNode::Side { side: 1, step: b },
            (a, b) if b == rv => LatticeNode::Side {
                side: 2,
                step: ru - a,
            },
            (0, b) => LatticeNode::Side {
                side: 3,
                step: rv - b,
            },
            (a, b) => LatticeNode::Interior((a - 1) + (b - 1) * (ru - 1)),
        }
    }

    /// Lattice coordinates of face sample `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TexelError::OutOfRange`] if the face has fewer samples.
    pub fn interior_coords(&self, index: usize) -> Result<(usize, usize), TexelError> {
        if index >= self.interior_samples() {
            return Err(TexelError::OutOfRange {
                index,
                count: self.interior_samples(),
            });
        }
        let row = self.ru - 1;
        Ok((index % row + 1, index / row + 1))
    }

    /// Bilinear weights of the four corners at lattice coordinates `(a, b)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn corner_weights(&self, a: usize, b: usize) -> [f64; 4] {
        let s = a as f64 / self.ru as f64;
        let t = b as f64 / self.rv as f64;
        [(1.0 - s) * (1.0 - t), s * (1.0 - t), s * t, (1.0 - s) * t]
    }

    /// Lattice nodes and weights blending to the point at bilinear
    /// parameters `(u, v)` in the unit square.
    ///
    /// # Errors
    ///
    /// Returns [`InterpolationError::OutsideDomain`] if `(u, v)` is outside
    /// the unit square.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn contributions(&self, u: f64, v: f64) -> Result<Vec<(LatticeNode, f64)>, InterpolationError> {
        let inside = |t: f64| (-TOLERANCE..=1.0 + TOLERANCE).contains(&t);
        if !inside(u) || !inside(v) {
            return Err(InterpolationError::OutsideDomain { u, v });
        }
        let x = u.clamp(0.0, 1.0) * self.ru as f64;
        let y = v.clamp(0.0, 1.0) * self.rv as f64;
        let i = (x.floor() as usize).min(self.ru - 1);
        let j = (y.floor() as usize).min(self.rv - 1);
        let fx = x - i as f64;
        let fy = y - j as f64;

        Ok(vec![
            (self.node(i, j), (1.0 - fx) * (1.0 - fy)),
            (self.node(i + 1, j), fx * (1.0 - fy)),
            (self.node(i + 1, j + 1), fx * fy),
            (self.node(i, j + 1), (1.0 - fx) * fy),
        ])
    }
}

/// Lattice of either face kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceLattice {
    Triangle(TriangleLattice),
    Quad(QuadLattice),
}

impl FaceLattice {
    /// Derives the lattice of a face from its edges' and its own sample counts.
    ///
    /// # Errors
    ///
    /// Returns [`TexelError::LayoutMismatch`] if the counts are inconsistent.
    pub fn from_sample_counts(edges: &[usize], face: usize) -> Result<Self, TexelError> {
        match *edges {
            [a, b, c] => Ok(Self::Triangle(TriangleLattice::from_sample_counts(
                [a, b, c],
                face,
            )?)),
            [a, b, c, d] => Ok(Self::Quad(QuadLattice::from_sample_counts(
                [a, b, c, d],
                face,
            )?)),
            _ => Err(mismatch(format!("no lattice for a {}-sided face", edges.len()))),
        }
    }

    /// Derives the lattice of a walked face.
    ///
    /// # Errors
    ///
    /// Returns [`TexelError::LayoutMismatch`] if the counts are inconsistent.
    pub fn for_boundary(boundary: &Boundary, face_samples: usize) -> Result<Self, TexelError> {
        let counts: Vec<usize> = boundary.sides.iter().map(|s| s.samples).collect();
        Self::from_sample_counts(&counts, face_samples)
    }

    /// Lattice nodes and weights at parametric coordinate `(u, v)`.
    ///
    /// # Errors
    ///
    /// Returns [`InterpolationError::OutsideDomain`] if `(u, v)` is outside the face.
    pub fn contributions(&self, u: f64, v: f64) -> Result<Vec<(LatticeNode, f64)>, InterpolationError> {
        match self {
            Self::Triangle(lattice) => lattice.contributions(u, v),
            Self::Quad(lattice) => lattice.contributions(u, v),
        }
    }

    /// Corner weights locating face sample `index` on the face.
    ///
    /// # Errors
    ///
    /// Returns [`TexelError::OutOfRange`] if the face has fewer samples.
    pub fn interior_corner_weights(&self, index: usize) -> Result<Vec<f64>, TexelError> {
        match self {
            Self::Triangle(lattice) => {
                let (a, b) = lattice.interior_coords(index)?;
                Ok(lattice.corner_weights(a, b).to_vec())
            }
            Self::Quad(lattice) => {
                let (a, b) = lattice.interior_coords(index)?;
                Ok(lattice.corner_weights(a, b).to_vec())
            }
        }
    }
}
