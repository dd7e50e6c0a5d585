use crate::error::TopologyError;
use crate::texel::TexelSpan;

use super::edge::{Edge, EdgeId};
use super::entity::{Entity, EntityHeader, EntityRef};
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a triangle in the mesh store.
    pub struct TriangleId;
}

slotmap::new_key_type! {
    /// Unique identifier for a quad in the mesh store.
    pub struct QuadId;
}

/// An edge with orientation information within a face boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrientedEdge {
    /// The edge identifier.
    pub edge: EdgeId,
    /// If `true`, the edge is traversed in its canonical direction (start → end).
    /// If `false`, the edge is traversed in reverse (end → start).
    pub forward: bool,
}

impl OrientedEdge {
    /// Creates a new oriented edge.
    #[must_use]
    pub fn new(edge: EdgeId, forward: bool) -> Self {
        Self { edge, forward }
    }

    /// Traverses `edge` in its canonical direction.
    #[must_use]
    pub fn forward(edge: EdgeId) -> Self {
        Self::new(edge, true)
    }

    /// Traverses `edge` against its canonical direction.
    #[must_use]
    pub fn reversed(edge: EdgeId) -> Self {
        Self::new(edge, false)
    }

    /// `(from, to)` endpoints in traversal order.
    #[must_use]
    pub fn endpoints(self, edge: &Edge) -> (VertexId, VertexId) {
        if self.forward {
            (edge.start(), edge.end())
        } else {
            (edge.end(), edge.start())
        }
    }

    /// Local texel index of the `step`-th interior sample met while walking
    /// this edge, for an edge carrying `count` interior samples.
    ///
    /// `step` counts from 1 at the sample closest to the walk's start.
    #[must_use]
    pub fn interior_texel(self, step: usize, count: usize) -> usize {
        if self.forward {
            step - 1
        } else {
            count - step
        }
    }
}

/// A polygon of fixed degree bounded by oriented edges.
#[derive(Debug, Clone)]
pub struct Face<const N: usize> {
    pub(crate) edges: [OrientedEdge; N],
    pub(crate) header: EntityHeader,
}

/// A three-sided face.
pub type Triangle = Face<3>;

/// A four-sided face.
pub type Quad = Face<4>;

impl<const N: usize> Face<N> {
    /// Number of bounding edges and corner vertices.
    pub const FACE_DEGREE: usize = N;

    pub(crate) fn new(edges: [OrientedEdge; N], texels: TexelSpan) -> Self {
        Self {
            edges,
            header: EntityHeader::new(texels),
        }
    }

    /// Bounding edges in walk order.
    #[must_use]
    pub fn edges(&self) -> &[OrientedEdge; N] {
        &self.edges
    }

    /// Whether `edge` bounds this face.
    #[must_use]
    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.edges.iter().any(|oe| oe.edge == edge)
    }
}

impl<const N: usize> Entity for Face<N> {
    fn header(&self) -> &EntityHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut EntityHeader {
        &mut self.header
    }
}

/// Typed reference to a face of either degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceRef {
    Triangle(TriangleId),
    Quad(QuadId),
}

impl From<FaceRef> for EntityRef {
    fn from(face: FaceRef) -> Self {
        match face {
            FaceRef::Triangle(id) => Self::Triangle(id),
            FaceRef::Quad(id) => Self::Quad(id),
        }
    }
}

impl From<TriangleId> for FaceRef {
    fn from(id: TriangleId) -> Self {
        Self::Triangle(id)
    }
}

impl From<QuadId> for FaceRef {
    fn from(id: QuadId) -> Self {
        Self::Quad(id)
    }
}

/// Walks a face boundary and returns its corner vertices in walk order.
///
/// Corner `i` is the vertex the walk leaves through `edges[i]`.
///
/// # Errors
///
/// Returns [`TopologyError::MalformedOrientation`] if an edge repeats, the
/// walk does not close, or it revisits a vertex. Errors from `endpoints`
/// are passed through.
pub(crate) fn walk_boundary<F>(
    edges: &[OrientedEdge],
    endpoints: F,
) -> Result<Vec<VertexId>, TopologyError>
where
    F: Fn(OrientedEdge) -> Result<(VertexId, VertexId), TopologyError>,
{
    let n = edges.len();
    for (i, a) in edges.iter().enumerate() {
        if edges[i + 1..].iter().any(|b| b.edge == a.edge) {
            return Err(TopologyError::MalformedOrientation(format!(
                "edge {:?} appears more than once",
                a.edge
            )));
        }
    }

    let steps = edges
        .iter()
        .map(|&oe| endpoints(oe))
        .collect::<Result<Vec<_>, _>>()?;

    for i in 0..n {
        let (_, to) = steps[i];
        let (next_from, _) = steps[(i + 1) % n];
        if to != next_from {
            return Err(TopologyError::MalformedOrientation(format!(
                "edge {i} ends at {to:?} but edge {} starts at {next_from:?}",
                (i + 1) % n
            )));
        }
    }

    let corners: Vec<VertexId> = steps.iter().map(|&(from, _)| from).collect();
    for (i, a) in corners.iter().enumerate() {
        if corners[i + 1..].contains(a) {
            return Err(TopologyError::MalformedOrientation(format!(
                "boundary visits vertex {a:?} twice"
            )));
        }
    }

    Ok(corners)
}
