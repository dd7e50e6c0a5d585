use crate::texel::TexelSpan;

use super::entity::{Entity, EntityHeader};
use super::face::{QuadId, TriangleId};
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the mesh store.
    pub struct EdgeId;
}

/// Data associated with a mesh edge.
///
/// The endpoint order is fixed at creation and defines the edge's canonical
/// direction. Interior texels are ordered from `vertices[0]` to `vertices[1]`.
#[derive(Debug, Clone)]
pub struct Edge {
    pub(crate) vertices: [VertexId; 2],
    pub(crate) header: EntityHeader,
    pub(crate) incident_triangles: Vec<TriangleId>,
    pub(crate) incident_quads: Vec<QuadId>,
}

impl Edge {
    pub(crate) fn new(start: VertexId, end: VertexId, texels: TexelSpan) -> Self {
        Self {
            vertices: [start, end],
            header: EntityHeader::new(texels),
            incident_triangles: Vec::new(),
            incident_quads: Vec::new(),
        }
    }

    /// Endpoints in canonical order.
    #[must_use]
    pub fn vertices(&self) -> [VertexId; 2] {
        self.vertices
    }

    /// Start vertex of the canonical direction.
    #[must_use]
    pub fn start(&self) -> VertexId {
        self.vertices[0]
    }

    /// End vertex of the canonical direction.
    #[must_use]
    pub fn end(&self) -> VertexId {
        self.vertices[1]
    }

    /// Returns the endpoint opposite `vertex`, if `vertex` is an endpoint.
    #[must_use]
    pub fn opposite(&self, vertex: VertexId) -> Option<VertexId> {
        match self.vertices {
            [a, b] if a == vertex => Some(b),
            [a, b] if b == vertex => Some(a),
            _ => None,
        }
    }

    /// Triangles bordered by this edge.
    #[must_use]
    pub fn incident_triangles(&self) -> &[TriangleId] {
        &self.incident_triangles
    }

    /// Quads bordered by this edge.
    #[must_use]
    pub fn incident_quads(&self) -> &[QuadId] {
        &self.incident_quads
    }

    /// Number of faces of any kind bordered by this edge.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.incident_triangles.len() + self.incident_quads.len()
    }
}

impl Entity for Edge {
    fn header(&self) -> &EntityHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut EntityHeader {
        &mut self.header
    }
}
