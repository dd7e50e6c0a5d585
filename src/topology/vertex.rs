use crate::math::{Point3, Vector3};
use crate::texel::TexelSpan;

use super::edge::EdgeId;
use super::entity::{Entity, EntityHeader};

slotmap::new_key_type! {
    /// Unique identifier for a vertex in the mesh store.
    pub struct VertexId;
}

/// A zero-dimensional anchor of the extracted mesh.
///
/// Owns exactly one texel.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// World-space position.
    pub position: Point3,
    /// Unit surface normal.
    pub normal: Vector3,
    pub(crate) header: EntityHeader,
    pub(crate) incident_edges: Vec<EdgeId>,
}

impl Vertex {
    pub(crate) fn new(position: Point3, normal: Vector3, texel: TexelSpan) -> Self {
        Self {
            position,
            normal,
            header: EntityHeader::new(texel),
            incident_edges: Vec::new(),
        }
    }

    /// Edges that have this vertex as an endpoint.
    #[must_use]
    pub fn incident_edges(&self) -> &[EdgeId] {
        &self.incident_edges
    }
}

impl Entity for Vertex {
    fn header(&self) -> &EntityHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut EntityHeader {
        &mut self.header
    }
}
