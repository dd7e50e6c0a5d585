use crate::error::{Result, TopologyError};
use crate::math::Texel;
use crate::pass::ExtractionPass;
use crate::topology::{Edge, EdgeId, EntityRef, VertexId};

/// Creates an edge between two existing vertices.
///
/// `start → end` becomes the edge's canonical direction; `texels` are its
/// interior samples in that direction.
pub struct MakeEdge {
    start: VertexId,
    end: VertexId,
    texels: Vec<Texel>,
}

impl MakeEdge {
    /// Creates a new `MakeEdge` operation.
    #[must_use]
    pub fn new(start: VertexId, end: VertexId, texels: Vec<Texel>) -> Self {
        Self { start, end, texels }
    }

    /// Executes the operation, registering the edge with both endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::DegenerateEdge`] if both endpoints are the same
    /// vertex, or [`TopologyError::EntityNotFound`] if an endpoint is missing.
    pub fn execute(&self, pass: &mut ExtractionPass<'_>) -> Result<EdgeId> {
        let result = self.insert(pass);
        pass.reject("edge", result)
    }

    fn insert(&self, pass: &mut ExtractionPass<'_>) -> Result<EdgeId> {
        if self.start == self.end {
            return Err(TopologyError::DegenerateEdge.into());
        }
        pass.store().raw_vertex(self.start)?;
        pass.store().raw_vertex(self.end)?;

        let span = pass.append_texels(&self.texels);
        let id = pass
            .store_mut()
            .insert_edge(Edge::new(self.start, self.end, span));
        pass.adopt(EntityRef::Edge(id))?;
        pass.touch(EntityRef::Edge(id))?;
        Ok(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::TexelMeshError;
    use crate::math::{Point3, Vector3};
    use crate::operations::creation::MakeVertex;
    use crate::topology::{Entity, MeshStore};

    fn vertex(pass: &mut ExtractionPass<'_>, x: f64) -> VertexId {
        MakeVertex::new(Point3::new(x, 0.0, 0.0), Vector3::z(), Texel::zeros())
            .execute(pass)
            .unwrap()
    }

    #[test]
    fn edge_keeps_canonical_order_and_texels() {
        let mut store = MeshStore::new();
        let mut pass = store.begin_pass().unwrap();
        let a = vertex(&mut pass, 0.0);
        let b = vertex(&mut pass, 1.0);
        let samples = vec![Texel::new(0.1, 0.0, 0.0, 0.0), Texel::new(0.2, 0.0, 0.0, 0.0)];
        let e = MakeEdge::new(b, a, samples).execute(&mut pass).unwrap();
        pass.commit();

        let edge = store.edge(e).unwrap();
        assert_eq!(edge.vertices(), [b, a]);
        assert_eq!(edge.sample_count(), 2);
        assert_eq!(store.texel(EntityRef::Edge(e), 1).unwrap().x, 0.2);
        assert!(store.texel(EntityRef::Edge(e), 2).is_err());
        assert_eq!(store.vertex(a).unwrap().incident_edges(), &[e]);
        assert_eq!(store.vertex(b).unwrap().incident_edges(), &[e]);
    }

    #[test]
    fn loop_edge_is_rejected() {
        let mut store = MeshStore::new();
        let mut pass = store.begin_pass().unwrap();
        let a = vertex(&mut pass, 0.0);
        let err = MakeEdge::new(a, a, vec![]).execute(&mut pass).unwrap_err();
        assert!(matches!(err, TexelMeshError::Topology(TopologyError::DegenerateEdge)));
        assert!(pass.store().raw_vertex(a).unwrap().incident_edges().is_empty());
    }

    #[test]
    fn missing_endpoint_is_rejected() {
        let mut store = MeshStore::new();
        let mut pass = store.begin_pass().unwrap();
        let a = vertex(&mut pass, 0.0);
        let b = vertex(&mut pass, 1.0);
        pass.commit();

        let mut pass = store.begin_pass().unwrap();
        pass.remove(EntityRef::Vertex(b)).unwrap();
        pass.commit();

        let mut pass = store.begin_pass().unwrap();
        let err = MakeEdge::new(a, b, vec![]).execute(&mut pass).unwrap_err();
        assert!(matches!(
            err,
            TexelMeshError::Topology(TopologyError::EntityNotFound(_))
        ));
    }
}
