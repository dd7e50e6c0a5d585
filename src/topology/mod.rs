pub mod edge;
pub mod entity;
pub mod face;
pub mod vertex;

pub use edge::{Edge, EdgeId};
pub use entity::{Entity, EntityHeader, EntityRef};
pub use face::{Face, FaceRef, OrientedEdge, Quad, QuadId, Triangle, TriangleId};
pub use vertex::{Vertex, VertexId};

use slotmap::SlotMap;
use tracing::trace;

use crate::config::MeshConfig;
use crate::error::{Result, TopologyError};
use crate::generation::Generation;
use crate::math::Texel;
use crate::texel::{TexelBuffer, TexelSpan};

/// Per-kind entity counts and texel buffer size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshStats {
    pub vertices: usize,
    pub edges: usize,
    pub triangles: usize,
    pub quads: usize,
    pub texels: usize,
}

/// Number of entities removed by one removal request, cascades included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovalCount {
    pub vertices: usize,
    pub edges: usize,
    pub triangles: usize,
    pub quads: usize,
}

impl RemovalCount {
    /// Total number of removed entities.
    #[must_use]
    pub fn total(&self) -> usize {
        self.vertices + self.edges + self.triangles + self.quads
    }

    pub(crate) fn add(&mut self, other: RemovalCount) {
        self.vertices += other.vertices;
        self.edges += other.edges;
        self.triangles += other.triangles;
        self.quads += other.quads;
    }
}

/// Central arena that owns all mesh entities and their texels.
///
/// Entities reference each other via typed IDs (generational indices), so a
/// removed entity's key can never alias a later insertion.
///
/// Readers go through the visibility-checked accessors ([`MeshStore::vertex`]
/// and friends), which only expose entities from committed generations inside
/// the retention window. Writers mutate the store through an
/// [`ExtractionPass`](crate::pass::ExtractionPass).
#[derive(Debug, Default)]
pub struct MeshStore {
    config: MeshConfig,
    vertices: SlotMap<VertexId, Vertex>,
    edges: SlotMap<EdgeId, Edge>,
    triangles: SlotMap<TriangleId, Triangle>,
    quads: SlotMap<QuadId, Quad>,
    texels: TexelBuffer,
    committed: Option<Generation>,
}

impl MeshStore {
    /// Creates a new, empty mesh store with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty mesh store with the given configuration.
    #[must_use]
    pub fn with_config(config: MeshConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &MeshConfig {
        &self.config
    }

    /// The last fully committed extraction pass, if any.
    #[must_use]
    pub fn committed(&self) -> Option<Generation> {
        self.committed
    }

    /// The append-only texel buffer.
    #[must_use]
    pub fn texel_buffer(&self) -> &TexelBuffer {
        &self.texels
    }

    /// Counts of stored entities, visible or not.
    #[must_use]
    pub fn stats(&self) -> MeshStats {
        MeshStats {
            vertices: self.vertices.len(),
            edges: self.edges.len(),
            triangles: self.triangles.len(),
            quads: self.quads.len(),
            texels: self.texels.len(),
        }
    }

    fn visible<'a, E: Entity>(&self, entity: Option<&'a E>, kind: &str) -> Result<&'a E> {
        let entity = entity.ok_or_else(|| TopologyError::EntityNotFound(kind.into()))?;
        entity
            .header()
            .generation
            .check_visible(self.committed, self.config.retention_window)?;
        Ok(entity)
    }

    fn is_visible<E: Entity>(&self, entity: &E) -> bool {
        entity
            .header()
            .generation
            .check_visible(self.committed, self.config.retention_window)
            .is_ok()
    }

    // --- Reader access ---

    /// Returns a committed, non-stale vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is not found, not yet committed, or stale.
    pub fn vertex(&self, id: VertexId) -> Result<&Vertex> {
        self.visible(self.vertices.get(id), "vertex")
    }

    /// Returns a committed, non-stale edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not found, not yet committed, or stale.
    pub fn edge(&self, id: EdgeId) -> Result<&Edge> {
        self.visible(self.edges.get(id), "edge")
    }

    /// Returns a committed, non-stale triangle.
    ///
    /// # Errors
    ///
    /// Returns an error if the triangle is not found, not yet committed, or stale.
    pub fn triangle(&self, id: TriangleId) -> Result<&Triangle> {
        self.visible(self.triangles.get(id), "triangle")
    }

    /// Returns a committed, non-stale quad.
    ///
    /// # Errors
    ///
    /// Returns an error if the quad is not found, not yet committed, or stale.
    pub fn quad(&self, id: QuadId) -> Result<&Quad> {
        self.visible(self.quads.get(id), "quad")
    }

    /// Returns the texel span of any visible entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not visible.
    pub fn texel_span(&self, entity: EntityRef) -> Result<TexelSpan> {
        Ok(match entity {
            EntityRef::Vertex(id) => self.vertex(id)?.texel_span(),
            EntityRef::Edge(id) => self.edge(id)?.texel_span(),
            EntityRef::Triangle(id) => self.triangle(id)?.texel_span(),
            EntityRef::Quad(id) => self.quad(id)?.texel_span(),
        })
    }

    /// Returns texel `local` of a visible entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not visible or `local` is not below
    /// its sample count.
    pub fn texel(&self, entity: EntityRef, local: usize) -> Result<&Texel> {
        let span = self.texel_span(entity)?;
        Ok(self.texels.get(span, local)?)
    }

    /// Visible vertices in stable slot order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices.iter().filter(move |(_, v)| self.is_visible(*v))
    }

    /// Visible edges in stable slot order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().filter(move |(_, e)| self.is_visible(*e))
    }

    /// Visible triangles in stable slot order.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleId, &Triangle)> {
        self.triangles.iter().filter(move |(_, t)| self.is_visible(*t))
    }

    /// Visible quads in stable slot order.
    pub fn quads(&self) -> impl Iterator<Item = (QuadId, &Quad)> {
        self.quads.iter().filter(move |(_, q)| self.is_visible(*q))
    }

    /// Returns an edge joining `a` and `b` in either direction.
    ///
    /// Sees entities regardless of commit state.
    #[must_use]
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        let vertex = self.vertices.get(a)?;
        vertex.incident_edges.iter().copied().find(|&id| {
            self.edges
                .get(id)
                .is_some_and(|e| e.opposite(a) == Some(b))
        })
    }

    // --- Writer access ---

    pub(crate) fn raw_vertex(&self, id: VertexId) -> std::result::Result<&Vertex, TopologyError> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    pub(crate) fn raw_edge(&self, id: EdgeId) -> std::result::Result<&Edge, TopologyError> {
        self.edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))
    }

    pub(crate) fn raw_header_mut(
        &mut self,
        entity: EntityRef,
    ) -> std::result::Result<&mut EntityHeader, TopologyError> {
        let header = match entity {
            EntityRef::Vertex(id) => self.vertices.get_mut(id).map(Entity::header_mut),
            EntityRef::Edge(id) => self.edges.get_mut(id).map(Entity::header_mut),
            EntityRef::Triangle(id) => self.triangles.get_mut(id).map(Entity::header_mut),
            EntityRef::Quad(id) => self.quads.get_mut(id).map(Entity::header_mut),
        };
        header.ok_or_else(|| TopologyError::EntityNotFound(entity.kind().into()))
    }

    /// `entity` followed by the edges and vertices it is built from.
    pub(crate) fn with_boundary(
        &self,
        entity: EntityRef,
    ) -> std::result::Result<Vec<EntityRef>, TopologyError> {
        let edges: Vec<EdgeId> = match entity {
            EntityRef::Vertex(id) => {
                self.raw_vertex(id)?;
                return Ok(vec![entity]);
            }
            EntityRef::Edge(id) => vec![id],
            EntityRef::Triangle(id) => self
                .triangles
                .get(id)
                .ok_or_else(|| TopologyError::EntityNotFound("triangle".into()))?
                .edges
                .iter()
                .map(|oe| oe.edge)
                .collect(),
            EntityRef::Quad(id) => self
                .quads
                .get(id)
                .ok_or_else(|| TopologyError::EntityNotFound("quad".into()))?
                .edges
                .iter()
                .map(|oe| oe.edge)
                .collect(),
        };

        let mut parts = vec![entity];
        for id in edges {
            let edge = self.raw_edge(id)?;
            let edge_ref = EntityRef::Edge(id);
            if !parts.contains(&edge_ref) {
                parts.push(edge_ref);
            }
            for v in edge.vertices {
                if !parts.contains(&EntityRef::Vertex(v)) {
                    parts.push(EntityRef::Vertex(v));
                }
            }
        }
        Ok(parts)
    }

    pub(crate) fn contains(&self, entity: EntityRef) -> bool {
        match entity {
            EntityRef::Vertex(id) => self.vertices.contains_key(id),
            EntityRef::Edge(id) => self.edges.contains_key(id),
            EntityRef::Triangle(id) => self.triangles.contains_key(id),
            EntityRef::Quad(id) => self.quads.contains_key(id),
        }
    }

    pub(crate) fn set_committed(&mut self, generation: Generation) {
        self.committed = Some(generation);
    }

    pub(crate) fn texels_mut(&mut self) -> &mut TexelBuffer {
        &mut self.texels
    }

    pub(crate) fn raw_vertices(&self) -> &SlotMap<VertexId, Vertex> {
        &self.vertices
    }

    pub(crate) fn raw_edges(&self) -> &SlotMap<EdgeId, Edge> {
        &self.edges
    }

    pub(crate) fn raw_triangles(&self) -> &SlotMap<TriangleId, Triangle> {
        &self.triangles
    }

    pub(crate) fn raw_quads(&self) -> &SlotMap<QuadId, Quad> {
        &self.quads
    }

    pub(crate) fn insert_vertex(&mut self, vertex: Vertex) -> VertexId {
        let id = self.vertices.insert(vertex);
        trace!(?id, "vertex inserted");
        id
    }

    /// Inserts an edge and registers it with both endpoints.
    pub(crate) fn insert_edge(&mut self, edge: Edge) -> EdgeId {
        let [a, b] = edge.vertices;
        let id = self.edges.insert(edge);
        for v in [a, b] {
            if let Some(vertex) = self.vertices.get_mut(v) {
                vertex.incident_edges.push(id);
            }
        }
        trace!(?id, "edge inserted");
        id
    }

    /// Inserts a triangle and registers it with its edges.
    pub(crate) fn insert_triangle(&mut self, triangle: Triangle) -> TriangleId {
        let edges = triangle.edges;
        let id = self.triangles.insert(triangle);
        for oe in edges {
            if let Some(edge) = self.edges.get_mut(oe.edge) {
                edge.incident_triangles.push(id);
            }
        }
        trace!(?id, "triangle inserted");
        id
    }

    /// Inserts a quad and registers it with its edges.
    pub(crate) fn insert_quad(&mut self, quad: Quad) -> QuadId {
        let edges = quad.edges;
        let id = self.quads.insert(quad);
        for oe in edges {
            if let Some(edge) = self.edges.get_mut(oe.edge) {
                edge.incident_quads.push(id);
            }
        }
        trace!(?id, "quad inserted");
        id
    }

    /// Removes an entity and everything that can no longer exist without it.
    ///
    /// Removing a vertex removes its edges; removing an edge removes the faces
    /// it bounds. Every incidence list that referenced a removed entity is
    /// updated. Missing entities are ignored.
    pub(crate) fn remove_cascading(&mut self, entity: EntityRef) -> RemovalCount {
        let mut count = RemovalCount::default();
        match entity {
            EntityRef::Vertex(id) => {
                let Some(vertex) = self.vertices.get(id) else {
                    return count;
                };
                for edge in vertex.incident_edges.clone() {
                    count.add(self.remove_cascading(EntityRef::Edge(edge)));
                }
                self.vertices.remove(id);
                count.vertices += 1;
            }
            EntityRef::Edge(id) => {
                let Some(edge) = self.edges.get(id) else {
                    return count;
                };
                let triangles = edge.incident_triangles.clone();
                let quads = edge.incident_quads.clone();
                for t in triangles {
                    count.add(self.remove_cascading(EntityRef::Triangle(t)));
                }
                for q in quads {
                    count.add(self.remove_cascading(EntityRef::Quad(q)));
                }
                if let Some(edge) = self.edges.remove(id) {
                    for v in edge.vertices {
                        if let Some(vertex) = self.vertices.get_mut(v) {
                            vertex.incident_edges.retain(|&e| e != id);
                        }
                    }
                    count.edges += 1;
                }
            }
            EntityRef::Triangle(id) => {
                if let Some(triangle) = self.triangles.remove(id) {
                    for oe in triangle.edges {
                        if let Some(edge) = self.edges.get_mut(oe.edge) {
                            edge.incident_triangles.retain(|&t| t != id);
                        }
                    }
                    count.triangles += 1;
                }
            }
            EntityRef::Quad(id) => {
                if let Some(quad) = self.quads.remove(id) {
                    for oe in quad.edges {
                        if let Some(edge) = self.edges.get_mut(oe.edge) {
                            edge.incident_quads.retain(|&q| q != id);
                        }
                    }
                    count.quads += 1;
                }
            }
        }
        if count.total() > 0 {
            trace!(?entity, removed = count.total(), "entity removed");
        }
        count
    }
}
