use crate::generation::{Generation, GenerationTag};
use crate::texel::TexelSpan;

use super::edge::EdgeId;
use super::face::{QuadId, TriangleId};
use super::vertex::VertexId;

/// Lifecycle data shared by every mesh entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityHeader {
    pub(crate) texels: TexelSpan,
    pub(crate) generation: GenerationTag,
}

impl EntityHeader {
    pub(crate) fn new(texels: TexelSpan) -> Self {
        Self {
            texels,
            generation: GenerationTag::default(),
        }
    }
}

/// Common contract of vertices, edges, triangles and quads.
pub trait Entity {
    /// Returns the lifecycle header.
    fn header(&self) -> &EntityHeader;

    /// Returns the mutable lifecycle header.
    fn header_mut(&mut self) -> &mut EntityHeader;

    /// Location of this entity's samples in the mesh texel buffer.
    fn texel_span(&self) -> TexelSpan {
        self.header().texels
    }

    /// Number of samples this entity owns.
    fn sample_count(&self) -> usize {
        self.header().texels.count()
    }

    /// The extraction pass that created or last touched this entity.
    fn generation(&self) -> Option<Generation> {
        self.header().generation.get()
    }
}

/// Typed, non-owning reference to any mesh entity.
///
/// The set of kinds is closed: geometry of dimension 0 to 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Vertex(VertexId),
    Edge(EdgeId),
    Triangle(TriangleId),
    Quad(QuadId),
}

impl EntityRef {
    /// Human-readable kind name used in error messages.
    #[must_use]
    pub fn kind(self) -> &'static str {
        match self {
            Self::Vertex(_) => "vertex",
            Self::Edge(_) => "edge",
            Self::Triangle(_) => "triangle",
            Self::Quad(_) => "quad",
        }
    }
}

impl From<VertexId> for EntityRef {
    fn from(id: VertexId) -> Self {
        Self::Vertex(id)
    }
}

impl From<EdgeId> for EntityRef {
    fn from(id: EdgeId) -> Self {
        Self::Edge(id)
    }
}

impl From<TriangleId> for EntityRef {
    fn from(id: TriangleId) -> Self {
        Self::Triangle(id)
    }
}

impl From<QuadId> for EntityRef {
    fn from(id: QuadId) -> Self {
        Self::Quad(id)
    }
}
