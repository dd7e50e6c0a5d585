use crate::error::{InterpolationError, Result};
use crate::math::{lerp_point, try_normalize};
use crate::topology::{Edge, Entity, MeshStore, OrientedEdge, Quad, Triangle, Vertex};

use super::{blend_samples, FaceLattice, InterpolationProvider, SurfaceSample};

/// Provider that places samples on the flat lattice spanned by the mesh
/// vertices: linearly along edges, barycentric on triangles and bilinear on
/// quads.
///
/// Reproduces vertex positions and normals exactly. Useful when no richer
/// reconstruction context is available, and as a reference for custom providers.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatticeInterpolator;

impl LatticeInterpolator {
    fn vertex_data(vertex: &Vertex) -> SurfaceSample {
        SurfaceSample {
            position: vertex.position,
            normal: vertex.normal,
        }
    }

    fn face_sample(
        store: &MeshStore,
        edges: &[OrientedEdge],
        face_samples: usize,
        local: usize,
    ) -> Result<SurfaceSample> {
        let mut corners = Vec::with_capacity(edges.len());
        let mut counts = Vec::with_capacity(edges.len());
        for oe in edges {
            let edge = store.edge(oe.edge)?;
            let (from, _) = oe.endpoints(edge);
            corners.push(Self::vertex_data(store.vertex(from)?));
            counts.push(edge.sample_count());
        }
        let weights = FaceLattice::from_sample_counts(&counts, face_samples)?
            .interior_corner_weights(local)?;
        Ok(blend_samples(corners.into_iter().zip(weights))?)
    }
}

impl InterpolationProvider for LatticeInterpolator {
    fn vertex_sample(&self, _store: &MeshStore, vertex: &Vertex, _local: usize) -> Result<SurfaceSample> {
        Ok(Self::vertex_data(vertex))
    }

    #[allow(clippy::cast_precision_loss)]
    fn edge_sample(&self, store: &MeshStore, edge: &Edge, local: usize) -> Result<SurfaceSample> {
        let a = store.vertex(edge.start())?;
        let b = store.vertex(edge.end())?;
        let t = (local + 1) as f64 / (edge.sample_count() + 1) as f64;
        let normal = try_normalize(&(a.normal * (1.0 - t) + b.normal * t))
            .ok_or(InterpolationError::DegenerateNormal)?;
        Ok(SurfaceSample {
            position: lerp_point(&a.position, &b.position, t),
            normal,
        })
    }

    fn triangle_sample(
        &self,
        store: &MeshStore,
        triangle: &Triangle,
        local: usize,
    ) -> Result<SurfaceSample> {
        Self::face_sample(store, triangle.edges(), triangle.sample_count(), local)
    }

    fn quad_sample(&self, store: &MeshStore, quad: &Quad, local: usize) -> Result<SurfaceSample> {
        Self::face_sample(store, quad.edges(), quad.sample_count(), local)
    }
}
