//! Continuous evaluation of the mesh from its discrete per-entity samples.
//!
//! Geometry is delegated to an [`InterpolationProvider`], which has one
//! evaluation per entity kind. Face-level blending of texels is done by the
//! [`FaceInterpolation`](crate::operations::query::FaceInterpolation) query
//! and only ever reaches a face's own edges and vertices.

pub mod lattice;
mod linear;

pub use lattice::{FaceLattice, LatticeNode, QuadLattice, TriangleLattice};
pub use linear::LatticeInterpolator;

use crate::error::{InterpolationError, Result};
use crate::math::{Point3, Texel, Vector3, WEIGHT_TOLERANCE};
use crate::topology::{Edge, EntityRef, MeshStore, Quad, Triangle, Vertex};

/// Position and unit normal at a point of the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub position: Point3,
    pub normal: Vector3,
}

impl SurfaceSample {
    /// Position offset along the normal by a texel's displacement channel.
    #[must_use]
    pub fn displaced(&self, displacement: f64) -> Point3 {
        self.position + self.normal * displacement
    }
}

/// One weighted texel contributing to a blended surface attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceInterpolationInfo {
    /// The entity whose texel is used.
    pub entity: EntityRef,
    /// The local index of the texel within the entity.
    pub local_texel: usize,
    /// The weight of this texel for the interpolation.
    pub weight: f64,
}

/// Source of positions and normals for individual texels.
///
/// Implementations usually consult the reconstruction context the mesh was
/// extracted from. Evaluation must not depend on anything but `store` and
/// the provider's own state.
pub trait InterpolationProvider {
    /// Evaluates the single texel of a vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample cannot be evaluated.
    fn vertex_sample(&self, store: &MeshStore, vertex: &Vertex, local: usize) -> Result<SurfaceSample>;

    /// Evaluates interior texel `local` of an edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample cannot be evaluated.
    fn edge_sample(&self, store: &MeshStore, edge: &Edge, local: usize) -> Result<SurfaceSample>;

    /// Evaluates interior texel `local` of a triangle.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample cannot be evaluated.
    fn triangle_sample(
        &self,
        store: &MeshStore,
        triangle: &Triangle,
        local: usize,
    ) -> Result<SurfaceSample>;

    /// Evaluates interior texel `local` of a quad.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample cannot be evaluated.
    fn quad_sample(&self, store: &MeshStore, quad: &Quad, local: usize) -> Result<SurfaceSample>;
}

impl MeshStore {
    /// Evaluates position and normal of texel `local` of `entity`.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not visible, `local` is out of range,
    /// or the provider fails.
    pub fn interpolate<P>(&self, entity: EntityRef, local: usize, provider: &P) -> Result<SurfaceSample>
    where
        P: InterpolationProvider + ?Sized,
    {
        self.texel_span(entity)?.global_index(local)?;
        match entity {
            EntityRef::Vertex(id) => provider.vertex_sample(self, self.vertex(id)?, local),
            EntityRef::Edge(id) => provider.edge_sample(self, self.edge(id)?, local),
            EntityRef::Triangle(id) => provider.triangle_sample(self, self.triangle(id)?, local),
            EntityRef::Quad(id) => provider.quad_sample(self, self.quad(id)?, local),
        }
    }

    /// Blends the texels referenced by `infos`.
    ///
    /// # Errors
    ///
    /// Returns an error if the weights do not sum to one or a texel is not
    /// accessible.
    pub fn blend_texels(&self, infos: &[FaceInterpolationInfo]) -> Result<Texel> {
        check_weight_sum(infos)?;
        infos.iter().try_fold(Texel::zeros(), |acc, info| {
            Ok(acc + self.texel(info.entity, info.local_texel)? * info.weight)
        })
    }
}

/// Checks the partition-of-unity invariant of an interpolation query.
///
/// # Errors
///
/// Returns [`InterpolationError::WeightSum`] if the weights do not sum to one.
pub fn check_weight_sum(infos: &[FaceInterpolationInfo]) -> std::result::Result<(), InterpolationError> {
    let sum: f64 = infos.iter().map(|i| i.weight).sum();
    if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(InterpolationError::WeightSum(sum));
    }
    Ok(())
}

/// Weighted average of samples, with the normal renormalized.
///
/// # Errors
///
/// Returns [`InterpolationError::DegenerateNormal`] if the blended normal vanishes.
pub fn blend_samples<I>(samples: I) -> std::result::Result<SurfaceSample, InterpolationError>
where
    I: IntoIterator<Item = (SurfaceSample, f64)>,
{
    let mut position = Vector3::zeros();
    let mut normal = Vector3::zeros();
    for (sample, weight) in samples {
        position += sample.position.coords * weight;
        normal += sample.normal * weight;
    }
    let normal = crate::math::try_normalize(&normal).ok_or(InterpolationError::DegenerateNormal)?;
    Ok(SurfaceSample {
        position: Point3::from(position),
        normal,
    })
}
