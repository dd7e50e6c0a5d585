use crate::error::Result;
use crate::interpolation::{check_weight_sum, FaceInterpolationInfo, FaceLattice};
use crate::math::TOLERANCE;
use crate::topology::{Entity, FaceRef, MeshStore};

use super::FaceBoundary;

/// Lists the texels, and their weights, that blend to a point of a face.
///
/// `(u, v)` are barycentric coordinates towards corners 1 and 2 on a
/// triangle and bilinear coordinates in the unit square on a quad. Corner
/// `i` is the vertex the boundary walk leaves through edge `i`.
pub struct FaceInterpolation {
    face: FaceRef,
    u: f64,
    v: f64,
}

impl FaceInterpolation {
    /// Creates a new `FaceInterpolation` query.
    #[must_use]
    pub fn new(face: impl Into<FaceRef>, u: f64, v: f64) -> Self {
        Self {
            face: face.into(),
            u,
            v,
        }
    }

    /// Executes the query.
    ///
    /// Only texels of the face, its edges and its corner vertices appear in
    /// the result. Zero-weight contributions are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or part of its boundary is not visible,
    /// the sample counts do not form a lattice, or `(u, v)` lies outside the
    /// face.
    pub fn execute(&self, store: &MeshStore) -> Result<Vec<FaceInterpolationInfo>> {
        let boundary = FaceBoundary::new(self.face).execute(store)?;
        let face_samples = match self.face {
            FaceRef::Triangle(id) => store.triangle(id)?.sample_count(),
            FaceRef::Quad(id) => store.quad(id)?.sample_count(),
        };
        let lattice = FaceLattice::for_boundary(&boundary, face_samples)?;

        let infos: Vec<FaceInterpolationInfo> = lattice
            .contributions(self.u, self.v)?
            .into_iter()
            .filter(|(_, weight)| weight.abs() > TOLERANCE)
            .map(|(node, weight)| {
                let (entity, local_texel) = node.texel_ref(&boundary);
                FaceInterpolationInfo {
                    entity,
                    local_texel,
                    weight,
                }
            })
            .collect();
        check_weight_sum(&infos)?;
        Ok(infos)
    }
}
