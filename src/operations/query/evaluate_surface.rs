use crate::error::Result;
use crate::interpolation::{blend_samples, InterpolationProvider};
use crate::math::{Point3, Texel, Vector3};
use crate::topology::{FaceRef, MeshStore};

use super::FaceInterpolation;

/// Continuous surface attributes at a point of a face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceEvaluation {
    pub position: Point3,
    /// Unit normal.
    pub normal: Vector3,
    /// Blended color (`xyz`) and displacement (`w`).
    pub texel: Texel,
}

impl SurfaceEvaluation {
    /// Position offset along the normal by the blended displacement.
    #[must_use]
    pub fn displaced_position(&self) -> Point3 {
        self.position + self.normal * self.texel.w
    }
}

/// Evaluates position, normal and texel at parametric coordinates of a face.
///
/// Uses the same texel weights as [`FaceInterpolation`]; positions and
/// normals of the individual texels come from the provider.
pub struct EvaluateSurface {
    face: FaceRef,
    u: f64,
    v: f64,
}

impl EvaluateSurface {
    /// Creates a new `EvaluateSurface` query.
    #[must_use]
    pub fn new(face: impl Into<FaceRef>, u: f64, v: f64) -> Self {
        Self {
            face: face.into(),
            u,
            v,
        }
    }

    /// Executes the query against `provider`.
    ///
    /// # Errors
    ///
    /// Returns an error if the face interpolation fails, the provider fails
    /// for one of the contributing texels, or the blended normal vanishes.
    pub fn execute<P>(&self, store: &MeshStore, provider: &P) -> Result<SurfaceEvaluation>
    where
        P: InterpolationProvider + ?Sized,
    {
        let infos = FaceInterpolation::new(self.face, self.u, self.v).execute(store)?;
        let samples = infos
            .iter()
            .map(|info| {
                let sample = store.interpolate(info.entity, info.local_texel, provider)?;
                Ok((sample, info.weight))
            })
            .collect::<Result<Vec<_>>>()?;
        let surface = blend_samples(samples)?;
        Ok(SurfaceEvaluation {
            position: surface.position,
            normal: surface.normal,
            texel: store.blend_texels(&infos)?,
        })
    }
}
