use crate::error::{Result, TopologyError};
use crate::interpolation::FaceLattice;
use crate::math::Texel;
use crate::pass::ExtractionPass;
use crate::topology::face::walk_boundary;
use crate::topology::{Entity, EntityRef, MeshStore, OrientedEdge, Quad, QuadId, Triangle, TriangleId};

/// Checks that `edges` form a closed walk, that `face_samples` fills the
/// lattice spanned by the edges, and that no edge exceeds the face limit.
fn check_face(store: &MeshStore, edges: &[OrientedEdge], face_samples: usize) -> Result<()> {
    walk_boundary(edges, |oe| store.raw_edge(oe.edge).map(|e| oe.endpoints(e)))?;

    let counts = edges
        .iter()
        .map(|oe| store.raw_edge(oe.edge).map(Entity::sample_count))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    FaceLattice::from_sample_counts(&counts, face_samples)?;

    if let Some(limit) = store.config().manifold_policy.face_limit() {
        for oe in edges {
            let incident = store.raw_edge(oe.edge)?.face_count();
            if incident >= limit {
                return Err(TopologyError::NonManifold { incident, limit }.into());
            }
        }
    }
    Ok(())
}

/// Creates a triangle from three oriented edges.
///
/// `texels` are the face-owned lattice samples; a triangle whose edges carry
/// `n` interior samples each owns `n * (n - 1) / 2` of them.
pub struct MakeTriangle {
    edges: [OrientedEdge; 3],
    texels: Vec<Texel>,
}

impl MakeTriangle {
    /// Creates a new `MakeTriangle` operation.
    #[must_use]
    pub fn new(edges: [OrientedEdge; 3], texels: Vec<Texel>) -> Self {
        Self { edges, texels }
    }

    /// Executes the operation, registering the triangle with its edges.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::MalformedOrientation`] if the edges do not form
    /// a closed walk, [`TexelError::LayoutMismatch`](crate::error::TexelError::LayoutMismatch)
    /// if the sample counts disagree, or [`TopologyError::NonManifold`] if an
    /// edge is already at the configured face limit.
    pub fn execute(&self, pass: &mut ExtractionPass<'_>) -> Result<TriangleId> {
        let result = self.insert(pass);
        pass.reject("triangle", result)
    }

    fn insert(&self, pass: &mut ExtractionPass<'_>) -> Result<TriangleId> {
        check_face(pass.store(), &self.edges, self.texels.len())?;
        let span = pass.append_texels(&self.texels);
        let id = pass
            .store_mut()
            .insert_triangle(Triangle::new(self.edges, span));
        pass.adopt(EntityRef::Triangle(id))?;
        pass.touch(EntityRef::Triangle(id))?;
        Ok(id)
    }
}

/// Creates a quad from four oriented edges.
///
/// Opposite edges must carry the same number of samples; with `nu` samples
/// on edges 0 and 2 and `nv` on edges 1 and 3 the quad owns `nu * nv`.
pub struct MakeQuad {
    edges: [OrientedEdge; 4],
    texels: Vec<Texel>,
}

impl MakeQuad {
    /// Creates a new `MakeQuad` operation.
    #[must_use]
    pub fn new(edges: [OrientedEdge; 4], texels: Vec<Texel>) -> Self {
        Self { edges, texels }
    }

    /// Executes the operation, registering the quad with its edges.
    ///
    /// # Errors
    ///
    /// Same conditions as [`MakeTriangle::execute`].
    pub fn execute(&self, pass: &mut ExtractionPass<'_>) -> Result<QuadId> {
        let result = self.insert(pass);
        pass.reject("quad", result)
    }

    fn insert(&self, pass: &mut ExtractionPass<'_>) -> Result<QuadId> {
        check_face(pass.store(), &self.edges, self.texels.len())?;
        let span = pass.append_texels(&self.texels);
        let id = pass.store_mut().insert_quad(Quad::new(self.edges, span));
        pass.adopt(EntityRef::Quad(id))?;
        pass.touch(EntityRef::Quad(id))?;
        Ok(id)
    }
}
