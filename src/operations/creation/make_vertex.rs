use crate::error::{Result, TopologyError};
use crate::math::{try_normalize, Point3, Texel, Vector3};
use crate::pass::ExtractionPass;
use crate::topology::{EntityRef, Vertex, VertexId};

/// Creates a vertex with its single texel.
pub struct MakeVertex {
    position: Point3,
    normal: Vector3,
    texel: Texel,
}

impl MakeVertex {
    /// Creates a new `MakeVertex` operation.
    #[must_use]
    pub fn new(position: Point3, normal: Vector3, texel: Texel) -> Self {
        Self {
            position,
            normal,
            texel,
        }
    }

    /// Executes the operation, stamping the vertex with the pass generation.
    ///
    /// The normal is stored normalized.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::ZeroNormal`] if the normal is zero-length.
    pub fn execute(&self, pass: &mut ExtractionPass<'_>) -> Result<VertexId> {
        let result = self.insert(pass);
        pass.reject("vertex", result)
    }

    fn insert(&self, pass: &mut ExtractionPass<'_>) -> Result<VertexId> {
        let normal = try_normalize(&self.normal).ok_or(TopologyError::ZeroNormal)?;
        let span = pass.append_texels(&[self.texel]);
        let id = pass
            .store_mut()
            .insert_vertex(Vertex::new(self.position, normal, span));
        pass.adopt(EntityRef::Vertex(id))?;
        Ok(id)
    }
}
