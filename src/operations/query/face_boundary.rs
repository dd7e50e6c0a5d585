use crate::error::Result;
use crate::topology::{Entity, FaceRef, MeshStore, OrientedEdge, VertexId};

/// One side of a face boundary with its endpoints resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundarySide {
    /// The oriented edge reference stored on the face.
    pub edge: OrientedEdge,
    /// Vertex the walk leaves through this side.
    pub from: VertexId,
    /// Vertex the walk arrives at.
    pub to: VertexId,
    /// Interior samples carried by the edge.
    pub samples: usize,
}

/// A face boundary walked in edge order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    /// The face that was walked.
    pub face: FaceRef,
    /// Sides in walk order; `sides[i].to == sides[i + 1].from`.
    pub sides: Vec<BoundarySide>,
}

impl Boundary {
    /// Corner vertices in walk order.
    #[must_use]
    pub fn corners(&self) -> Vec<VertexId> {
        self.sides.iter().map(|s| s.from).collect()
    }
}

/// Enumerates the bounding edges of a face with resolved orientation.
pub struct FaceBoundary {
    face: FaceRef,
}

impl FaceBoundary {
    /// Creates a new `FaceBoundary` query.
    #[must_use]
    pub fn new(face: impl Into<FaceRef>) -> Self {
        Self { face: face.into() }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or one of its edges is not visible.
    pub fn execute(&self, store: &MeshStore) -> Result<Boundary> {
        let edges: &[OrientedEdge] = match self.face {
            FaceRef::Triangle(id) => store.triangle(id)?.edges().as_slice(),
            FaceRef::Quad(id) => store.quad(id)?.edges().as_slice(),
        };
        let sides = edges
            .iter()
            .map(|&oe| {
                let edge = store.edge(oe.edge)?;
                let (from, to) = oe.endpoints(edge);
                Ok(BoundarySide {
                    edge: oe,
                    from,
                    to,
                    samples: edge.sample_count(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Boundary {
            face: self.face,
            sides,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Point3, Texel, Vector3};
    use crate::operations::creation::{MakeEdge, MakeTriangle, MakeVertex};

    #[test]
    fn triangle_walk_with_reversed_edge() {
        let mut store = MeshStore::new();
        let mut pass = store.begin_pass().unwrap();
        let v: Vec<VertexId> = (0..3_u32)
            .map(|i| {
                MakeVertex::new(Point3::new(f64::from(i), 0.0, 0.0), Vector3::z(), Texel::zeros())
                    .execute(&mut pass)
                    .unwrap()
            })
            .collect();
        let e0 = MakeEdge::new(v[0], v[1], vec![]).execute(&mut pass).unwrap();
        let e1 = MakeEdge::new(v[1], v[2], vec![]).execute(&mut pass).unwrap();
        let e2 = MakeEdge::new(v[0], v[2], vec![]).execute(&mut pass).unwrap();
        let tri = MakeTriangle::new(
            [
                OrientedEdge::forward(e0),
                OrientedEdge::forward(e1),
                OrientedEdge::reversed(e2),
            ],
            vec![],
        )
        .execute(&mut pass)
        .unwrap();
        pass.commit();

        let boundary = FaceBoundary::new(tri).execute(&store).unwrap();
        assert_eq!(boundary.corners(), v);
        let walk: Vec<(VertexId, VertexId)> =
            boundary.sides.iter().map(|s| (s.from, s.to)).collect();
        assert_eq!(walk, vec![(v[0], v[1]), (v[1], v[2]), (v[2], v[0])]);
    }
}
