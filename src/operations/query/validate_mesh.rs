use tracing::debug;

use crate::interpolation::FaceLattice;
use crate::topology::face::walk_boundary;
use crate::topology::{EdgeId, Entity, EntityRef, FaceRef, MeshStore, OrientedEdge};

/// A single broken structural invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshIssue {
    /// An edge whose endpoints coincide.
    DegenerateEdge(EdgeId),
    /// `from` references `to`, which no longer exists.
    DanglingReference { from: EntityRef, to: EntityRef },
    /// `from` references `to` but `to` does not reference `from` back.
    MissingBackReference { from: EntityRef, to: EntityRef },
    /// A face whose oriented edges do not walk a closed loop of distinct vertices.
    OpenBoundary(FaceRef),
    /// A vertex with other than one texel, or a face whose sample count does
    /// not match its edges.
    TexelLayout(EntityRef),
    /// A texel span reaching past the end of the buffer.
    SpanOutOfBuffer(EntityRef),
    /// An entity that no pass has stamped.
    Unstamped(EntityRef),
    /// A reader-visible entity depending on an entity readers cannot see.
    HiddenDependency { from: EntityRef, to: EntityRef },
    /// An edge with more faces than the manifold policy allows.
    NonManifold {
        edge: EdgeId,
        incident: usize,
        limit: usize,
    },
}

/// Outcome of [`ValidateMesh`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<MeshIssue>,
}

impl ValidationReport {
    /// Returns `true` if no invariant is broken.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Broken invariants in discovery order.
    #[must_use]
    pub fn issues(&self) -> &[MeshIssue] {
        &self.issues
    }
}

/// Re-checks the structural invariants of every stored entity.
///
/// Covers edge endpoints, the two-way consistency of incidence lists, face
/// walks, texel layout and spans, generation stamps and the manifold limit.
#[derive(Debug, Default)]
pub struct ValidateMesh;

impl ValidateMesh {
    /// Creates a new `ValidateMesh` query.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the validation.
    #[must_use]
    pub fn execute(&self, store: &MeshStore) -> ValidationReport {
        let mut issues = Vec::new();
        check_vertices(store, &mut issues);
        check_edges(store, &mut issues);
        for (id, triangle) in store.raw_triangles() {
            check_face(store, FaceRef::Triangle(id), triangle, triangle.edges(), &mut issues);
        }
        for (id, quad) in store.raw_quads() {
            check_face(store, FaceRef::Quad(id), quad, quad.edges(), &mut issues);
        }
        debug!(issues = issues.len(), "mesh validated");
        ValidationReport { issues }
    }
}

fn visible(store: &MeshStore, entity: EntityRef) -> bool {
    store.texel_span(entity).is_ok()
}

fn check_entity<E: Entity>(
    store: &MeshStore,
    entity: EntityRef,
    data: &E,
    issues: &mut Vec<MeshIssue>,
) {
    if data.header().generation.is_unset() {
        issues.push(MeshIssue::Unstamped(entity));
    }
    if store.texel_buffer().samples(data.texel_span()).is_err() {
        issues.push(MeshIssue::SpanOutOfBuffer(entity));
    }
}

fn check_dependency(
    store: &MeshStore,
    from: EntityRef,
    to: EntityRef,
    issues: &mut Vec<MeshIssue>,
) -> bool {
    if !store.contains(to) {
        issues.push(MeshIssue::DanglingReference { from, to });
        return false;
    }
    if visible(store, from) && !visible(store, to) {
        issues.push(MeshIssue::HiddenDependency { from, to });
    }
    true
}

fn check_vertices(store: &MeshStore, issues: &mut Vec<MeshIssue>) {
    for (id, vertex) in store.raw_vertices() {
        let entity = EntityRef::Vertex(id);
        check_entity(store, entity, vertex, issues);
        if vertex.sample_count() != 1 {
            issues.push(MeshIssue::TexelLayout(entity));
        }
        for &edge_id in vertex.incident_edges() {
            let edge = EntityRef::Edge(edge_id);
            match store.raw_edge(edge_id) {
                Ok(edge_data) if edge_data.opposite(id).is_some() => {}
                Ok(_) => issues.push(MeshIssue::MissingBackReference {
                    from: entity,
                    to: edge,
                }),
                Err(_) => issues.push(MeshIssue::DanglingReference {
                    from: entity,
                    to: edge,
                }),
            }
        }
    }
}

fn check_edges(store: &MeshStore, issues: &mut Vec<MeshIssue>) {
    let limit = store.config().manifold_policy.face_limit();
    for (id, edge) in store.raw_edges() {
        let entity = EntityRef::Edge(id);
        check_entity(store, entity, edge, issues);
        if edge.start() == edge.end() {
            issues.push(MeshIssue::DegenerateEdge(id));
        }
        for v in edge.vertices() {
            if check_dependency(store, entity, EntityRef::Vertex(v), issues)
                && !store
                    .raw_vertices()
                    .get(v)
                    .is_some_and(|vertex| vertex.incident_edges().contains(&id))
            {
                issues.push(MeshIssue::MissingBackReference {
                    from: entity,
                    to: EntityRef::Vertex(v),
                });
            }
        }

        let faces = edge
            .incident_triangles()
            .iter()
            .map(|&t| (FaceRef::Triangle(t), store.raw_triangles().get(t).map(|f| f.contains_edge(id))))
            .chain(
                edge.incident_quads()
                    .iter()
                    .map(|&q| (FaceRef::Quad(q), store.raw_quads().get(q).map(|f| f.contains_edge(id)))),
            );
        for (face, bounded) in faces {
            match bounded {
                Some(true) => {}
                Some(false) => issues.push(MeshIssue::MissingBackReference {
                    from: entity,
                    to: face.into(),
                }),
                None => issues.push(MeshIssue::DanglingReference {
                    from: entity,
                    to: face.into(),
                }),
            }
        }

        if let Some(limit) = limit {
            if edge.face_count() > limit {
                issues.push(MeshIssue::NonManifold {
                    edge: id,
                    incident: edge.face_count(),
                    limit,
                });
            }
        }
    }
}

fn check_face<E: Entity>(
    store: &MeshStore,
    face: FaceRef,
    data: &E,
    edges: &[OrientedEdge],
    issues: &mut Vec<MeshIssue>,
) {
    let entity = EntityRef::from(face);
    check_entity(store, entity, data, issues);

    let mut complete = true;
    for oe in edges {
        let edge = EntityRef::Edge(oe.edge);
        if !check_dependency(store, entity, edge, issues) {
            complete = false;
            continue;
        }
        let registered = store.raw_edge(oe.edge).is_ok_and(|e| match face {
            FaceRef::Triangle(t) => e.incident_triangles().contains(&t),
            FaceRef::Quad(q) => e.incident_quads().contains(&q),
        });
        if !registered {
            issues.push(MeshIssue::MissingBackReference {
                from: entity,
                to: edge,
            });
        }
    }
    if !complete {
        return;
    }

    if walk_boundary(edges, |oe| store.raw_edge(oe.edge).map(|e| oe.endpoints(e))).is_err() {
        issues.push(MeshIssue::OpenBoundary(face));
    }
    let counts: Vec<usize> = edges
        .iter()
        .filter_map(|oe| store.raw_edge(oe.edge).ok())
        .map(Entity::sample_count)
        .collect();
    if FaceLattice::from_sample_counts(&counts, data.sample_count()).is_err() {
        issues.push(MeshIssue::TexelLayout(entity));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::MeshConfig;
    use crate::math::{Point3, Texel, Vector3};
    use crate::operations::creation::{MakeEdge, MakeQuad, MakeTriangle, MakeVertex};
    use crate::topology::{QuadId, TriangleId, VertexId};

    fn build(store: &mut MeshStore) -> (Vec<VertexId>, TriangleId, QuadId) {
        let mut pass = store.begin_pass().unwrap();
        let v: Vec<VertexId> = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (2.0, 0.5)]
            .iter()
            .map(|&(x, y)| {
                MakeVertex::new(Point3::new(x, y, 0.0), Vector3::z(), Texel::zeros())
                    .execute(&mut pass)
                    .unwrap()
            })
            .collect();
        let e = |pass: &mut crate::pass::ExtractionPass<'_>, a: usize, b: usize| {
            MakeEdge::new(v[a], v[b], vec![Texel::zeros()])
                .execute(pass)
                .unwrap()
        };
        let e01 = e(&mut pass, 0, 1);
        let e12 = e(&mut pass, 1, 2);
        let e32 = e(&mut pass, 3, 2);
        let e03 = e(&mut pass, 0, 3);
        let e14 = e(&mut pass, 1, 4);
        let e42 = e(&mut pass, 4, 2);
        let q = MakeQuad::new(
            [
                OrientedEdge::forward(e01),
                OrientedEdge::forward(e12),
                OrientedEdge::reversed(e32),
                OrientedEdge::reversed(e03),
            ],
            vec![Texel::zeros()],
        )
        .execute(&mut pass)
        .unwrap();
        let t = MakeTriangle::new(
            [
                OrientedEdge::forward(e14),
                OrientedEdge::forward(e42),
                OrientedEdge::reversed(e12),
            ],
            vec![],
        )
        .execute(&mut pass)
        .unwrap();
        pass.commit();
        (v, t, q)
    }

    #[test]
    fn freshly_built_mesh_is_valid() {
        let mut store = MeshStore::new();
        build(&mut store);
        let report = ValidateMesh::new().execute(&store);
        assert!(report.is_valid(), "{:?}", report.issues());
    }

    #[test]
    fn cascading_removal_keeps_mesh_valid() {
        let mut store = MeshStore::new();
        let (v, t, q) = build(&mut store);
        let mut pass = store.begin_pass().unwrap();
        pass.remove(EntityRef::Vertex(v[4])).unwrap();
        pass.commit();

        assert!(store.triangle(t).is_err());
        assert!(store.quad(q).is_ok());
        let report = ValidateMesh::new().execute(&store);
        assert!(report.is_valid(), "{:?}", report.issues());
    }

    fn hidden_dependencies(store: &MeshStore) -> Vec<MeshIssue> {
        ValidateMesh::new()
            .execute(store)
            .issues()
            .iter()
            .filter(|i| matches!(i, MeshIssue::HiddenDependency { .. }))
            .cloned()
            .collect()
    }

    #[test]
    fn revisited_face_keeps_its_boundary_visible() {
        let mut store = MeshStore::with_config(MeshConfig::default().with_retention_window(0));
        let (v, t, q) = build(&mut store);
        let mut pass = store.begin_pass().unwrap();
        pass.touch(EntityRef::Triangle(t)).unwrap();
        pass.commit();

        assert!(store.triangle(t).is_ok());
        assert!(store.quad(q).is_err());
        assert!(hidden_dependencies(&store).is_empty());

        let mut pass = store.begin_pass().unwrap();
        let e = MakeEdge::new(v[0], v[4], vec![]).execute(&mut pass).unwrap();
        pass.commit();

        assert!(store.edge(e).is_ok());
        assert!(store.vertex(v[0]).is_ok());
        assert!(hidden_dependencies(&store).is_empty());
    }
}
