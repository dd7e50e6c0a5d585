#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use tracing_subscriber::EnvFilter;

use texelmesh::math::{Point3, Texel, Vector3};
use texelmesh::operations::creation::{MakeEdge, MakeQuad, MakeTriangle, MakeVertex};
use texelmesh::operations::modification::CollectGarbage;
use texelmesh::operations::query::{EvaluateSurface, FaceInterpolation, ValidateMesh};
use texelmesh::topology::{EdgeId, QuadId, VertexId};
use texelmesh::{EntityRef, ExtractionPass, LatticeInterpolator, MeshConfig, MeshStore, OrientedEdge};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn color(r: f64, displacement: f64) -> Texel {
    Texel::new(r, 0.5, 0.5, displacement)
}

/// Two unit quads side by side, one sample per edge and per quad.
struct Strip {
    vertices: [[VertexId; 2]; 3],
    horizontal: [[EdgeId; 2]; 2],
    vertical: [EdgeId; 3],
    quads: [QuadId; 2],
}

impl Strip {
    fn extract(pass: &mut ExtractionPass<'_>) -> Self {
        let mut vertices = Vec::new();
        for i in 0..3_u32 {
            let column: Vec<VertexId> = (0..2_u32)
                .map(|j| {
                    MakeVertex::new(
                        Point3::new(f64::from(i), f64::from(j), 0.0),
                        Vector3::z(),
                        color(f64::from(i), 0.0),
                    )
                    .execute(pass)
                    .unwrap()
                })
                .collect();
            vertices.push([column[0], column[1]]);
        }
        let vertices: [[VertexId; 2]; 3] = [vertices[0], vertices[1], vertices[2]];

        let edge = |pass: &mut ExtractionPass<'_>, a: VertexId, b: VertexId, r: f64| {
            MakeEdge::new(a, b, vec![color(r, 0.0)]).execute(pass).unwrap()
        };
        let horizontal = [
            [
                edge(pass, vertices[0][0], vertices[1][0], 0.5),
                edge(pass, vertices[0][1], vertices[1][1], 0.5),
            ],
            [
                edge(pass, vertices[1][0], vertices[2][0], 1.5),
                edge(pass, vertices[1][1], vertices[2][1], 1.5),
            ],
        ];
        let vertical = [
            edge(pass, vertices[0][0], vertices[0][1], 0.0),
            edge(pass, vertices[1][0], vertices[1][1], 1.0),
            edge(pass, vertices[2][0], vertices[2][1], 2.0),
        ];
        let quad = |pass: &mut ExtractionPass<'_>, k: usize| {
            MakeQuad::new(
                [
                    OrientedEdge::forward(horizontal[k][0]),
                    OrientedEdge::forward(vertical[k + 1]),
                    OrientedEdge::reversed(horizontal[k][1]),
                    OrientedEdge::reversed(vertical[k]),
                ],
                vec![color(f64::from(u32::try_from(k).unwrap()) + 0.5, 0.25)],
            )
            .execute(pass)
            .unwrap()
        };
        let quads = [quad(pass, 0), quad(pass, 1)];

        Self {
            vertices,
            horizontal,
            vertical,
            quads,
        }
    }

    /// Every entity of the right-hand quad.
    fn right_half(&self) -> Vec<EntityRef> {
        vec![
            EntityRef::Quad(self.quads[1]),
            EntityRef::Edge(self.horizontal[1][0]),
            EntityRef::Edge(self.horizontal[1][1]),
            EntityRef::Edge(self.vertical[1]),
            EntityRef::Edge(self.vertical[2]),
            EntityRef::Vertex(self.vertices[1][0]),
            EntityRef::Vertex(self.vertices[1][1]),
            EntityRef::Vertex(self.vertices[2][0]),
            EntityRef::Vertex(self.vertices[2][1]),
        ]
    }
}

#[test]
fn multi_pass_extraction_keeps_stable_regions() {
    init_tracing();
    let mut store = MeshStore::with_config(MeshConfig::default().with_retention_window(1));

    let mut pass = store.begin_pass().unwrap();
    let strip = Strip::extract(&mut pass);
    pass.commit();
    assert!(ValidateMesh::new().execute(&store).is_valid());

    let left_quad = EntityRef::Quad(strip.quads[0]);
    let left_span = store.texel_span(left_quad).unwrap();
    let left_texel = *store.texel(left_quad, 0).unwrap();

    // Second pass: refine the right quad's samples and close a triangle on top.
    let mut pass = store.begin_pass().unwrap();
    for entity in strip.right_half() {
        pass.touch(entity).unwrap();
    }
    pass.replace_texels(EntityRef::Quad(strip.quads[1]), &[color(9.0, 0.5)])
        .unwrap();
    let apex = MakeVertex::new(Point3::new(1.5, 2.0, 0.0), Vector3::z(), color(3.0, 0.0))
        .execute(&mut pass)
        .unwrap();
    let top = strip.vertices[1][1];
    let top_right = strip.vertices[2][1];
    let up = MakeEdge::new(top, apex, vec![]).execute(&mut pass).unwrap();
    let down = MakeEdge::new(apex, top_right, vec![]).execute(&mut pass).unwrap();
    let tip = pass.find_edge(top_right, top).unwrap();
    assert_eq!(tip, strip.horizontal[1][1]);
    // Edge samples must match across the triangle, so the tip edge is rejected
    // while it carries one sample and the others none.
    assert!(MakeTriangle::new(
        [
            OrientedEdge::forward(up),
            OrientedEdge::forward(down),
            OrientedEdge::reversed(tip),
        ],
        vec![],
    )
    .execute(&mut pass)
    .is_err());
    pass.commit();

    // Earlier spans are never relocated or overwritten.
    assert_eq!(store.texel_span(left_quad).unwrap(), left_span);
    assert_eq!(*store.texel_buffer().get(left_span, 0).unwrap(), left_texel);
    assert_eq!(store.texel(EntityRef::Quad(strip.quads[1]), 0).unwrap().x, 9.0);
    assert!(ValidateMesh::new().execute(&store).is_valid());

    // A cancelled pass leaves no trace.
    let texels_before = store.texel_buffer().len();
    {
        let mut pass = store.begin_pass().unwrap();
        MakeVertex::new(Point3::origin(), Vector3::z(), color(0.0, 0.0))
            .execute(&mut pass)
            .unwrap();
        pass.touch(left_quad).unwrap();
    }
    assert_eq!(store.texel_buffer().len(), texels_before);

    // Third pass revisits only the right half; the left half ages out.
    let mut pass = store.begin_pass().unwrap();
    for entity in strip.right_half() {
        pass.touch(entity).unwrap();
    }
    for entity in [EntityRef::Vertex(apex), EntityRef::Edge(up), EntityRef::Edge(down)] {
        pass.touch(entity).unwrap();
    }
    pass.commit();

    assert!(store.quad(strip.quads[0]).is_err());
    let removed = CollectGarbage::new().execute(&mut store);
    assert_eq!(removed.quads, 1);
    assert_eq!(removed.edges, 3);
    assert_eq!(removed.vertices, 2);

    let report = ValidateMesh::new().execute(&store);
    assert!(report.is_valid(), "{:?}", report.issues());
    assert!(store
        .vertex(strip.vertices[1][0])
        .unwrap()
        .incident_edges()
        .iter()
        .all(|&e| e != strip.horizontal[0][0]));

    // The surviving quad still interpolates consistently.
    for &(u, v) in &[(0.0, 0.0), (0.25, 0.75), (0.5, 0.5), (1.0, 1.0)] {
        let infos = FaceInterpolation::new(strip.quads[1], u, v)
            .execute(&store)
            .unwrap();
        let total: f64 = infos.iter().map(|i| i.weight).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-9);

        let eval = EvaluateSurface::new(strip.quads[1], u, v)
            .execute(&store, &LatticeInterpolator)
            .unwrap();
        assert_relative_eq!(eval.position, Point3::new(1.0 + u, v, 0.0), epsilon = 1e-9);
    }
}
