mod make_edge;
mod make_face;
mod make_vertex;

pub use make_edge::MakeEdge;
pub use make_face::{MakeQuad, MakeTriangle};
pub use make_vertex::MakeVertex;
