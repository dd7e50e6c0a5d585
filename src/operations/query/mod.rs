mod evaluate_surface;
mod face_boundary;
mod face_interpolation;
mod validate_mesh;

pub use evaluate_surface::{EvaluateSurface, SurfaceEvaluation};
pub use face_boundary::{Boundary, BoundarySide, FaceBoundary};
pub use face_interpolation::FaceInterpolation;
pub use validate_mesh::{MeshIssue, ValidateMesh, ValidationReport};
