//! Extraction-time mesh for online surface reconstruction.
//!
//! Vertices, edges, triangles and quads carry their own color/displacement
//! samples (texels) and are stamped with the extraction pass that created or
//! last revisited them. See [`MeshStore`] for storage and visibility and
//! [`ExtractionPass`] for writing.

pub mod config;
pub mod error;
pub mod generation;
pub mod interpolation;
pub mod math;
pub mod operations;
pub mod pass;
pub mod texel;
pub mod topology;

pub use config::{ManifoldPolicy, MeshConfig};
pub use error::{Result, TexelMeshError};
pub use generation::{Generation, GenerationTag};
pub use interpolation::{FaceInterpolationInfo, InterpolationProvider, LatticeInterpolator, SurfaceSample};
pub use pass::ExtractionPass;
pub use texel::{TexelBuffer, TexelSpan};
pub use topology::{EntityRef, FaceRef, MeshStore, OrientedEdge};
