use thiserror::Error;

use crate::generation::Generation;

/// Top-level error type for the texel mesh.
#[derive(Debug, Error)]
pub enum TexelMeshError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Texel(#[from] TexelError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
}

/// Errors related to mesh connectivity.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("edge endpoints must be distinct")]
    DegenerateEdge,

    #[error("vertex normal must be non-zero")]
    ZeroNormal,

    #[error("malformed face orientation: {0}")]
    MalformedOrientation(String),

    #[error("edge already has {incident} incident faces, policy allows at most {limit}")]
    NonManifold { incident: usize, limit: usize },
}

/// Errors related to texel addressing.
#[derive(Debug, Error)]
pub enum TexelError {
    #[error("texel index {index} is out of range for {count} samples")]
    OutOfRange { index: usize, count: usize },

    #[error("texel layout mismatch: {0}")]
    LayoutMismatch(String),
}

/// Errors related to generation tagging and visibility.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("entity generation {entity} fell out of the retention window (committed {committed})")]
    StaleEntity {
        entity: Generation,
        committed: Generation,
    },

    #[error("entity has not been stamped by any extraction pass")]
    Unstamped,

    #[error("entity generation {generation} is not committed yet")]
    Uncommitted { generation: Generation },

    #[error("generation counter exhausted")]
    Exhausted,

    #[error("generation cannot move backwards from {current} to {requested}")]
    Regression {
        current: Generation,
        requested: Generation,
    },
}

/// Errors related to surface evaluation.
#[derive(Debug, Error)]
pub enum InterpolationError {
    #[error("parametric coordinate ({u}, {v}) lies outside the face domain")]
    OutsideDomain { u: f64, v: f64 },

    #[error("interpolation weights sum to {0}, expected 1")]
    WeightSum(f64),

    #[error("degenerate normal at evaluated point")]
    DegenerateNormal,
}

/// Convenience type alias for results using [`TexelMeshError`].
pub type Result<T> = std::result::Result<T, TexelMeshError>;
