/// Default number of generations an entity survives without being revisited.
pub const DEFAULT_RETENTION_WINDOW: u32 = 2;

/// How many faces may share a single edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManifoldPolicy {
    /// At most two incident faces per edge.
    Strict,
    /// Any number of incident faces, as produced by adaptive
    /// multi-resolution extraction with T-junctions.
    #[default]
    Permissive,
}

impl ManifoldPolicy {
    /// Maximum number of faces an edge may border, if bounded.
    #[must_use]
    pub fn face_limit(self) -> Option<usize> {
        match self {
            Self::Strict => Some(2),
            Self::Permissive => None,
        }
    }
}

/// Parameters controlling mesh lifecycle and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshConfig {
    /// Generations an entity stays visible after its last stamp.
    pub retention_window: u32,
    /// Incidence limit enforced when faces are created.
    pub manifold_policy: ManifoldPolicy,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            retention_window: DEFAULT_RETENTION_WINDOW,
            manifold_policy: ManifoldPolicy::default(),
        }
    }
}

impl MeshConfig {
    /// Returns a copy with the given retention window.
    #[must_use]
    pub fn with_retention_window(mut self, retention_window: u32) -> Self {
        self.retention_window = retention_window;
        self
    }

    /// Returns a copy with the given manifold policy.
    #[must_use]
    pub fn with_manifold_policy(mut self, manifold_policy: ManifoldPolicy) -> Self {
        self.manifold_policy = manifold_policy;
        self
    }
}
