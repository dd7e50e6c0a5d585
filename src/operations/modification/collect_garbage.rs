use tracing::debug;

use crate::topology::{Entity, EntityRef, MeshStore, RemovalCount};

/// Removes every entity that fell out of the retention window.
///
/// Edges of a removed vertex and faces of a removed edge are removed with
/// it. Incidence lists of the survivors are updated. Texels of removed entities stay in the buffer.
#[derive(Debug, Default)]
pub struct CollectGarbage {
    retention_window: Option<u32>,
}

impl CollectGarbage {
    /// Creates a new `CollectGarbage` operation using the store's retention window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the retention window for this sweep.
    #[must_use]
    pub fn with_retention_window(mut self, retention_window: u32) -> Self {
        self.retention_window = Some(retention_window);
        self
    }

    /// Executes the sweep and returns what was removed.
    pub fn execute(&self, store: &mut MeshStore) -> RemovalCount {
        let committed = store.committed();
        let window = self
            .retention_window
            .unwrap_or(store.config().retention_window);
        let stale = |e: &dyn Entity| e.header().generation.is_stale(committed, window);

        let mut doomed: Vec<EntityRef> = Vec::new();
        doomed.extend(
            store
                .raw_triangles()
                .iter()
                .filter(|(_, t)| stale(*t))
                .map(|(id, _)| EntityRef::Triangle(id)),
        );
        doomed.extend(
            store
                .raw_quads()
                .iter()
                .filter(|(_, q)| stale(*q))
                .map(|(id, _)| EntityRef::Quad(id)),
        );
        doomed.extend(
            store
                .raw_edges()
                .iter()
                .filter(|(_, e)| stale(*e))
                .map(|(id, _)| EntityRef::Edge(id)),
        );
        doomed.extend(
            store
                .raw_vertices()
                .iter()
                .filter(|(_, v)| stale(*v))
                .map(|(id, _)| EntityRef::Vertex(id)),
        );

        let mut removed = RemovalCount::default();
        for entity in doomed {
            removed.add(store.remove_cascading(entity));
        }
        debug!(
            committed = ?committed,
            window,
            removed = removed.total(),
            "garbage collected"
        );
        removed
    }
}
