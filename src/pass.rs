//! Extraction passes: the single writer of a [`MeshStore`].
//!
//! A pass stamps everything it creates or revisits with its own generation.
//! Nothing it does is visible to readers until [`ExtractionPass::commit`];
//! dropping the pass without committing rolls every change back.

use tracing::{debug, warn};

use crate::error::{Result, TexelError};
use crate::generation::{Generation, GenerationTag};
use crate::math::Texel;
use crate::texel::TexelSpan;
use crate::topology::{EdgeId, EntityRef, MeshStore, RemovalCount, VertexId};

#[derive(Debug, Clone, Copy)]
enum JournalEntry {
    Created(EntityRef),
    Stamped(EntityRef, GenerationTag),
    Retexeled(EntityRef, TexelSpan),
}

/// An in-progress extraction pass holding exclusive access to the store.
#[derive(Debug)]
pub struct ExtractionPass<'a> {
    store: &'a mut MeshStore,
    generation: Generation,
    texel_mark: usize,
    journal: Vec<JournalEntry>,
    pending_removals: Vec<EntityRef>,
    finished: bool,
}

impl MeshStore {
    /// Starts the next extraction pass.
    ///
    /// The pass generation is one past the last committed generation, or
    /// [`Generation::FIRST`] for a fresh store.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Exhausted`](crate::error::GenerationError::Exhausted)
    /// if the generation counter cannot advance.
    pub fn begin_pass(&mut self) -> Result<ExtractionPass<'_>> {
        let generation = self
            .committed()
            .map_or(Ok(Generation::FIRST), Generation::next)?;
        let texel_mark = self.texel_buffer().len();
        debug!(%generation, texel_mark, "extraction pass started");
        Ok(ExtractionPass {
            store: self,
            generation,
            texel_mark,
            journal: Vec::new(),
            pending_removals: Vec::new(),
            finished: false,
        })
    }
}

impl ExtractionPass<'_> {
    /// The generation this pass stamps.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Read access to the store as readers see it.
    #[must_use]
    pub fn store(&self) -> &MeshStore {
        &*self.store
    }

    /// Returns an edge joining `a` and `b`, including edges created by this pass.
    #[must_use]
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.store.find_edge(a, b)
    }

    /// Re-stamps an existing entity with this pass's generation, keeping it
    /// inside the retention window.
    ///
    /// The edges and vertices the entity is built from are re-stamped too, so
    /// a revisited face never outlives its boundary.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity does not exist or already carries a
    /// newer generation.
    pub fn touch(&mut self, entity: EntityRef) -> Result<()> {
        for part in self.store.with_boundary(entity)? {
            self.stamp(part)?;
        }
        Ok(())
    }

    fn stamp(&mut self, entity: EntityRef) -> Result<()> {
        let generation = self.generation;
        let header = self.store.raw_header_mut(entity)?;
        if header.generation.get() == Some(generation) {
            return Ok(());
        }
        let previous = header.generation.stamp(generation)?;
        self.journal.push(JournalEntry::Stamped(entity, previous));
        Ok(())
    }

    /// Gives an entity fresh samples by appending a new span.
    ///
    /// The old span stays in the buffer untouched, so readers holding its
    /// offset keep seeing the previous samples. The entity is re-stamped.
    ///
    /// # Errors
    ///
    /// Returns [`TexelError::LayoutMismatch`] if the sample count differs from
    /// the entity's current count, or an error if the entity does not exist.
    pub fn replace_texels(&mut self, entity: EntityRef, samples: &[Texel]) -> Result<TexelSpan> {
        let current = self.store.raw_header_mut(entity)?.texels;
        if current.count() != samples.len() {
            return Err(TexelError::LayoutMismatch(format!(
                "{} owns {} samples, got {}",
                entity.kind(),
                current.count(),
                samples.len()
            ))
            .into());
        }
        self.touch(entity)?;
        let span = self.store.texels_mut().append(samples);
        self.store.raw_header_mut(entity)?.texels = span;
        self.journal.push(JournalEntry::Retexeled(entity, current));
        Ok(span)
    }

    /// Schedules removal of an entity when the pass commits.
    ///
    /// Edges of a removed vertex and faces of a removed edge go with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity does not exist.
    pub fn remove(&mut self, entity: EntityRef) -> Result<()> {
        self.store.raw_header_mut(entity)?;
        self.pending_removals.push(entity);
        Ok(())
    }

    /// Publishes everything this pass did and returns its generation.
    pub fn commit(mut self) -> Generation {
        let mut removed = RemovalCount::default();
        for entity in std::mem::take(&mut self.pending_removals) {
            removed.add(self.store.remove_cascading(entity));
        }
        self.store.set_committed(self.generation);
        self.finished = true;
        debug!(
            generation = %self.generation,
            changes = self.journal.len(),
            removed = removed.total(),
            "extraction pass committed"
        );
        self.generation
    }

    /// Discards everything this pass did.
    pub fn cancel(mut self) {
        self.rollback();
    }

    pub(crate) fn append_texels(&mut self, samples: &[Texel]) -> TexelSpan {
        self.store.texels_mut().append(samples)
    }

    pub(crate) fn store_mut(&mut self) -> &mut MeshStore {
        &mut *self.store
    }

    /// Stamps a freshly inserted entity and records it for rollback.
    pub(crate) fn adopt(&mut self, entity: EntityRef) -> Result<()> {
        let generation = self.generation;
        self.store.raw_header_mut(entity)?.generation.stamp(generation)?;
        self.journal.push(JournalEntry::Created(entity));
        Ok(())
    }

    /// Logs a rejected insertion. The pass itself stays usable.
    pub(crate) fn reject<T>(&self, what: &str, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            warn!(generation = %self.generation, %err, "{what} rejected");
        }
        result
    }

    fn rollback(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        for entry in self.journal.drain(..).rev() {
            match entry {
                JournalEntry::Created(entity) => {
                    self.store.remove_cascading(entity);
                }
                JournalEntry::Stamped(entity, previous) => {
                    if let Ok(header) = self.store.raw_header_mut(entity) {
                        header.generation.restore(previous);
                    }
                }
                JournalEntry::Retexeled(entity, span) => {
                    if let Ok(header) = self.store.raw_header_mut(entity) {
                        header.texels = span;
                    }
                }
            }
        }
        self.pending_removals.clear();
        self.store.texels_mut().truncate(self.texel_mark);
        debug!(generation = %self.generation, "extraction pass cancelled");
    }
}

impl Drop for ExtractionPass<'_> {
    fn drop(&mut self) {
        self.rollback();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{GenerationError, TexelMeshError};
    use crate::math::{Point3, Vector3};
    use crate::operations::creation::{MakeEdge, MakeVertex};
    use crate::topology::Entity;

    fn t(v: f64) -> Texel {
        Texel::new(v, 0.0, 0.0, 0.0)
    }

    fn make_vertex(pass: &mut ExtractionPass<'_>, x: f64) -> VertexId {
        MakeVertex::new(Point3::new(x, 0.0, 0.0), Vector3::z(), t(x))
            .execute(pass)
            .unwrap()
    }

    #[test]
    fn passes_number_generations_consecutively() {
        let mut store = MeshStore::new();
        assert_eq!(store.begin_pass().unwrap().commit(), Generation::FIRST);
        assert_eq!(store.begin_pass().unwrap().commit(), Generation::new(1));
        assert_eq!(store.committed(), Some(Generation::new(1)));
    }

    #[test]
    fn uncommitted_entities_are_invisible() {
        let mut store = MeshStore::new();
        let mut pass = store.begin_pass().unwrap();
        let v = make_vertex(&mut pass, 1.0);
        assert!(matches!(
            pass.store().vertex(v),
            Err(TexelMeshError::Generation(GenerationError::Uncommitted { .. }))
        ));
        pass.commit();
        assert!(store.vertex(v).is_ok());
    }

    #[test]
    fn dropped_pass_rolls_back_everything() {
        let mut store = MeshStore::new();
        let mut pass = store.begin_pass().unwrap();
        let a = make_vertex(&mut pass, 0.0);
        let b = make_vertex(&mut pass, 1.0);
        pass.commit();
        let texels_before = store.texel_buffer().len();

        {
            let mut pass = store.begin_pass().unwrap();
            let c = make_vertex(&mut pass, 2.0);
            MakeEdge::new(a, c, vec![t(5.0)]).execute(&mut pass).unwrap();
            pass.touch(EntityRef::Vertex(b)).unwrap();
            pass.replace_texels(EntityRef::Vertex(a), &[t(9.0)]).unwrap();
            pass.remove(EntityRef::Vertex(b)).unwrap();
        }

        assert_eq!(store.committed(), Some(Generation::FIRST));
        assert_eq!(store.stats().vertices, 2);
        assert_eq!(store.stats().edges, 0);
        assert_eq!(store.texel_buffer().len(), texels_before);
        assert_eq!(store.vertex(b).unwrap().generation(), Some(Generation::FIRST));
        assert_eq!(store.texel(EntityRef::Vertex(a), 0).unwrap().x, 0.0);
        assert!(store.vertex(a).unwrap().incident_edges().is_empty());
    }

    #[test]
    fn explicit_cancel_matches_drop() {
        let mut store = MeshStore::new();
        let mut pass = store.begin_pass().unwrap();
        make_vertex(&mut pass, 0.0);
        pass.cancel();
        assert_eq!(store.stats().vertices, 0);
        assert_eq!(store.committed(), None);
        assert_eq!(store.begin_pass().unwrap().generation(), Generation::FIRST);
    }

    #[test]
    fn touch_keeps_entity_alive() {
        let mut store = MeshStore::with_config(
            crate::config::MeshConfig::default().with_retention_window(1),
        );
        let mut pass = store.begin_pass().unwrap();
        let v = make_vertex(&mut pass, 0.0);
        pass.commit();

        for _ in 0..4 {
            let mut pass = store.begin_pass().unwrap();
            pass.touch(EntityRef::Vertex(v)).unwrap();
            pass.commit();
        }

        assert_eq!(store.vertex(v).unwrap().generation(), Some(Generation::new(4)));
    }

    #[test]
    fn touching_an_edge_restamps_its_endpoints() {
        let mut store = MeshStore::new();
        let mut pass = store.begin_pass().unwrap();
        let a = make_vertex(&mut pass, 0.0);
        let b = make_vertex(&mut pass, 1.0);
        let e = MakeEdge::new(a, b, vec![]).execute(&mut pass).unwrap();
        pass.commit();

        let mut pass = store.begin_pass().unwrap();
        pass.touch(EntityRef::Edge(e)).unwrap();
        drop(pass);
        assert_eq!(store.vertex(a).unwrap().generation(), Some(Generation::FIRST));

        let mut pass = store.begin_pass().unwrap();
        let generation = pass.generation();
        pass.touch(EntityRef::Edge(e)).unwrap();
        pass.commit();
        for id in [a, b] {
            assert_eq!(store.vertex(id).unwrap().generation(), Some(generation));
        }
    }

    #[test]
    fn exhausted_counter_refuses_new_pass() {
        let mut store = MeshStore::new();
        store.set_committed(Generation::new(u32::MAX));
        assert!(matches!(
            store.begin_pass(),
            Err(TexelMeshError::Generation(GenerationError::Exhausted))
        ));
    }

    #[test]
    fn replace_texels_appends_and_keeps_old_span() {
        let mut store = MeshStore::new();
        let mut pass = store.begin_pass().unwrap();
        let v = make_vertex(&mut pass, 0.25);
        pass.commit();
        let old_span = store.texel_span(EntityRef::Vertex(v)).unwrap();

        let mut pass = store.begin_pass().unwrap();
        let new_span = pass.replace_texels(EntityRef::Vertex(v), &[t(0.75)]).unwrap();
        pass.commit();

        assert_ne!(old_span, new_span);
        assert_eq!(store.texel_buffer().get(old_span, 0).unwrap().x, 0.25);
        assert_eq!(store.texel(EntityRef::Vertex(v), 0).unwrap().x, 0.75);
    }

    #[test]
    fn replace_texels_rejects_count_change() {
        let mut store = MeshStore::new();
        let mut pass = store.begin_pass().unwrap();
        let v = make_vertex(&mut pass, 0.0);
        let err = pass
            .replace_texels(EntityRef::Vertex(v), &[t(1.0), t(2.0)])
            .unwrap_err();
        assert!(matches!(err, TexelMeshError::Texel(TexelError::LayoutMismatch(_))));
        assert_eq!(pass.store().texel_buffer().len(), 1);
    }

    #[test]
    fn removal_is_deferred_to_commit() {
        let mut store = MeshStore::new();
        let mut pass = store.begin_pass().unwrap();
        let v = make_vertex(&mut pass, 0.0);
        pass.commit();

        let mut pass = store.begin_pass().unwrap();
        pass.remove(EntityRef::Vertex(v)).unwrap();
        assert_eq!(pass.store().stats().vertices, 1);
        pass.commit();
        assert_eq!(store.stats().vertices, 0);
    }
}
