//! The two operations exposed to a calling layer: recomputing all distances and
//! serving suggestions.
use std::sync::{Arc, Mutex, TryLockError};
use std::time::Instant;

use hashbrown::HashSet;

use crate::cancel::CancelToken;
use crate::config::SuggestConfig;
use crate::document::{DocId, Document, DocumentSummary};
use crate::engine::JaccardEngine;
use crate::errors::{Result, StorePhase, SuggestError};
use crate::ranker::SuggestionRanker;
use crate::store::{CorpusStore, DistanceStore};

/// Outcome of a successful similarity computation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    /// Number of documents read from the corpus.
    pub num_documents: usize,
    /// Number of distance records written.
    pub num_records: usize,
    /// Wall-clock duration of the run.
    pub elapsed_sec: f64,
}

/// Service recomputing the distance matrix of a corpus and suggesting neighbors.
///
/// At most one computation runs at a time per service.
pub struct SimilarityService<C, D> {
    corpus: Arc<C>,
    distances: Arc<D>,
    engine: JaccardEngine,
    ranker: SuggestionRanker,
    run_lock: Mutex<()>,
}

impl<C, D> SimilarityService<C, D>
where
    C: CorpusStore,
    D: DistanceStore,
{
    /// Creates an instance over the given stores.
    pub fn new(corpus: Arc<C>, distances: Arc<D>, config: SuggestConfig) -> Self {
        Self {
            corpus,
            distances,
            engine: JaccardEngine::new().parallel(config.is_parallel()),
            ranker: SuggestionRanker::from(&config),
            run_lock: Mutex::new(()),
        }
    }

    /// Recomputes the distances of all pairs of documents and replaces the stored records.
    ///
    /// The corpus is read once, all pairs are computed, then the records are written
    /// through [`DistanceStore::replace_all_distance_records`].
    ///
    /// # Errors
    ///
    /// - [`SuggestError::AlreadyRunning`] if another computation is in flight.
    /// - [`SuggestError::Store`] if a store call fails, naming the failed phase.
    /// - [`SuggestError::Input`] if the corpus holds a duplicated id.
    pub fn run_similarity_computation(&self) -> Result<RunSummary> {
        self.run_similarity_computation_with(&CancelToken::new())
    }

    /// Same as [`Self::run_similarity_computation`], aborting with
    /// [`SuggestError::Cancelled`] if `cancel` is raised before the records are written.
    /// A cancelled run leaves the distance store untouched.
    pub fn run_similarity_computation_with(&self, cancel: &CancelToken) -> Result<RunSummary> {
        let _guard = match self.run_lock.try_lock() {
            Ok(guard) => guard,
            // A previous run panicked; nothing guarded by the lock is left inconsistent.
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                tracing::warn!("similarity computation rejected: another run is in progress");
                return Err(SuggestError::AlreadyRunning);
            }
        };

        let start = Instant::now();
        tracing::info!("similarity computation started");

        let documents = self.corpus.list_all_documents().map_err(|e| {
            tracing::error!(phase = %StorePhase::List, error = %e, "store failure");
            SuggestError::store(StorePhase::List, e)
        })?;
        tracing::debug!(num_documents = documents.len(), "listed documents");

        let records = match self.engine.compute_all_distances(&documents, Some(cancel)) {
            Ok(records) if !cancel.is_cancelled() => records,
            Ok(_) | Err(SuggestError::Cancelled) => {
                tracing::warn!("similarity computation cancelled before writing");
                return Err(SuggestError::Cancelled);
            }
            Err(e) => return Err(e),
        };

        let num_records = records.len();
        self.distances
            .replace_all_distance_records(records)
            .map_err(|e| {
                let phase = e
                    .downcast_ref::<StorePhase>()
                    .copied()
                    .unwrap_or(StorePhase::Replace);
                tracing::error!(%phase, error = %e, "store failure");
                SuggestError::store(phase, e)
            })?;

        let summary = RunSummary {
            num_documents: documents.len(),
            num_records,
            elapsed_sec: start.elapsed().as_secs_f64(),
        };
        tracing::info!(
            num_documents = summary.num_documents,
            num_records = summary.num_records,
            elapsed_sec = summary.elapsed_sec,
            "similarity computation done"
        );
        Ok(summary)
    }

    /// Suggests the nearest neighbors of `target` that are not in `already_found`,
    /// nearest first. See [`SuggestionRanker::suggest`].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use simdoc_suggest::{Document, InMemoryStore, SimilarityService, SuggestConfig};
    ///
    /// let store = Arc::new(InMemoryStore::with_documents([
    ///     Document::new(1, "the cat sat"),
    ///     Document::new(2, "the dog sat"),
    ///     Document::new(3, "quantum flux"),
    /// ]));
    /// let service = SimilarityService::new(store.clone(), store, SuggestConfig::new());
    /// service.run_similarity_computation().unwrap();
    ///
    /// let ids: Vec<_> = service
    ///     .get_suggestions(1, [])
    ///     .unwrap()
    ///     .iter()
    ///     .map(|d| d.id)
    ///     .collect();
    /// assert_eq!(ids, vec![2, 3]);
    /// ```
    pub fn get_suggestions<I>(&self, target: DocId, already_found: I) -> Result<Vec<Document>>
    where
        I: IntoIterator<Item = DocId>,
    {
        let already_found: HashSet<_> = already_found.into_iter().collect();
        self.ranker.suggest(
            self.corpus.as_ref(),
            self.distances.as_ref(),
            target,
            &already_found,
        )
    }

    /// Same as [`Self::get_suggestions`], returning card-like summaries.
    pub fn get_suggestion_summaries<I>(
        &self,
        target: DocId,
        already_found: I,
    ) -> Result<Vec<DocumentSummary>>
    where
        I: IntoIterator<Item = DocId>,
    {
        Ok(self
            .get_suggestions(target, already_found)?
            .iter()
            .map(DocumentSummary::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::mpsc;

    use anyhow::anyhow;

    use crate::document::DistanceRecord;
    use crate::memory::InMemoryStore;

    fn example_store() -> Arc<InMemoryStore> {
        Arc::new(InMemoryStore::with_documents([
            Document::new(1, "the cat sat"),
            Document::new(2, "the dog sat"),
            Document::new(3, "quantum flux"),
        ]))
    }

    fn service_over(
        store: &Arc<InMemoryStore>,
    ) -> SimilarityService<InMemoryStore, InMemoryStore> {
        SimilarityService::new(store.clone(), store.clone(), SuggestConfig::new())
    }

    fn ids(docs: &[Document]) -> Vec<DocId> {
        docs.iter().map(|d| d.id).collect()
    }

    /// Corpus delegating to an in-memory store, with hooks into listing.
    struct HookedCorpus<F> {
        inner: Arc<InMemoryStore>,
        on_list: F,
    }

    fn hooked<F>(inner: &Arc<InMemoryStore>, on_list: F) -> HookedCorpus<F>
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync,
    {
        HookedCorpus {
            inner: inner.clone(),
            on_list,
        }
    }

    impl<F> CorpusStore for HookedCorpus<F>
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync,
    {
        fn list_all_documents(&self) -> anyhow::Result<Vec<Document>> {
            (self.on_list)()?;
            self.inner.list_all_documents()
        }

        fn get_document_by_id(&self, id: DocId) -> anyhow::Result<Option<Document>> {
            self.inner.get_document_by_id(id)
        }
    }

    /// Distance store failing in the given phase of the default replace.
    struct FailingDistances {
        inner: Arc<InMemoryStore>,
        fail_on: StorePhase,
    }

    impl DistanceStore for FailingDistances {
        fn clear_all_distance_records(&self) -> anyhow::Result<()> {
            if self.fail_on == StorePhase::Clear {
                return Err(anyhow!("disk full"));
            }
            self.inner.clear_all_distance_records()
        }

        fn bulk_insert_distance_records(&self, records: Vec<DistanceRecord>) -> anyhow::Result<()> {
            if self.fail_on == StorePhase::Insert {
                return Err(anyhow!("disk full"));
            }
            self.inner.bulk_insert_distance_records(records)
        }

        fn get_ordered_neighbors(&self, id: DocId) -> anyhow::Result<Vec<(DocId, f64)>> {
            self.inner.get_ordered_neighbors(id)
        }
    }

    #[test]
    fn test_end_to_end() {
        let store = example_store();
        let service = service_over(&store);
        let summary = service.run_similarity_computation().unwrap();
        assert_eq!(summary.num_documents, 3);
        assert_eq!(summary.num_records, 3);

        assert_eq!(store.get_ordered_neighbors(1).unwrap(), vec![(2, 0.5), (3, 1.)]);
        assert_eq!(ids(&service.get_suggestions(1, []).unwrap()), vec![2, 3]);
        assert_eq!(ids(&service.get_suggestions(1, [2]).unwrap()), vec![3]);
        assert_eq!(ids(&service.get_suggestions(3, []).unwrap()), vec![1, 2]);
        assert!(service.get_suggestions(42, []).unwrap().is_empty());

        let summaries = service.get_suggestion_summaries(2, []).unwrap();
        assert_eq!(summaries[0].id, 1);
        assert_eq!(summaries[0].title, "the cat sat");
    }

    #[test]
    fn test_before_any_run() {
        let store = example_store();
        let service = service_over(&store);
        assert!(service.get_suggestions(1, []).unwrap().is_empty());
    }

    #[test]
    fn test_idempotent_recompute() {
        let store = example_store();
        let service = service_over(&store);
        service.run_similarity_computation().unwrap();
        let first: Vec<_> = (1..=3)
            .map(|id| store.get_ordered_neighbors(id).unwrap())
            .collect();
        service.run_similarity_computation().unwrap();
        let second: Vec<_> = (1..=3)
            .map(|id| store.get_ordered_neighbors(id).unwrap())
            .collect();
        assert_eq!(first, second);
        assert_eq!(store.num_records().unwrap(), 3);
    }

    #[test]
    fn test_recompute_picks_up_corpus_changes() {
        let store = example_store();
        let service = service_over(&store);
        service.run_similarity_computation().unwrap();
        store
            .insert_document(Document::new(4, "the cat sat down"))
            .unwrap();
        let summary = service.run_similarity_computation().unwrap();
        assert_eq!(summary.num_records, 6);
        assert_eq!(ids(&service.get_suggestions(1, []).unwrap()), vec![4, 2, 3]);
    }

    #[test]
    fn test_stale_neighbor_after_deletion() {
        let store = example_store();
        let service = service_over(&store);
        service.run_similarity_computation().unwrap();
        store.remove_document(2).unwrap();
        assert_eq!(ids(&service.get_suggestions(1, []).unwrap()), vec![3]);
    }

    #[test]
    fn test_cancelled_before_run() {
        let store = example_store();
        store
            .replace_all_distance_records(vec![DistanceRecord::new(1, 2, 0.9)])
            .unwrap();
        let service = service_over(&store);
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = service.run_similarity_computation_with(&cancel);
        assert!(matches!(result, Err(SuggestError::Cancelled)));
        assert_eq!(store.get_ordered_neighbors(1).unwrap(), vec![(2, 0.9)]);
    }

    #[test]
    fn test_cancelled_during_run() {
        let store = example_store();
        store
            .replace_all_distance_records(vec![DistanceRecord::new(1, 2, 0.9)])
            .unwrap();
        let cancel = CancelToken::new();
        let trigger = cancel.clone();
        let corpus = hooked(&store, move || {
            trigger.cancel();
            Ok(())
        });
        let service = SimilarityService::new(Arc::new(corpus), store.clone(), SuggestConfig::new());
        let result = service.run_similarity_computation_with(&cancel);
        assert!(matches!(result, Err(SuggestError::Cancelled)));
        assert_eq!(store.num_records().unwrap(), 1);
    }

    #[test]
    fn test_list_failure_keeps_records() {
        let store = example_store();
        store
            .replace_all_distance_records(vec![DistanceRecord::new(1, 2, 0.9)])
            .unwrap();
        let corpus = hooked(&store, || Err(anyhow!("connection refused")));
        let service = SimilarityService::new(Arc::new(corpus), store.clone(), SuggestConfig::new());
        match service.run_similarity_computation() {
            Err(SuggestError::Store { phase, .. }) => {
                assert_eq!(phase, StorePhase::List);
                assert!(phase.leaves_prior_records());
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(store.num_records().unwrap(), 1);
    }

    #[test]
    fn test_write_failure_phases() {
        for fail_on in [StorePhase::Clear, StorePhase::Insert] {
            let store = example_store();
            let distances = FailingDistances {
                inner: store.clone(),
                fail_on,
            };
            let service =
                SimilarityService::new(store.clone(), Arc::new(distances), SuggestConfig::new());
            match service.run_similarity_computation() {
                Err(SuggestError::Store { phase, .. }) => {
                    assert_eq!(phase, fail_on);
                    assert!(!phase.leaves_prior_records());
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }

    #[test]
    fn test_duplicate_ids_fail_before_writing() {
        let store = example_store();
        store
            .replace_all_distance_records(vec![DistanceRecord::new(1, 2, 0.9)])
            .unwrap();
        let corpus = InMemoryStore::with_documents([Document::new(1, "x")]);
        struct Doubled(InMemoryStore);
        impl CorpusStore for Doubled {
            fn list_all_documents(&self) -> anyhow::Result<Vec<Document>> {
                let mut docs = self.0.list_all_documents()?;
                docs.extend(docs.clone());
                Ok(docs)
            }
            fn get_document_by_id(&self, id: DocId) -> anyhow::Result<Option<Document>> {
                self.0.get_document_by_id(id)
            }
        }
        let service =
            SimilarityService::new(Arc::new(Doubled(corpus)), store.clone(), SuggestConfig::new());
        let result = service.run_similarity_computation();
        assert!(matches!(result, Err(SuggestError::Input(_))));
        assert_eq!(store.num_records().unwrap(), 1);
    }

    #[test]
    fn test_concurrent_run_is_rejected() {
        let store = example_store();
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let entered_tx = Mutex::new(entered_tx);
        let release_rx = Mutex::new(release_rx);
        let corpus = hooked(&store, move || {
            entered_tx.lock().unwrap().send(()).unwrap();
            release_rx.lock().unwrap().recv().unwrap();
            Ok(())
        });
        let service = SimilarityService::new(Arc::new(corpus), store.clone(), SuggestConfig::new());

        std::thread::scope(|s| {
            let first = s.spawn(|| service.run_similarity_computation());
            entered_rx.recv().unwrap();
            let second = service.run_similarity_computation();
            assert!(matches!(second, Err(SuggestError::AlreadyRunning)));
            release_tx.send(()).unwrap();
            assert_eq!(first.join().unwrap().unwrap().num_records, 3);
        });

        // The lock is released once the first run is done.
        release_tx.send(()).unwrap();
        assert!(service.run_similarity_computation().is_ok());
    }

    #[test]
    fn test_custom_limit() {
        let store = Arc::new(InMemoryStore::with_documents(
            (1..=6).map(|id| Document::new(id, format!("shared word{id}"))),
        ));
        let config = SuggestConfig::new().limit(2).unwrap();
        let service = SimilarityService::new(store.clone(), store.clone(), config);
        service.run_similarity_computation().unwrap();
        assert_eq!(service.get_suggestions(1, []).unwrap().len(), 2);
        assert_eq!(ids(&service.get_suggestions(1, [2, 3]).unwrap()), vec![4, 5]);
    }
}
