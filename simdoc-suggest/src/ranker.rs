//! Top-K retrieval of precomputed nearest neighbors.
use hashbrown::HashSet;

use crate::config::{SuggestConfig, DEFAULT_LIMIT};
use crate::document::{DocId, Document};
use crate::errors::{Result, StorePhase, SuggestError};
use crate::store::{CorpusStore, DistanceStore};

/// Ranker selecting the nearest neighbors of a document that the caller has not seen yet.
#[derive(Clone, Copy, Debug)]
pub struct SuggestionRanker {
    limit: usize,
}

impl Default for SuggestionRanker {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
        }
    }
}

impl From<&SuggestConfig> for SuggestionRanker {
    fn from(config: &SuggestConfig) -> Self {
        Self {
            limit: config.get_limit(),
        }
    }
}

impl SuggestionRanker {
    /// Creates an instance returning at most `limit` documents.
    ///
    /// # Errors
    ///
    /// [`SuggestError::Input`] is returned if `limit` is 0.
    pub fn new(limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(SuggestError::input("Suggestion limit must not be 0."));
        }
        Ok(Self { limit })
    }

    /// Gets the maximum number of suggested documents.
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Suggests the nearest neighbors of `target`, nearest first.
    ///
    /// Neighbors are scanned in the order given by the distance store. A neighbor in
    /// `already_found` is skipped without counting against the limit, as is a neighbor
    /// that no longer resolves to a document. The scan stops as soon as the limit is
    /// reached, so the result may be shorter if neighbors run out first.
    ///
    /// An unknown `target` yields an empty result.
    ///
    /// # Errors
    ///
    /// [`SuggestError::Store`] is returned if a store call fails.
    pub fn suggest<C, D>(
        &self,
        corpus: &C,
        distances: &D,
        target: DocId,
        already_found: &HashSet<DocId>,
    ) -> Result<Vec<Document>>
    where
        C: CorpusStore + ?Sized,
        D: DistanceStore + ?Sized,
    {
        let exists = corpus
            .get_document_by_id(target)
            .map_err(|e| SuggestError::store(StorePhase::Lookup, e))?
            .is_some();
        if !exists {
            tracing::debug!(target_id = target, "unknown suggestion target");
            return Ok(vec![]);
        }

        let neighbors = distances
            .get_ordered_neighbors(target)
            .map_err(|e| SuggestError::store(StorePhase::Neighbors, e))?;

        let mut suggested = Vec::with_capacity(self.limit);
        for (id, distance) in neighbors {
            if suggested.len() >= self.limit {
                break;
            }
            if id == target || already_found.contains(&id) {
                tracing::debug!(target_id = target, id, "skipped already found neighbor");
                continue;
            }
            match corpus
                .get_document_by_id(id)
                .map_err(|e| SuggestError::store(StorePhase::Lookup, e))?
            {
                Some(doc) => {
                    tracing::trace!(target_id = target, id, distance, "suggested neighbor");
                    suggested.push(doc);
                }
                None => tracing::debug!(target_id = target, id, "skipped stale neighbor"),
            }
        }
        Ok(suggested)
    }
}
