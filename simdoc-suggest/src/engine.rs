//! Exact Jaccard distances between all pairs of documents.
use std::time::Instant;

use all_pairs_jaccard::{Cancelled, SimpleJoiner, TokenSet, Vocabulary};
use hashbrown::HashSet;
use rayon::prelude::*;

use crate::cancel::CancelToken;
use crate::document::{DistanceRecord, Document};
use crate::errors::{Result, SuggestError};
use crate::tokenizer::tokenize;

/// Engine computing the Jaccard distance of every unordered pair of documents.
///
/// The engine performs no I/O; callers persist its output.
#[derive(Clone, Copy, Debug)]
pub struct JaccardEngine {
    parallel: bool,
}

impl Default for JaccardEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl JaccardEngine {
    /// Creates an instance running in parallel.
    pub const fn new() -> Self {
        Self { parallel: true }
    }

    /// Tokenizes documents and evaluates pairs on the rayon thread pool?
    pub const fn parallel(mut self, yes: bool) -> Self {
        self.parallel = yes;
        self
    }

    /// Computes one [`DistanceRecord`] per unordered pair of documents,
    /// i.e., `n * (n - 1) / 2` records for `n` documents, in no particular order.
    ///
    /// Every document is tokenized exactly once. Two documents without any token
    /// are at distance [`EMPTY_UNION_DISTANCE`](all_pairs_jaccard::EMPTY_UNION_DISTANCE).
    ///
    /// # Arguments
    ///
    /// * `documents` - Corpus snapshot (ids must be unique).
    /// * `cancel` - Token polled during the computation.
    ///
    /// # Errors
    ///
    /// [`SuggestError::Input`] is returned if an id occurs twice, and
    /// [`SuggestError::Cancelled`] if `cancel` is raised before completion.
    ///
    /// # Examples
    ///
    /// ```
    /// use simdoc_suggest::{Document, JaccardEngine};
    ///
    /// let documents = vec![
    ///     Document::new(1, "the cat sat"),
    ///     Document::new(2, "the dog sat"),
    ///     Document::new(3, "quantum flux"),
    /// ];
    /// let mut records = JaccardEngine::new()
    ///     .compute_all_distances(&documents, None)
    ///     .unwrap();
    /// records.sort_by_key(|r| (r.left, r.right));
    ///
    /// let dists: Vec<_> = records.iter().map(|r| (r.left, r.right, r.distance)).collect();
    /// assert_eq!(dists, vec![(1, 2, 0.5), (1, 3, 1.), (2, 3, 1.)]);
    /// ```
    pub fn compute_all_distances(
        &self,
        documents: &[Document],
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<DistanceRecord>> {
        let start = Instant::now();
        check_unique_ids(documents)?;

        let sets = self.token_sets(documents);
        if cancel.map_or(false, CancelToken::is_cancelled) {
            return Err(SuggestError::Cancelled);
        }
        tracing::debug!(
            num_documents = documents.len(),
            elapsed_sec = start.elapsed().as_secs_f64(),
            "tokenized documents"
        );

        let mut joiner = SimpleJoiner::new().parallel(self.parallel);
        if let Some(cancel) = cancel {
            joiner = joiner.cancel_flag(cancel.flag());
        }
        sets.into_iter().for_each(|set| joiner.add(set));
        tracing::debug!(
            memory_in_bytes = joiner.memory_in_bytes(),
            num_pairs = joiner.num_pairs(),
            "built token sets"
        );

        let pairs = joiner.all_pairs().map_err(|e| {
            if e.is::<Cancelled>() {
                SuggestError::Cancelled
            } else {
                SuggestError::input(e.to_string())
            }
        })?;

        let records: Vec<_> = pairs
            .into_iter()
            .map(|(i, j, distance)| {
                let (a, b) = (documents[i].id, documents[j].id);
                tracing::trace!(a, b, distance, "evaluated pair");
                DistanceRecord::new(a, b, distance)
            })
            .collect();
        tracing::debug!(
            num_records = records.len(),
            elapsed_sec = start.elapsed().as_secs_f64(),
            "computed all pairs"
        );
        Ok(records)
    }

    fn token_sets(&self, documents: &[Document]) -> Vec<TokenSet> {
        let tokenized: Vec<_> = if self.parallel {
            documents.par_iter().map(|d| tokenize(&d.text)).collect()
        } else {
            documents.iter().map(|d| tokenize(&d.text)).collect()
        };
        let mut vocab = Vocabulary::new();
        let sets = tokenized
            .into_iter()
            .map(|tokens| vocab.intern_set(tokens))
            .collect();
        tracing::debug!(vocab_size = vocab.len(), "interned tokens");
        sets
    }
}

fn check_unique_ids(documents: &[Document]) -> Result<()> {
    let mut seen = HashSet::with_capacity(documents.len());
    for doc in documents {
        if !seen.insert(doc.id) {
            return Err(SuggestError::input(format!(
                "Document id {} occurs more than once.",
                doc.id
            )));
        }
    }
    Ok(())
}
