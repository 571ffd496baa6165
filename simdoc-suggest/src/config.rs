//! Settings of the similarity computation and of the suggestion ranking.
use crate::errors::{Result, SuggestError};

/// Default number of suggested documents.
pub const DEFAULT_LIMIT: usize = 3;

/// Configure of [`SimilarityService`](crate::SimilarityService).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SuggestConfig {
    limit: usize,
    parallel: bool,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestConfig {
    /// Creates an instance with a limit of [`DEFAULT_LIMIT`] and parallel computation.
    pub const fn new() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            parallel: true,
        }
    }

    /// Sets the maximum number of suggested documents (must be more than 0).
    pub fn limit(mut self, limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(SuggestError::input("Suggestion limit must not be 0."));
        }
        self.limit = limit;
        Ok(self)
    }

    /// Tokenizes documents and evaluates pairs on the rayon thread pool?
    pub const fn parallel(mut self, yes: bool) -> Self {
        self.parallel = yes;
        self
    }

    /// Gets the maximum number of suggested documents.
    pub const fn get_limit(&self) -> usize {
        self.limit
    }

    /// Checks if the computation runs in parallel.
    pub const fn is_parallel(&self) -> bool {
        self.parallel
    }
}
