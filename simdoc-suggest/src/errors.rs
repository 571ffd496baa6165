//! Error definitions.
use std::{fmt, result};

/// A specialized Result type for this library.
pub type Result<T, E = SuggestError> = result::Result<T, E>;

/// Step of a store interaction, used to report where a failure occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorePhase {
    /// Reading the whole corpus.
    List,
    /// Removing all distance records.
    Clear,
    /// Writing the new distance records.
    Insert,
    /// Replacing the distance records in one step.
    Replace,
    /// Resolving a single document.
    Lookup,
    /// Reading the ordered neighbors of a document.
    Neighbors,
}

impl StorePhase {
    /// Checks if previous distance records are intact after a failure in this phase.
    pub const fn leaves_prior_records(self) -> bool {
        matches!(self, Self::List | Self::Lookup | Self::Neighbors)
    }
}

impl fmt::Display for StorePhase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::List => "list",
            Self::Clear => "clear",
            Self::Insert => "insert",
            Self::Replace => "replace",
            Self::Lookup => "lookup",
            Self::Neighbors => "neighbors",
        };
        f.write_str(name)
    }
}

/// Errors in this library.
#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    /// The input argument is invalid.
    #[error("InputError: {0}")]
    Input(String),

    /// A call to an external store failed.
    #[error("StoreError: {phase} failed: {source:#}")]
    Store {
        /// Step that failed.
        phase: StorePhase,
        /// Error raised by the store.
        source: anyhow::Error,
    },

    /// The computation was cancelled before anything was written.
    #[error("Cancelled: the similarity computation was aborted before writing")]
    Cancelled,

    /// Another similarity computation is in flight.
    #[error("AlreadyRunning: another similarity computation is in progress")]
    AlreadyRunning,
}

impl SuggestError {
    pub(crate) fn input<S: Into<String>>(msg: S) -> Self {
        Self::Input(msg.into())
    }

    pub(crate) fn store(phase: StorePhase, source: anyhow::Error) -> Self {
        Self::Store { phase, source }
    }
}
