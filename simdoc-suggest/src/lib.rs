//! Exact all-pair Jaccard distances between documents and nearest-neighbor suggestions.
//!
//! [`SimilarityService`] reads a corpus from a [`CorpusStore`], computes the Jaccard
//! distance of every pair of documents with the [`JaccardEngine`], replaces the records
//! held by a [`DistanceStore`], and serves the nearest unseen neighbors of a document
//! through the [`SuggestionRanker`].
#![deny(missing_docs)]

pub mod cancel;
pub mod config;
pub mod document;
pub mod engine;
pub mod errors;
pub mod memory;
pub mod ranker;
pub mod service;
pub mod store;
pub mod tokenizer;

pub use cancel::CancelToken;
pub use config::SuggestConfig;
pub use document::{read_documents, DistanceRecord, DocId, Document, DocumentSummary};
pub use engine::JaccardEngine;
pub use errors::{Result, StorePhase, SuggestError};
pub use memory::InMemoryStore;
pub use ranker::SuggestionRanker;
pub use service::{RunSummary, SimilarityService};
pub use store::{CorpusStore, DistanceStore};
