//! Contracts of the external stores holding the corpus and the distances.
//!
//! Implementations own storage, networking, and serialization; this library only
//! calls them. Every call is blocking and may fail with any error.
use anyhow::Result;

use crate::document::{DistanceRecord, DocId, Document};
use crate::errors::StorePhase;

/// Read access to the corpus.
pub trait CorpusStore: Send + Sync {
    /// Gets a snapshot of all documents.
    fn list_all_documents(&self) -> Result<Vec<Document>>;

    /// Gets a document, or `None` if it does not exist.
    fn get_document_by_id(&self, id: DocId) -> Result<Option<Document>>;
}

/// Storage of the precomputed distance records.
pub trait DistanceStore: Send + Sync {
    /// Removes all stored records.
    fn clear_all_distance_records(&self) -> Result<()>;

    /// Appends records.
    fn bulk_insert_distance_records(&self, records: Vec<DistanceRecord>) -> Result<()>;

    /// Gets the neighbors of a document with their distances, nearest first.
    ///
    /// Only records of the most recent completed computation may be returned.
    fn get_ordered_neighbors(&self, id: DocId) -> Result<Vec<(DocId, f64)>>;

    /// Replaces all stored records by `records`.
    ///
    /// The provided implementation clears, then inserts. A failure is returned with
    /// the failed [`StorePhase`] attached as context, so callers can tell whether
    /// prior records are still there. Stores able to stage the records and swap them
    /// in one step should override this.
    fn replace_all_distance_records(&self, records: Vec<DistanceRecord>) -> Result<()> {
        self.clear_all_distance_records()
            .map_err(|e| e.context(StorePhase::Clear))?;
        self.bulk_insert_distance_records(records)
            .map_err(|e| e.context(StorePhase::Insert))
    }
}
