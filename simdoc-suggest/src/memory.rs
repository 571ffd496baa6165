//! An in-memory implementation of both stores.
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, Result};
use hashbrown::HashMap;

use crate::document::{DistanceRecord, DocId, Document};
use crate::store::{CorpusStore, DistanceStore};

/// Ascending neighbor lists of every document.
#[derive(Clone, Debug, Default)]
struct NeighborIndex {
    lists: HashMap<DocId, Vec<(DocId, f64)>>,
    num_records: usize,
}

impl NeighborIndex {
    fn from_records(records: Vec<DistanceRecord>) -> Self {
        let mut index = Self::default();
        index.extend(records);
        index
    }

    fn extend(&mut self, records: Vec<DistanceRecord>) {
        self.num_records += records.len();
        for r in records {
            self.lists.entry(r.left).or_default().push((r.right, r.distance));
            self.lists.entry(r.right).or_default().push((r.left, r.distance));
        }
        // Ties are broken by id so that the order is stable across runs.
        for list in self.lists.values_mut() {
            list.sort_by(|(i, x), (j, y)| x.total_cmp(y).then(i.cmp(j)));
        }
    }
}

/// Corpus and distance store kept in memory.
///
/// [`DistanceStore::replace_all_distance_records`] builds the new neighbor index
/// aside and swaps it in, so readers never see an empty store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    documents: RwLock<HashMap<DocId, Document>>,
    neighbors: RwLock<Arc<NeighborIndex>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given documents.
    pub fn with_documents<I>(documents: I) -> Self
    where
        I: IntoIterator<Item = Document>,
    {
        Self {
            documents: RwLock::new(documents.into_iter().map(|d| (d.id, d)).collect()),
            neighbors: RwLock::default(),
        }
    }

    /// Inserts or replaces a document.
    pub fn insert_document(&self, document: Document) -> Result<()> {
        self.write_documents()?.insert(document.id, document);
        Ok(())
    }

    /// Removes a document, leaving its distance records in place.
    pub fn remove_document(&self, id: DocId) -> Result<Option<Document>> {
        Ok(self.write_documents()?.remove(&id))
    }

    /// Gets the number of documents.
    pub fn num_documents(&self) -> Result<usize> {
        Ok(self.read_documents()?.len())
    }

    /// Gets the number of stored distance records.
    pub fn num_records(&self) -> Result<usize> {
        Ok(self.snapshot()?.num_records)
    }

    fn read_documents(&self) -> Result<RwLockReadGuard<'_, HashMap<DocId, Document>>> {
        self.documents
            .read()
            .map_err(|_| anyhow!("The document map is poisoned."))
    }

    fn write_documents(&self) -> Result<RwLockWriteGuard<'_, HashMap<DocId, Document>>> {
        self.documents
            .write()
            .map_err(|_| anyhow!("The document map is poisoned."))
    }

    fn snapshot(&self) -> Result<Arc<NeighborIndex>> {
        self.neighbors
            .read()
            .map(|index| Arc::clone(&index))
            .map_err(|_| anyhow!("The neighbor index is poisoned."))
    }

    fn swap(&self, index: NeighborIndex) -> Result<()> {
        let mut current = self
            .neighbors
            .write()
            .map_err(|_| anyhow!("The neighbor index is poisoned."))?;
        *current = Arc::new(index);
        Ok(())
    }
}

impl CorpusStore for InMemoryStore {
    fn list_all_documents(&self) -> Result<Vec<Document>> {
        let mut documents: Vec<_> = self.read_documents()?.values().cloned().collect();
        documents.sort_by_key(|d| d.id);
        Ok(documents)
    }

    fn get_document_by_id(&self, id: DocId) -> Result<Option<Document>> {
        Ok(self.read_documents()?.get(&id).cloned())
    }
}

impl DistanceStore for InMemoryStore {
    fn clear_all_distance_records(&self) -> Result<()> {
        self.swap(NeighborIndex::default())
    }

    fn bulk_insert_distance_records(&self, records: Vec<DistanceRecord>) -> Result<()> {
        let mut current = self
            .neighbors
            .write()
            .map_err(|_| anyhow!("The neighbor index is poisoned."))?;
        Arc::make_mut(&mut *current).extend(records);
        Ok(())
    }

    fn get_ordered_neighbors(&self, id: DocId) -> Result<Vec<(DocId, f64)>> {
        Ok(self
            .snapshot()?
            .lists
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }

    fn replace_all_distance_records(&self, records: Vec<DistanceRecord>) -> Result<()> {
        self.swap(NeighborIndex::from_records(records))
    }
}
