use std::sync::Arc;

use simdoc_suggest::{Document, InMemoryStore, SimilarityService, SuggestConfig};

fn main() {
    let documents = vec![
        Document::new(1, "Welcome to Jimbocho, the town of books and curry!"),
        Document::new(2, "Welcome to Jimbocho, the city of books and curry!"),
        Document::new(3, "We welcome you to Jimbocho, the town of books and curry."),
        Document::new(4, "Welcome to the town of books and curry, Jimbocho!"),
        Document::new(5, "Quantum flux capacitors need no curry."),
    ];

    // Both the corpus and the distances live in memory here.
    let store = Arc::new(InMemoryStore::with_documents(documents));
    let service = SimilarityService::new(store.clone(), store, SuggestConfig::new());

    // Computes the Jaccard distances of all 10 pairs and stores them.
    let summary = service.run_similarity_computation().unwrap();
    assert_eq!(summary.num_records, 10);

    // Documents 1 and 4 consist of the same words, so 4 comes first.
    let ids: Vec<_> = service
        .get_suggestions(1, [])
        .unwrap()
        .iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(ids, vec![4, 3, 2]);

    // Already found documents are skipped, and the next nearest fill the result.
    let ids: Vec<_> = service
        .get_suggestions(1, [4])
        .unwrap()
        .iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(ids, vec![3, 2, 5]);
}
