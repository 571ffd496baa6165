//! Documents and the distance records computed between them.
use std::io::{BufRead, BufReader, Read};

/// Identifier of a document in the corpus store.
pub type DocId = u64;

/// A document as read from the corpus store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// Identifier, unique within the corpus.
    pub id: DocId,
    /// Text body.
    pub text: String,
}

impl Document {
    /// Creates an instance.
    pub fn new<S>(id: DocId, text: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            id,
            text: text.into(),
        }
    }
}

/// Reads documents from a text, one document per line.
///
/// The line number (starting at 0) is used as the document id.
///
/// # Errors
///
/// An error is returned if reading fails or a line is not valid UTF-8.
pub fn read_documents<R>(rdr: R) -> std::io::Result<Vec<Document>>
where
    R: Read,
{
    let mut documents = vec![];
    for (i, line) in BufReader::new(rdr).lines().enumerate() {
        documents.push(Document::new(i as DocId, line?));
    }
    Ok(documents)
}

/// Card-like view of a document: its id and the first non-blank line of its text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentSummary {
    /// Identifier of the summarized document.
    pub id: DocId,
    /// First non-blank line, trimmed.
    pub title: String,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        let title = doc
            .text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default();
        Self {
            id: doc.id,
            title: title.to_string(),
        }
    }
}

/// Jaccard distance between an unordered pair of documents.
///
/// The pair is normalized so that `left < right`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceRecord {
    /// Smaller id of the pair.
    pub left: DocId,
    /// Larger id of the pair.
    pub right: DocId,
    /// Distance in `[0, 1]`.
    pub distance: f64,
}

impl DistanceRecord {
    /// Creates a record for the pair `{a, b}`, in either order.
    pub fn new(a: DocId, b: DocId, distance: f64) -> Self {
        debug_assert_ne!(a, b);
        debug_assert!((0. ..=1.).contains(&distance));
        let (left, right) = if a < b { (a, b) } else { (b, a) };
        Self {
            left,
            right,
            distance,
        }
    }
}
