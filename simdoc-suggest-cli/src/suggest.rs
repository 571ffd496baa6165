use std::borrow::Cow;
use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use simdoc_suggest::{read_documents, DocId, InMemoryStore, SimilarityService, SuggestConfig};

#[derive(Parser, Debug)]
#[clap(
    name = "simdoc-suggest-suggest",
    about = "A program to suggest the documents nearest to a given one in the Jaccard space."
)]
struct Args {
    /// File path to a document file, one document per line.
    /// The line number (starting at 0) is used as the document id.
    #[clap(short = 'i', long)]
    document_path: PathBuf,

    /// Id of the document to find suggestions for.
    #[clap(short = 't', long)]
    target: DocId,

    /// Ids of documents already found, which are never suggested.
    #[clap(short = 'x', long, use_value_delimiter = true)]
    excluded: Vec<DocId>,

    /// Maximum number of suggested documents (must be more than 0).
    #[clap(short = 'k', long, default_value = "3")]
    limit: usize,

    /// Disables parallel computation.
    #[clap(short = 'p', long)]
    disable_parallel: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = SuggestConfig::new()
        .limit(args.limit)?
        .parallel(!args.disable_parallel);

    let documents = read_documents(File::open(&args.document_path)?)?;
    let store = Arc::new(InMemoryStore::with_documents(documents));
    let service = SimilarityService::new(store.clone(), store.clone(), config);

    service.run_similarity_computation()?;
    tracing::info!(
        num_documents = store.num_documents()?,
        num_records = store.num_records()?,
        "stored distance records"
    );

    println!("id,title");
    for summary in service.get_suggestion_summaries(args.target, args.excluded)? {
        println!("{},{}", summary.id, csv_field(&summary.title));
    }

    Ok(())
}

/// Quotes a CSV field if it contains a delimiter, a quote, or a line break.
fn csv_field(field: &str) -> Cow<str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
