use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use simdoc_suggest::{read_documents, JaccardEngine};

#[derive(Parser, Debug)]
#[clap(
    name = "simdoc-suggest-jaccard",
    about = "A program to compute the exact Jaccard distances of all pairs of documents."
)]
struct Args {
    /// File path to a document file, one document per line.
    /// The line number (starting at 0) is used as the document id.
    #[clap(short = 'i', long)]
    document_path: PathBuf,

    /// Only prints pairs within this distance, in the range of [0,1].
    #[clap(short = 'r', long, default_value = "1")]
    radius: f64,

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

    let document_path = args.document_path;
    let radius = args.radius;
    let disable_parallel = args.disable_parallel;

    if !(0. ..=1.).contains(&radius) {
        return Err("radius must be in the range of [0,1].".into());
    }

    let documents = read_documents(File::open(&document_path)?)?;
    tracing::info!(num_documents = documents.len(), "loaded documents");

    let start = Instant::now();
    let mut records = JaccardEngine::new()
        .parallel(!disable_parallel)
        .compute_all_distances(&documents, None)?;
    tracing::info!(
        num_records = records.len(),
        elapsed_sec = start.elapsed().as_secs_f64(),
        "computed all pairs"
    );

    records.sort_unstable_by_key(|r| (r.left, r.right));
    println!("i,j,dist");
    for r in records.iter().filter(|r| r.distance <= radius) {
        println!("{},{},{}", r.left, r.right, r.distance);
    }

    Ok(())
}
