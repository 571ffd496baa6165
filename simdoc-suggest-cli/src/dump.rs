use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(
    name = "simdoc-suggest-dump",
    about = "A program to dump pairs of documents with their texts."
)]
struct Args {
    /// File path to the document file given to `jaccard`.
    #[clap(short = 'i', long)]
    text_path: PathBuf,

    /// File path to the CSV output of `jaccard`.
    #[clap(short = 's', long)]
    simpair_path: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let text_path = args.text_path;
    let simpair_path = args.simpair_path;

    let texts = BufReader::new(File::open(text_path)?)
        .lines()
        .collect::<Result<Vec<_>, _>>()?;

    for (n, row) in BufReader::new(File::open(simpair_path)?)
        .lines()
        .enumerate()
    {
        if n == 0 {
            continue;
        }
        let row = row?;
        let cols: Vec<_> = row.split(',').collect();
        if cols.len() != 3 {
            return Err(format!("Malformed row {n}: {row}").into());
        }
        let i = cols[0].parse::<usize>()?;
        let j = cols[1].parse::<usize>()?;
        let dist = cols[2].parse::<f64>()?;
        let (ti, tj) = match (texts.get(i), texts.get(j)) {
            (Some(ti), Some(tj)) => (ti, tj),
            _ => return Err(format!("Row {n} refers to a missing document.").into()),
        };
        println!("[i={i},j={j},dist={dist}]");
        println!("{ti}");
        println!("{tj}");
    }

    Ok(())
}
