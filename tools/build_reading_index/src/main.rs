//! Build the reading index from a phrase catalog.
//!
//! Every phrase whose key syllables line up one-to-one with its characters
//! contributes an entry under each distinct syllable, listing the characters
//! that carry it and their positions.
//!
//! Usage:
//!   cargo run -p build_reading_index -- --phrases data/phrases.json --out data/readingIndex.json
//!   cargo run -p build_reading_index -- --phrases data/phrases.json --dry-run

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use zhuyin_core::{PhraseCatalog, ReadingIndex};

#[derive(clap::Parser, Debug)]
#[command(name = "build_reading_index")]
#[command(about = "Build readingIndex.json from phrases.json")]
struct Args {
    /// Phrase catalog (JSON array of phrases)
    #[arg(short, long, default_value = "data/phrases.json")]
    phrases: PathBuf,

    /// Where to write the index
    #[arg(short, long, default_value = "data/readingIndex.json")]
    out: PathBuf,

    /// Print a summary without writing anything
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let catalog = PhraseCatalog::load_json(&args.phrases)?;
    let index = ReadingIndex::build(&catalog);

    let entries: usize = index.keys().map(|k| index.get(k).len()).sum();
    println!(
        "{} phrases -> {} keys, {} entries",
        catalog.len(),
        index.len(),
        entries
    );

    if args.dry_run {
        let mut keys: Vec<&str> = index.keys().collect();
        keys.sort_unstable();
        for key in keys.iter().take(10) {
            println!("  {} ({} phrases)", key, index.get(key).len());
        }
        if keys.len() > 10 {
            println!("  ... and {} more", keys.len() - 10);
        }
        return Ok(());
    }

    index
        .save_json(&args.out)
        .with_context(|| format!("writing {}", args.out.display()))?;
    println!("wrote {}", args.out.display());
    Ok(())
}
