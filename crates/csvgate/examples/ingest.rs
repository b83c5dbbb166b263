//! Example: Ingest a CSV file against a named format.
//!
//! Usage:
//!   cargo run --example ingest -- <store_dir> <format_name> <file_path>
//!
//! Example:
//!   RUST_LOG=csvgate=debug cargo run --example ingest -- formats purchase data/purchase.csv

use std::env;
use std::path::Path;

use csvgate::{FormatStore, IngestResult, Ingestor};
use tracing_subscriber::EnvFilter;

fn main() -> csvgate::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 4 {
        eprintln!("Usage: cargo run --example ingest -- <store_dir> <format_name> <file_path>");
        std::process::exit(1);
    }

    let store = FormatStore::open(&args[1])?;
    let name = &args[2];
    let path = Path::new(&args[3]);

    let result = Ingestor::new().ingest_file(path, &store, name)?;

    match &result {
        IngestResult::Rows(rows) => eprintln!("{} rows accepted", rows.len()),
        IngestResult::Errors { errors } => eprintln!(
            "{} header errors, {} rows with content errors",
            errors.header.len(),
            errors.content.len()
        ),
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
