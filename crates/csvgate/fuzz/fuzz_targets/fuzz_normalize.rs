//! Fuzz target for normalization and ingestion.
//!
//! This fuzzer tests that normalization, tokenization and ingestion never
//! panic on malformed quoting or stray separators.

#![no_main]

use libfuzzer_sys::fuzz_target;
use csvgate::{
    normalize, tokenize, ColumnSpec, FormatConfig, IngestConfig, Ingestor, SchemaDocument,
};

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    for line in normalize(text, ',') {
        let _ = tokenize(line.as_str(), ',');
    }

    let Ok(format) = FormatConfig::new(vec![
        ColumnSpec::new("id", "id"),
        ColumnSpec::new("name", "name").with_default("-"),
    ]) else {
        return;
    };
    let config = IngestConfig {
        skip_empty_rows: true,
        validate_duplicate_columns: true,
        ..IngestConfig::default()
    };
    let _ = Ingestor::with_config(config).ingest(text, &format, &SchemaDocument::empty());
});
