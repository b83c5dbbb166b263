//! Property-based tests for csvgate.
//!
//! # Testing Philosophy
//!
//! Property-based tests verify:
//! 1. **No panics**: Normalization, tokenization and ingestion never crash
//! 2. **Record boundaries**: Quoted newlines never split a record, and
//!    normalizing already-normalized text changes nothing
//! 3. **Invariants**: Mapped rows always carry every format column
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p csvgate --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p csvgate --test property_tests
//! ```

use proptest::prelude::*;

use csvgate::{
    map_row, normalize, tokenize, ColumnSpec, FormatConfig, IngestConfig, Ingestor,
    NormalizeOptions, Normalizer, RawRow, SchemaDocument,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Arbitrary CSV-ish text, heavy on the characters the scanner cares about.
fn csv_like_text() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        "[a-z0-9,;\"\n\r \t]{0,200}",
    ]
}

/// A field that may hold newlines but no quotes.
fn multiline_field() -> impl Strategy<Value = String> {
    "[a-z0-9 \n]{0,8}"
}

/// A line of two or more plain or quoted fields with no newline anywhere.
fn single_line_record() -> impl Strategy<Value = String> {
    let field = prop_oneof![
        "[a-z0-9 ]{0,6}",
        "[a-z0-9 ,]{0,6}".prop_map(|f| format!("\"{f}\"")),
        "[a-z]{1,3}".prop_map(|f| format!("\"{f}\"\"{f}\"")),
    ];
    prop::collection::vec(field, 2..5).prop_map(|fields| fields.join(","))
}

fn format_with(columns: usize) -> FormatConfig {
    FormatConfig::new(
        (0..columns)
            .map(|i| ColumnSpec::new(format!("Column {i}"), format!("c{i}")))
            .collect(),
    )
    .unwrap()
}

// =============================================================================
// No panics
// =============================================================================

proptest! {
    #[test]
    fn normalize_never_panics(text in csv_like_text(), sep in prop_oneof![Just(','), Just(';'), Just('\t')]) {
        let _ = normalize(&text, sep);
    }

    #[test]
    fn tokenize_never_panics(line in csv_like_text()) {
        let _ = tokenize(&line, ',');
    }

    #[test]
    fn ingest_never_panics(text in csv_like_text(), skip_empty in any::<bool>(), has_header in any::<bool>()) {
        let config = IngestConfig {
            skip_empty_rows: skip_empty,
            has_header,
            validate_duplicate_columns: true,
            ..IngestConfig::default()
        };
        let _ = Ingestor::with_config(config).ingest(&text, &format_with(3), &SchemaDocument::empty());
    }
}

// =============================================================================
// Record boundaries
// =============================================================================

proptest! {
    #[test]
    fn plain_lines_pass_through(lines in prop::collection::vec("[a-z ]{0,10}", 1..8)) {
        let normalized = normalize(&lines.join("\n"), ',');
        let texts: Vec<&str> = normalized.iter().map(|l| l.as_str()).collect();
        prop_assert_eq!(texts, lines.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn renormalizing_is_a_no_op(
        lines in prop::collection::vec(single_line_record(), 1..8),
        skip_empty in any::<bool>(),
    ) {
        let normalizer = Normalizer::new(NormalizeOptions {
            skip_empty_rows: skip_empty,
            ..NormalizeOptions::default()
        });
        let once: Vec<String> = normalizer
            .normalize(&lines.join("\n"))
            .into_iter()
            .map(|l| l.into_string())
            .collect();
        let twice: Vec<String> = normalizer
            .normalize(&once.join("\n"))
            .into_iter()
            .map(|l| l.into_string())
            .collect();

        prop_assert_eq!(twice, once);
    }

    #[test]
    fn quoted_newlines_stay_in_record(
        rows in prop::collection::vec(prop::collection::vec(multiline_field(), 1..5), 1..6)
    ) {
        let text = rows
            .iter()
            .map(|fields| {
                fields
                    .iter()
                    .map(|f| format!("\"{f}\""))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect::<Vec<_>>()
            .join("\n");

        let lines = normalize(&text, ',');
        prop_assert_eq!(lines.len(), rows.len());
        for (line, fields) in lines.iter().zip(&rows) {
            prop_assert_eq!(tokenize(line.as_str(), ',').into_fields(), fields.clone());
        }
    }

    #[test]
    fn written_rows_tokenize_back(fields in prop::collection::vec("[a-z0-9 ,\"]{0,8}", 1..6)) {
        let row = RawRow::new(fields.clone());
        let line = row.to_line(',').unwrap();
        prop_assert_eq!(tokenize(&line, ',').into_fields(), fields);
    }
}

// =============================================================================
// Mapping invariants
// =============================================================================

proptest! {
    #[test]
    fn mapped_row_has_every_column(
        columns in 1usize..8,
        fields in prop::collection::vec("[ a-z]{0,6}", 0..10),
    ) {
        let format = format_with(columns);
        let mapped = map_row(&RawRow::new(fields), None, &format);

        prop_assert_eq!(mapped.len(), columns);
        let expected: Vec<String> = (0..columns).map(|i| format!("c{i}")).collect();
        prop_assert_eq!(mapped.names().map(str::to_string).collect::<Vec<_>>(), expected);
        for (_, value) in mapped.iter() {
            prop_assert_eq!(value, value.trim());
        }
    }
}
