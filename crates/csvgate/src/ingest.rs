//! Main Ingestor struct and public API.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{CsvGateError, Result};
use crate::input::{tokenize, NormalizeOptions, Normalizer};
use crate::mapping::{map_row, resolve, HeaderIndex};
use crate::schema::{FormatConfig, FormatStore, SchemaDocument};
use crate::validation::{
    IngestResult, JsonSchemaValidator, RecordValidator, SourceRow, ValidationGateway,
};

/// Configuration for one kind of CSV input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Field separator.
    pub separator: char,
    /// Whether the first row (after skipped lines) is a header.
    pub has_header: bool,
    /// Normalized lines to skip before the header or first data row.
    pub skip_data_lines: usize,
    /// Drop blank records.
    pub skip_empty_rows: bool,
    /// Report format titles repeated in the header as header errors.
    pub validate_duplicate_columns: bool,
    /// Re-quote unquoted fields that span several lines.
    pub recover_unquoted_fields: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            separator: ',',
            has_header: true,
            skip_data_lines: 0,
            skip_empty_rows: false,
            validate_duplicate_columns: false,
            recover_unquoted_fields: true,
        }
    }
}

impl IngestConfig {
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            separator: self.separator,
            skip_empty_rows: self.skip_empty_rows,
            recover_unquoted_fields: self.recover_unquoted_fields,
        }
    }
}

/// The CSV ingestion engine.
///
/// Holds no mutable state; one instance can serve concurrent calls.
pub struct Ingestor {
    config: IngestConfig,
    validator: Arc<dyn RecordValidator + Send + Sync>,
}

impl Ingestor {
    /// Create an ingestor with default configuration and JSON Schema validation.
    pub fn new() -> Self {
        Self::with_config(IngestConfig::default())
    }

    /// Create an ingestor with custom configuration.
    pub fn with_config(config: IngestConfig) -> Self {
        Self {
            config,
            validator: Arc::new(JsonSchemaValidator),
        }
    }

    /// Replace the record validator.
    pub fn with_validator(mut self, validator: impl RecordValidator + Send + Sync + 'static) -> Self {
        self.validator = Arc::new(validator);
        self
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Ingest in-memory text against a format and schema.
    ///
    /// Header errors suppress row validation. Malformed quoting never fails.
    pub fn ingest(&self, text: &str, columns: &FormatConfig, schema: &SchemaDocument) -> IngestResult {
        let config = &self.config;
        let lines = Normalizer::new(config.normalize_options()).normalize(text);

        let mut rows = lines
            .iter()
            .enumerate()
            .skip(config.skip_data_lines)
            .filter(|(_, line)| !line.is_empty())
            .map(|(line_index, line)| (line_index, tokenize(line.as_str(), config.separator)));

        let mut header: Option<HeaderIndex> = None;
        if config.has_header {
            if let Some((_, header_row)) = rows.next() {
                let (index, resolution) =
                    resolve(&header_row, columns, config.validate_duplicate_columns);
                if !resolution.is_clean() {
                    let messages = resolution.messages();
                    tracing::info!(header_errors = messages.len(), "header does not match format");
                    return IngestResult::header_errors(messages);
                }
                header = Some(index);
            }
        }

        let mapped: Vec<SourceRow> = rows
            .map(|(line_index, raw)| SourceRow {
                line_index,
                record: map_row(&raw, header.as_ref(), columns),
            })
            .collect();
        tracing::debug!(lines = lines.len(), rows = mapped.len(), "mapped data rows");

        let content = ValidationGateway::new(self.validator.as_ref(), schema).validate_rows(&mapped);
        if !content.is_empty() {
            tracing::info!(
                rows = mapped.len(),
                invalid_rows = content.len(),
                "rows failed validation"
            );
            return IngestResult::content_errors(content);
        }

        tracing::info!(rows = mapped.len(), "ingested rows");
        IngestResult::Rows(mapped.into_iter().map(|row| row.record).collect())
    }

    /// Ingest text against a named format from `store`.
    ///
    /// Missing format or schema files fail before any parsing.
    pub fn ingest_named(&self, text: &str, store: &FormatStore, name: &str) -> Result<IngestResult> {
        let (columns, schema) = store.load(name)?;
        Ok(self.ingest(text, &columns, &schema))
    }

    /// Ingest a UTF-8 file against a named format from `store`.
    pub fn ingest_file(
        &self,
        path: impl AsRef<Path>,
        store: &FormatStore,
        name: &str,
    ) -> Result<IngestResult> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(CsvGateError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let (columns, schema) = store.load(name)?;

        let bytes = std::fs::read(path).map_err(|e| CsvGateError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let text = String::from_utf8(bytes).map_err(|_| CsvGateError::Encoding {
            path: path.to_path_buf(),
        })?;

        tracing::debug!(path = %path.display(), format = name, bytes = text.len(), "read input file");
        Ok(self.ingest(&text, &columns, &schema))
    }
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::new()
    }
}
