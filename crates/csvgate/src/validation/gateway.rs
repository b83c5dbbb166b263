//! Runs the validator over mapped rows and keys the results by source row.

use std::collections::BTreeMap;

use crate::mapping::MappedRow;
use crate::schema::SchemaDocument;

use super::validators::RecordValidator;

/// A mapped row together with its position in the normalized line sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    /// Zero-based index into the normalized lines, skipped lines included.
    pub line_index: usize,
    pub record: MappedRow,
}

impl SourceRow {
    /// One-based row number used in error reports.
    pub fn row_number(&self) -> usize {
        self.line_index + 1
    }
}

/// Per-row error lists keyed by one-based source row number.
pub type ContentErrors = BTreeMap<usize, Vec<String>>;

/// Sequences validation of data rows against one schema document.
pub struct ValidationGateway<'a> {
    validator: &'a dyn RecordValidator,
    schema: &'a SchemaDocument,
}

impl<'a> ValidationGateway<'a> {
    pub fn new(validator: &'a dyn RecordValidator, schema: &'a SchemaDocument) -> Self {
        Self { validator, schema }
    }

    /// Validate one record.
    pub fn validate_row(&self, record: &MappedRow) -> Vec<String> {
        self.validator.validate(self.schema, record)
    }

    /// Validate every row; rows without errors are left out of the result.
    ///
    /// An inactive schema validates nothing.
    pub fn validate_rows(&self, rows: &[SourceRow]) -> ContentErrors {
        let mut content = ContentErrors::new();
        if !self.schema.is_active() {
            return content;
        }

        for row in rows {
            let errors = self.validate_row(&row.record);
            if !errors.is_empty() {
                tracing::debug!(row = row.row_number(), errors = errors.len(), "row failed validation");
                content.insert(row.row_number(), errors);
            }
        }

        content
    }
}
