//! csvgate: CSV ingestion with multi-line field recovery and schema validation.
//!
//! Input text goes through four stages:
//!
//! - **Normalize**: split into logical lines, keeping newlines that belong to
//!   quoted fields inside their record
//! - **Tokenize**: split each logical line into raw fields
//! - **Map**: resolve the header against a [`FormatConfig`] and turn each data
//!   row into a [`MappedRow`] keyed by column name
//! - **Validate**: hand every mapped row to a [`RecordValidator`] and collect
//!   errors per source row
//!
//! # Example
//!
//! ```
//! use csvgate::{ColumnSpec, FormatConfig, Ingestor, SchemaDocument};
//!
//! let format = FormatConfig::new(vec![
//!     ColumnSpec::new("ID", "id"),
//!     ColumnSpec::new("Note", "note"),
//! ])
//! .unwrap();
//!
//! let text = "ID,Note\n1,\"two\nlines\"\n";
//! let result = Ingestor::new().ingest(text, &format, &SchemaDocument::empty());
//!
//! let rows = result.rows().unwrap();
//! assert_eq!(rows[0].get("note"), Some("two\nlines"));
//! ```

pub mod error;
pub mod input;
pub mod mapping;
pub mod schema;
pub mod validation;

mod ingest;

pub use crate::ingest::{IngestConfig, Ingestor};
pub use error::{CsvGateError, Result};
pub use input::{normalize, tokenize, LogicalLine, NormalizeOptions, Normalizer, RawRow};
pub use mapping::{map_row, resolve, HeaderIndex, HeaderResolution, MappedRow};
pub use schema::{ColumnSpec, FormatConfig, FormatStore, SchemaDocument};
pub use validation::{
    ContentErrors, IngestErrors, IngestResult, JsonSchemaValidator, RecordValidator, SourceRow,
    ValidationGateway,
};
