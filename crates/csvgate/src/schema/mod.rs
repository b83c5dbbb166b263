//! Format definitions and schema documents.

mod column;
mod document;
mod store;

pub use column::{ColumnSpec, FormatConfig};
pub use document::SchemaDocument;
pub use store::{FormatStore, FORMAT_DIR, VALIDATION_DIR};
