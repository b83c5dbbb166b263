//! Validation gateway and ingestion results.

mod gateway;
mod report;
mod validators;

pub use gateway::{ContentErrors, SourceRow, ValidationGateway};
pub use report::{IngestErrors, IngestResult};
pub use validators::{JsonSchemaValidator, RecordValidator};
