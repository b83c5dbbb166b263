//! Record validators.

use jsonschema::error::ValidationErrorKind;

use crate::mapping::MappedRow;
use crate::schema::SchemaDocument;

/// Trait for validators.
///
/// Given a schema document and one mapped record, return zero or more
/// human-readable error strings, each naming the offending field.
/// Implementations hold no per-call state.
pub trait RecordValidator {
    fn validate(&self, schema: &SchemaDocument, record: &MappedRow) -> Vec<String>;
}

impl<F> RecordValidator for F
where
    F: Fn(&SchemaDocument, &MappedRow) -> Vec<String>,
{
    fn validate(&self, schema: &SchemaDocument, record: &MappedRow) -> Vec<String> {
        self(schema, record)
    }
}

/// Validates records against the document's compiled JSON Schema.
///
/// Errors read `Column <property>: <message>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaValidator;

impl RecordValidator for JsonSchemaValidator {
    fn validate(&self, schema: &SchemaDocument, record: &MappedRow) -> Vec<String> {
        let Some(compiled) = schema.compiled() else {
            return Vec::new();
        };

        let instance = record.to_json();
        match compiled.validate(&instance) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|error| {
                    let property = match &error.kind {
                        ValidationErrorKind::Required { property } => property
                            .as_str()
                            .map(str::to_string)
                            .unwrap_or_else(|| property.to_string()),
                        _ => error
                            .instance_path
                            .to_string()
                            .trim_start_matches('/')
                            .to_string(),
                    };
                    format!("Column {property}: {error}")
                })
                .collect(),
        }
    }
}
