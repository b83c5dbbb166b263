//! Schema documents that mapped rows are validated against.

use std::fmt;
use std::path::Path;

use jsonschema::JSONSchema;
use serde_json::Value;

use crate::error::{CsvGateError, Result};

/// A JSON Schema document, compiled once and shared read-only across rows.
///
/// A document that is not a non-empty JSON object is inactive: rows are not
/// validated against it.
pub struct SchemaDocument {
    value: Value,
    compiled: Option<JSONSchema>,
}

impl SchemaDocument {
    /// Compile `value`. Inactive documents are accepted without compiling.
    pub fn new(value: Value) -> Result<Self> {
        let compiled = if is_active(&value) {
            let schema = JSONSchema::compile(&value)
                .map_err(|e| CsvGateError::InvalidSchema(e.to_string()))?;
            Some(schema)
        } else {
            None
        };

        Ok(Self { value, compiled })
    }

    /// A document that validates nothing.
    pub fn empty() -> Self {
        Self {
            value: Value::Object(Default::default()),
            compiled: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| CsvGateError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&text)
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Whether rows should be validated against this document.
    pub fn is_active(&self) -> bool {
        self.compiled.is_some()
    }

    pub fn compiled(&self) -> Option<&JSONSchema> {
        self.compiled.as_ref()
    }
}

impl Default for SchemaDocument {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for SchemaDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaDocument")
            .field("value", &self.value)
            .field("active", &self.is_active())
            .finish()
    }
}

fn is_active(value: &Value) -> bool {
    value.as_object().is_some_and(|o| !o.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_is_inactive() {
        let doc = SchemaDocument::new(json!({})).unwrap();
        assert!(!doc.is_active());
        assert!(!SchemaDocument::empty().is_active());
    }

    #[test]
    fn test_non_object_is_inactive() {
        let doc = SchemaDocument::new(json!(true)).unwrap();
        assert!(!doc.is_active());
    }

    #[test]
    fn test_object_schema_compiles() {
        let doc = SchemaDocument::from_json(
            r#"{"type": "object", "required": ["id"], "properties": {"id": {"type": "string"}}}"#,
        )
        .unwrap();
        assert!(doc.is_active());
        assert!(doc.compiled().is_some());
    }

    #[test]
    fn test_invalid_schema_rejected() {
        let result = SchemaDocument::new(json!({"type": 12}));
        assert!(matches!(result, Err(CsvGateError::InvalidSchema(_))));
    }
}
