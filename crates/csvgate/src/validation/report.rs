//! Ingestion outcome: mapped rows or a structured error report.

use serde::{Deserialize, Serialize};

use crate::mapping::MappedRow;

use super::gateway::ContentErrors;

/// Header and content errors of one ingestion call.
///
/// Header errors suppress content validation, so at most one of the two is
/// populated in practice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestErrors {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header: Vec<String>,
    /// Errors per one-based source row number.
    #[serde(default, skip_serializing_if = "ContentErrors::is_empty")]
    pub content: ContentErrors,
}

impl IngestErrors {
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.content.is_empty()
    }
}

/// Result of ingesting one input.
///
/// Serializes to either a JSON array of records or
/// `{"errors": {"header": [...], "content": {"<row>": [...]}}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IngestResult {
    Rows(Vec<MappedRow>),
    Errors { errors: IngestErrors },
}

impl IngestResult {
    pub fn header_errors(messages: Vec<String>) -> Self {
        Self::Errors {
            errors: IngestErrors {
                header: messages,
                content: ContentErrors::new(),
            },
        }
    }

    pub fn content_errors(content: ContentErrors) -> Self {
        Self::Errors {
            errors: IngestErrors {
                header: Vec::new(),
                content,
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Rows(_))
    }

    pub fn rows(&self) -> Option<&[MappedRow]> {
        match self {
            Self::Rows(rows) => Some(rows),
            Self::Errors { .. } => None,
        }
    }

    pub fn errors(&self) -> Option<&IngestErrors> {
        match self {
            Self::Rows(_) => None,
            Self::Errors { errors } => Some(errors),
        }
    }

    pub fn into_rows(self) -> Option<Vec<MappedRow>> {
        match self {
            Self::Rows(rows) => Some(rows),
            Self::Errors { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_error_shape() {
        let result = IngestResult::header_errors(vec![
            "Header column doesn't match. Expected: id".to_string(),
        ]);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"errors": {"header": ["Header column doesn't match. Expected: id"]}})
        );
        assert!(!result.is_ok());
    }

    #[test]
    fn test_content_error_shape() {
        let mut content = ContentErrors::new();
        content.insert(3, vec!["Column id: bad".to_string()]);
        let result = IngestResult::content_errors(content);

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"errors": {"content": {"3": ["Column id: bad"]}}})
        );
    }

    #[test]
    fn test_rows_shape() {
        let row: MappedRow = [("id".to_string(), "1".to_string())].into_iter().collect();
        let result = IngestResult::Rows(vec![row]);

        assert_eq!(serde_json::to_value(&result).unwrap(), json!([{"id": "1"}]));
        assert_eq!(result.rows().map(<[MappedRow]>::len), Some(1));
    }

    #[test]
    fn test_errors_deserialize() {
        let text = r#"{"content": {"2": ["Column a: x"]}}"#;
        let errors: IngestErrors = serde_json::from_str(text).unwrap();
        assert!(errors.header.is_empty());
        assert_eq!(errors.content[&2], vec!["Column a: x"]);
    }
}
