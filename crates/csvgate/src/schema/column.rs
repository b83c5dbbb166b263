//! Column definitions for a CSV format.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CsvGateError, Result};

/// One expected column of a CSV format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Exact header text expected in the file.
    pub title: String,
    /// Key used in mapped rows.
    pub name: String,
    /// Value used when the column is absent. A column with a default may be
    /// missing from the header without error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl ColumnSpec {
    pub fn new(title: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            name: name.into(),
            default: None,
        }
    }

    /// Set the default value.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Whether the header must contain this column.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Ordered column definitions of one named CSV format.
///
/// Column names are unique. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormatConfig {
    columns: Vec<ColumnSpec>,
}

impl FormatConfig {
    /// Build a format, rejecting an empty column list or duplicate names.
    pub fn new(columns: Vec<ColumnSpec>) -> Result<Self> {
        if columns.is_empty() {
            return Err(CsvGateError::InvalidFormat(
                "format defines no columns".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(CsvGateError::InvalidFormat(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
        }

        Ok(Self { columns })
    }

    /// Parse a JSON array of column definitions.
    pub fn from_json(json: &str) -> Result<Self> {
        let columns: Vec<ColumnSpec> = serde_json::from_str(json)?;
        Self::new(columns)
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnSpec> {
        self.columns.iter()
    }

    /// Whether any column expects `title` in the header.
    pub fn has_title(&self, title: &str) -> bool {
        self.columns.iter().any(|c| c.title == title)
    }

    /// Header row listing every column title, in order.
    pub fn titles(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.title.as_str()).collect()
    }
}

impl<'de> Deserialize<'de> for FormatConfig {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let columns = Vec::<ColumnSpec>::deserialize(deserializer)?;
        Self::new(columns).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a FormatConfig {
    type Item = &'a ColumnSpec;
    type IntoIter = std::slice::Iter<'a, ColumnSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let format = FormatConfig::from_json(
            r#"[
                {"title": "ID", "name": "id"},
                {"title": "Supplier", "name": "supplier", "default": "none"}
            ]"#,
        )
        .unwrap();

        assert_eq!(format.len(), 2);
        assert!(format.columns()[0].is_required());
        assert_eq!(format.columns()[1].default.as_deref(), Some("none"));
        assert_eq!(format.titles(), vec!["ID", "Supplier"]);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = FormatConfig::new(vec![
            ColumnSpec::new("A", "a"),
            ColumnSpec::new("B", "a"),
        ]);
        assert!(matches!(result, Err(CsvGateError::InvalidFormat(_))));
    }

    #[test]
    fn test_empty_format_rejected() {
        assert!(FormatConfig::new(Vec::new()).is_err());
        assert!(FormatConfig::from_json("[]").is_err());
    }

    #[test]
    fn test_duplicate_titles_allowed() {
        let format = FormatConfig::new(vec![
            ColumnSpec::new("A", "a"),
            ColumnSpec::new("A", "b"),
        ]);
        assert!(format.is_ok());
    }
}
