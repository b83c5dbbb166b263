//! Mapping raw rows to named records.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::input::RawRow;
use crate::schema::FormatConfig;

use super::header::HeaderIndex;
use super::TRIM_CHARS;

/// A record keyed by column name, one entry per format column, in format
/// order. Values are never type-converted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappedRow {
    values: IndexMap<String, String>,
}

impl MappedRow {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// JSON object form, as handed to schema validation.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        )
    }

    pub fn into_inner(self) -> IndexMap<String, String> {
        self.values
    }
}

impl FromIterator<(String, String)> for MappedRow {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Resolve `row` into a [`MappedRow`].
///
/// With a header index each column is looked up by title; without one, by its
/// position in the format. A present value is trimmed. An absent value takes
/// the column default verbatim, or the empty string.
pub fn map_row(row: &RawRow, header: Option<&HeaderIndex>, columns: &FormatConfig) -> MappedRow {
    columns
        .iter()
        .enumerate()
        .map(|(ordinal, column)| {
            let source = match header {
                Some(index) => index.position(&column.title),
                None => Some(ordinal),
            };

            let value = match (source.and_then(|idx| row.get(idx)), &column.default) {
                (Some(raw), _) => raw.trim_matches(TRIM_CHARS).to_string(),
                (None, Some(default)) => default.clone(),
                (None, None) => String::new(),
            };

            (column.name.clone(), value)
        })
        .collect()
}
