//! Header row resolution against a format.

use indexmap::IndexMap;
use serde::Serialize;

use crate::input::RawRow;
use crate::schema::FormatConfig;

use super::TRIM_CHARS;

/// Positions of each title in a header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderIndex {
    positions: IndexMap<String, Vec<usize>>,
}

impl HeaderIndex {
    /// Index the titles of `header`, trimmed like mapped values.
    pub fn from_row(header: &RawRow) -> Self {
        let mut positions: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (idx, title) in header.iter().enumerate() {
            let title = title.trim_matches(TRIM_CHARS);
            positions.entry(title.to_string()).or_default().push(idx);
        }
        Self { positions }
    }

    /// First position of `title`.
    pub fn position(&self, title: &str) -> Option<usize> {
        self.positions.get(title).and_then(|p| p.first().copied())
    }

    /// Every position of `title`, in header order.
    pub fn positions(&self, title: &str) -> &[usize] {
        self.positions.get(title).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, title: &str) -> bool {
        self.positions.contains_key(title)
    }

    /// Titles appearing more than once, in order of first appearance.
    pub fn duplicates(&self) -> impl Iterator<Item = &str> {
        self.positions
            .iter()
            .filter(|(_, p)| p.len() > 1)
            .map(|(title, _)| title.as_str())
    }
}

/// Header problems found by [`resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderResolution {
    /// Titles of required columns absent from the header, in format order.
    pub missing: Vec<String>,
    /// Format titles appearing more than once in the header.
    pub duplicates: Vec<String>,
}

impl HeaderResolution {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.duplicates.is_empty()
    }

    /// Human-readable header errors: missing columns first, then duplicates.
    pub fn messages(&self) -> Vec<String> {
        self.missing
            .iter()
            .map(|title| format!("Header column doesn't match. Expected: {title}"))
            .chain(
                self.duplicates
                    .iter()
                    .map(|title| format!("Duplicate header column: {title}")),
            )
            .collect()
    }
}

/// Check `header` against `columns`.
///
/// Column order in the header does not matter. Columns with a default may be
/// absent. When `detect_duplicates` is set, titles that the format knows and
/// that appear more than once are reported once each; other repeated titles
/// are ignored.
pub fn resolve(
    header: &RawRow,
    columns: &FormatConfig,
    detect_duplicates: bool,
) -> (HeaderIndex, HeaderResolution) {
    let index = HeaderIndex::from_row(header);

    let missing = columns
        .iter()
        .filter(|c| c.is_required() && !index.contains(&c.title))
        .map(|c| c.title.clone())
        .collect();

    let duplicates = if detect_duplicates {
        index
            .duplicates()
            .filter(|title| columns.has_title(title))
            .map(str::to_string)
            .collect()
    } else {
        Vec::new()
    };

    (index, HeaderResolution { missing, duplicates })
}
