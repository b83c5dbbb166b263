//! Line normalization: turns raw text into logical lines.
//!
//! A logical line is the full text of one record. Newlines that sit inside a
//! quoted field are data and stay in the line; every other newline separates
//! records. The pass runs in this order:
//!
//! 1. CRLF and lone CR become LF.
//! 2. A leading UTF-8 byte-order mark is dropped.
//! 3. Unquoted multi-line spans are re-quoted (optional, see
//!    [`NormalizeOptions::recover_unquoted_fields`]).
//! 4. Physical lines are folded into records by tracking quote parity.
//! 5. Blank records are dropped or folded when `skip_empty_rows` is set.

use std::fmt;

use serde::{Deserialize, Serialize};

const BYTE_ORDER_MARK: char = '\u{feff}';
const QUOTE: char = '"';

/// Options for [`Normalizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Field separator.
    pub separator: char,
    /// Drop blank records; fold interior empty lines into the previous record.
    pub skip_empty_rows: bool,
    /// Re-quote fields whose unquoted content spans several physical lines.
    pub recover_unquoted_fields: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            separator: ',',
            skip_empty_rows: false,
            recover_unquoted_fields: true,
        }
    }
}

/// The text of one record, with embedded newlines kept as `\n` characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalLine(String);

impl LogicalLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the record spans more than one physical line.
    pub fn is_multiline(&self) -> bool {
        self.0.contains('\n')
    }

    /// Render embedded newlines as the two characters `\n`.
    ///
    /// This is the single-line form used in diagnostics. It is lossy: a field
    /// that already contains a literal backslash-n renders the same way.
    pub fn escaped(&self) -> String {
        self.0.replace('\n', "\\n")
    }
}

impl fmt::Display for LogicalLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LogicalLine {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Tracks whether a character stream is inside a quoted span.
///
/// A doubled quote inside a quoted span toggles the state twice, so parity
/// alone is enough; no lookahead is needed.
#[derive(Debug, Clone, Copy, Default)]
struct QuoteScanner {
    in_quotes: bool,
}

impl QuoteScanner {
    fn feed(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == QUOTE {
                self.in_quotes = !self.in_quotes;
            }
        }
    }

    fn in_quotes(&self) -> bool {
        self.in_quotes
    }
}

/// Separator positions of one physical line, scanned from outside quotes.
#[derive(Debug, Clone, Copy)]
struct LineShape {
    first_separator: Option<usize>,
    last_separator: Option<usize>,
    ends_in_quotes: bool,
}

impl LineShape {
    fn scan(line: &str, separator: char) -> Self {
        let mut shape = Self {
            first_separator: None,
            last_separator: None,
            ends_in_quotes: false,
        };
        let mut in_quotes = false;

        for (idx, ch) in line.char_indices() {
            if ch == QUOTE {
                in_quotes = !in_quotes;
            } else if ch == separator && !in_quotes {
                shape.first_separator.get_or_insert(idx);
                shape.last_separator = Some(idx);
            }
        }

        shape.ends_in_quotes = in_quotes;
        shape
    }
}

/// Splits raw text into [`LogicalLine`]s.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Normalize `text` into logical lines.
    ///
    /// Never fails. Empty input yields a single empty line unless
    /// `skip_empty_rows` is set, in which case it yields none.
    pub fn normalize(&self, text: &str) -> Vec<LogicalLine> {
        let unified = unify_line_endings(text);
        let body = unified
            .strip_prefix(BYTE_ORDER_MARK)
            .unwrap_or(unified.as_str());

        let mut physical: Vec<String> = body.split('\n').map(str::to_string).collect();
        if self.options.recover_unquoted_fields {
            physical = refence_unquoted_spans(physical, self.options.separator);
        }

        let records = fold_quoted_newlines(physical);
        tracing::debug!(records = records.len(), "folded physical lines into records");

        let records = if self.options.skip_empty_rows {
            drop_blank_records(records, self.options.separator)
        } else {
            records
        };

        records.into_iter().map(LogicalLine).collect()
    }
}

/// Normalize with the given separator and default options.
pub fn normalize(text: &str, separator: char) -> Vec<LogicalLine> {
    Normalizer::new(NormalizeOptions {
        separator,
        ..NormalizeOptions::default()
    })
    .normalize(text)
}

fn unify_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Re-quote unquoted content that runs over several physical lines.
///
/// Matches a line whose last field is unquoted, followed by one or more
/// non-empty lines holding neither separator nor quote, followed by a line
/// whose first field is unquoted. An opening line without separators starts
/// the field at its first character. The tail, the middle lines and the head are
/// joined into one quoted field. The merged line is examined again so chains
/// collapse into one record.
fn refence_unquoted_spans(mut lines: Vec<String>, separator: char) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    let mut scanner = QuoteScanner::default();
    let mut idx = 0;

    while idx < lines.len() {
        if !scanner.in_quotes() {
            if let Some(span) = find_unquoted_span(&lines, idx, separator) {
                tracing::warn!(
                    line = idx + 1,
                    span = span.end - idx + 1,
                    "re-quoting unquoted field spanning several lines"
                );
                let merged = span.merge(&lines, idx, separator);
                lines[span.end] = merged;
                idx = span.end;
                continue;
            }
        }

        let line = std::mem::take(&mut lines[idx]);
        scanner.feed(&line);
        out.push(line);
        idx += 1;
    }

    out
}

struct UnquotedSpan {
    /// Index of the line that closes the span.
    end: usize,
    /// Byte offset of the last separator in the opening line. `None` when the
    /// whole opening line is the start of the field.
    open_separator: Option<usize>,
    /// Byte offset of the first separator in the closing line.
    close_separator: usize,
}

impl UnquotedSpan {
    fn merge(&self, lines: &[String], start: usize, separator: char) -> String {
        let opening = &lines[start];
        let closing = &lines[self.end];
        let field_start = self
            .open_separator
            .map_or(0, |idx| idx + separator.len_utf8());

        let mut merged = String::with_capacity(
            lines[start..=self.end].iter().map(|l| l.len() + 1).sum::<usize>() + 2,
        );
        merged.push_str(&opening[..field_start]);
        merged.push(QUOTE);
        merged.push_str(&opening[field_start..]);
        for middle in &lines[start + 1..self.end] {
            merged.push('\n');
            merged.push_str(middle);
        }
        merged.push('\n');
        merged.push_str(&closing[..self.close_separator]);
        merged.push(QUOTE);
        merged.push_str(&closing[self.close_separator..]);
        merged
    }
}

fn find_unquoted_span(lines: &[String], start: usize, separator: char) -> Option<UnquotedSpan> {
    let opening = &lines[start];
    let shape = LineShape::scan(opening, separator);
    if shape.ends_in_quotes {
        return None;
    }
    let open_separator = match shape.last_separator {
        Some(idx) if opening[idx + separator.len_utf8()..].contains(QUOTE) => return None,
        Some(idx) => Some(idx),
        None if is_bare_fragment(opening, separator) => None,
        None => return None,
    };

    let mut end = start + 1;
    while end < lines.len() && is_bare_fragment(&lines[end], separator) {
        end += 1;
    }
    if end == start + 1 || end >= lines.len() {
        return None;
    }

    let closing = &lines[end];
    let close_separator = LineShape::scan(closing, separator).first_separator?;
    if closing[..close_separator].contains(QUOTE) {
        return None;
    }

    Some(UnquotedSpan {
        end,
        open_separator,
        close_separator,
    })
}

fn is_bare_fragment(line: &str, separator: char) -> bool {
    !line.trim().is_empty() && !line.contains(separator) && !line.contains(QUOTE)
}

/// Join physical lines that continue an open quoted span.
fn fold_quoted_newlines(lines: Vec<String>) -> Vec<String> {
    let mut records: Vec<String> = Vec::with_capacity(lines.len());
    let mut scanner = QuoteScanner::default();

    for line in lines {
        if scanner.in_quotes() {
            if let Some(record) = records.last_mut() {
                record.push('\n');
                record.push_str(&line);
                scanner.feed(&line);
                continue;
            }
        }
        scanner.feed(&line);
        records.push(line);
    }

    if scanner.in_quotes() {
        tracing::warn!(
            record = records.len(),
            "unterminated quoted field runs to end of input"
        );
    }

    records
}

/// Apply the skip-empty-rows policy.
///
/// Records that are empty after removing quotes, whitespace and separators are
/// dropped. An exactly-empty line between two kept records is folded into the
/// previous record as a trailing newline instead, which the row mapper's
/// trimming later absorbs.
fn drop_blank_records(records: Vec<String>, separator: char) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(records.len());
    let mut pending_breaks = 0usize;

    for record in records {
        if record.is_empty() {
            if !kept.is_empty() {
                pending_breaks += 1;
            }
            continue;
        }
        if is_blank(&record, separator) {
            continue;
        }
        if let Some(previous) = kept.last_mut() {
            for _ in 0..pending_breaks {
                previous.push('\n');
            }
        }
        pending_breaks = 0;
        kept.push(record);
    }

    kept
}

/// Full-width spaces are data, so only ASCII whitespace counts as blank.
fn is_blank(record: &str, separator: char) -> bool {
    record
        .chars()
        .all(|c| c == QUOTE || c == separator || c.is_ascii_whitespace())
}
