//! Quote-aware field tokenizer for logical lines.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{CsvGateError, Result};

const QUOTE: char = '"';

/// Ordered raw field values of one logical line.
///
/// Quotes are stripped and doubled quotes collapsed; nothing is trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow {
    fields: Vec<String>,
}

impl RawRow {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }

    /// Serialize back to a logical line, quoting only where needed.
    ///
    /// Fields containing the separator, a quote or a newline are quoted and
    /// their quotes doubled. The separator must be ASCII.
    pub fn to_line(&self, separator: char) -> Result<String> {
        if !separator.is_ascii() {
            return Err(CsvGateError::InvalidSeparator(separator));
        }

        let mut writer = csv::WriterBuilder::new()
            .delimiter(separator as u8)
            .terminator(csv::Terminator::Any(b'\n'))
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(Vec::new());
        writer.write_record(&self.fields)?;
        let bytes = writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))?;

        let mut line = String::from_utf8_lossy(&bytes).into_owned();
        if line.ends_with('\n') {
            line.pop();
        }
        Ok(line)
    }
}

impl Index<usize> for RawRow {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.fields[index]
    }
}

impl From<Vec<String>> for RawRow {
    fn from(fields: Vec<String>) -> Self {
        Self::new(fields)
    }
}

impl<'a> From<Vec<&'a str>> for RawRow {
    fn from(fields: Vec<&'a str>) -> Self {
        Self::new(fields.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// At the start of a field.
    FieldStart,
    /// Inside a field that did not open with a quote.
    Unquoted,
    /// Inside a quoted field.
    Quoted,
    /// Saw a quote inside a quoted field: either an escape or the closing quote.
    QuoteInQuoted,
    /// Text after a closing quote, kept verbatim until the next separator.
    AfterQuoted,
}

/// Split a logical line into raw fields.
///
/// Never fails on malformed quoting: an unterminated quoted field extends to
/// the end of the line, a quote inside an unquoted field is kept literally, and
/// text after a closing quote is appended to the field. Embedded newlines are
/// returned as newline characters.
pub fn tokenize(line: &str, separator: char) -> RawRow {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut state = State::FieldStart;

    for ch in line.chars() {
        state = match (state, ch) {
            (State::Quoted, QUOTE) => State::QuoteInQuoted,
            (State::Quoted, c) => {
                field.push(c);
                State::Quoted
            }
            (State::QuoteInQuoted, QUOTE) => {
                field.push(QUOTE);
                State::Quoted
            }
            (_, c) if c == separator => {
                fields.push(std::mem::take(&mut field));
                State::FieldStart
            }
            (State::FieldStart, QUOTE) => State::Quoted,
            (State::QuoteInQuoted, c) | (State::AfterQuoted, c) => {
                field.push(c);
                State::AfterQuoted
            }
            (State::FieldStart, c) | (State::Unquoted, c) => {
                field.push(c);
                State::Unquoted
            }
        };
    }

    fields.push(field);
    RawRow::new(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> RawRow {
        RawRow::from(fields.to_vec())
    }

    #[test]
    fn test_plain_fields() {
        assert_eq!(tokenize("a,b,c", ','), row(&["a", "b", "c"]));
    }

    #[test]
    fn test_empty_fields() {
        assert_eq!(tokenize(",,", ','), row(&["", "", ""]));
        assert_eq!(tokenize("", ','), row(&[""]));
    }

    #[test]
    fn test_quoted_separator() {
        assert_eq!(tokenize("\"a,b\",c", ','), row(&["a,b", "c"]));
    }

    #[test]
    fn test_doubled_quotes_collapse() {
        assert_eq!(
            tokenize("\"1\"\"doublehere\",2,3", ','),
            row(&["1\"doublehere", "2", "3"])
        );
        assert_eq!(tokenize("\"\"\"\"\"yy\"\"\"", ','), row(&["\"\"yy\""]));
    }

    #[test]
    fn test_embedded_newline() {
        assert_eq!(tokenize(",,\"\n\"", ','), row(&["", "", "\n"]));
    }

    #[test]
    fn test_whitespace_preserved() {
        assert_eq!(
            tokenize("100 , x,\" y \"", ','),
            row(&["100 ", " x", " y "])
        );
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        assert_eq!(tokenize("a,\"b,c", ','), row(&["a", "b,c"]));
    }

    #[test]
    fn test_quote_inside_unquoted_field_is_literal() {
        assert_eq!(tokenize("ab\"c,d", ','), row(&["ab\"c", "d"]));
    }

    #[test]
    fn test_text_after_closing_quote_appended() {
        assert_eq!(tokenize("\"ab\"c,d", ','), row(&["abc", "d"]));
        assert_eq!(tokenize("\"1\"\n", ','), row(&["1\n"]));
    }

    #[test]
    fn test_custom_separator() {
        assert_eq!(tokenize("a;\"b;c\";d", ';'), row(&["a", "b;c", "d"]));
        assert_eq!(tokenize("a\tb", '\t'), row(&["a", "b"]));
    }

    #[test]
    fn test_to_line_round_trip() {
        let line = "a,\"b,c\",\"d\"\"e\"";
        let parsed = tokenize(line, ',');
        assert_eq!(parsed.to_line(',').unwrap(), line);
    }

    #[test]
    fn test_to_line_rejects_non_ascii_separator() {
        let result = row(&["a"]).to_line('、');
        assert!(matches!(result, Err(CsvGateError::InvalidSeparator('、'))));
    }
}
