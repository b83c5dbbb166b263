//! Header resolution and row mapping.

mod header;
mod row;

pub use header::{resolve, HeaderIndex, HeaderResolution};
pub use row::{map_row, MappedRow};

/// Characters removed from both ends of header titles and mapped values.
const TRIM_CHARS: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];
