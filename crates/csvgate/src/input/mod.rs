//! Text input: line normalization and tokenization.

mod normalizer;
mod tokenizer;

pub use normalizer::{normalize, LogicalLine, NormalizeOptions, Normalizer};
pub use tokenizer::{tokenize, RawRow};
