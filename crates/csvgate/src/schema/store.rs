//! Directory-backed lookup of named formats.
//!
//! Layout under the store root:
//!
//! ```text
//! <root>/Format/<name>.json      column definitions (JSON array)
//! <root>/Validation/<name>.json  schema document
//! ```

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CsvGateError, Result};

use super::column::FormatConfig;
use super::document::SchemaDocument;

pub const FORMAT_DIR: &str = "Format";
pub const VALIDATION_DIR: &str = "Validation";

static FORMAT_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Reads format definitions and schemas from a directory.
#[derive(Debug, Clone)]
pub struct FormatStore {
    root: PathBuf,
}

impl FormatStore {
    /// Open a store rooted at `root`. The directory must exist; it is never
    /// created.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(CsvGateError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn format_path(&self, name: &str) -> Result<PathBuf> {
        check_name(name)?;
        Ok(self.root.join(FORMAT_DIR).join(format!("{name}.json")))
    }

    pub fn schema_path(&self, name: &str) -> Result<PathBuf> {
        check_name(name)?;
        Ok(self.root.join(VALIDATION_DIR).join(format!("{name}.json")))
    }

    /// Load the column definitions of `name`.
    pub fn format(&self, name: &str) -> Result<FormatConfig> {
        let path = self.format_path(name)?;
        if !path.is_file() {
            return Err(CsvGateError::FormatNotFound {
                name: name.to_string(),
                path,
            });
        }
        let text = read(&path)?;
        FormatConfig::from_json(&text)
    }

    /// Load the schema document of `name`.
    pub fn schema(&self, name: &str) -> Result<SchemaDocument> {
        let path = self.schema_path(name)?;
        if !path.is_file() {
            return Err(CsvGateError::SchemaNotFound {
                name: name.to_string(),
                path,
            });
        }
        SchemaDocument::from_path(&path)
    }

    /// Load both halves of `name`, format first.
    pub fn load(&self, name: &str) -> Result<(FormatConfig, SchemaDocument)> {
        let format = self.format(name)?;
        let schema = self.schema(name)?;
        tracing::debug!(format = name, columns = format.len(), "loaded format");
        Ok((format, schema))
    }
}

fn check_name(name: &str) -> Result<()> {
    if FORMAT_NAME.is_match(name) {
        Ok(())
    } else {
        Err(CsvGateError::InvalidFormatName(name.to_string()))
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| CsvGateError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
