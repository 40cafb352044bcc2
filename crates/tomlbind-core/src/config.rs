//! Parse and bind options.

use crate::de;
use crate::document::Document;
use crate::error::Result;
use crate::scanner;
use serde::de::DeserializeOwned;

/// Default bound on nesting depth (arrays, inline tables, header segments).
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options shared by one or more parse/bind calls.
///
/// ```
/// use tomlbind_core::Config;
///
/// let config = Config { max_depth: 4 };
/// assert!(config.parse("a = [[[[[1]]]]]").is_err());
/// assert!(config.parse("a = [[1]]").is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum nesting of arrays and tables. Deeper input fails with `Error::TooDeep`
    /// instead of exhausting the stack.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    /// Parse `source` into a [`Document`] under these options.
    pub fn parse(&self, source: &str) -> Result<Document> {
        scanner::parse_with(source, self)
    }

    /// Parse `source` and bind the result onto a fresh `T`.
    pub fn from_str<T: DeserializeOwned>(&self, source: &str) -> Result<T> {
        let doc = self.parse(source)?;
        de::from_document(&doc)
    }
}
