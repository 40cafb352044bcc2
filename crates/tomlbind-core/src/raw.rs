//! Raw-source hook: capture the exact text of a value or table instead of binding it.
//!
//! ```
//! use serde::Deserialize;
//! use tomlbind_core::{from_str, RawSource};
//!
//! #[derive(Deserialize)]
//! struct Conf {
//!     ports: RawSource,
//! }
//!
//! let conf: Conf = from_str("ports = [ 8000, 8001 ]").unwrap();
//! assert_eq!(conf.ports.as_str(), "[ 8000, 8001 ]");
//! assert_eq!(conf.ports.line(), 1);
//! ```

use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};
use std::fmt;

/// Newtype-struct name the binder recognizes as a raw-source request.
pub(crate) const RAW_SOURCE_TOKEN: &str = "$__tomlbind_private_RawSource";

/// Source text spanning one value or table, with the line it starts on.
///
/// Binders other than this crate's deliver the node as a plain string with line 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawSource {
    text: String,
    line: usize,
}

impl RawSource {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for RawSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for RawSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_newtype_struct(RAW_SOURCE_TOKEN, RawSourceVisitor)
    }
}

struct RawSourceVisitor;

impl<'de> Visitor<'de> for RawSourceVisitor {
    type Value = RawSource;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("raw source text")
    }

    /// Sent by this crate's binder: `(line, text)`.
    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let line: usize = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let text: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        Ok(RawSource { text, line })
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<Self::Value, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(RawSource { text, line: 0 })
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(RawSource {
            text: v.to_string(),
            line: 0,
        })
    }
}
