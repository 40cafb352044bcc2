//! # tomlbind-core
//!
//! TOML front end: source text → conflict-checked [`Document`] → typed destination.
//!
//! Parsing is a single hand-written recursive-descent pass that drives a document
//! builder; the builder rejects redeclared keys and tables as it goes. Binding is a
//! `serde::Deserializer` over the finished document, with per-width overflow checks,
//! array homogeneity for typed sequences, and a four-step field-name cascade.
//!
//! ## Quick start
//!
//! ```rust
//! use serde::Deserialize;
//! use tomlbind_core::from_str;
//!
//! #[derive(Deserialize)]
//! struct Fruit {
//!     name: String,
//! }
//!
//! #[derive(Deserialize)]
//! struct Basket {
//!     fruit: Vec<Fruit>,
//! }
//!
//! let basket: Basket = from_str("[[fruit]]\nname = \"apple\"\n[[fruit]]\nname = \"banana\"").unwrap();
//! let names: Vec<_> = basket.fruit.iter().map(|f| f.name.as_str()).collect();
//! assert_eq!(names, ["apple", "banana"]);
//! ```
//!
//! ## Modules
//!
//! - [`scanner`]: grammar engine, source text → builder events
//! - [`document`]: `Document`, `Table`, `Entry`, `Value`
//! - [`datetime`]: date/time/offset values and chrono conversions
//! - [`de`]: the binder (`from_document`, `from_str`)
//! - [`raw`]: `RawSource`, the raw-source hook
//! - [`config`]: parse/bind options
//! - [`error`]: error types

mod builder;
pub mod config;
pub mod datetime;
pub mod de;
pub mod document;
pub mod error;
pub mod raw;
pub mod scanner;

pub use config::Config;
pub use datetime::{Date, Datetime, Offset, Time};
pub use de::{from_document, from_str};
pub use document::{Document, Entry, Float, Integer, Span, Table, TableKind, Value, ValueKind};
pub use error::{Error, Result};
pub use raw::RawSource;
pub use scanner::{parse, parse_with};
