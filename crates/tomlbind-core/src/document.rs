//! The parsed document tree.
//!
//! A [`Document`] owns its root [`Table`] and a copy of the source text, so raw-source
//! hooks can slice the exact text of any node by its [`Span`]. Tables keep entries
//! in declaration order.

use crate::datetime::Datetime;
use indexmap::IndexMap;

/// Byte range `start..end` into the document source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn cover(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// An integer literal as written: digits without prefix or separators, sign and radix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Integer {
    pub digits: String,
    pub negative: bool,
    pub radix: u32,
}

impl Integer {
    /// Absolute value, or `None` when it exceeds `u128`.
    pub fn magnitude(&self) -> Option<u128> {
        u128::from_str_radix(&self.digits, self.radix).ok()
    }

    /// Signed value, or `None` when it exceeds `i128`.
    pub fn to_i128(&self) -> Option<i128> {
        let magnitude = self.magnitude()?;
        if self.negative {
            0i128.checked_sub_unsigned(magnitude)
        } else {
            i128::try_from(magnitude).ok()
        }
    }
}

/// A float literal as written, separators removed. Includes `nan` and `inf` forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Float {
    pub text: String,
}

impl Float {
    pub fn to_f64(&self) -> f64 {
        let (negative, body) = match self.text.as_bytes().first() {
            Some(b'-') => (true, &self.text[1..]),
            Some(b'+') => (false, &self.text[1..]),
            _ => (false, self.text.as_str()),
        };
        let magnitude = match body {
            "nan" => f64::NAN,
            "inf" => f64::INFINITY,
            digits => digits.parse::<f64>().unwrap_or(f64::NAN),
        };
        if negative {
            -magnitude
        } else {
            magnitude
        }
    }
}

/// The payload of a [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    String(String),
    Integer(Integer),
    Float(Float),
    Boolean(bool),
    Datetime(Datetime),
    Array(Vec<Value>),
    /// An inline table written as an array element.
    Table(Table),
}

impl ValueKind {
    /// Human-readable kind name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueKind::String(_) => "string",
            ValueKind::Integer(_) => "integer",
            ValueKind::Float(_) => "float",
            ValueKind::Boolean(_) => "boolean",
            ValueKind::Datetime(_) => "datetime",
            ValueKind::Array(_) => "array",
            ValueKind::Table(_) => "inline table",
        }
    }

    /// Whether two values are the same variant, ignoring payloads.
    pub fn same_variant(&self, other: &ValueKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// A leaf or array value with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub kind: ValueKind,
    pub span: Span,
    pub line: usize,
}

impl Value {
    pub fn new(kind: ValueKind, span: Span, line: usize) -> Self {
        Self { kind, span, line }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match &self.kind {
            ValueKind::Integer(i) => i.to_i128().and_then(|n| i64::try_from(n).ok()),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match &self.kind {
            ValueKind::Float(f) => Some(f.to_f64()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.kind {
            ValueKind::Boolean(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&Datetime> {
        match &self.kind {
            ValueKind::Datetime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match &self.kind {
            ValueKind::Array(items) => Some(items),
            _ => None,
        }
    }
}

/// How a table came into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// `[header]`, an inline table, or an intermediate table created for a dotted header.
    Normal,
    /// One element of an `[[array.table]]`.
    ArrayElement,
}

impl TableKind {
    /// Kind description used in conflict messages.
    pub fn name(self) -> &'static str {
        match self {
            TableKind::Normal => "normal table",
            TableKind::ArrayElement => "array table",
        }
    }
}

/// One named entry of a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    KeyValue(Value),
    Table(Table),
    ArrayOfTables(Vec<Table>),
}

impl Entry {
    /// Line where this entry was first declared.
    pub fn line(&self) -> usize {
        match self {
            Entry::KeyValue(v) => v.line,
            Entry::Table(t) => t.line,
            Entry::ArrayOfTables(ts) => ts.first().map_or(0, |t| t.line),
        }
    }

    /// Kind description used in conflict messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Entry::KeyValue(_) => "key",
            Entry::Table(_) => TableKind::Normal.name(),
            Entry::ArrayOfTables(_) => TableKind::ArrayElement.name(),
        }
    }
}

/// A named collection of entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub entries: IndexMap<String, Entry>,
    pub kind: TableKind,
    pub line: usize,
    pub span: Span,
}

impl Table {
    pub fn new(kind: TableKind, line: usize, span: Span) -> Self {
        Self {
            entries: IndexMap::new(),
            kind,
            line,
            span,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// The value stored under `key`, if that entry is a key/value pair.
    pub fn value(&self, key: &str) -> Option<&Value> {
        match self.entries.get(key) {
            Some(Entry::KeyValue(v)) => Some(v),
            _ => None,
        }
    }

    /// The sub-table stored under `key`, if that entry is a single table.
    pub fn table(&self, key: &str) -> Option<&Table> {
        match self.entries.get(key) {
            Some(Entry::Table(t)) => Some(t),
            _ => None,
        }
    }

    /// The elements stored under `key`, if that entry is an array of tables.
    pub fn array_of_tables(&self, key: &str) -> Option<&[Table]> {
        match self.entries.get(key) {
            Some(Entry::ArrayOfTables(ts)) => Some(ts),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A successfully parsed document: the root table plus the text it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(crate) root: Table,
    pub(crate) source: String,
}

impl Document {
    pub fn root(&self) -> &Table {
        &self.root
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Source text covered by `span`. Empty when the span is out of range.
    pub fn slice(&self, span: Span) -> &str {
        self.source.get(span.start..span.end).unwrap_or("")
    }
}
