//! Value binder: a `serde::Deserializer` over a finished [`Document`].
//!
//! The destination's `Deserialize` impl is its binding description. Record fields are
//! matched to document keys through [`resolve_field`]. Scalars are checked against the
//! width the destination asks for, so `i8` rejects `300` while `i64` accepts it.
//!
//! # Hooks
//!
//! Each hook is the destination's choice of what to ask the binder for, so the
//! priority order falls out of serde's dispatch:
//!
//! 1. A hand-written `Deserialize` impl sees the binder first and may bind the current
//!    node into any intermediate shape (a helper struct, `serde_json::Value`,
//!    [`RawSource`](crate::RawSource)) before building itself.
//! 2. [`RawSource`](crate::RawSource) receives the exact source text of the node.
//! 3. `deserialize_str` is the text-conversion path: strings and datetimes offer their
//!    text, so `FromStr`-backed types such as chrono's bind from it. Map keys always do.
//! 4. Everything else follows the structural rules below.
//!
//! # Arrays
//!
//! A sequence destination (`deserialize_seq`) requires every element to be the same
//! value variant. Dynamic destinations (`deserialize_any`) and tuples accept mixed
//! arrays.

use crate::config::Config;
use crate::document::{Document, Entry, Span, Table, Value, ValueKind};
use crate::error::{Error, Result};
use crate::raw::RAW_SOURCE_TOKEN;
use serde::de::value::BorrowedStrDeserializer;
use serde::de::{
    DeserializeOwned, DeserializeSeed, Deserializer, EnumAccess, IntoDeserializer, MapAccess,
    SeqAccess, VariantAccess, Visitor,
};
use serde::{forward_to_deserialize_any, Deserialize};

/// Bind `doc` onto a `T`, borrowing strings from the document where `T` allows it.
pub fn from_document<'de, T: Deserialize<'de>>(doc: &'de Document) -> Result<T> {
    log::debug!("binding document into {}", std::any::type_name::<T>());
    T::deserialize(DocumentDeserializer {
        root: &doc.root,
        source: &doc.source,
    })
}

/// Parse `source` and bind it onto a `T` with the default [`Config`].
///
/// ```
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Example {
///     title: String,
/// }
///
/// let ex: Example = tomlbind_core::from_str(r#"title = "TOML Example""#).unwrap();
/// assert_eq!(ex.title, "TOML Example");
/// ```
pub fn from_str<T: DeserializeOwned>(source: &str) -> Result<T> {
    Config::default().from_str(source)
}

// ---------------------------------------------------------------------------
// Field-name cascade
// ---------------------------------------------------------------------------

fn title_case(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Find the destination field a document key binds to.
///
/// `fields` are the destination's declared names after any `#[serde(rename)]`;
/// skipped fields never appear in it. Candidates are tried in order across all
/// fields: the declared name itself, then its Title-case form (`Name`), then its
/// camelCase form (`serverName`), then its upper-case form (`SERVER_NAME`).
///
/// The transforms apply to the field names, never to the key: `serverName` reaches
/// `server_name`, while `ServerName` matches no step and fails to bind.
pub fn resolve_field(key: &str, fields: &'static [&'static str]) -> Option<&'static str> {
    let transforms: [fn(&str) -> String; 4] = [
        str::to_string,
        title_case,
        camel_case,
        str::to_uppercase,
    ];
    transforms
        .iter()
        .find_map(|transform| fields.iter().copied().find(|f| transform(f) == key))
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Node<'de> {
    Value(&'de Value),
    Table(&'de Table),
    Tables(&'de [Table]),
}

impl<'de> Node<'de> {
    fn of_value(value: &'de Value) -> Self {
        match &value.kind {
            ValueKind::Table(table) => Node::Table(table),
            _ => Node::Value(value),
        }
    }

    fn of_entry(entry: &'de Entry) -> Self {
        match entry {
            Entry::KeyValue(value) => Node::of_value(value),
            Entry::Table(table) => Node::Table(table),
            Entry::ArrayOfTables(tables) => Node::Tables(tables),
        }
    }

    fn line(self) -> usize {
        match self {
            Node::Value(v) => v.line,
            Node::Table(t) => t.line,
            Node::Tables(ts) => ts.first().map_or(0, |t| t.line),
        }
    }

    fn span(self) -> Span {
        match self {
            Node::Value(v) => v.span,
            Node::Table(t) => t.span,
            Node::Tables(ts) => ts
                .iter()
                .map(|t| t.span)
                .reduce(Span::cover)
                .unwrap_or_default(),
        }
    }

    fn kind_name(self) -> &'static str {
        match self {
            Node::Value(v) => v.kind.type_name(),
            Node::Table(_) => "table",
            Node::Tables(_) => "array of tables",
        }
    }
}

// ---------------------------------------------------------------------------
// Document (top-level bind target)
// ---------------------------------------------------------------------------

struct DocumentDeserializer<'de> {
    root: &'de Table,
    source: &'de str,
}

impl<'de> DocumentDeserializer<'de> {
    fn node(&self) -> NodeDeserializer<'de> {
        NodeDeserializer {
            node: Node::Table(self.root),
            source: self.source,
        }
    }

    fn reject(what: &str) -> Error {
        Error::InvalidTarget(format!("a document cannot be bound into {what}"))
    }
}

macro_rules! reject_targets {
    ($($method:ident => $what:literal,)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
                Err(Self::reject($what))
            }
        )*
    };
}

impl<'de> Deserializer<'de> for DocumentDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.node().deserialize_any(visitor)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.node().deserialize_struct(name, fields, visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.node().deserialize_map(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        if name == RAW_SOURCE_TOKEN {
            return self.node().deserialize_newtype_struct(name, visitor);
        }
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.node().deserialize_enum(name, variants, visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        _visitor: V,
    ) -> Result<V::Value> {
        Err(Self::reject(name))
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, _visitor: V) -> Result<V::Value> {
        Err(Self::reject("a tuple"))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value> {
        Err(Self::reject(name))
    }

    reject_targets! {
        deserialize_bool => "bool",
        deserialize_i8 => "i8",
        deserialize_i16 => "i16",
        deserialize_i32 => "i32",
        deserialize_i64 => "i64",
        deserialize_i128 => "i128",
        deserialize_u8 => "u8",
        deserialize_u16 => "u16",
        deserialize_u32 => "u32",
        deserialize_u64 => "u64",
        deserialize_u128 => "u128",
        deserialize_f32 => "f32",
        deserialize_f64 => "f64",
        deserialize_char => "char",
        deserialize_str => "a string",
        deserialize_string => "a string",
        deserialize_bytes => "bytes",
        deserialize_byte_buf => "bytes",
        deserialize_unit => "unit",
        deserialize_seq => "a sequence",
        deserialize_identifier => "an identifier",
    }
}

// ---------------------------------------------------------------------------
// Any node
// ---------------------------------------------------------------------------

struct NodeDeserializer<'de> {
    node: Node<'de>,
    source: &'de str,
}

macro_rules! bind_integer {
    ($($method:ident => $visit:ident, $ty:ty;)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
                let n = self.integer(stringify!($ty))?;
                let n = <$ty>::try_from(n).map_err(|_| self.overflow(stringify!($ty)))?;
                visitor.$visit(n)
            }
        )*
    };
}

impl<'de> NodeDeserializer<'de> {
    fn new(node: Node<'de>, source: &'de str) -> Self {
        Self { node, source }
    }

    fn mismatch(&self, expected: &str) -> Error {
        Error::TypeMismatch {
            found: self.node.kind_name().to_string(),
            expected: expected.to_string(),
        }
    }

    fn literal(&self) -> String {
        let span = self.node.span();
        self.source
            .get(span.start..span.end)
            .unwrap_or_default()
            .to_string()
    }

    fn overflow(&self, kind: &'static str) -> Error {
        Error::Overflow {
            kind,
            literal: self.literal(),
        }
    }

    fn value(&self) -> Option<&'de Value> {
        match self.node {
            Node::Value(v) => Some(v),
            _ => None,
        }
    }

    /// The literal as `i128`; wider literals overflow every integer destination but `u128`.
    fn integer(&self, kind: &'static str) -> Result<i128> {
        match self.value().map(|v| &v.kind) {
            Some(ValueKind::Integer(int)) => int.to_i128().ok_or_else(|| self.overflow(kind)),
            _ => Err(self.mismatch(kind)),
        }
    }

    fn float(&self, kind: &'static str) -> Result<f64> {
        match self.value().map(|v| &v.kind) {
            Some(ValueKind::Float(f)) => Ok(f.to_f64()),
            Some(ValueKind::Integer(int)) => match int.to_i128() {
                Some(n) => Ok(n as f64),
                None => Err(self.overflow(kind)),
            },
            _ => Err(self.mismatch(kind)),
        }
    }

    fn visit_array<V: Visitor<'de>>(&self, items: &'de [Value], visitor: V) -> Result<V::Value> {
        visitor.visit_seq(ArrayAccess {
            iter: items.iter(),
            source: self.source,
        })
    }

    fn visit_tables<V: Visitor<'de>>(&self, tables: &'de [Table], visitor: V) -> Result<V::Value> {
        visitor.visit_seq(TablesAccess {
            iter: tables.iter(),
            source: self.source,
        })
    }

    fn visit_record<V: Visitor<'de>>(
        &self,
        name: &'de str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.node {
            Node::Table(table) => visitor.visit_map(TableAccess::new(
                table,
                Mode::Record { name, fields },
                self.source,
            )),
            _ => Err(self.mismatch(name)),
        }
    }
}

impl<'de> Deserializer<'de> for NodeDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let value = match self.node {
            Node::Table(table) => {
                return visitor.visit_map(TableAccess::new(table, Mode::Map, self.source))
            }
            Node::Tables(tables) => return self.visit_tables(tables, visitor),
            Node::Value(value) => value,
        };
        match &value.kind {
            ValueKind::String(s) => visitor.visit_borrowed_str(s),
            ValueKind::Integer(int) => match int.to_i128() {
                Some(n) => {
                    if let Ok(n) = i64::try_from(n) {
                        visitor.visit_i64(n)
                    } else if let Ok(n) = u64::try_from(n) {
                        visitor.visit_u64(n)
                    } else {
                        Err(self.overflow("i64"))
                    }
                }
                None => Err(self.overflow("i64")),
            },
            ValueKind::Float(f) => visitor.visit_f64(f.to_f64()),
            ValueKind::Boolean(b) => visitor.visit_bool(*b),
            ValueKind::Datetime(dt) => visitor.visit_string(dt.to_string()),
            ValueKind::Array(items) => self.visit_array(items, visitor),
            ValueKind::Table(table) => {
                visitor.visit_map(TableAccess::new(table, Mode::Map, self.source))
            }
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value().map(|v| &v.kind) {
            Some(ValueKind::Boolean(b)) => visitor.visit_bool(*b),
            _ => Err(self.mismatch("bool")),
        }
    }

    bind_integer! {
        deserialize_i8 => visit_i8, i8;
        deserialize_i16 => visit_i16, i16;
        deserialize_i32 => visit_i32, i32;
        deserialize_i64 => visit_i64, i64;
        deserialize_i128 => visit_i128, i128;
        deserialize_u8 => visit_u8, u8;
        deserialize_u16 => visit_u16, u16;
        deserialize_u32 => visit_u32, u32;
        deserialize_u64 => visit_u64, u64;
    }

    fn deserialize_u128<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value().map(|v| &v.kind) {
            Some(ValueKind::Integer(int)) => match int.magnitude() {
                Some(0) => visitor.visit_u128(0),
                Some(n) if !int.negative => visitor.visit_u128(n),
                _ => Err(self.overflow("u128")),
            },
            _ => Err(self.mismatch("u128")),
        }
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let x = self.float("f32")?;
        if x.is_finite() && x.abs() > f64::from(f32::MAX) {
            return Err(self.overflow("f32"));
        }
        visitor.visit_f32(x as f32)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f64(self.float("f64")?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value().and_then(Value::as_str) {
            Some(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => visitor.visit_char(c),
                    _ => Err(Error::TypeMismatch {
                        found: format!("string `{s}`"),
                        expected: "char".to_string(),
                    }),
                }
            }
            None => Err(self.mismatch("char")),
        }
    }

    /// Text-conversion path: strings and datetimes both offer their text.
    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value().map(|v| &v.kind) {
            Some(ValueKind::String(s)) => visitor.visit_borrowed_str(s),
            Some(ValueKind::Datetime(dt)) => visitor.visit_string(dt.to_string()),
            _ => Err(self.mismatch("string")),
        }
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value().and_then(Value::as_str) {
            Some(s) => visitor.visit_borrowed_str(s),
            None => Err(self.mismatch("string")),
        }
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value().map(|v| &v.kind) {
            Some(ValueKind::String(s)) => visitor.visit_borrowed_bytes(s.as_bytes()),
            Some(ValueKind::Array(_)) => self.deserialize_seq(visitor),
            _ => Err(self.mismatch("bytes")),
        }
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_bytes(visitor)
    }

    /// Every present node is `Some`; absent keys are left to the destination's default.
    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(self.mismatch("unit"))
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        _visitor: V,
    ) -> Result<V::Value> {
        Err(self.mismatch(name))
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        if name == RAW_SOURCE_TOKEN {
            let span = self.node.span();
            return visitor.visit_seq(RawAccess {
                line: self.node.line(),
                text: self.source.get(span.start..span.end).unwrap_or_default(),
                index: 0,
            });
        }
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.node {
            Node::Tables(tables) => self.visit_tables(tables, visitor),
            Node::Value(Value {
                kind: ValueKind::Array(items),
                ..
            }) => {
                if let Some(first) = items.first() {
                    if items.iter().any(|v| !v.kind.same_variant(&first.kind)) {
                        return Err(Error::MultipleTypes);
                    }
                }
                self.visit_array(items, visitor)
            }
            _ => Err(self.mismatch("a sequence")),
        }
    }

    /// Tuples are positional, so each element may have its own type.
    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        match self.node {
            Node::Tables(tables) => self.visit_tables(tables, visitor),
            Node::Value(Value {
                kind: ValueKind::Array(items),
                ..
            }) => self.visit_array(items, visitor),
            _ => Err(self.mismatch("a tuple")),
        }
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.node {
            Node::Table(table) => {
                visitor.visit_map(TableAccess::new(table, Mode::Map, self.source))
            }
            _ => Err(self.mismatch("a map")),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.visit_record(name, fields, visitor)
    }

    /// A string names a unit variant; a single-entry table names a variant with data.
    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.node {
            Node::Value(Value {
                kind: ValueKind::String(s),
                ..
            }) => visitor.visit_enum(s.as_str().into_deserializer()),
            Node::Table(table) if table.len() == 1 => {
                let Some((key, entry)) = table.entries.iter().next() else {
                    return Err(self.mismatch(name));
                };
                visitor.visit_enum(TableEnum {
                    key,
                    entry,
                    source: self.source,
                })
            }
            _ => Err(self.mismatch(name)),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }
}

// ---------------------------------------------------------------------------
// Sequences
// ---------------------------------------------------------------------------

struct ArrayAccess<'de> {
    iter: std::slice::Iter<'de, Value>,
    source: &'de str,
}

impl<'de> SeqAccess<'de> for ArrayAccess<'de> {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        let Some(value) = self.iter.next() else {
            return Ok(None);
        };
        seed.deserialize(NodeDeserializer::new(Node::of_value(value), self.source))
            .map(Some)
            .map_err(|e| e.located(value.line, None))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct TablesAccess<'de> {
    iter: std::slice::Iter<'de, Table>,
    source: &'de str,
}

impl<'de> SeqAccess<'de> for TablesAccess<'de> {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        let Some(table) = self.iter.next() else {
            return Ok(None);
        };
        seed.deserialize(NodeDeserializer::new(Node::Table(table), self.source))
            .map(Some)
            .map_err(|e| e.located(table.line, None))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// `(line, text)` for a [`RawSource`](crate::RawSource) request.
struct RawAccess<'de> {
    line: usize,
    text: &'de str,
    index: u8,
}

impl<'de> SeqAccess<'de> for RawAccess<'de> {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        self.index += 1;
        match self.index {
            1 => seed.deserialize(self.line.into_deserializer()).map(Some),
            2 => seed
                .deserialize(BorrowedStrDeserializer::<Error>::new(self.text))
                .map(Some),
            _ => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Mode<'de> {
    /// Keys resolve to declared field names; unknown keys fail.
    Record {
        name: &'de str,
        fields: &'static [&'static str],
    },
    /// Keys convert into the container's key type.
    Map,
}

struct TableAccess<'de> {
    iter: indexmap::map::Iter<'de, String, Entry>,
    mode: Mode<'de>,
    pending: Option<(Option<&'static str>, &'de Entry)>,
    source: &'de str,
}

impl<'de> TableAccess<'de> {
    fn new(table: &'de Table, mode: Mode<'de>, source: &'de str) -> Self {
        Self {
            iter: table.entries.iter(),
            mode,
            pending: None,
            source,
        }
    }
}

impl<'de> MapAccess<'de> for TableAccess<'de> {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        let Some((key, entry)) = self.iter.next() else {
            return Ok(None);
        };
        let line = entry.line();
        match self.mode {
            Mode::Record { name, fields } => {
                let field = resolve_field(key, fields).ok_or_else(|| {
                    Error::FieldNotDefined {
                        key: key.clone(),
                        type_name: name.to_string(),
                    }
                    .located(line, None)
                })?;
                self.pending = Some((Some(field), entry));
                seed.deserialize(BorrowedStrDeserializer::<Error>::new(field))
                    .map(Some)
            }
            Mode::Map => {
                self.pending = Some((None, entry));
                seed.deserialize(KeyDeserializer { key })
                    .map(Some)
                    .map_err(|e| e.located(line, None))
            }
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        let (field, entry) = self
            .pending
            .take()
            .ok_or_else(|| Error::Custom("value requested before its key".to_string()))?;
        let path = match (self.mode, field) {
            (Mode::Record { name, .. }, Some(field)) => Some(format!("{name}.{field}")),
            _ => None,
        };
        seed.deserialize(NodeDeserializer::new(Node::of_entry(entry), self.source))
            .map_err(|e| e.located(entry.line(), path))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// Converts a table key into a container's key type.
struct KeyDeserializer<'de> {
    key: &'de str,
}

macro_rules! bind_key_integer {
    ($($method:ident => $visit:ident, $ty:ty;)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
                visitor.$visit(self.integer::<$ty>(stringify!($ty))?)
            }
        )*
    };
}

impl<'de> KeyDeserializer<'de> {
    fn integer<T: TryFrom<i128>>(&self, kind: &'static str) -> Result<T> {
        let n: i128 = self.key.parse().map_err(|_| Error::TypeMismatch {
            found: format!("key `{}`", self.key),
            expected: kind.to_string(),
        })?;
        T::try_from(n).map_err(|_| Error::Overflow {
            kind,
            literal: self.key.to_string(),
        })
    }
}

impl<'de> Deserializer<'de> for KeyDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_borrowed_str(self.key)
    }

    bind_key_integer! {
        deserialize_i8 => visit_i8, i8;
        deserialize_i16 => visit_i16, i16;
        deserialize_i32 => visit_i32, i32;
        deserialize_i64 => visit_i64, i64;
        deserialize_i128 => visit_i128, i128;
        deserialize_u8 => visit_u8, u8;
        deserialize_u16 => visit_u16, u16;
        deserialize_u32 => visit_u32, u32;
        deserialize_u64 => visit_u64, u64;
        deserialize_u128 => visit_u128, u128;
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.key {
            "true" => visitor.visit_bool(true),
            "false" => visitor.visit_bool(false),
            other => Err(Error::TypeMismatch {
                found: format!("key `{other}`"),
                expected: "bool".to_string(),
            }),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_enum(self.key.into_deserializer())
    }

    forward_to_deserialize_any! {
        f32 f64 char str string bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// `{ Variant = <content> }`.
struct TableEnum<'de> {
    key: &'de str,
    entry: &'de Entry,
    source: &'de str,
}

impl<'de> EnumAccess<'de> for TableEnum<'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<(T::Value, Self)> {
        let variant = seed.deserialize(BorrowedStrDeserializer::<Error>::new(self.key))?;
        Ok((variant, self))
    }
}

impl<'de> TableEnum<'de> {
    fn content(&self) -> NodeDeserializer<'de> {
        NodeDeserializer::new(Node::of_entry(self.entry), self.source)
    }
}

impl<'de> VariantAccess<'de> for TableEnum<'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Err(Error::TypeMismatch {
            found: format!("table `{}`", self.key),
            expected: "unit variant".to_string(),
        })
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        let line = self.entry.line();
        seed.deserialize(self.content())
            .map_err(|e| e.located(line, Some(self.key.to_string())))
    }

    fn tuple_variant<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        let line = self.entry.line();
        Deserializer::deserialize_tuple(self.content(), len, visitor)
            .map_err(|e| e.located(line, Some(self.key.to_string())))
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        let line = self.entry.line();
        self.content()
            .visit_record(self.key, fields, visitor)
            .map_err(|e| e.located(line, Some(self.key.to_string())))
    }
}
