//! Document builder: grows the table tree from scanner events.
//!
//! The builder owns all construction state for one parse. The table currently
//! receiving key/values is addressed by its key path from the scope root; the path is
//! re-resolved on each insert, which keeps the tree free of aliasing handles.
//!
//! # Conflict rules
//!
//! - A key names exactly one of {value, table, array of tables} within its parent.
//! - `[a.b]` creates missing intermediates as normal tables. A table created that way
//!   may later be declared explicitly once; declaring the same header twice conflicts.
//! - `[[a.b]]` appends an element; the last segment must not be a value or normal table.
//! - Inline tables bound to a key enter that key like a header and are registered, so
//!   a later header naming them conflicts.
//!
//! The construction registry is keyed by the resolved path, including the element
//! index of every array of tables traversed, so `[a.b]` under two different `[[a]]`
//! elements names two different tables.

use crate::document::{Document, Entry, Span, Table, TableKind, Value, ValueKind};
use crate::error::{Error, Result};
use std::collections::HashMap;

/// A key as written in the source, after unquoting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Key {
    pub name: String,
    pub span: Span,
}

/// One segment of a fully qualified table name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Segment {
    Key(String),
    Index(usize),
}

fn dotted(name: &[Segment]) -> String {
    let mut out = String::new();
    for seg in name {
        match seg {
            Segment::Key(k) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(k);
            }
            Segment::Index(i) => out.push_str(&format!("[{i}]")),
        }
    }
    out
}

/// Declaration recorded in the construction registry.
#[derive(Debug, Clone, Copy)]
struct Declared {
    line: usize,
    kind: TableKind,
}

/// A tree under construction: the document itself, or a detached inline table that
/// is an array element.
#[derive(Debug)]
struct Scope {
    root: Table,
    current: Vec<String>,
    current_name: Vec<Segment>,
}

impl Scope {
    fn new(root: Table) -> Self {
        Self {
            root,
            current: Vec::new(),
            current_name: Vec::new(),
        }
    }
}

/// Saved context of a key-bound inline table.
#[derive(Debug)]
struct InlineFrame {
    key: String,
    saved_path: Vec<String>,
    saved_name: Vec<Segment>,
}

#[derive(Debug)]
pub(crate) struct Builder {
    scopes: Vec<Scope>,
    inline_stack: Vec<InlineFrame>,
    arrays: Vec<Vec<Value>>,
    registry: HashMap<Vec<Segment>, Declared>,
    max_depth: usize,
}

fn conflict(line: usize, key: impl Into<String>, existing: &Entry) -> Error {
    Error::Conflict {
        line,
        key: key.into(),
        original_kind: existing.kind_name(),
        original_line: existing.line(),
    }
}

/// Follow `path` from `table`, taking the last element of any array of tables.
fn resolve<'t>(mut table: &'t mut Table, path: &[String]) -> Option<&'t mut Table> {
    for key in path {
        table = match table.entries.get_mut(key)? {
            Entry::Table(t) => t,
            Entry::ArrayOfTables(ts) => ts.last_mut()?,
            Entry::KeyValue(_) => return None,
        };
    }
    Some(table)
}

/// Descend into `key`, creating a normal table when it is absent.
fn enter<'t>(
    table: &'t mut Table,
    key: &Key,
    line: usize,
    span: Span,
    name: &mut Vec<Segment>,
) -> Result<&'t mut Table> {
    name.push(Segment::Key(key.name.clone()));
    let entry = table
        .entries
        .entry(key.name.clone())
        .or_insert_with(|| Entry::Table(Table::new(TableKind::Normal, line, span)));
    match entry {
        Entry::Table(t) => Ok(t),
        Entry::ArrayOfTables(ts) => {
            name.push(Segment::Index(ts.len().saturating_sub(1)));
            ts.last_mut()
                .ok_or_else(|| Error::syntax(line, format!("empty array of tables `{}`", key.name)))
        }
        Entry::KeyValue(v) => Err(Error::Conflict {
            line,
            key: key.name.clone(),
            original_kind: "key",
            original_line: v.line,
        }),
    }
}

fn lost_path(line: usize) -> Error {
    Error::syntax(line, "current table is no longer reachable")
}

impl Builder {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            scopes: vec![Scope::new(Table::new(TableKind::Normal, 1, Span::default()))],
            inline_stack: Vec::new(),
            arrays: Vec::new(),
            registry: HashMap::new(),
            max_depth,
        }
    }

    fn check_depth(&self, depth: usize, line: usize) -> Result<()> {
        if depth > self.max_depth {
            return Err(Error::TooDeep {
                line,
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn scope_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    /// `[a.b.c]`: resolve the path, create what is missing, make it current.
    pub(crate) fn table_header(&mut self, keys: &[Key], line: usize, span: Span) -> Result<()> {
        self.check_depth(keys.len(), line)?;
        log::trace!("table header at line {line}: {keys:?}");
        let Some((last, prefix)) = keys.split_last() else {
            return Err(Error::syntax(line, "table header without a key"));
        };

        let scope = &mut self.scopes[0];
        let mut name = Vec::with_capacity(keys.len());
        let mut table = &mut scope.root;
        for key in prefix {
            table = enter(table, key, line, span, &mut name)?;
        }
        name.push(Segment::Key(last.name.clone()));

        match table.entries.get_mut(&last.name) {
            None => {
                table.entries.insert(
                    last.name.clone(),
                    Entry::Table(Table::new(TableKind::Normal, line, span)),
                );
            }
            Some(Entry::Table(implicit)) => {
                if let Some(declared) = self.registry.get(&name) {
                    return Err(Error::Conflict {
                        line,
                        key: dotted(&name),
                        original_kind: declared.kind.name(),
                        original_line: declared.line,
                    });
                }
                // The header becomes the table's declaration; entries made
                // through its subtables stay.
                implicit.line = line;
                implicit.span = span;
            }
            Some(existing) => return Err(conflict(line, dotted(&name), existing)),
        }

        self.registry.insert(
            name.clone(),
            Declared {
                line,
                kind: TableKind::Normal,
            },
        );
        scope.current = keys.iter().map(|k| k.name.clone()).collect();
        scope.current_name = name;
        Ok(())
    }

    /// `[[a.b]]`: resolve the prefix, then append a fresh element to `b`.
    pub(crate) fn array_table_header(
        &mut self,
        keys: &[Key],
        line: usize,
        span: Span,
    ) -> Result<()> {
        self.check_depth(keys.len(), line)?;
        log::trace!("array table header at line {line}: {keys:?}");
        let Some((last, prefix)) = keys.split_last() else {
            return Err(Error::syntax(line, "array table header without a key"));
        };

        let scope = &mut self.scopes[0];
        let mut name = Vec::with_capacity(keys.len() + 1);
        let mut table = &mut scope.root;
        for key in prefix {
            table = enter(table, key, line, span, &mut name)?;
        }
        name.push(Segment::Key(last.name.clone()));

        let element = Table::new(TableKind::ArrayElement, line, span);
        let index = match table.entries.get_mut(&last.name) {
            None => {
                table
                    .entries
                    .insert(last.name.clone(), Entry::ArrayOfTables(vec![element]));
                0
            }
            Some(Entry::ArrayOfTables(ts)) => {
                ts.push(element);
                ts.len() - 1
            }
            Some(existing) => return Err(conflict(line, dotted(&name), existing)),
        };
        name.push(Segment::Index(index));

        self.registry.insert(
            name.clone(),
            Declared {
                line,
                kind: TableKind::ArrayElement,
            },
        );
        scope.current = keys.iter().map(|k| k.name.clone()).collect();
        scope.current_name = name;
        Ok(())
    }

    /// Insert `key = value` into the current table.
    pub(crate) fn key_value(&mut self, key: Key, value: Value) -> Result<()> {
        let line = value.line;
        let scope = self.scope_mut();
        let table = resolve(&mut scope.root, &scope.current).ok_or_else(|| lost_path(line))?;
        if let Some(existing) = table.entries.get(&key.name) {
            return Err(conflict(line, key.name, existing));
        }
        table.span = table.span.cover(key.span.cover(value.span));
        table.entries.insert(key.name, Entry::KeyValue(value));
        Ok(())
    }

    /// `key = {`: create the table under `key` and make it current until the matching
    /// [`end_inline_table`](Self::end_inline_table).
    pub(crate) fn begin_inline_table(&mut self, key: Key, line: usize, start: usize) -> Result<()> {
        let depth = self.scope_mut().current.len() + 1;
        self.check_depth(depth, line)?;
        log::trace!("inline table `{}` at line {line}", key.name);

        let in_document = self.scopes.len() == 1;
        let scope = self.scope_mut();
        let table = resolve(&mut scope.root, &scope.current).ok_or_else(|| lost_path(line))?;
        if let Some(existing) = table.entries.get(&key.name) {
            return Err(conflict(line, key.name, existing));
        }
        table.entries.insert(
            key.name.clone(),
            Entry::Table(Table::new(TableKind::Normal, line, Span::new(start, start))),
        );

        let frame = InlineFrame {
            key: key.name.clone(),
            saved_path: scope.current.clone(),
            saved_name: scope.current_name.clone(),
        };
        scope.current.push(key.name.clone());
        scope.current_name.push(Segment::Key(key.name));
        let name = scope.current_name.clone();
        if in_document {
            self.registry.insert(
                name,
                Declared {
                    line,
                    kind: TableKind::Normal,
                },
            );
        }
        self.inline_stack.push(frame);
        Ok(())
    }

    /// `}` of a key-bound inline table: record its extent and restore the outer table.
    pub(crate) fn end_inline_table(&mut self, end: usize, line: usize) -> Result<()> {
        let frame = self
            .inline_stack
            .pop()
            .ok_or_else(|| Error::syntax(line, "unbalanced inline table"))?;
        log::trace!("leaving inline table `{}` at line {line}", frame.key);
        let scope = self.scope_mut();
        let table = resolve(&mut scope.root, &scope.current).ok_or_else(|| lost_path(line))?;
        table.span.end = end;
        scope.current = frame.saved_path;
        scope.current_name = frame.saved_name;
        Ok(())
    }

    /// `{` as an array element: start a detached table.
    pub(crate) fn begin_inline_element(&mut self, line: usize, start: usize) {
        self.scopes.push(Scope::new(Table::new(
            TableKind::Normal,
            line,
            Span::new(start, start),
        )));
    }

    /// `}` of an array-element inline table: the finished table as a value.
    pub(crate) fn end_inline_element(&mut self, end: usize, line: usize) -> Result<Value> {
        if self.scopes.len() < 2 {
            return Err(Error::syntax(line, "unbalanced inline table"));
        }
        let mut table = match self.scopes.pop() {
            Some(scope) => scope.root,
            None => return Err(Error::syntax(line, "unbalanced inline table")),
        };
        table.span.end = end;
        let span = table.span;
        let declared = table.line;
        Ok(Value::new(ValueKind::Table(table), span, declared))
    }

    pub(crate) fn begin_array(&mut self) {
        self.arrays.push(Vec::new());
    }

    pub(crate) fn push_element(&mut self, value: Value) {
        if let Some(top) = self.arrays.last_mut() {
            top.push(value);
        }
    }

    pub(crate) fn end_array(&mut self, span: Span, line: usize) -> Value {
        let items = self.arrays.pop().unwrap_or_default();
        Value::new(ValueKind::Array(items), span, line)
    }

    /// Hand over the finished tree; the registry is dropped here.
    pub(crate) fn finish(self, source: &str) -> Document {
        let mut root = self
            .scopes
            .into_iter()
            .next()
            .map(|scope| scope.root)
            .unwrap_or_else(|| Table::new(TableKind::Normal, 1, Span::default()));
        root.span = Span::new(0, source.len());
        log::debug!(
            "built document: {} top-level entries, {} registered tables",
            root.len(),
            self.registry.len()
        );
        Document {
            root,
            source: source.to_string(),
        }
    }
}
