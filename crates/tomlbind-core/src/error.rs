//! Error types for parsing and binding.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while parsing a document or binding it onto a destination.
///
/// Parse errors (`Syntax`, `Conflict`, `TooDeep`) abort the parse. Bind errors abort the
/// bind; the innermost failing field wraps its error in `Located` exactly once.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed token, illegal character, or unterminated construct.
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// A key or table was declared again with an incompatible kind.
    #[error(
        "line {line}: key `{key}` is in conflict with {original_kind} declared at line {original_line}"
    )]
    Conflict {
        line: usize,
        key: String,
        original_kind: &'static str,
        original_line: usize,
    },

    /// Nesting of arrays, inline tables or table headers exceeded the configured limit.
    #[error("line {line}: nesting exceeds the maximum depth of {limit}")]
    TooDeep { line: usize, limit: usize },

    /// No destination field matched a document key.
    #[error("field corresponding to `{key}` is not defined in {type_name}")]
    FieldNotDefined { key: String, type_name: String },

    /// The document value kind cannot be bound into the destination kind.
    #[error("{found} cannot be bound into {expected}")]
    TypeMismatch { found: String, expected: String },

    /// A numeric literal does not fit the destination.
    #[error("{literal} overflows {kind}")]
    Overflow { kind: &'static str, literal: String },

    /// A heterogeneous array was bound into a uniformly typed sequence.
    #[error("array cannot contain multiple types")]
    MultipleTypes,

    /// The top-level destination cannot receive a table.
    #[error("invalid bind target: {0}")]
    InvalidTarget(String),

    /// Raised by destination `Deserialize` impls via `serde::de::Error::custom`.
    #[error("{0}")]
    Custom(String),

    /// A bind error annotated with its source line and, for record fields, a
    /// `<type>.<field>` path.
    #[error("{}", display_located(.line, .path.as_deref(), .source))]
    Located {
        line: usize,
        path: Option<String>,
        #[source]
        source: Box<Error>,
    },
}

fn display_located(line: &usize, path: Option<&str>, source: &Error) -> String {
    match path {
        Some(path) => format!("line {line}: {path}: {source}"),
        None => format!("line {line}: {source}"),
    }
}

impl Error {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Error::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Attach a line and optional field path. An error that already carries a line keeps
    /// it; a missing path is filled in by the nearest enclosing field.
    pub(crate) fn located(self, line: usize, path: Option<String>) -> Self {
        match self {
            Error::Located {
                line: inner,
                path: None,
                source,
            } => Error::Located {
                line: inner,
                path,
                source,
            },
            located @ Error::Located { .. } => located,
            other => Error::Located {
                line,
                path,
                source: Box::new(other),
            },
        }
    }

    /// The 1-based source line this error points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Syntax { line, .. }
            | Error::Conflict { line, .. }
            | Error::TooDeep { line, .. }
            | Error::Located { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// The unwrapped root cause, skipping any `Located` annotation.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Located { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    fn invalid_type(unexp: serde::de::Unexpected<'_>, exp: &dyn serde::de::Expected) -> Self {
        Error::TypeMismatch {
            found: unexp.to_string(),
            expected: exp.to_string(),
        }
    }
}

/// Convenience alias used throughout tomlbind-core.
pub type Result<T> = std::result::Result<T, Error>;
