//! Error types for triton tag parsing and validation.
//!
//! Every failure is returned to the caller; nothing here is fatal. A host
//! that receives any of these for one tag should reject the whole tag-set
//! write.

use thiserror::Error;

use crate::services::SyntaxError;
use crate::value::TagType;

/// Why a raw string could not be converted to its key's declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionErrorKind {
    /// Boolean tags accept exactly `"true"` and `"false"`.
    InvalidBooleanLiteral,
    /// Empty, malformed, or non-finite numeric literal.
    InvalidNumberLiteral,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TagError {
    #[error("Unrecognized special triton tag \"{key}\"")]
    UnrecognizedKey { key: String },

    #[error("Triton tag \"{}\" value must be {}: {}", .key, expectation(.kind), json_string(.raw))]
    TypeCoercion {
        key: String,
        raw: String,
        kind: CoercionErrorKind,
    },

    /// A typed value handed to `validate_tag` disagrees with the registry.
    /// `value` is the JSON rendering of what was received.
    #[error("Triton tag \"{key}\" value must be a {expected}: {value} ({actual})")]
    TypeMismatch {
        key: String,
        expected: TagType,
        value: String,
        actual: &'static str,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, TagError>;

impl TagError {
    pub(crate) fn unrecognized(key: &str) -> Self {
        TagError::UnrecognizedKey {
            key: key.to_string(),
        }
    }

    pub(crate) fn coercion(key: &str, raw: &str, kind: CoercionErrorKind) -> Self {
        TagError::TypeCoercion {
            key: key.to_string(),
            raw: raw.to_string(),
            kind,
        }
    }

    /// The validation failure, if this error is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            TagError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

fn expectation(kind: &CoercionErrorKind) -> &'static str {
    match kind {
        CoercionErrorKind::InvalidBooleanLiteral => "\"true\" or \"false\"",
        CoercionErrorKind::InvalidNumberLiteral => "a number",
    }
}

fn json_string(raw: &str) -> String {
    serde_json::Value::from(raw).to_string()
}

/// A correctly typed value that breaks a rule of its tag.
///
/// Grammar failures from the service list keep the structured
/// [`SyntaxError`] so callers can inspect the offset and expectations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid \"{key}\" tag: {reason}")]
pub struct ValidationError {
    key: &'static str,
    reason: String,
    syntax: Option<SyntaxError>,
}

impl ValidationError {
    pub(crate) fn new(key: &'static str, reason: impl Into<String>) -> Self {
        Self {
            key,
            reason: reason.into(),
            syntax: None,
        }
    }

    pub(crate) fn syntax(key: &'static str, err: SyntaxError) -> Self {
        Self {
            key,
            reason: err.to_string(),
            syntax: Some(err),
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// The message without the `invalid "<key>" tag: ` prefix.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn syntax_error(&self) -> Option<&SyntaxError> {
        self.syntax.as_ref()
    }
}
