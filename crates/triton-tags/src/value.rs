//! Tag value types and coercion from raw strings.
//!
//! Tag stores keep every value as a string. Each registered key declares a
//! [`TagType`], and [`TagType::coerce`] turns the stored string into a
//! [`TagValue`] of exactly that type.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoercionErrorKind, TagError};

/// The scalar type declared for a tag key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagType {
    String,
    Boolean,
    Number,
}

impl TagType {
    pub fn name(self) -> &'static str {
        match self {
            TagType::String => "string",
            TagType::Boolean => "boolean",
            TagType::Number => "number",
        }
    }

    /// Convert a raw stored string to this type.
    ///
    /// - `String`: identity, the empty string included.
    /// - `Boolean`: exactly `"true"` or `"false"`.
    /// - `Number`: a finite numeric literal, decimal or `0x`/`0o`/`0b`,
    ///   surrounding whitespace ignored. Blank strings are rejected.
    ///
    /// `key` is only used for the error.
    pub fn coerce(self, key: &str, raw: &str) -> Result<TagValue, TagError> {
        match self {
            TagType::String => Ok(TagValue::String(raw.to_string())),
            TagType::Boolean => match raw {
                "true" => Ok(TagValue::Bool(true)),
                "false" => Ok(TagValue::Bool(false)),
                _ => Err(TagError::coercion(
                    key,
                    raw,
                    CoercionErrorKind::InvalidBooleanLiteral,
                )),
            },
            TagType::Number => match parse_number(raw) {
                Some(n) if n.is_finite() => Ok(TagValue::Number(n)),
                _ => Err(TagError::coercion(
                    key,
                    raw,
                    CoercionErrorKind::InvalidNumberLiteral,
                )),
            },
        }
    }
}

/// Parse a numeric literal the way tag stores have always read them:
/// surrounding whitespace is ignored and unsigned `0x`, `0o` and `0b`
/// integers are accepted. Blank input is not a number.
fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let radix = match s.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return s.parse().ok(),
    };
    let digits = &s[2..];
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0f64, |acc, c| {
        c.to_digit(radix)
            .map(|d| acc * f64::from(radix) + f64::from(d))
    })
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A coerced tag value.
///
/// Serializes as the bare JSON scalar, which is how hosts hand typed tag
/// values around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl TagValue {
    pub fn tag_type(&self) -> TagType {
        match self {
            TagValue::Bool(_) => TagType::Boolean,
            TagValue::Number(_) => TagType::Number,
            TagValue::String(_) => TagType::String,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TagValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            TagValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// JSON form of the value. Integral numbers render without a fraction
    /// and non-finite numbers become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            TagValue::Bool(b) => Value::Bool(*b),
            TagValue::String(s) => Value::String(s.clone()),
            TagValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    Value::from(*n as i64)
                } else {
                    serde_json::Number::from_f64(*n)
                        .map(Value::Number)
                        .unwrap_or(Value::Null)
                }
            }
        }
    }

    /// Build a value from a JSON scalar.
    ///
    /// Anything that is not a string, number or boolean is rejected with
    /// its JSON `typeof` name.
    pub fn from_json(value: &Value) -> Result<Self, &'static str> {
        match value {
            Value::Bool(b) => Ok(TagValue::Bool(*b)),
            Value::String(s) => Ok(TagValue::String(s.clone())),
            Value::Number(n) => n.as_f64().map(TagValue::Number).ok_or("number"),
            other => Err(json_type_name(other)),
        }
    }
}

/// The JavaScript-style `typeof` name of a JSON value.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Null | Value::Array(_) | Value::Object(_) => "object",
    }
}

/// The canonical stored-string form; [`TagType::coerce`] reads it back.
impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Bool(b) => write!(f, "{}", b),
            TagValue::Number(n) => write!(f, "{}", n),
            TagValue::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for TagValue {
    fn from(value: bool) -> Self {
        TagValue::Bool(value)
    }
}

impl From<f64> for TagValue {
    fn from(value: f64) -> Self {
        TagValue::Number(value)
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::String(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::String(value)
    }
}
