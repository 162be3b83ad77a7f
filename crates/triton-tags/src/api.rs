//! # API Facade
//!
//! The API layer is a **thin facade** over the registry. It is the entry
//! point hosts use, whatever store the tags come from.
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Looks up** the key in [`TRITON_TAGS`](crate::spec::TRITON_TAGS)
//! - **Coerces** raw strings to the declared type
//! - **Dispatches** to the key's validator with the configured [`TagLimits`]
//! - **Logs** each decision at `debug`/`trace` level via `tracing`
//!
//! Coercion errors always win over validation errors, since validators
//! assume a correctly typed value.
//!
//! ## Two Entry Points
//!
//! - [`TritonTags::parse`]: for raw stored strings (`"true"`, `"api,web"`).
//! - [`TritonTags::validate`]: for callers already holding a typed value,
//!   e.g. re-checking a stored tag without re-parsing it.
//!
//! The free functions ([`parse_tag_str`], [`validate_tag`], ...) run against
//! a process-wide instance with the default limits.

use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::TagLimits;
use crate::error::{Result, TagError};
use crate::services::ServiceDescriptor;
use crate::spec::{get_spec, TagSpec, TRITON_TAG_PREFIX};
use crate::validation;
use crate::value::TagValue;

static DEFAULT_TAGS: Lazy<TritonTags> = Lazy::new(TritonTags::default);

/// Parser and validator for Triton tags under a fixed set of limits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TritonTags {
    limits: TagLimits,
}

impl TritonTags {
    pub fn new(limits: TagLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &TagLimits {
        &self.limits
    }

    /// Parse and validate a raw tag string.
    pub fn parse(&self, key: &str, raw: &str) -> Result<TagValue> {
        let result = lookup(key).and_then(|spec| {
            let value = spec.tag_type().coerce(key, raw)?;
            spec.check(&value, &self.limits)?;
            Ok(value)
        });
        match &result {
            Ok(value) => trace!(key, %value, "parsed triton tag"),
            Err(err) => debug!(key, raw, error = %err, "rejected triton tag"),
        }
        result
    }

    /// Type-check and validate an already typed value.
    pub fn check(&self, key: &str, value: &TagValue) -> Result<()> {
        let result = lookup(key).and_then(|spec| spec.check(value, &self.limits));
        match &result {
            Ok(()) => trace!(key, %value, "validated triton tag"),
            Err(err) => debug!(key, %value, error = %err, "invalid triton tag"),
        }
        result
    }

    /// Like [`check`](Self::check) but returns only the message, if any.
    pub fn validate(&self, key: &str, value: &TagValue) -> Option<String> {
        self.check(key, value).err().map(|err| err.to_string())
    }

    /// Validate a value as a host stores it in JSON. Nulls, arrays and
    /// objects are type mismatches.
    pub fn validate_json(&self, key: &str, value: &Value) -> Option<String> {
        let spec = match lookup(key) {
            Ok(spec) => spec,
            Err(err) => return Some(err.to_string()),
        };
        match TagValue::from_json(value) {
            Ok(value) => self.validate(key, &value),
            Err(actual) => {
                debug!(key, %value, actual, "non-scalar triton tag value");
                Some(
                    TagError::TypeMismatch {
                        key: key.to_string(),
                        expected: spec.tag_type(),
                        value: value.to_string(),
                        actual,
                    }
                    .to_string(),
                )
            }
        }
    }

    /// Parse and validate `triton.cmon.groups`, returning the groups.
    pub fn groups(&self, raw: &str) -> Result<Vec<String>> {
        Ok(validation::cmon_group_list(raw, &self.limits)?)
    }

    /// Parse and validate `triton.cns.services`, returning the typed
    /// descriptors in input order.
    pub fn services(&self, raw: &str) -> Result<Vec<ServiceDescriptor>> {
        Ok(validation::cns_service_list(raw, &self.limits)?)
    }
}

fn lookup(key: &str) -> Result<&'static TagSpec> {
    get_spec(key).ok_or_else(|| TagError::unrecognized(key))
}

/// Return true if the key uses the Triton tag prefix. It still might not
/// be one of the registered tags.
///
/// # Examples
/// ```
/// use triton_tags::is_triton_tag;
///
/// assert!(is_triton_tag("triton.foo"));
/// assert!(is_triton_tag("triton.cns.disable"));
/// assert!(!is_triton_tag("Triton.foo"));
/// assert!(!is_triton_tag("cns.disable"));
/// assert!(!is_triton_tag(""));
/// ```
pub fn is_triton_tag(key: &str) -> bool {
    key.starts_with(TRITON_TAG_PREFIX)
}

/// Convert `raw` to the type declared for `key`, without validating it.
pub fn coerce(key: &str, raw: &str) -> Result<TagValue> {
    lookup(key)?.tag_type().coerce(key, raw)
}

/// Parse a Triton tag from its stored string value.
///
/// # Examples
/// ```
/// use triton_tags::{parse_tag_str, TagValue};
///
/// assert_eq!(parse_tag_str("triton.cns.disable", "true").unwrap(), TagValue::Bool(true));
/// assert!(parse_tag_str("triton.cns.disable", "booga").is_err());
/// ```
pub fn parse_tag_str(key: &str, raw: &str) -> Result<TagValue> {
    DEFAULT_TAGS.parse(key, raw)
}

pub fn check_tag(key: &str, value: &TagValue) -> Result<()> {
    DEFAULT_TAGS.check(key, value)
}

/// Validate a typed Triton tag value. Returns `None` if valid, otherwise
/// the error message.
pub fn validate_tag(key: &str, value: &TagValue) -> Option<String> {
    DEFAULT_TAGS.validate(key, value)
}

pub fn validate_tag_json(key: &str, value: &Value) -> Option<String> {
    DEFAULT_TAGS.validate_json(key, value)
}
