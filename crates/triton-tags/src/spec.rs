//! Triton tag specifications and registry.
//!
//! This module defines the closed set of recognized tags: the key, the
//! declared value type, and the validator for each. The declared type is
//! read off the [`Validator`] variant, so one key can never carry two types.

use std::fmt;

use crate::config::TagLimits;
use crate::error::{TagError, ValidationError};
use crate::validation;
use crate::value::{TagType, TagValue};

/// Every Triton tag key starts with this. A prefixed key is not
/// necessarily registered.
pub const TRITON_TAG_PREFIX: &str = "triton.";

/// Comma-separated CMON groups used to filter CMON discovery results.
pub const CMON_GROUPS: &str = "triton.cmon.groups";
/// Comma-separated CNS service descriptors.
pub const CNS_SERVICES: &str = "triton.cns.services";
/// Tells CNS not to serve records for this VM.
pub const CNS_DISABLE: &str = "triton.cns.disable";
/// The DNS reverse pointer CNS serves for this VM.
pub const CNS_REVERSE_PTR: &str = "triton.cns.reverse_ptr";
/// Name of the external network the VM uses.
pub const NETWORK_PUBLIC: &str = "triton.network.public";

pub const TEST_STRING: &str = "triton._test.string";
pub const TEST_NUMBER: &str = "triton._test.number";
pub const TEST_BOOLEAN: &str = "triton._test.boolean";

/// A validation function, typed by the value it accepts.
#[derive(Clone, Copy)]
pub enum Validator {
    String(fn(&str, &TagLimits) -> Result<(), ValidationError>),
    Boolean(fn(bool) -> Result<(), ValidationError>),
    Number(fn(f64) -> Result<(), ValidationError>),
}

impl Validator {
    pub const fn tag_type(&self) -> TagType {
        match self {
            Validator::String(_) => TagType::String,
            Validator::Boolean(_) => TagType::Boolean,
            Validator::Number(_) => TagType::Number,
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validator::{:?}", self.tag_type())
    }
}

/// Specification for a single Triton tag.
#[derive(Debug, Clone)]
pub struct TagSpec {
    /// The full tag key, prefix included (e.g., "triton.cns.disable")
    pub key: &'static str,

    pub validator: Validator,

    /// Whether this tag exists only to exercise the coercion layer in tests
    pub internal: bool,
}

impl TagSpec {
    /// Create a new tag spec.
    const fn new(key: &'static str, validator: Validator) -> Self {
        Self {
            key,
            validator,
            internal: false,
        }
    }

    /// Set the internal flag.
    const fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    pub const fn tag_type(&self) -> TagType {
        self.validator.tag_type()
    }

    /// Type-check `value` against this tag, then run its validator.
    ///
    /// Non-finite numbers fail the type check, as they have no stored
    /// string form.
    pub fn check(&self, value: &TagValue, limits: &TagLimits) -> Result<(), TagError> {
        match (self.validator, value) {
            (Validator::String(validate), TagValue::String(s)) => validate(s, limits)?,
            (Validator::Boolean(validate), TagValue::Bool(b)) => validate(*b)?,
            (Validator::Number(validate), TagValue::Number(n)) if n.is_finite() => validate(*n)?,
            _ => {
                return Err(TagError::TypeMismatch {
                    key: self.key.to_string(),
                    expected: self.tag_type(),
                    value: value.to_json().to_string(),
                    actual: value.tag_type().name(),
                })
            }
        }
        Ok(())
    }
}

/// Registry of all Triton tags.
///
/// This is the single source of truth for which keys exist. Adding a tag
/// means adding an entry here.
pub const TRITON_TAGS: &[TagSpec] = &[
    TagSpec::new(CMON_GROUPS, Validator::String(validation::cmon_groups)),
    TagSpec::new(CNS_SERVICES, Validator::String(validation::cns_services)),
    TagSpec::new(CNS_DISABLE, Validator::Boolean(validation::any_bool)),
    TagSpec::new(
        CNS_REVERSE_PTR,
        Validator::String(validation::cns_reverse_ptr),
    ),
    TagSpec::new(NETWORK_PUBLIC, Validator::String(validation::any_string)),
    // Type-only tags for testing the coercion layer end to end
    TagSpec::new(TEST_STRING, Validator::String(validation::any_string)).internal(),
    TagSpec::new(TEST_NUMBER, Validator::Number(validation::any_number)).internal(),
    TagSpec::new(TEST_BOOLEAN, Validator::Boolean(validation::any_bool)).internal(),
];

/// Look up a tag spec by key.
pub fn get_spec(key: &str) -> Option<&'static TagSpec> {
    TRITON_TAGS.iter().find(|spec| spec.key == key)
}

/// Get all non-internal tag keys.
pub fn public_tags() -> impl Iterator<Item = &'static str> {
    TRITON_TAGS
        .iter()
        .filter(|spec| !spec.internal)
        .map(|spec| spec.key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_expected_entries() {
        for key in [
            CMON_GROUPS,
            CNS_SERVICES,
            CNS_DISABLE,
            CNS_REVERSE_PTR,
            NETWORK_PUBLIC,
            TEST_STRING,
            TEST_NUMBER,
            TEST_BOOLEAN,
        ] {
            assert!(get_spec(key).is_some(), "{key}");
        }
        assert_eq!(TRITON_TAGS.len(), 8);
    }

    #[test]
    fn unknown_tag_returns_none() {
        assert!(get_spec("triton.nonexistent").is_none());
        assert!(get_spec("cns.disable").is_none());
        assert!(get_spec("").is_none());
    }

    #[test]
    fn keys_are_unique_and_prefixed() {
        for (i, spec) in TRITON_TAGS.iter().enumerate() {
            assert!(spec.key.starts_with(TRITON_TAG_PREFIX), "{}", spec.key);
            assert!(
                TRITON_TAGS[i + 1..].iter().all(|other| other.key != spec.key),
                "duplicate {}",
                spec.key
            );
        }
    }

    #[test]
    fn declared_types() {
        let type_of = |key| get_spec(key).unwrap().tag_type();
        assert_eq!(type_of(CMON_GROUPS), TagType::String);
        assert_eq!(type_of(CNS_SERVICES), TagType::String);
        assert_eq!(type_of(CNS_DISABLE), TagType::Boolean);
        assert_eq!(type_of(CNS_REVERSE_PTR), TagType::String);
        assert_eq!(type_of(NETWORK_PUBLIC), TagType::String);
        assert_eq!(type_of(TEST_STRING), TagType::String);
        assert_eq!(type_of(TEST_NUMBER), TagType::Number);
        assert_eq!(type_of(TEST_BOOLEAN), TagType::Boolean);
    }

    #[test]
    fn public_tags_excludes_internal() {
        let public: Vec<_> = public_tags().collect();
        assert_eq!(
            public,
            vec![
                CMON_GROUPS,
                CNS_SERVICES,
                CNS_DISABLE,
                CNS_REVERSE_PTR,
                NETWORK_PUBLIC
            ]
        );
    }

    #[test]
    fn check_rejects_wrong_type() {
        let spec = get_spec(CNS_DISABLE).unwrap();
        let err = spec
            .check(&TagValue::from("true"), &TagLimits::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Triton tag \"triton.cns.disable\" value must be a boolean: \"true\" (string)"
        );
    }

    #[test]
    fn check_rejects_non_finite_numbers() {
        let spec = get_spec(TEST_NUMBER).unwrap();
        let limits = TagLimits::default();
        assert!(spec.check(&TagValue::Number(1.5), &limits).is_ok());
        assert!(matches!(
            spec.check(&TagValue::Number(f64::INFINITY), &limits),
            Err(TagError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn check_runs_validator() {
        let spec = get_spec(CNS_REVERSE_PTR).unwrap();
        let limits = TagLimits::default();
        assert!(spec.check(&TagValue::from("example.com"), &limits).is_ok());
        let err = spec
            .check(&TagValue::from("not dns"), &limits)
            .unwrap_err();
        assert!(err.as_validation().is_some());
    }
}
