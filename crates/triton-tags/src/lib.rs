//! # Triton Tags
//!
//! In Triton some per-VM configuration is controlled via special structured
//! tags on the VM's `tags` object. They are all prefixed with `triton.`;
//! call them "Triton tags". Tag stores keep every value as a string, so this
//! crate turns `(key, raw string)` into a typed, validated value or a
//! precise error.
//!
//! All Triton tags are optional. The recognized set is closed:
//!
//! | Key | Type | Meaning |
//! |-----|------|---------|
//! | `triton.cmon.groups` | string | Comma-separated CMON groups filtering CMON discovery results |
//! | `triton.cns.services` | string | Comma-separated CNS service descriptors (`name[:port][:key=value...]`) |
//! | `triton.cns.disable` | boolean | Tells CNS not to serve records for this VM |
//! | `triton.cns.reverse_ptr` | string | DNS reverse pointer for this VM |
//! | `triton.network.public` | string | External network name the VM uses |
//!
//! ## Layers
//!
//! ```text
//! raw string ──► value (coercion) ──► spec (registry lookup) ──► validation
//!                                                                  │
//!                                         groups / services grammars ◄┘
//! ```
//!
//! Everything is pure and synchronous. The registry is a `const` table and
//! the only shared state is a lazily compiled regex, so every function may
//! be called from any thread without locking.
//!
//! ## Module Overview
//!
//! - [`api`]: Entry points: [`is_triton_tag`], [`parse_tag_str`], [`validate_tag`]
//! - [`spec`]: The tag registry
//! - [`value`]: Tag types, typed values, coercion
//! - [`validation`]: Per-key rules
//! - [`groups`]: CMON group list parser
//! - [`services`]: CNS service list grammar
//! - [`config`]: Configurable limits
//! - [`error`]: Error types

pub mod api;
pub mod config;
pub mod error;
pub mod groups;
pub mod services;
pub mod spec;
pub mod validation;
pub mod value;

pub use api::{
    check_tag, coerce, is_triton_tag, parse_tag_str, validate_tag, validate_tag_json, TritonTags,
};
pub use config::TagLimits;
pub use error::{CoercionErrorKind, TagError, ValidationError};
pub use services::{ServiceDescriptor, SyntaxError};
pub use spec::{get_spec, public_tags, TagSpec, TRITON_TAGS, TRITON_TAG_PREFIX};
pub use value::{TagType, TagValue};
