//! # Configuration
//!
//! The size limits applied by the tag validators are managed by
//! [`confique`]. Every field has a compiled default matching the limits
//! Triton has always enforced, so most hosts never need to load anything.
//!
//! ## Sources
//!
//! [`TagLimits::load`] resolves values in priority order:
//! 1. **Environment variables**: `TRITON_TAGS_MAX_GROUPS`, etc.
//! 2. **TOML file**: the optional path passed to `load`.
//! 3. **Compiled Defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `max_groups` | `100` | Groups allowed in `triton.cmon.groups` |
//! | `max_group_len` | `100` | Characters allowed per CMON group |
//! | `max_service_name_len` | `63` | Characters allowed per CNS service name |
//! | `max_reverse_ptr_len` | `255` | Characters allowed in `triton.cns.reverse_ptr` |

use std::path::Path;

use confique::Config;
use serde::{Deserialize, Serialize};

/// Limits applied by the tag validators.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TagLimits {
    /// Maximum number of groups in `triton.cmon.groups`.
    #[config(default = 100, env = "TRITON_TAGS_MAX_GROUPS")]
    pub max_groups: usize,

    /// Maximum length of one CMON group name.
    #[config(default = 100, env = "TRITON_TAGS_MAX_GROUP_LEN")]
    pub max_group_len: usize,

    /// Maximum length of a CNS service DNS name (one DNS label).
    #[config(default = 63, env = "TRITON_TAGS_MAX_SERVICE_NAME_LEN")]
    pub max_service_name_len: usize,

    /// Maximum length of the reverse pointer DNS name.
    #[config(default = 255, env = "TRITON_TAGS_MAX_REVERSE_PTR_LEN")]
    pub max_reverse_ptr_len: usize,
}

impl Default for TagLimits {
    fn default() -> Self {
        Self {
            max_groups: 100,
            max_group_len: 100,
            max_service_name_len: 63,
            max_reverse_ptr_len: 255,
        }
    }
}

impl TagLimits {
    /// Load limits from the environment and an optional TOML file, falling
    /// back to the compiled defaults. A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, confique::Error> {
        let mut builder = Self::builder().env();
        if let Some(path) = path {
            builder = builder.file(path);
        }
        builder.load()
    }
}
