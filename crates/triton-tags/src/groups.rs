//! CMON group list parsing.
//!
//! A group list is a comma-separated list of group names. Valid groups:
//! - Alphanumeric characters, underscores (`_`), and hyphens (`-`)
//! - At least one character
//!
//! Whitespace is not trimmed, so `"api, web"` is rejected on `" web"`.
//! Count, length and uniqueness limits are applied by the
//! `triton.cmon.groups` validator, not here.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupListError {
    /// Token `index` (zero-based) is empty or has a character outside
    /// `[A-Za-z0-9_-]`.
    #[error("malformed group \"{token}\" at position {index}: groups must be strings comprised of letters, numbers, _, and -")]
    MalformedGroupToken { token: String, index: usize },
}

/// Splits `s` on `,` and checks every token, in input order.
///
/// # Examples
/// ```
/// use triton_tags::groups::parse_group_list;
///
/// assert_eq!(parse_group_list("api").unwrap(), vec!["api"]);
/// assert_eq!(parse_group_list("api,web_1,db-2").unwrap(), vec!["api", "web_1", "db-2"]);
///
/// assert!(parse_group_list("").is_err());
/// assert!(parse_group_list("api,").is_err());
/// assert!(parse_group_list("api web").is_err());
/// ```
pub fn parse_group_list(s: &str) -> Result<Vec<String>, GroupListError> {
    s.split(',')
        .enumerate()
        .map(|(index, token)| {
            if !token.is_empty() && token.chars().all(is_valid_group_char) {
                Ok(token.to_string())
            } else {
                Err(GroupListError::MalformedGroupToken {
                    token: token.to_string(),
                    index,
                })
            }
        })
        .collect()
}

/// Checks if a character is valid in a group name.
fn is_valid_group_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}
