//! # CNS Service List Grammar
//!
//! `triton.cns.services` holds a comma-separated list of service
//! descriptors. Each descriptor names a DNS service and optionally carries a
//! port and `key=value` properties:
//!
//! ```text
//! service_list := service (',' service)*
//! service      := dns_name (':' port)? (':' property)*
//! port         := DIGIT+                       only directly after the name
//! property     := IDENT '=' VALUE
//! dns_name     := [A-Za-z0-9] [A-Za-z0-9-]*
//! IDENT        := [A-Za-z_] [A-Za-z0-9_]*
//! VALUE        := [A-Za-z0-9]+
//! ```
//!
//! Examples: `web`, `web:8080`, `web:8080:priority=10:weight=5`,
//! `web:weight=5,db:5432`.
//!
//! ## Errors
//!
//! The parser is a single left-to-right recursive descent with no
//! backtracking. The first character that fits nowhere raises a
//! [`SyntaxError`] naming what could have appeared there and what was found:
//!
//! ```text
//! Expected DNS name but end of input found.
//! Expected DNS name but "_" found.
//! Expected "=" but end of input found.
//! Expected ",", ":", or end of input but "/" found.
//! ```
//!
//! The grammar accepts any property key and any value token. Which keys are
//! allowed and what range values must fall in is decided by the
//! `triton.cns.services` validator, which turns a [`ServiceSpec`] into a
//! [`ServiceDescriptor`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One service as written, before any semantic checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSpec {
    pub name: String,
    /// The digits of the port segment, unconverted.
    pub port: Option<String>,
    /// `key=value` properties in input order.
    pub properties: Vec<(String, String)>,
}

/// A validated CNS service.
///
/// Order in a list is significant downstream (it sets DNS record
/// precedence) but carries no meaning here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u16>,
}

/// A token class the parser was prepared to accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    DnsName,
    PortNumber,
    PropertyName,
    PropertyValue,
    Literal(char),
    EndOfInput,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::DnsName => f.write_str("DNS name"),
            Expected::PortNumber => f.write_str("port number"),
            Expected::PropertyName => f.write_str("property name"),
            Expected::PropertyValue => f.write_str("property value"),
            Expected::Literal(c) => write!(f, "\"{}\"", c.escape_default()),
            Expected::EndOfInput => f.write_str("end of input"),
        }
    }
}

/// Positional parse failure: what was expected at `offset` and what was
/// there instead (`None` for end of input).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Expected {} but {} found.", describe_expected(.expected), describe_found(.found))]
pub struct SyntaxError {
    pub expected: Vec<Expected>,
    pub found: Option<char>,
    /// Byte offset into the input.
    pub offset: usize,
}

fn describe_expected(expected: &[Expected]) -> String {
    let parts: Vec<String> = expected.iter().map(ToString::to_string).collect();
    match parts.as_slice() {
        [] => String::new(),
        [one] => one.clone(),
        [first, second] => format!("{} or {}", first, second),
        [rest @ .., last] => format!("{}, or {}", rest.join(", "), last),
    }
}

fn describe_found(found: &Option<char>) -> String {
    match found {
        Some(c) => format!("\"{}\"", c.escape_default()),
        None => "end of input".to_string(),
    }
}

/// Parse a service list. The input is taken as-is, whitespace included.
///
/// # Examples
/// ```
/// use triton_tags::services::parse_service_list;
///
/// let services = parse_service_list("web:8080:priority=10,db").unwrap();
/// assert_eq!(services.len(), 2);
/// assert_eq!(services[0].name, "web");
/// assert_eq!(services[0].port.as_deref(), Some("8080"));
/// assert_eq!(services[0].properties, vec![("priority".to_string(), "10".to_string())]);
///
/// let err = parse_service_list("").unwrap_err();
/// assert_eq!(err.to_string(), "Expected DNS name but end of input found.");
/// ```
pub fn parse_service_list(s: &str) -> Result<Vec<ServiceSpec>, SyntaxError> {
    Parser::new(s).service_list()
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
        &self.input[start..self.pos]
    }

    fn error(&self, expected: &[Expected]) -> SyntaxError {
        SyntaxError {
            expected: expected.to_vec(),
            found: self.peek(),
            offset: self.pos,
        }
    }

    fn service_list(&mut self) -> Result<Vec<ServiceSpec>, SyntaxError> {
        let mut services = vec![self.service()?];
        loop {
            match self.peek() {
                None => return Ok(services),
                Some(',') => {
                    self.bump();
                    services.push(self.service()?);
                }
                Some(_) => {
                    return Err(self.error(&[
                        Expected::Literal(','),
                        Expected::Literal(':'),
                        Expected::EndOfInput,
                    ]))
                }
            }
        }
    }

    fn service(&mut self) -> Result<ServiceSpec, SyntaxError> {
        if !self.peek().is_some_and(is_dns_start) {
            return Err(self.error(&[Expected::DnsName]));
        }
        let name = self.take_while(is_dns_char).to_string();

        let mut port = None;
        let mut properties = Vec::new();
        while self.eat(':') {
            let first_segment = port.is_none() && properties.is_empty();
            match self.peek() {
                Some(c) if first_segment && c.is_ascii_digit() => {
                    port = Some(self.take_while(|c| c.is_ascii_digit()).to_string());
                }
                Some(c) if is_ident_start(c) => properties.push(self.property()?),
                _ if first_segment => {
                    return Err(self.error(&[Expected::PortNumber, Expected::PropertyName]))
                }
                _ => return Err(self.error(&[Expected::PropertyName])),
            }
        }

        Ok(ServiceSpec {
            name,
            port,
            properties,
        })
    }

    fn property(&mut self) -> Result<(String, String), SyntaxError> {
        let key = self.take_while(is_ident_char).to_string();
        if !self.eat('=') {
            return Err(self.error(&[Expected::Literal('=')]));
        }
        if !self.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
            return Err(self.error(&[Expected::PropertyValue]));
        }
        let value = self.take_while(|c| c.is_ascii_alphanumeric()).to_string();
        Ok((key, value))
    }
}

fn is_dns_start(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

fn is_dns_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
