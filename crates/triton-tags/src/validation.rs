//! Per-key semantic validation.
//!
//! Each validator takes a value already coerced to its key's declared type
//! and either accepts it or returns a [`ValidationError`] explaining which
//! rule it breaks. Validators are pure: they read only their arguments.
//!
//! | Key | Rules |
//! |-----|-------|
//! | `triton.cmon.groups` | 1 to `max_groups` groups, each 1 to `max_group_len` chars of `[A-Za-z0-9_-]`, no duplicates |
//! | `triton.cns.services` | at least one service; name up to `max_service_name_len` chars; port 1-65535; only `priority`/`weight` properties, each 0-65535 |
//! | `triton.cns.disable` | none |
//! | `triton.cns.reverse_ptr` | DNS safe, at most `max_reverse_ptr_len` chars |
//! | `triton.network.public` | none |

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::TagLimits;
use crate::error::ValidationError;
use crate::groups::parse_group_list;
use crate::services::{parse_service_list, ServiceDescriptor, ServiceSpec};
use crate::spec::{CMON_GROUPS, CNS_REVERSE_PTR, CNS_SERVICES};

/// Labels of letters, digits and hyphens joined by dots, each label 1-63
/// characters and not starting with a hyphen. This is the RFC 1123 label
/// set rather than the broader RFC 2181 one, since underscores and the like
/// upset other systems.
static DNS_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9\-]{0,62}(?:\.[A-Za-z0-9][A-Za-z0-9\-]{0,62})*$")
        .expect("DNS name pattern is valid")
});

/// Whether `name` is a dot-separated list of DNS-safe labels.
pub fn is_dns_name(name: &str) -> bool {
    DNS_NAME_RE.is_match(name)
}

/// Validate `triton.cmon.groups` and return the groups in input order.
pub fn cmon_group_list(val: &str, limits: &TagLimits) -> Result<Vec<String>, ValidationError> {
    let groups = parse_group_list(val).map_err(|_| {
        ValidationError::new(
            CMON_GROUPS,
            "groups must be strings comprised of letters, numbers, _, and -",
        )
    })?;

    if groups.is_empty() {
        return Err(ValidationError::new(
            CMON_GROUPS,
            "must contain at least one valid group string",
        ));
    }

    if groups.len() > limits.max_groups {
        return Err(ValidationError::new(
            CMON_GROUPS,
            format!(
                "must contain less than or equal to {} group strings",
                limits.max_groups
            ),
        ));
    }

    let mut seen = HashSet::with_capacity(groups.len());
    for group in groups.iter() {
        if !seen.insert(group.clone()) {
            return Err(ValidationError::new(
                CMON_GROUPS,
                format!("contains duplicate group {}", group),
            ));
        }

        let len = group.chars().count();
        if len < 1 || len > limits.max_group_len {
            return Err(ValidationError::new(
                CMON_GROUPS,
                format!(
                    "group name must be no less than 1 character and no greater than {} characters",
                    limits.max_group_len
                ),
            ));
        }
    }

    Ok(groups)
}

/// Validate `triton.cns.services` and return the typed descriptors.
pub fn cns_service_list(
    val: &str,
    limits: &TagLimits,
) -> Result<Vec<ServiceDescriptor>, ValidationError> {
    let specs =
        parse_service_list(val).map_err(|err| ValidationError::syntax(CNS_SERVICES, err))?;

    if specs.is_empty() {
        return Err(ValidationError::new(
            CNS_SERVICES,
            "must contain at least one valid service",
        ));
    }

    specs
        .into_iter()
        .map(|spec| service_descriptor(spec, limits))
        .collect()
}

fn service_descriptor(
    spec: ServiceSpec,
    limits: &TagLimits,
) -> Result<ServiceDescriptor, ValidationError> {
    let invalid = |reason: String| ValidationError::new(CNS_SERVICES, reason);

    let len = spec.name.chars().count();
    if len < 1 || len > limits.max_service_name_len {
        return Err(invalid(format!(
            "service DNS name \"{}\" must be {} or fewer characters",
            spec.name, limits.max_service_name_len
        )));
    }

    let port = match &spec.port {
        Some(raw) => match raw.parse::<u16>() {
            Ok(port) if port >= 1 => Some(port),
            _ => {
                return Err(invalid(format!(
                    "service port number for {} must be within the range 1 - 65535",
                    spec.name
                )))
            }
        },
        None => None,
    };

    let mut priority = None;
    let mut weight = None;
    for (key, raw) in &spec.properties {
        let slot = match key.as_str() {
            "priority" => &mut priority,
            "weight" => &mut weight,
            _ => {
                return Err(invalid(format!(
                    "service property \"{}\" is not a valid property name",
                    key
                )))
            }
        };
        if slot.is_some() {
            return Err(invalid(format!(
                "service {} for {} is given more than once",
                key, spec.name
            )));
        }
        let value = raw.parse::<u16>().map_err(|_| {
            invalid(format!(
                "service {} for {} must be within the range 0 - 65535",
                key, spec.name
            ))
        })?;
        *slot = Some(value);
    }

    Ok(ServiceDescriptor {
        name: spec.name,
        port,
        priority,
        weight,
    })
}

pub fn cmon_groups(val: &str, limits: &TagLimits) -> Result<(), ValidationError> {
    cmon_group_list(val, limits).map(|_| ())
}

pub fn cns_services(val: &str, limits: &TagLimits) -> Result<(), ValidationError> {
    cns_service_list(val, limits).map(|_| ())
}

pub fn cns_reverse_ptr(val: &str, limits: &TagLimits) -> Result<(), ValidationError> {
    if val.len() > limits.max_reverse_ptr_len || !is_dns_name(val) {
        return Err(ValidationError::new(
            CNS_REVERSE_PTR,
            format!("\"{}\" is not DNS safe", val),
        ));
    }
    Ok(())
}

/// For keys whose only rule is their type: `triton.network.public` and the
/// internal string test key.
pub fn any_string(_val: &str, _limits: &TagLimits) -> Result<(), ValidationError> {
    Ok(())
}

/// For `triton.cns.disable` and the internal boolean test key.
pub fn any_bool(_val: bool) -> Result<(), ValidationError> {
    Ok(())
}

pub fn any_number(_val: f64) -> Result<(), ValidationError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> TagLimits {
        TagLimits::default()
    }

    fn reason(err: ValidationError) -> String {
        err.reason().to_string()
    }

    fn numbered_groups(count: usize) -> String {
        (0..count)
            .map(|i| format!("g{}", i))
            .collect::<Vec<_>>()
            .join(",")
    }

    // --- cmon groups

    #[test]
    fn groups_valid_list() {
        assert_eq!(
            cmon_group_list("api,web,db", &limits()).unwrap(),
            vec!["api", "web", "db"]
        );
    }

    #[test]
    fn groups_hundred_short_distinct_groups() {
        let chars: Vec<String> = ('a'..='z')
            .chain('A'..='Z')
            .chain('0'..='9')
            .map(String::from)
            .chain(["_", "-"].iter().map(|s| s.to_string()))
            .collect();
        assert_eq!(chars.len(), 64);

        // 64 single chars plus 36 two-char groups gives 100 distinct groups.
        let mut groups = chars.clone();
        groups.extend(chars.iter().take(36).map(|c| format!("{c}{c}")));
        assert_eq!(groups.len(), 100);
        assert!(cmon_groups(&groups.join(","), &limits()).is_ok());
    }

    #[test]
    fn groups_exactly_max_count() {
        assert!(cmon_groups(&numbered_groups(100), &limits()).is_ok());
    }

    #[test]
    fn groups_too_many() {
        let err = cmon_groups(&numbered_groups(101), &limits()).unwrap_err();
        assert_eq!(
            reason(err),
            "must contain less than or equal to 100 group strings"
        );
    }

    #[test]
    fn groups_name_too_long() {
        let long = "a".repeat(101);
        let err = cmon_groups(&long, &limits()).unwrap_err();
        assert_eq!(
            reason(err),
            "group name must be no less than 1 character and no greater than 100 characters"
        );
        assert!(cmon_groups(&"a".repeat(100), &limits()).is_ok());
    }

    #[test]
    fn groups_duplicate_reports_first_repeat() {
        let err = cmon_groups("a,b,b,a", &limits()).unwrap_err();
        assert_eq!(reason(err), "contains duplicate group b");
    }

    #[test]
    fn groups_duplicate_checked_before_length() {
        let long = "x".repeat(101);
        let err = cmon_groups(&format!("a,a,{long}"), &limits()).unwrap_err();
        assert_eq!(reason(err), "contains duplicate group a");
    }

    #[test]
    fn groups_malformed() {
        for val in ["", "a,,b", "a b", "a.b", "a,"] {
            let err = cmon_groups(val, &limits()).unwrap_err();
            assert_eq!(err.key(), CMON_GROUPS);
            assert_eq!(
                reason(err),
                "groups must be strings comprised of letters, numbers, _, and -",
                "{val:?}"
            );
        }
    }

    #[test]
    fn groups_respect_configured_limits() {
        let limits = TagLimits {
            max_groups: 2,
            max_group_len: 3,
            ..Default::default()
        };
        assert!(cmon_groups("abc,def", &limits).is_ok());
        assert_eq!(
            reason(cmon_groups("a,b,c", &limits).unwrap_err()),
            "must contain less than or equal to 2 group strings"
        );
        assert_eq!(
            reason(cmon_groups("abcd", &limits).unwrap_err()),
            "group name must be no less than 1 character and no greater than 3 characters"
        );
    }

    // --- cns services

    #[test]
    fn services_port() {
        assert_eq!(
            cns_service_list("foobar:1234", &limits()).unwrap(),
            vec![ServiceDescriptor {
                name: "foobar".to_string(),
                port: Some(1234),
                priority: None,
                weight: None,
            }]
        );
    }

    #[test]
    fn services_priority_and_weight() {
        let services = cns_service_list("web:80:priority=0:weight=65535,db", &limits()).unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].port, Some(80));
        assert_eq!(services[0].priority, Some(0));
        assert_eq!(services[0].weight, Some(65535));
        assert_eq!(services[1].name, "db");
        assert_eq!(services[1].port, None);
    }

    #[test]
    fn services_port_out_of_range() {
        for val in ["foobar:123123123123", "foobar:0", "foobar:65536"] {
            let err = cns_services(val, &limits()).unwrap_err();
            assert_eq!(
                reason(err),
                "service port number for foobar must be within the range 1 - 65535",
                "{val:?}"
            );
        }
        assert!(cns_services("foobar:1", &limits()).is_ok());
        assert!(cns_services("foobar:65535", &limits()).is_ok());
    }

    #[test]
    fn services_unknown_property() {
        let err = cns_services("foobar:invalid=somevalue1", &limits()).unwrap_err();
        assert_eq!(
            reason(err),
            "service property \"invalid\" is not a valid property name"
        );
        let err = cns_services("foobar:port=80", &limits()).unwrap_err();
        assert_eq!(
            reason(err),
            "service property \"port\" is not a valid property name"
        );
    }

    #[test]
    fn services_property_out_of_range() {
        let err = cns_services("web:priority=65536", &limits()).unwrap_err();
        assert_eq!(
            reason(err),
            "service priority for web must be within the range 0 - 65535"
        );
        let err = cns_services("web:weight=heavy", &limits()).unwrap_err();
        assert_eq!(
            reason(err),
            "service weight for web must be within the range 0 - 65535"
        );
    }

    #[test]
    fn services_repeated_property() {
        let err = cns_services("web:weight=1:weight=2", &limits()).unwrap_err();
        assert_eq!(reason(err), "service weight for web is given more than once");
    }

    #[test]
    fn services_name_too_long() {
        let name = "a".repeat(64);
        let err = cns_services(&name, &limits()).unwrap_err();
        assert_eq!(
            reason(err),
            format!("service DNS name \"{}\" must be 63 or fewer characters", name)
        );
        assert!(cns_services(&"a".repeat(63), &limits()).is_ok());
    }

    #[test]
    fn services_name_checked_before_port() {
        let name = "a".repeat(64);
        let err = cns_services(&format!("{name}:0"), &limits()).unwrap_err();
        assert!(reason(err).starts_with("service DNS name"));
    }

    #[test]
    fn services_syntax_error_keeps_position() {
        let err = cns_services("", &limits()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid \"triton.cns.services\" tag: Expected DNS name but end of input found."
        );
        let syntax = err.syntax_error().unwrap();
        assert_eq!(syntax.offset, 0);
        assert_eq!(syntax.found, None);
    }

    #[test]
    fn services_first_invalid_service_is_reported() {
        let err = cns_services("web:0,db:0", &limits()).unwrap_err();
        assert_eq!(
            reason(err),
            "service port number for web must be within the range 1 - 65535"
        );
    }

    // --- reverse ptr

    #[test]
    fn reverse_ptr_valid_names() {
        for val in ["example.com", "a", "my-host.Example.COM", "1.2.3.4.in-addr.arpa"] {
            assert!(cns_reverse_ptr(val, &limits()).is_ok(), "{val:?}");
        }
    }

    #[test]
    fn reverse_ptr_invalid_names() {
        for val in ["", "-host.com", "host..com", "host.com.", "under_score.com", "sp ace.com"] {
            let err = cns_reverse_ptr(val, &limits()).unwrap_err();
            assert_eq!(reason(err), format!("\"{}\" is not DNS safe", val));
        }
    }

    #[test]
    fn reverse_ptr_label_length() {
        let label = "a".repeat(63);
        assert!(cns_reverse_ptr(&format!("{label}.com"), &limits()).is_ok());
        let label = "a".repeat(64);
        assert!(cns_reverse_ptr(&format!("{label}.com"), &limits()).is_err());
    }

    #[test]
    fn reverse_ptr_total_length() {
        let label = "a".repeat(63);
        // 4 * 63 + 3 dots = 255
        let name = vec![label.as_str(); 4].join(".");
        assert_eq!(name.len(), 255);
        assert!(cns_reverse_ptr(&name, &limits()).is_ok());
        let longer = format!("{name}.a");
        assert!(is_dns_name(&longer));
        assert!(cns_reverse_ptr(&longer, &limits()).is_err());
    }

    #[test]
    fn reverse_ptr_rejects_kelvin_sign() {
        assert!(!is_dns_name("\u{212a}.com"));
    }

    #[test]
    fn type_only_validators_accept_everything() {
        assert!(any_string("", &limits()).is_ok());
        assert!(any_bool(false).is_ok());
        assert!(any_number(-1.5).is_ok());
    }
}
