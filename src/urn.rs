//! Identifier helpers for `urn:li:<type>:<id>` strings.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Prefix of member profile identifiers.
pub const PROFILE_URN_PREFIX: &str = "urn:li:fsd_profile:";

static URN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^urn:li:([A-Za-z0-9_]+):(.+)$").expect("valid URN regex"));

/// Returns true if `value` is shaped like an entity identifier.
pub fn is_urn(value: &str) -> bool {
    URN_PATTERN.is_match(value)
}

/// A parsed identifier, borrowing from the source string.
///
/// The id part is kept verbatim; compound ids such as
/// `(ACoAAB,EXPERIENCE_VIEW_DETAILS,...)` are not split further.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Urn<'a> {
    raw: &'a str,
    entity_type: &'a str,
    id: &'a str,
}

impl<'a> Urn<'a> {
    pub fn parse(raw: &'a str) -> Option<Self> {
        let caps = URN_PATTERN.captures(raw)?;
        let entity_type = caps.get(1)?.as_str();
        let id = caps.get(2)?.as_str();
        Some(Self {
            raw,
            entity_type,
            id,
        })
    }

    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    pub fn entity_type(&self) -> &'a str {
        self.entity_type
    }

    pub fn id(&self) -> &'a str {
        self.id
    }
}

impl fmt::Display for Urn<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw)
    }
}

/// Strips `prefix` from `urn`, returning the input unchanged when absent.
pub fn strip_urn_prefix<'a>(urn: &'a str, prefix: &str) -> &'a str {
    urn.strip_prefix(prefix).unwrap_or(urn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_urn() {
        assert!(is_urn("urn:li:fsd_profile:ACoAAB123"));
        assert!(is_urn("urn:li:company:1035"));
        assert!(!is_urn("urn:li:company"));
        assert!(!is_urn("https://example.com"));
        assert!(!is_urn(""));
    }

    #[test]
    fn test_parse_compound_id() {
        let urn = Urn::parse(
            "urn:li:fsd_profileCard:(ACoAAB,EXPERIENCE_VIEW_DETAILS,urn:li:fsd_profile:ACoAAB)",
        )
        .unwrap();

        assert_eq!(urn.entity_type(), "fsd_profileCard");
        assert!(urn.id().starts_with("(ACoAAB,"));
        assert!(urn.id().ends_with("urn:li:fsd_profile:ACoAAB)"));
    }

    #[test]
    fn test_strip_prefix() {
        assert_eq!(
            strip_urn_prefix("urn:li:fsd_profile:ACoAAB123", PROFILE_URN_PREFIX),
            "ACoAAB123"
        );
        assert_eq!(strip_urn_prefix("ACoAAB123", PROFILE_URN_PREFIX), "ACoAAB123");
    }
}
