//! User-configured ranges of addresses that are never looked up.

use crate::error::IgnoreListError;
use crate::model::Entity;
use ipnet::Ipv4Net;
use std::net::Ipv4Addr;
use tracing::warn;

/// Parsed set of IPv4 ranges. Bare addresses are stored as /32.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList {
    ranges: Vec<Ipv4Net>,
}

impl IgnoreList {
    /// Parse a comma-separated list, dropping tokens that are not valid ranges.
    ///
    /// Used at lookup time, where the list has already been validated when the
    /// configuration was accepted.
    pub fn parse(raw: &str) -> Self {
        let ranges = tokens(raw)
            .filter_map(|token| {
                let parsed = parse_token(token);
                if parsed.is_none() {
                    warn!(token = %token, "Ignoring invalid ignore-list entry");
                }
                parsed
            })
            .collect();

        Self { ranges }
    }

    /// Parse a comma-separated list, failing with every invalid token at once.
    pub fn validate(raw: &str) -> Result<Self, IgnoreListError> {
        let mut ranges = Vec::new();
        let mut invalid_tokens = Vec::new();

        for token in tokens(raw) {
            match parse_token(token) {
                Some(range) => ranges.push(range),
                None => invalid_tokens.push(token.to_string()),
            }
        }

        if !invalid_tokens.is_empty() {
            return Err(IgnoreListError::ConfigurationInvalid { invalid_tokens });
        }

        Ok(Self { ranges })
    }

    /// True if the address falls inside any listed range.
    ///
    /// Addresses that do not parse as IPv4 never match.
    pub fn contains(&self, address: &str) -> bool {
        match address.trim().parse::<Ipv4Addr>() {
            Ok(ip) => self.ranges.iter().any(|range| range.contains(&ip)),
            Err(_) => false,
        }
    }

    pub fn matches(&self, entity: &Entity) -> bool {
        self.contains(&entity.value)
    }

    pub fn ranges(&self) -> &[Ipv4Net] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

fn tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|t| !t.is_empty())
}

fn parse_token(token: &str) -> Option<Ipv4Net> {
    if let Ok(net) = token.parse::<Ipv4Net>() {
        Some(net)
    } else if let Ok(ip) = token.parse::<Ipv4Addr>() {
        Some(Ipv4Net::from(ip))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_skips_empty_tokens() {
        let list = IgnoreList::parse(" 1.2.3.4 ,, 10.0.0.0/8 , ");
        assert_eq!(list.len(), 2);
        assert_eq!(list.ranges()[0].prefix_len(), 32);
        assert_eq!(list.ranges()[1].prefix_len(), 8);
    }

    #[test]
    fn test_parse_empty_string() {
        assert!(IgnoreList::parse("").is_empty());
        assert!(IgnoreList::parse("  ,  ").is_empty());
    }

    #[test]
    fn test_parse_drops_invalid_tokens() {
        let list = IgnoreList::parse("1.2.3.4, not-an-ip, 10.0.0.0/33");
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_validate_reports_only_invalid_tokens() {
        let err = IgnoreList::validate("1.2.3.4, not-an-ip, 10.0.0.0/8").unwrap_err();
        assert_eq!(
            err,
            IgnoreListError::ConfigurationInvalid {
                invalid_tokens: vec!["not-an-ip".to_string()]
            }
        );
    }

    #[test]
    fn test_validate_collects_every_invalid_token() {
        let err = IgnoreList::validate("foo, 1.2.3.4, 300.1.1.1, ::1, 10.0.0.0/40").unwrap_err();
        let IgnoreListError::ConfigurationInvalid { invalid_tokens } = err;
        assert_eq!(invalid_tokens, vec!["foo", "300.1.1.1", "::1", "10.0.0.0/40"]);
    }

    #[test]
    fn test_validate_accepts_valid_list() {
        let list = IgnoreList::validate("8.8.8.8,192.0.2.0/24").unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_contains_single_address() {
        let list = IgnoreList::parse("8.8.8.8");
        assert!(list.contains("8.8.8.8"));
        assert!(!list.contains("8.8.8.9"));
    }

    #[test]
    fn test_contains_cidr_range() {
        let list = IgnoreList::parse("203.0.113.0/24, 198.51.100.7");
        assert!(list.contains("203.0.113.1"));
        assert!(list.contains("203.0.113.255"));
        assert!(!list.contains("203.0.114.1"));
        assert!(list.contains("198.51.100.7"));
    }

    #[test]
    fn test_contains_masks_range_host_bits() {
        let list = IgnoreList::parse("10.1.2.3/8");
        assert!(list.contains("10.200.0.1"));
        assert!(!list.contains("11.0.0.1"));
    }

    #[test]
    fn test_contains_malformed_address() {
        let list = IgnoreList::parse("0.0.0.0/0");
        assert!(list.contains("1.2.3.4"));
        assert!(!list.contains("not-an-ip"));
        assert!(!list.contains(""));
    }

    #[test]
    fn test_matches_entity() {
        let list = IgnoreList::parse("1.1.1.0/24");
        assert!(list.matches(&Entity::ipv4("1.1.1.1")));
        assert!(!list.matches(&Entity::ipv4("1.0.0.1")));
    }
}
