//! Pre-flight eligibility checks for entity addresses.
//!
//! Loopback and link-local detection are textual prefix checks rather than
//! subnet math: anything starting with `169` counts as link-local, including
//! addresses such as `169.1.2.3` that lie outside 169.254.0.0/16.

use crate::model::Entity;

/// True if the address starts with `127`.
pub fn is_loopback(address: &str) -> bool {
    address.starts_with("127")
}

/// True if the address starts with `169`.
pub fn is_link_local(address: &str) -> bool {
    address.starts_with("169")
}

/// Uses the caller-supplied flag; no RFC 1918 math happens here.
pub fn is_private(entity: &Entity) -> bool {
    entity.is_private_ip
}

/// Why the entity may not be sent upstream, checked loopback first, then
/// link-local, then private.
pub fn ineligible_reason(entity: &Entity) -> Option<&'static str> {
    if is_loopback(&entity.value) {
        Some("loopback")
    } else if is_link_local(&entity.value) {
        Some("link-local")
    } else if is_private(entity) {
        Some("private")
    } else {
        None
    }
}

/// Whether the entity may be sent upstream at all.
pub fn is_eligible(entity: &Entity) -> bool {
    ineligible_reason(entity).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loopback_prefix() {
        assert!(is_loopback("127.0.0.1"));
        assert!(is_loopback("127.255.1.1"));
        assert!(!is_loopback("128.0.0.1"));
        assert!(!is_loopback("8.127.0.1"));
    }

    #[test]
    fn test_link_local_prefix_is_loose() {
        assert!(is_link_local("169.254.10.1"));
        // Prefix check only, not 169.254.0.0/16 containment.
        assert!(is_link_local("169.1.2.3"));
        assert!(!is_link_local("16.9.0.1"));
    }

    #[test]
    fn test_private_uses_caller_flag() {
        // 8.8.8.8 is public, but the caller's flag wins.
        let entity = Entity::ipv4("8.8.8.8").with_private(true);
        assert!(is_private(&entity));
        assert!(!is_eligible(&entity));

        let entity = Entity::ipv4("10.0.0.1").with_private(false);
        assert!(!is_private(&entity));
    }

    #[test]
    fn test_eligibility() {
        assert!(is_eligible(&Entity::ipv4("8.8.8.8")));
        assert!(!is_eligible(&Entity::ipv4("127.0.0.1")));
        assert!(!is_eligible(&Entity::ipv4("169.254.1.1")));
        assert!(!is_eligible(&Entity::ipv4("192.168.1.1")));
    }

    #[test]
    fn test_ineligible_reason() {
        assert_eq!(ineligible_reason(&Entity::ipv4("127.0.0.1")), Some("loopback"));
        assert_eq!(ineligible_reason(&Entity::ipv4("169.254.1.1")), Some("link-local"));
        assert_eq!(ineligible_reason(&Entity::ipv4("172.16.0.1")), Some("private"));
        assert_eq!(ineligible_reason(&Entity::ipv4("8.8.8.8")), None);
        // A private flag on a loopback-looking value still reports loopback.
        let entity = Entity::ipv4("127.0.0.1").with_private(true);
        assert_eq!(ineligible_reason(&entity), Some("loopback"));
    }

    #[test]
    fn test_malformed_addresses_do_not_panic() {
        assert!(is_eligible(&Entity::ipv4("")));
        assert!(is_eligible(&Entity::ipv4("not-an-ip")));
        assert!(!is_eligible(&Entity::ipv4("1270")));
    }
}
