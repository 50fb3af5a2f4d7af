//! Header sanitization shared by both forwarding directions.
//!
//! # Responsibilities
//! - Define the hop-by-hop header set
//! - Strip hop-by-hop headers (case-insensitive)
//! - Name the X-Forwarded-For header added to upstream requests

/// Headers meaningful only for a single transport connection.
///
/// From RFC 2068 section 13.5.1.
pub const HOP_BY_HOP_HEADERS: [&str; 6] = [
    "connection",
    "keep-alive",
    "public",
    "proxy-authenticate",
    "transfer-encoding",
    "upgrade",
];

pub const X_FORWARDED_FOR: &str = "X-Forwarded-For";

/// Returns true if `name` must not be forwarded by an intermediary.
pub fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP_HEADERS
        .iter()
        .any(|hop| hop.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hop_by_hop_any_case() {
        assert!(is_hop_by_hop("connection"));
        assert!(is_hop_by_hop("Connection"));
        assert!(is_hop_by_hop("CONNECTION"));
        assert!(is_hop_by_hop("Transfer-Encoding"));
        assert!(is_hop_by_hop("Keep-Alive"));
        assert!(is_hop_by_hop("PUBLIC"));
    }

    #[test]
    fn test_end_to_end_headers_pass() {
        assert!(!is_hop_by_hop("Content-Type"));
        assert!(!is_hop_by_hop("Referer"));
        assert!(!is_hop_by_hop("Proxy-Authorization"));
        assert!(!is_hop_by_hop("connection-id"));
    }
}
