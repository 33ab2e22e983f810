//! HTTP cache control module
//!
//! Provides `ETag` generation, conditional request handling and per-file cache policy.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Generate a quoted `ETag`, e.g. `"abc123def"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Accepts a single tag, a comma-separated list, or `*`.
/// Returns true when a 304 should be sent.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .map(str::trim)
            .any(|e| e == etag || e == "*" || e.strip_prefix("W/") == Some(etag))
    })
}

/// Cache control policy for static responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Public cache with specified max-age (seconds)
    Public(u32),
    /// Revalidate on every use
    NoCache,
}

impl CachePolicy {
    /// Frontend entry documents must be revalidated so a new build is picked up
    /// immediately; fingerprinted assets can be cached.
    pub fn for_content_type(content_type: &str) -> Self {
        if content_type.starts_with("text/html") {
            Self::NoCache
        } else {
            Self::default()
        }
    }

    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::Public(max_age) => format!("public, max-age={max_age}"),
            Self::NoCache => "no-cache".to_string(),
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::Public(3600) // 1 hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_etag() {
        let etag = generate_etag(b"<html></html>");
        assert!(etag.starts_with('"') && etag.ends_with('"'));
        assert_eq!(etag, generate_etag(b"<html></html>"));
        assert_ne!(etag, generate_etag(b"<html> </html>"));
    }

    #[test]
    fn test_check_etag_match() {
        let etag = "\"abc123\"";
        assert!(check_etag_match(Some("\"abc123\""), etag));
        assert!(check_etag_match(Some("\"xyz\", \"abc123\""), etag));
        assert!(check_etag_match(Some("W/\"abc123\""), etag));
        assert!(check_etag_match(Some("*"), etag));
        assert!(!check_etag_match(Some("\"different\""), etag));
        assert!(!check_etag_match(None, etag));
    }

    #[test]
    fn test_policy_by_content_type() {
        assert_eq!(
            CachePolicy::for_content_type("text/html; charset=utf-8"),
            CachePolicy::NoCache
        );
        assert_eq!(
            CachePolicy::for_content_type("application/javascript"),
            CachePolicy::Public(3600)
        );
        assert_eq!(CachePolicy::NoCache.to_header_value(), "no-cache");
        assert_eq!(
            CachePolicy::Public(600).to_header_value(),
            "public, max-age=600"
        );
    }
}
