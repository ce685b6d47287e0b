/// Longest textual domain name (RFC 1035, without the root dot).
pub const MAX_DOMAIN_LENGTH: usize = 253;
/// Longest single label.
pub const MAX_LABEL_LENGTH: usize = 63;

/// Lowercases, trims whitespace and strips leading/trailing dots.
pub fn normalize_domain(domain: &str) -> String {
    domain
        .trim()
        .trim_matches('.')
        .to_ascii_lowercase()
}

/// True when `query` equals `blocked` or is a strict subdomain of it,
/// ignoring ASCII case.
///
/// `"www.youtube.com"` matches `"youtube.com"`; `"notyoutube.com"` does not.
pub fn domain_matches(query: &str, blocked: &str) -> bool {
    if blocked.is_empty() {
        return false;
    }
    if query.eq_ignore_ascii_case(blocked) {
        return true;
    }
    if query.len() <= blocked.len() {
        return false;
    }
    let boundary = query.len() - blocked.len() - 1;
    query.as_bytes()[boundary] == b'.'
        && query
            .get(boundary + 1..)
            .is_some_and(|suffix| suffix.eq_ignore_ascii_case(blocked))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_domain("  .WWW.Example.COM. "), "www.example.com");
        assert_eq!(normalize_domain("..."), "");
    }

    #[test]
    fn test_exact_and_subdomain_match() {
        assert!(domain_matches("youtube.com", "youtube.com"));
        assert!(domain_matches("YouTube.COM", "youtube.com"));
        assert!(domain_matches("www.youtube.com", "youtube.com"));
        assert!(domain_matches("a.b.YOUTUBE.com", "youtube.com"));
    }

    #[test]
    fn test_no_partial_label_match() {
        assert!(!domain_matches("notyoutube.com", "youtube.com"));
        assert!(!domain_matches("youtube.com.evil", "youtube.com"));
        assert!(!domain_matches("com", "youtube.com"));
        assert!(!domain_matches("youtube.com", ""));
    }
}
