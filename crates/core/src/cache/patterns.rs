//! Glob matching over bill ids for pattern invalidation.
//!
//! Only `*` is special and matches any run of characters, including none.

/// Checks if a bill id matches a glob pattern.
///
/// # Examples
///
/// ```
/// use billwatch_core::cache::pattern_matches;
///
/// assert!(pattern_matches("AB-123", "AB-123"));
/// assert!(pattern_matches("AB-*", "AB-123"));
/// assert!(pattern_matches("ocd-bill/*", "ocd-bill/0e3c4b2a"));
/// assert!(pattern_matches("*-12*", "SB-1234"));
/// assert!(!pattern_matches("AB-*", "SB-123"));
/// ```
pub fn pattern_matches(pattern: &str, id: &str) -> bool {
    let mut parts = pattern.split('*');

    // `split` always yields at least one item.
    let head = parts.next().unwrap_or_default();
    let Some(mut rest) = id.strip_prefix(head) else {
        return false;
    };

    let middle: Vec<&str> = parts.collect();
    let Some((tail, middle)) = middle.split_last() else {
        // No wildcard at all.
        return rest.is_empty();
    };

    for part in middle.iter().filter(|p| !p.is_empty()) {
        match rest.find(part) {
            Some(pos) => rest = &rest[pos + part.len()..],
            None => return false,
        }
    }

    rest.ends_with(tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(pattern_matches("AB-123", "AB-123"));
        assert!(!pattern_matches("AB-123", "AB-1234"));
        assert!(!pattern_matches("AB-123", "AB-12"));
    }

    #[test]
    fn test_trailing_wildcard() {
        assert!(pattern_matches("AB-*", "AB-123"));
        assert!(pattern_matches("AB-*", "AB-"));
        assert!(!pattern_matches("AB-*", "SB-123"));
    }

    #[test]
    fn test_leading_wildcard() {
        assert!(pattern_matches("*-123", "AB-123"));
        assert!(pattern_matches("*-123", "SB-123"));
        assert!(!pattern_matches("*-123", "AB-1234"));
    }

    #[test]
    fn test_wildcard_in_middle() {
        assert!(pattern_matches("ocd-bill/*/v2", "ocd-bill/abc/v2"));
        assert!(!pattern_matches("ocd-bill/*/v2", "ocd-bill/abc/v3"));
    }

    #[test]
    fn test_multiple_wildcards() {
        assert!(pattern_matches("*B-*", "AB-1"));
        assert!(pattern_matches("*-*-*", "ocd-bill-x"));
        assert!(!pattern_matches("*-*-*", "AB-1"));
    }

    #[test]
    fn test_tail_cannot_overlap_consumed_middle() {
        assert!(!pattern_matches("a*bc*c", "abc"));
        assert!(pattern_matches("a*bc*c", "abcc"));
    }

    #[test]
    fn test_star_matches_everything() {
        assert!(pattern_matches("*", "AB-123"));
        assert!(pattern_matches("*", ""));
        assert!(pattern_matches("**", "SB-9"));
    }

    #[test]
    fn test_empty_pattern() {
        assert!(pattern_matches("", ""));
        assert!(!pattern_matches("", "AB-1"));
    }
}
