//! Prefix matching predicates used to filter candidates

/// Decides whether a candidate matches the partially typed token
pub trait PrefixMatcher: Send + Sync {
    fn matches(&self, candidate: &str, incomplete: &str) -> bool;
}

/// Case-sensitive literal prefix (the default)
#[derive(Debug, Clone, Copy, Default)]
pub struct Prefix;

impl PrefixMatcher for Prefix {
    fn matches(&self, candidate: &str, incomplete: &str) -> bool {
        candidate.starts_with(incomplete)
    }
}

/// Prefix comparison after Unicode lowercasing of both sides
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitivePrefix;

impl PrefixMatcher for CaseInsensitivePrefix {
    fn matches(&self, candidate: &str, incomplete: &str) -> bool {
        candidate.to_lowercase().starts_with(&incomplete.to_lowercase())
    }
}

/// Any closure `(candidate, incomplete) -> bool`
///
/// ```
/// use shellcomp::completion::{MatchFn, PrefixMatcher};
///
/// let contains = MatchFn(|candidate: &str, incomplete: &str| candidate.contains(incomplete));
/// assert!(contains.matches("--verbose", "erb"));
/// ```
pub struct MatchFn<F>(pub F);

impl<F> PrefixMatcher for MatchFn<F>
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn matches(&self, candidate: &str, incomplete: &str) -> bool {
        (self.0)(candidate, incomplete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_is_case_sensitive() {
        assert!(Prefix.matches("add", "a"));
        assert!(Prefix.matches("add", ""));
        assert!(!Prefix.matches("add", "A"));
    }

    #[test]
    fn test_case_insensitive_prefix() {
        assert!(CaseInsensitivePrefix.matches("Remove", "re"));
        assert!(CaseInsensitivePrefix.matches("remove", "RE"));
        assert!(!CaseInsensitivePrefix.matches("remove", "add"));
    }

    #[test]
    fn test_match_fn() {
        let suffix = MatchFn(|c: &str, i: &str| c.ends_with(i));
        assert!(suffix.matches("x.txt", ".txt"));
        assert!(!suffix.matches("x.txt", "x."));
    }
}
