use regex::Regex;

/// Compiled set of path exclusion patterns
///
/// Patterns are matched against the URL path only, so query strings cannot
/// hide a `.pdf` suffix and hosts never trip a path rule.
#[derive(Debug, Clone)]
pub struct ExclusionMatcher {
    patterns: Vec<Regex>,
}

impl ExclusionMatcher {
    /// Compiles the given patterns, failing on the first invalid one
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Returns true if any pattern matches the path
    pub fn is_excluded(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(path))
    }

    /// Number of compiled patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if no patterns are configured
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
