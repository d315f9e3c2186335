use grep_matcher::Matcher;
use grep_regex::{RegexMatcher, RegexMatcherBuilder};

use crate::error::TrawlError;

/// A compiled search pattern. Built once per run and shared read-only by
/// every extraction strategy.
#[derive(Debug, Clone)]
pub struct SearchPattern {
    raw: String,
    case_sensitive: bool,
    matcher: RegexMatcher,
}

impl SearchPattern {
    /// Compile `pattern` as a regular expression. Case-insensitive unless
    /// `case_sensitive` is set; folding happens inside the regex engine, so
    /// both the pattern and the searched text are folded.
    pub fn new(pattern: &str, case_sensitive: bool) -> Result<Self, TrawlError> {
        Self::build(pattern, pattern, case_sensitive)
    }

    /// Compile `pattern` as a literal string (regex metacharacters escaped).
    pub fn literal(pattern: &str, case_sensitive: bool) -> Result<Self, TrawlError> {
        Self::build(pattern, &regex_syntax::escape(pattern), case_sensitive)
    }

    fn build(raw: &str, source: &str, case_sensitive: bool) -> Result<Self, TrawlError> {
        let matcher = RegexMatcherBuilder::new()
            .case_insensitive(!case_sensitive)
            .multi_line(true)
            .build(source)
            .map_err(|e| TrawlError::InvalidPattern {
                pattern: raw.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            raw: raw.to_string(),
            case_sensitive,
            matcher,
        })
    }

    /// The pattern as the user typed it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Underlying matcher, for driving `grep_searcher` directly.
    pub(crate) fn matcher(&self) -> &RegexMatcher {
        &self.matcher
    }

    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        matches!(self.matcher.is_match(text.as_bytes()), Ok(true))
    }

    /// First match as `(byte_offset, fragment)`.
    #[must_use]
    pub fn find<'t>(&self, text: &'t str) -> Option<(usize, &'t str)> {
        let m = self.matcher.find(text.as_bytes()).ok()??;
        text.get(m.start()..m.end()).map(|s| (m.start(), s))
    }

    /// Every non-overlapping match as `(byte_offset, fragment)`, left to right.
    #[must_use]
    pub fn find_all<'t>(&self, text: &'t str) -> Vec<(usize, &'t str)> {
        let mut out = Vec::new();
        // `RegexMatcher::Error` is `NoError`: the scan always completes.
        self.matcher
            .find_iter(text.as_bytes(), |m| {
                if let Some(s) = text.get(m.start()..m.end()) {
                    out.push((m.start(), s));
                }
                true
            })
            .ok();
        out
    }
}
