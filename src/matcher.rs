//! Target location in document text
//!
//! A [`Matcher`] finds the region a rule operates on. Two strategies:
//! a literal substring (fast path, no pattern-engine ambiguity) and an
//! optional regex fallback that tolerates formatting drift. Literal mode
//! is always tried first; the fallback only runs when the literal target
//! is absent. "Not found" is an expected outcome, not an error.

use regex::Regex;

/// Byte span of a match within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the matched region in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Locates the first occurrence of a rule's target in document text.
#[derive(Debug, Clone)]
pub struct Matcher {
    /// Exact substring to search for first
    literal: Option<String>,
    /// Fallback pattern when the literal target is absent
    pattern: Option<Regex>,
}

impl Matcher {
    /// Matcher with a literal target only.
    pub fn literal(target: &str) -> Self {
        Self {
            literal: Some(target.to_string()),
            pattern: None,
        }
    }

    /// Matcher with a pattern target only.
    pub fn pattern(pattern: Regex) -> Self {
        Self {
            literal: None,
            pattern: Some(pattern),
        }
    }

    /// Add a regex fallback to a literal matcher.
    pub fn with_fallback(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Find the first matching span, literal mode first, pattern mode only
    /// if the literal is absent. `None` means the rule is skipped for this
    /// document.
    pub fn find(&self, text: &str) -> Option<Span> {
        if let Some(literal) = &self.literal {
            if let Some(start) = text.find(literal.as_str()) {
                return Some(Span::new(start, start + literal.len()));
            }
        }

        if let Some(pattern) = &self.pattern {
            if let Some(m) = pattern.find(text) {
                return Some(Span::new(m.start(), m.end()));
            }
        }

        None
    }

    /// Check whether the target occurs at all.
    pub fn is_match(&self, text: &str) -> bool {
        self.find(text).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_match() {
        let matcher = Matcher::literal("<aside>");
        let span = matcher.find("<body><aside></aside></body>").unwrap();
        assert_eq!(span.start, 6);
        assert_eq!(span.end, 13);
        assert_eq!(span.len(), 7);
        assert!(!span.is_empty());
    }

    #[test]
    fn test_pattern_only_matcher() {
        let matcher = Matcher::pattern(Regex::new(r#"<aside\s+class="w-64""#).unwrap());

        let span = matcher.find(r#"<body><aside  class="w-64">"#).unwrap();
        assert_eq!(span.start, 6);
        assert!(matcher.is_match(r#"<aside class="w-64">"#));
        assert!(!matcher.is_match("<div>"));
    }

    #[test]
    fn test_zero_width_pattern_yields_empty_span() {
        // A pattern that can match nothing still reports a span; callers
        // can tell via is_empty that there is no text to replace
        let matcher = Matcher::pattern(Regex::new("x*").unwrap());
        let span = matcher.find("abc").unwrap();
        assert!(span.is_empty());
        assert_eq!(span.len(), 0);
    }

    #[test]
    fn test_literal_not_found() {
        let matcher = Matcher::literal("<nav>");
        assert!(matcher.find("<body></body>").is_none());
        assert!(!matcher.is_match("<body></body>"));
    }

    #[test]
    fn test_literal_first_match_only() {
        let matcher = Matcher::literal("<li>");
        let span = matcher.find("<li>a</li><li>b</li>").unwrap();
        assert_eq!(span.start, 0);
    }

    #[test]
    fn test_pattern_fallback() {
        // Literal expects single spaces; document has drifted formatting
        let matcher = Matcher::literal(r#"<aside class="w-64 dark">"#)
            .with_fallback(Regex::new(r#"<aside\s+class="w-64\s+dark"\s*>"#).unwrap());

        let text = r#"<aside  class="w-64  dark" >"#;
        let span = matcher.find(text).unwrap();
        assert_eq!(span.start, 0);
        assert_eq!(span.end, text.len());
    }

    #[test]
    fn test_literal_wins_over_fallback() {
        let matcher =
            Matcher::literal("exact").with_fallback(Regex::new("ex.*?t").unwrap());
        // Both would match; literal mode decides the span
        let span = matcher.find("exact").unwrap();
        assert_eq!(span.len(), 5);
    }

    #[test]
    fn test_both_modes_fail() {
        let matcher =
            Matcher::literal("<footer>").with_fallback(Regex::new("<footer\\s*>").unwrap());
        assert!(matcher.find("<body></body>").is_none());
    }
}
