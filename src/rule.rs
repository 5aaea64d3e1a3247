//! Rewrite rule definition and application
//!
//! A [`Rule`] is a named, guarded, atomic text transformation. Applying a
//! rule either produces a new document version or reports that it did not
//! fire. Rules never error on a missing target: absence of the target
//! region is an expected, non-fatal condition.
//!
//! Idempotency is enforced two ways:
//! - injection rules carry an explicit [`Guard`], a marker that only exists
//!   after the rule has run;
//! - edit rules use patterns that no longer match their own output, so a
//!   second application finds nothing to do.

use crate::matcher::Matcher;
use regex::Regex;

/// Predicate over document text deciding whether a rule's effect is
/// already present. `check() == true` means the rule must be skipped.
#[derive(Debug, Clone)]
pub struct Guard {
    /// Marker string whose presence signals the rule already applied
    marker: String,
}

impl Guard {
    pub fn marker(marker: &str) -> Self {
        Self {
            marker: marker.to_string(),
        }
    }

    /// True when the marker is present and the rule must not run again.
    pub fn check(&self, text: &str) -> bool {
        text.contains(self.marker.as_str())
    }
}

/// The transform half of a rule: how to rewrite or inject content once
/// the guard has passed.
#[derive(Debug, Clone)]
pub enum Transform {
    /// Rewrite the first occurrence of the matched region with a fixed
    /// replacement. Used to augment a uniquely-identified element.
    ReplaceFirst {
        matcher: Matcher,
        replacement: String,
    },

    /// Regex substitution over every occurrence, with capture-group
    /// back-references in the template so surrounding attributes survive
    /// verbatim. The pattern must not re-match its own output.
    RegexReplaceAll { pattern: Regex, template: String },

    /// Wrap or prefix the first occurrence of the pattern with new markup.
    /// The template references the matched text as `${0}`. Limited to one
    /// insertion per document even if the signature repeats.
    WrapFirst { pattern: Regex, template: String },

    /// Insert a fragment immediately before a fixed closing anchor. The
    /// anchor is re-located against the current text on every application,
    /// never via offsets computed by earlier rules.
    InsertBeforeAnchor { anchor: String, fragment: String },

    /// Unconditional literal replacement of every occurrence of a token.
    ReplaceAllLiteral { needle: String, replacement: String },
}

impl Transform {
    /// Apply the transform to `text`. `None` means the target was not
    /// found and the document is untouched.
    fn apply(&self, text: &str) -> Option<String> {
        match self {
            Transform::ReplaceFirst {
                matcher,
                replacement,
            } => {
                let span = matcher.find(text)?;
                let mut out = String::with_capacity(text.len() + replacement.len());
                out.push_str(&text[..span.start]);
                out.push_str(replacement);
                out.push_str(&text[span.end..]);
                Some(out)
            }

            Transform::RegexReplaceAll { pattern, template } => {
                if !pattern.is_match(text) {
                    return None;
                }
                Some(pattern.replace_all(text, template.as_str()).into_owned())
            }

            Transform::WrapFirst { pattern, template } => {
                if !pattern.is_match(text) {
                    return None;
                }
                // replace() rewrites the first match only
                Some(pattern.replace(text, template.as_str()).into_owned())
            }

            Transform::InsertBeforeAnchor { anchor, fragment } => {
                let pos = text.find(anchor.as_str())?;
                let mut out = String::with_capacity(text.len() + fragment.len() + 1);
                out.push_str(&text[..pos]);
                out.push_str(fragment);
                out.push('\n');
                out.push_str(&text[pos..]);
                Some(out)
            }

            Transform::ReplaceAllLiteral {
                needle,
                replacement,
            } => {
                if !text.contains(needle.as_str()) {
                    return None;
                }
                Some(text.replace(needle.as_str(), replacement))
            }
        }
    }
}

/// A named, guarded, atomic rewrite rule.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Stable rule identifier (e.g., "sidebar-layout")
    pub name: &'static str,

    /// One-line description for `--list-rules`
    pub description: &'static str,

    /// Idempotency guard; required for rules that inject new content
    guard: Option<Guard>,

    /// The rewrite itself
    transform: Transform,
}

impl Rule {
    /// Unguarded rule; the transform must be idempotent by construction.
    pub fn new(name: &'static str, description: &'static str, transform: Transform) -> Self {
        Self {
            name,
            description,
            guard: None,
            transform,
        }
    }

    /// Attach an explicit guard.
    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Whether this rule's effect is already present in `text`.
    pub fn is_applied(&self, text: &str) -> bool {
        self.guard.as_ref().is_some_and(|g| g.check(text))
    }

    /// Apply the rule. Returns the new document text, or `None` when the
    /// rule did not fire (guard satisfied or target absent).
    pub fn apply(&self, text: &str) -> Option<String> {
        if self.is_applied(text) {
            log::debug!("rule {}: guard marker present, skipping", self.name);
            return None;
        }

        let result = self.transform.apply(text);
        match &result {
            Some(_) => log::debug!("rule {}: applied", self.name),
            None => log::debug!("rule {}: target not found, skipping", self.name),
        }
        result
    }
}
