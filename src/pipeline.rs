//! Ordered application of rewrite rules to one document
//!
//! The pipeline owns the rule table and applies it strictly in declaration
//! order. Each rule consumes the previous rule's output, so anchors are
//! always located against the current cumulative text. There is no early
//! exit: every rule gets a chance to fire.

use crate::rule::Rule;

/// Outcome of running the pipeline over one document.
#[derive(Debug, Clone)]
pub struct TransformationResult {
    /// Final document text
    pub text: String,

    /// Whether the text differs from the input
    pub changed: bool,

    /// Names of the rules that actually fired, in application order
    pub applied: Vec<&'static str>,
}

/// An ordered list of rules applied to a document in sequence.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    rules: Vec<Rule>,
}

impl Pipeline {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The rule table, in application order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule over `input` in order. The changed flag holds
    /// exactly when the final text differs from the original, and
    /// `applied` records which rules fired.
    pub fn run(&self, input: &str) -> TransformationResult {
        let mut text = input.to_string();
        let mut applied = Vec::new();

        for rule in &self.rules {
            if let Some(next) = rule.apply(&text) {
                text = next;
                applied.push(rule.name);
            }
        }

        let changed = text != input;
        TransformationResult {
            text,
            changed,
            applied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Guard, Transform};

    fn pipeline() -> Pipeline {
        Pipeline::new(vec![
            Rule::new(
                "swap-token",
                "test",
                Transform::ReplaceAllLiteral {
                    needle: "old".to_string(),
                    replacement: "new".to_string(),
                },
            ),
            Rule::new(
                "add-footer",
                "test",
                Transform::InsertBeforeAnchor {
                    anchor: "</body>".to_string(),
                    fragment: r#"<footer id="site-footer"></footer>"#.to_string(),
                },
            )
            .with_guard(Guard::marker(r#"id="site-footer""#)),
        ])
    }

    #[test]
    fn test_rule_table_access() {
        let pipeline = pipeline();
        assert_eq!(pipeline.len(), 2);
        assert!(!pipeline.is_empty());
        assert_eq!(pipeline.rules()[0].name, "swap-token");
    }

    #[test]
    fn test_run_applies_in_order() {
        let result = pipeline().run("<body>old\n</body>");

        assert!(result.changed);
        assert_eq!(result.applied, vec!["swap-token", "add-footer"]);
        assert!(result.text.contains("new"));
        assert!(result.text.contains(r#"id="site-footer""#));
    }

    #[test]
    fn test_changed_flag_soundness() {
        let pipeline = pipeline();
        let input = "<body>old\n</body>";

        let result = pipeline.run(input);
        assert_eq!(result.changed, result.text != input);

        let untouched = pipeline.run("<div>nothing matches</div>");
        assert!(!untouched.changed);
        assert_eq!(untouched.text, "<div>nothing matches</div>");
        assert!(untouched.applied.is_empty());
    }

    #[test]
    fn test_second_run_is_noop() {
        let pipeline = pipeline();
        let first = pipeline.run("<body>old\n</body>");
        let second = pipeline.run(&first.text);

        assert!(!second.changed);
        assert_eq!(second.text, first.text);
        assert!(second.applied.is_empty());
    }

    #[test]
    fn test_absent_target_leaves_other_rules_working() {
        // No closing body tag: the insertion rule skips, the edit still fires
        let result = pipeline().run("<div>old</div>");

        assert!(result.changed);
        assert_eq!(result.applied, vec!["swap-token"]);
        assert!(!result.text.contains("footer"));
    }

    #[test]
    fn test_later_anchor_relocated_after_earlier_insert() {
        // Two insertions against the same anchor: the second must find the
        // anchor in the text the first one produced
        let pipeline = Pipeline::new(vec![
            Rule::new(
                "first-insert",
                "test",
                Transform::InsertBeforeAnchor {
                    anchor: "</body>".to_string(),
                    fragment: r#"<div id="one"></div>"#.to_string(),
                },
            )
            .with_guard(Guard::marker(r#"id="one""#)),
            Rule::new(
                "second-insert",
                "test",
                Transform::InsertBeforeAnchor {
                    anchor: "</body>".to_string(),
                    fragment: r#"<div id="two"></div>"#.to_string(),
                },
            )
            .with_guard(Guard::marker(r#"id="two""#)),
        ]);

        let result = pipeline.run("<body>\n</body>");
        assert_eq!(result.applied.len(), 2);

        let one = result.text.find(r#"id="one""#).unwrap();
        let two = result.text.find(r#"id="two""#).unwrap();
        let body = result.text.find("</body>").unwrap();
        assert!(one < two && two < body);
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = Pipeline::default();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.len(), 0);

        let result = pipeline.run("anything");
        assert!(!result.changed);
        assert_eq!(result.text, "anything");
    }
}
