//! The built-in responsive retrofit rule set
//!
//! These are the compiled-in rules that migrate the admin pages to a
//! responsive layout: off-canvas sidebar, hamburger toggle, overlay,
//! toggle script, and mobile spacing. Patterns and replacements are
//! deliberately verbatim and highly specific (unique class signatures,
//! anchored prefixes/suffixes) so they cannot land on unrelated markup.
//!
//! Rule order matters only in that the toggle button must be injected
//! before the overlay exists, since both carry the `toggleSidebar()`
//! handler the button rule guards on.

use crate::pipeline::Pipeline;
use crate::rule::{Guard, Rule, Transform};
use once_cell::sync::Lazy;
use regex::Regex;

/// Pre-migration sidebar opening tag, matched verbatim.
const SIDEBAR_TARGET: &str =
    r#"<aside class="w-64 bg-brand-dark text-white flex flex-col z-20 shadow-xl flex-shrink-0">"#;

/// Sidebar opening tag after migration: identified, raised z-index,
/// off-canvas on small screens, static on md and up.
const SIDEBAR_REPLACEMENT: &str = r#"<aside id="sidebar" class="w-64 bg-brand-dark text-white flex flex-col z-30 shadow-xl flex-shrink-0 fixed inset-y-0 left-0 transform -translate-x-full transition-transform duration-300 md:relative md:translate-x-0">"#;

/// Whitespace-tolerant fallback for documents whose sidebar tag drifted
/// from the verbatim form.
static SIDEBAR_FALLBACK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"<aside\s+class="w-64\s+bg-brand-dark\s+text-white\s+flex\s+flex-col\s+z-20\s+shadow-xl\s+flex-shrink-0"\s*>"#,
    )
    .expect("sidebar fallback pattern")
});

/// Standalone `px-8` token inside a header class attribute. The token must
/// be preceded by the attribute opening quote or a space, so the
/// `md:px-8` produced by the replacement can never re-match.
static HEADER_PADDING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(<header class="(?:[^"]* )?)px-8((?: [^"]*)?">)"#)
        .expect("header padding pattern")
});

/// Page heading the toggle button is injected next to.
static PAGE_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<h2 class="text-lg font-bold text-slate-800">.*?</h2>"#)
        .expect("page heading pattern")
});

/// Wraps the heading in a flex row with the hamburger button in front.
const TOGGLE_TEMPLATE: &str = r#"<div class="flex items-center gap-4">
                <button onclick="toggleSidebar()" class="md:hidden p-2 text-slate-500 hover:bg-slate-100 rounded-lg transition-colors">
                    <span class="material-symbols-outlined">menu</span>
                </button>
                ${0}
            </div>"#;

/// Click-away overlay shown behind the open sidebar on small screens.
const OVERLAY_FRAGMENT: &str = r#"<div id="sidebar-overlay" onclick="toggleSidebar()" class="fixed inset-0 bg-black/50 z-20 hidden md:hidden backdrop-blur-sm transition-opacity"></div>"#;

/// Toggle behavior shared by the button and the overlay.
const SCRIPT_FRAGMENT: &str = r#"
    <script>
        function toggleSidebar() {
            const sidebar = document.getElementById('sidebar');
            const overlay = document.getElementById('sidebar-overlay');
            sidebar.classList.toggle('-translate-x-full');
            overlay.classList.toggle('hidden');
        }
    </script>
"#;

const CONTENT_PADDING_TARGET: &str = r#"<div class="flex-1 overflow-y-auto p-8">"#;
const CONTENT_PADDING_REPLACEMENT: &str = r#"<div class="flex-1 overflow-y-auto p-4 md:p-8">"#;

/// The responsive retrofit rule table, in application order.
pub fn responsive_rules() -> Vec<Rule> {
    use crate::matcher::Matcher;

    vec![
        Rule::new(
            "sidebar-layout",
            "Make the sidebar off-canvas on small screens",
            Transform::ReplaceFirst {
                matcher: Matcher::literal(SIDEBAR_TARGET)
                    .with_fallback(SIDEBAR_FALLBACK.clone()),
                replacement: SIDEBAR_REPLACEMENT.to_string(),
            },
        )
        .with_guard(Guard::marker(r#"id="sidebar""#)),
        Rule::new(
            "header-padding",
            "Reduce header padding on small screens (px-8 -> px-4 md:px-8)",
            Transform::RegexReplaceAll {
                pattern: HEADER_PADDING.clone(),
                template: "${1}px-4 md:px-8${2}".to_string(),
            },
        ),
        Rule::new(
            "sidebar-toggle",
            "Inject a hamburger button next to the page heading",
            Transform::WrapFirst {
                pattern: PAGE_HEADING.clone(),
                template: TOGGLE_TEMPLATE.to_string(),
            },
        )
        .with_guard(Guard::marker(r#"onclick="toggleSidebar()""#)),
        Rule::new(
            "sidebar-overlay",
            "Add the click-away overlay behind the open sidebar",
            Transform::InsertBeforeAnchor {
                anchor: "</body>".to_string(),
                fragment: OVERLAY_FRAGMENT.to_string(),
            },
        )
        .with_guard(Guard::marker(r#"id="sidebar-overlay""#)),
        Rule::new(
            "sidebar-script",
            "Add the toggleSidebar() behavior script",
            Transform::InsertBeforeAnchor {
                anchor: "</body>".to_string(),
                fragment: SCRIPT_FRAGMENT.to_string(),
            },
        )
        .with_guard(Guard::marker("function toggleSidebar()")),
        Rule::new(
            "content-padding",
            "Reduce main content padding on small screens (p-8 -> p-4 md:p-8)",
            Transform::ReplaceAllLiteral {
                needle: CONTENT_PADDING_TARGET.to_string(),
                replacement: CONTENT_PADDING_REPLACEMENT.to_string(),
            },
        ),
    ]
}

/// Pipeline preloaded with the responsive retrofit rules.
pub fn responsive_pipeline() -> Pipeline {
    Pipeline::new(responsive_rules())
}
