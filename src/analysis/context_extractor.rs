//! Surrounding-text extraction
//!
//! Collects readable text before and after an image, skipping script, style
//! and code content, until a soft character budget is reached on each side.

use std::collections::VecDeque;

use super::TextContext;
use crate::dom::{DocumentNode, TextFragment};

/// Text inside these elements is never content.
const EXCLUDED_PARENTS: &[&str] = &["script", "style", "code", "noscript"];

/// Substrings that mark a fragment as code rather than prose.
const CODE_PATTERNS: &[&str] = &[
    "{",
    "}",
    "//",
    "/*",
    "*/",
    "<script",
    "<style",
    "@media",
    "function(",
    "var ",
    "let ",
    "const ",
    ".css",
    ".js",
    "window.",
    "document.",
];

/// Gather `before` and `after` context for an image.
///
/// `budget` is checked before each node is examined, so the last fragment
/// taken may push a side past the budget.
pub fn extract_context<'a, N: DocumentNode<'a>>(img: &N, budget: usize) -> TextContext {
    TextContext {
        before: accumulate(img.text_before(), budget, Side::Before),
        after: accumulate(img.text_after(), budget, Side::After),
    }
}

/// Whether a text node is readable page content.
pub fn is_content_text(fragment: &TextFragment) -> bool {
    if fragment
        .parent_tag
        .is_some_and(|tag| EXCLUDED_PARENTS.contains(&tag))
    {
        return false;
    }

    let text = fragment.text.trim();
    if text.is_empty() {
        return false;
    }

    !CODE_PATTERNS.iter().any(|pattern| text.contains(pattern))
}

#[derive(Clone, Copy)]
enum Side {
    Before,
    After,
}

fn accumulate<'a>(
    fragments: impl Iterator<Item = TextFragment<'a>>,
    budget: usize,
    side: Side,
) -> String {
    let mut parts: VecDeque<&str> = VecDeque::new();
    // Length of the parts joined by single spaces
    let mut joined_len = 0;

    for fragment in fragments {
        if joined_len >= budget {
            break;
        }
        if !is_content_text(&fragment) {
            continue;
        }

        let text = fragment.text.trim();
        if !parts.is_empty() {
            joined_len += 1;
        }
        joined_len += text.chars().count();

        match side {
            Side::Before => parts.push_front(text),
            Side::After => parts.push_back(text),
        }
    }

    parts.into_iter().collect::<Vec<_>>().join(" ")
}
