//! WCAG role classification
//!
//! Rules are applied in priority order: decorative, then functional, then
//! caption and location facts, with informative as the fallback.

use super::RoleInfo;
use crate::dom::DocumentNode;

const CONTENT_SECTIONS: &[&str] = &["article", "main", "section"];

/// Classify one image from its attributes and ancestor chain.
pub fn classify_image<'a, N: DocumentNode<'a>>(img: &N) -> RoleInfo {
    let anchor = img.closest(&["a"]);

    if is_decorative(img, anchor.is_some()) {
        // Nothing else is computed for decorative images.
        return RoleInfo {
            is_decorative: true,
            ..RoleInfo::default()
        };
    }

    let mut info = RoleInfo::default();

    if let Some(anchor) = anchor {
        info.is_functional = true;
        info.link_text = Some(anchor.text_content());
        info.link_url = Some(anchor.attr("href").unwrap_or_default().to_string());
    } else if img.closest(&["button"]).is_some() {
        info.is_functional = true;
    }

    if let Some(caption) = img
        .closest(&["figure"])
        .and_then(|figure| figure.find_descendant("figcaption"))
    {
        let text = caption.text_content();
        if !text.is_empty() {
            info.has_caption = true;
            info.caption_text = text;
        }
    }

    info.in_header = img.closest(&["header"]).is_some();
    info.in_navigation = img.closest(&["nav"]).is_some();
    info.in_content = img.closest(CONTENT_SECTIONS).is_some();

    info.is_informative = !info.is_functional;
    info
}

/// `alt` is compared untrimmed: a whitespace-only alt is still an alt.
fn is_decorative<'a, N: DocumentNode<'a>>(img: &N, in_anchor: bool) -> bool {
    img.attr("role") == Some("presentation")
        || img.attr("aria-hidden") == Some("true")
        || (img.attr("alt").unwrap_or_default().is_empty() && !in_anchor)
}
