//! Record assembly

use super::{ImageContextRecord, ImageRole, LinkInfo, RoleInfo, TextContext};
use crate::dom::DocumentNode;

/// Merge an image's attributes, classification and context into one record.
///
/// `title`, `caption` and `link` stay `None` unless they carry text.
pub fn assemble_record<'a, N: DocumentNode<'a>>(
    img: &N,
    role_info: &RoleInfo,
    context: TextContext,
) -> ImageContextRecord {
    let role = role_info.role();

    let title = non_empty(img.attr("title").unwrap_or_default());
    let caption = non_empty(&role_info.caption_text);

    let link = if role == ImageRole::Functional {
        role_info
            .link_text
            .as_deref()
            .and_then(non_empty)
            .map(|text| LinkInfo {
                text,
                url: role_info.link_url.clone().unwrap_or_default(),
            })
    } else {
        None
    };

    let suggested_alt = match role {
        ImageRole::Decorative => Some(String::new()),
        _ => None,
    };

    ImageContextRecord {
        src: img.attr("src").unwrap_or_default().to_string(),
        existing_alt: img.attr("alt").unwrap_or_default().to_string(),
        role,
        context,
        title,
        caption,
        link,
        suggested_alt,
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
