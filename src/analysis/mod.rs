//! Image accessibility analysis
//!
//! Each `<img>` goes through three stages, in document order:
//! role classification, surrounding-text extraction, and record assembly.

mod context_extractor;
mod record_assembler;
mod role_classifier;

pub use context_extractor::*;
pub use record_assembler::*;
pub use role_classifier::*;

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::config::AnalyzerConfig;
use crate::dom::DocumentNode;

/// WCAG purpose of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageRole {
    Decorative,
    Functional,
    Informative,
}

impl ImageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageRole::Decorative => "decorative",
            ImageRole::Functional => "functional",
            ImageRole::Informative => "informative",
        }
    }
}

/// Classification facts for one image.
///
/// Exactly one of `is_decorative`, `is_functional` and `is_informative` is
/// set. A decorative image carries nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleInfo {
    pub is_decorative: bool,
    pub is_functional: bool,
    pub is_informative: bool,
    pub has_caption: bool,
    pub caption_text: String,
    pub in_header: bool,
    pub in_navigation: bool,
    pub in_content: bool,
    /// Only set for images inside an anchor.
    pub link_text: Option<String>,
    pub link_url: Option<String>,
}

impl RoleInfo {
    pub fn role(&self) -> ImageRole {
        if self.is_decorative {
            ImageRole::Decorative
        } else if self.is_functional {
            ImageRole::Functional
        } else {
            ImageRole::Informative
        }
    }
}

/// Qualifying text gathered on either side of an image
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContext {
    pub before: String,
    pub after: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkInfo {
    pub text: String,
    pub url: String,
}

/// Per-image output record.
///
/// Optional fields are `None` whenever their source is empty and are left out
/// of the serialized form entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageContextRecord {
    pub src: String,
    pub existing_alt: String,
    pub role: ImageRole,
    pub context: TextContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkInfo>,
    /// `Some("")` for decorative images; `None` until a description is generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_alt: Option<String>,
}

/// A record plus the full classification the description generator works from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedImage {
    pub record: ImageContextRecord,
    pub role_info: RoleInfo,
}

/// Parse `html` and analyze every image in it.
pub fn analyze_html(html: &str, config: &AnalyzerConfig) -> Vec<AnalyzedImage> {
    let document = Html::parse_document(html);
    analyze_document(&document, config)
}

/// Analyze the images of an already parsed document.
///
/// With `max_images` set only that many leading images are processed, so the
/// output is always a prefix of the full result.
pub fn analyze_document(document: &Html, config: &AnalyzerConfig) -> Vec<AnalyzedImage> {
    let selector = match Selector::parse("img") {
        Ok(s) => s,
        Err(_) => return vec![],
    };

    let limit = config.max_images.unwrap_or(usize::MAX);
    let images: Vec<AnalyzedImage> = document
        .select(&selector)
        .take(limit)
        .map(|img| analyze_image(&img, config.context_range))
        .collect();

    log::info!("Analyzed {} images", images.len());
    images
}

/// Run classification, extraction and assembly for a single image node.
pub fn analyze_image<'a, N: DocumentNode<'a>>(img: &N, context_range: usize) -> AnalyzedImage {
    let role_info = classify_image(img);
    let context = extract_context(img, context_range);
    let record = assemble_record(img, &role_info, context);

    log::debug!("Image {:?} classified as {}", record.src, record.role.as_str());

    AnalyzedImage { record, role_info }
}
