//! Alt-text generation
//!
//! [`DescriptionGenerator`] is the seam to whatever service turns an image
//! record into prose. [`describe_images`] fans the calls out over a rayon pool
//! while keeping results in document order, and never calls the generator
//! for decorative images.

use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::{AnalyzedImage, ImageRole};
use crate::config::GeneratorConfig;
use crate::error::{AltTextError, Result};

/// Stored in place of a description when generation fails.
pub const GENERATION_ERROR_PREFIX: &str = "Error generating alt text: ";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Produces a suggested alt text for one non-decorative image.
pub trait DescriptionGenerator: Send + Sync {
    fn describe(&self, image: &AnalyzedImage) -> Result<String>;
}

/// Fill `suggested_alt` for every image, `batch_size` images at a time.
///
/// Once `deadline` passes no further batch is started and the unprocessed
/// tail is dropped, so the result is always a fully described prefix of the
/// input. A failed generation stores a sentinel string instead of aborting.
pub fn describe_images(
    mut images: Vec<AnalyzedImage>,
    generator: &dyn DescriptionGenerator,
    batch_size: usize,
    deadline: Option<Instant>,
) -> Vec<AnalyzedImage> {
    let total = images.len();
    let mut described = 0;

    log::info!("Generating alt text for {} images", total);

    for chunk in images.chunks_mut(batch_size.max(1)) {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            log::warn!(
                "Deadline reached, skipping {} of {} images",
                total - described,
                total
            );
            break;
        }

        chunk
            .par_iter_mut()
            .for_each(|image| describe_one(image, generator));
        described += chunk.len();
    }

    images.truncate(described);
    images
}

fn describe_one(image: &mut AnalyzedImage, generator: &dyn DescriptionGenerator) {
    if image.role_info.is_decorative {
        image.record.suggested_alt = Some(String::new());
        return;
    }

    let text = match generator.describe(image) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Alt text generation failed for {:?}: {}", image.record.src, e);
            format!("{}{}", GENERATION_ERROR_PREFIX, e)
        }
    };
    image.record.suggested_alt = Some(text);
}

/// Build the WCAG 2.1 alt-text prompt for one image.
pub fn build_prompt(image: &AnalyzedImage) -> String {
    let record = &image.record;
    let role_info = &image.role_info;

    let role = match record.role {
        ImageRole::Functional => "functional",
        _ => "informative",
    };

    let link = if role_info.is_functional {
        format!(
            "text: {}, url: {}",
            role_info.link_text.as_deref().unwrap_or_default(),
            role_info.link_url.as_deref().unwrap_or_default()
        )
    } else {
        "Not a link".to_string()
    };

    format!(
        "Given this image context, generate appropriate WCAG 2.1-compliant alt text:

Image Role: {role}
Existing Alt: {existing_alt}
Title: {title}
Caption: {caption}
Link Info: {link}
Surrounding Text:
- Before: {before}
- After: {after}

Generate alt text following these WCAG guidelines:
1. If functional (in link/button), describe the action
2. Be concise but descriptive
3. Don't repeat information already visible in surrounding text
4. Don't use phrases like \"image of\" or \"picture of\"
5. Focus on the purpose and meaning of the image
6. Keep it under 125 characters when possible

Alt text:",
        existing_alt = record.existing_alt,
        title = record.title.as_deref().unwrap_or_default(),
        caption = role_info.caption_text,
        before = record.context.before,
        after = record.context.after,
    )
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Generator backed by the Anthropic Messages API (blocking ureq client).
pub struct AnthropicGenerator {
    agent: ureq::Agent,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicGenerator {
    /// Reads the API key from the environment variable named in `config`.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| AltTextError::MissingApiKey {
            key: config.api_key_env.clone(),
        })?;
        Ok(Self::with_api_key(config, api_key))
    }

    pub fn with_api_key(config: &GeneratorConfig, api_key: impl Into<String>) -> Self {
        let agent = ureq::Agent::new_with_config(
            ureq::Agent::config_builder()
                .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
                .build(),
        );

        Self {
            agent,
            api_url: config.api_url.clone(),
            api_key: api_key.into(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }
}

impl AnthropicGenerator {
    fn request_body<'a>(&'a self, image: &AnalyzedImage) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [Message {
                role: "user",
                content: build_prompt(image),
            }],
        }
    }

    fn headers(&self) -> [(&'static str, &str); 2] {
        [
            ("x-api-key", self.api_key.as_str()),
            ("anthropic-version", ANTHROPIC_VERSION),
        ]
    }
}

impl DescriptionGenerator for AnthropicGenerator {
    fn describe(&self, image: &AnalyzedImage) -> Result<String> {
        let mut request = self.agent.post(&self.api_url);
        for (name, value) in self.headers() {
            request = request.header(name, value);
        }

        let mut response = request
            .send_json(&self.request_body(image))
            .map_err(|e| AltTextError::Generation(e.to_string()))?;

        let parsed: MessagesResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| AltTextError::Generation(format!("invalid response: {}", e)))?;

        first_text(parsed)
    }
}

fn first_text(response: MessagesResponse) -> Result<String> {
    response
        .content
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
        .map(|text| text.trim().to_string())
        .ok_or_else(|| AltTextError::Generation("response contained no text".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_html;
    use crate::config::AnalyzerConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Echo {
        calls: AtomicUsize,
    }

    impl DescriptionGenerator for Echo {
        fn describe(&self, image: &AnalyzedImage) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if image.record.src == "broken.png" {
                return Err(AltTextError::Generation("rate limited".into()));
            }
            Ok(format!("alt for {}", image.record.src))
        }
    }

    const PAGE: &str = r#"
        <img src="one.png" alt="One">
        <img src="spacer.gif" alt="">
        <img src="broken.png" alt="Broken">
        <a href="/four"><img src="four.png"> Four</a>
    "#;

    #[test]
    fn test_describe_images_keeps_order() {
        let generator = Echo { calls: AtomicUsize::new(0) };
        let images = analyze_html(PAGE, &AnalyzerConfig::default());
        let described = describe_images(images, &generator, 2, None);

        let alts: Vec<&str> = described
            .iter()
            .map(|i| i.record.suggested_alt.as_deref().unwrap())
            .collect();
        assert_eq!(
            alts,
            vec![
                "alt for one.png",
                "",
                "Error generating alt text: generation failed: rate limited",
                "alt for four.png",
            ]
        );
        // The decorative spacer never reaches the generator.
        assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_expired_deadline_yields_empty_prefix() {
        let generator = Echo { calls: AtomicUsize::new(0) };
        let images = analyze_html(PAGE, &AnalyzerConfig::default());
        let described = describe_images(images, &generator, 2, Some(Instant::now()));
        assert!(described.is_empty());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_prompt_for_functional_image() {
        let images = analyze_html(
            r#"<p>Shop our range.</p><a href="/cart"><img src="cart.svg" alt="Cart"> Basket</a>"#,
            &AnalyzerConfig::default(),
        );
        let prompt = build_prompt(&images[0]);
        assert!(prompt.contains("Image Role: functional"));
        assert!(prompt.contains("Existing Alt: Cart"));
        assert!(prompt.contains("Link Info: text: Basket, url: /cart"));
        assert!(prompt.contains("- Before: Shop our range."));
    }

    #[test]
    fn test_prompt_for_informative_image() {
        let images = analyze_html(
            r#"<figure><img src="c.png" alt="Chart"><figcaption>Q3 revenue</figcaption></figure>"#,
            &AnalyzerConfig::default(),
        );
        let prompt = build_prompt(&images[0]);
        assert!(prompt.contains("Image Role: informative"));
        assert!(prompt.contains("Caption: Q3 revenue"));
        assert!(prompt.contains("Link Info: Not a link"));
    }

    #[test]
    fn test_messages_request_format() {
        let config = GeneratorConfig {
            model: "claude-test".into(),
            max_tokens: 64,
            ..GeneratorConfig::default()
        };
        let generator = AnthropicGenerator::with_api_key(&config, "sk-test");
        let images = analyze_html(
            r#"<p>Trail map.</p><img src="map.png" alt="Map">"#,
            &AnalyzerConfig::default(),
        );

        let body = serde_json::to_value(generator.request_body(&images[0])).unwrap();
        assert_eq!(body["model"], "claude-test");
        assert_eq!(body["max_tokens"], 64);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], build_prompt(&images[0]));
        assert_eq!(body.as_object().unwrap().len(), 3);

        assert_eq!(
            generator.headers(),
            [("x-api-key", "sk-test"), ("anthropic-version", "2023-06-01")]
        );
    }

    #[test]
    fn test_first_text_block() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"content": [{"type": "text", "text": "  Open the shopping cart \n"}]}"#,
        )
        .unwrap();
        assert_eq!(first_text(response).unwrap(), "Open the shopping cart");

        let empty: MessagesResponse = serde_json::from_str(r#"{"content": []}"#).unwrap();
        assert!(matches!(first_text(empty), Err(AltTextError::Generation(_))));
    }
}
