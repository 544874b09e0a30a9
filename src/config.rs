//! Analyzer configuration
//!
//! Every struct deserializes from JSON with per-field defaults, so callers
//! (including the FFI layer) only need to send the options they change.

use serde::{Deserialize, Serialize};

use crate::error::{AltTextError, Result};

/// Characters of surrounding text gathered on each side of an image.
pub const DEFAULT_CONTEXT_RANGE: usize = 100;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; WCAGAltTextBot/1.0)";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Soft character budget for `before` and `after` context.
    pub context_range: usize,
    /// Only the first N images (document order) are analyzed when set.
    pub max_images: Option<usize>,
    /// Directory reports are written into.
    pub output_dir: String,
    pub fetch: FetchConfig,
    pub generator: GeneratorConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            context_range: DEFAULT_CONTEXT_RANGE,
            max_images: None,
            output_dir: "output".to_string(),
            fetch: FetchConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Parse options JSON; an empty string yields the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fetch.timeout_secs == 0 {
            return Err(AltTextError::InvalidConfig(
                "`fetch.timeout_secs` must be greater than 0".into(),
            ));
        }
        if self.generator.max_tokens == 0 {
            return Err(AltTextError::InvalidConfig(
                "`generator.max_tokens` must be greater than 0".into(),
            ));
        }
        if self.generator.batch_size == 0 {
            return Err(AltTextError::InvalidConfig(
                "`generator.batch_size` must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// HTTP settings for page retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Settings for the description service and the fan-out around it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
    /// Images described concurrently per chunk; the deadline is checked between chunks.
    pub batch_size: usize,
    /// Stop starting new chunks this many seconds after generation begins.
    pub deadline_secs: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.anthropic.com/v1/messages".to_string(),
            model: "claude-3-opus-20240229".to_string(),
            max_tokens: 150,
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            timeout_secs: 60,
            batch_size: 8,
            deadline_secs: None,
        }
    }
}
