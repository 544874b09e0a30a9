//! Page retrieval using ureq (simple blocking HTTP)

use std::time::Duration;

use crate::config::FetchConfig;
use crate::error::{AltTextError, Result};

/// Fetch the HTML of `url`. Errors are reported as [`AltTextError::Fetch`]; there is no retry.
pub fn fetch_page(url: &str, config: &FetchConfig) -> Result<String> {
    let fetch_error = |reason: String| AltTextError::Fetch {
        url: url.to_string(),
        reason,
    };

    let parsed = url::Url::parse(url).map_err(|e| fetch_error(e.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(fetch_error(format!("unsupported scheme: {}", parsed.scheme())));
    }

    let agent = ureq::Agent::new_with_config(
        ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .user_agent(config.user_agent.as_str())
            .build(),
    );

    log::info!("Fetching {}", url);

    let resp = agent.get(url).call().map_err(|e| fetch_error(e.to_string()))?;
    if !resp.status().is_success() {
        return Err(fetch_error(format!("HTTP {}", resp.status())));
    }

    resp.into_body()
        .read_to_string()
        .map_err(|e| fetch_error(format!("failed to read body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url() {
        let err = fetch_page("not a url", &FetchConfig::default()).unwrap_err();
        match err {
            AltTextError::Fetch { url, .. } => assert_eq!(url, "not a url"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unsupported_scheme() {
        let err = fetch_page("ftp://example.com/page.html", &FetchConfig::default()).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme: ftp"));
    }
}
