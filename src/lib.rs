//! WCAG image alt-text analysis
//!
//! Finds every image in an HTML page and builds an accessibility record for it:
//! - Role classification (decorative, functional, informative)
//! - Caption, link and page-location facts
//! - Surrounding text, filtered of scripts, styles and code
//! - Suggested alt text from a pluggable description generator
//!
//! [`process_url`] runs the whole pipeline; [`analyze_html`] is the pure
//! classification and context step on its own.

pub mod analysis;
pub mod config;
pub mod dom;
pub mod error;
pub mod fetch;
pub mod ffi;
pub mod generator;
pub mod report;

use std::path::PathBuf;
use std::time::{Duration, Instant};

pub use analysis::*;
pub use config::{AnalyzerConfig, FetchConfig, GeneratorConfig};
pub use error::{AltTextError, Result};
pub use generator::{describe_images, AnthropicGenerator, DescriptionGenerator};
pub use report::{load_report, save_report, AnalysisReport};

/// Fetch `url`, analyze its images and generate alt text for each.
///
/// Fetch errors are returned unchanged. Generation failures are recorded per
/// image and never abort the report.
pub fn process_url(
    url: &str,
    config: &AnalyzerConfig,
    generator: &dyn DescriptionGenerator,
) -> Result<AnalysisReport> {
    let html = fetch::fetch_page(url, &config.fetch)?;
    Ok(process_html(url, &html, config, generator))
}

/// [`process_url`], then write the report into `config.output_dir`.
pub fn process_url_and_save(
    url: &str,
    config: &AnalyzerConfig,
    generator: &dyn DescriptionGenerator,
) -> Result<(AnalysisReport, PathBuf)> {
    let html = fetch::fetch_page(url, &config.fetch)?;
    process_html_and_save(url, &html, config, generator)
}

/// [`process_html`], then write the report into `config.output_dir`.
pub fn process_html_and_save(
    url: &str,
    html: &str,
    config: &AnalyzerConfig,
    generator: &dyn DescriptionGenerator,
) -> Result<(AnalysisReport, PathBuf)> {
    let report = process_html(url, html, config, generator);
    let path = save_report(&report, &config.output_dir)?;
    Ok((report, path))
}

/// Same as [`process_url`] for markup that is already in hand.
pub fn process_html(
    url: &str,
    html: &str,
    config: &AnalyzerConfig,
    generator: &dyn DescriptionGenerator,
) -> AnalysisReport {
    let images = analyze_html(html, config);

    let deadline = config
        .generator
        .deadline_secs
        .map(|secs| Instant::now() + Duration::from_secs(secs));
    let described = describe_images(images, generator, config.generator.batch_size, deadline);

    AnalysisReport::new(url, described.into_iter().map(|image| image.record).collect())
}
