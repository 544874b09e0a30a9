//! JSON report persistence

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::ImageContextRecord;
use crate::error::Result;

/// Everything found on one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub url: String,
    pub analysis_timestamp: DateTime<Utc>,
    pub total_images: usize,
    pub images: Vec<ImageContextRecord>,
}

impl AnalysisReport {
    pub fn new(url: &str, images: Vec<ImageContextRecord>) -> Self {
        Self {
            url: url.to_string(),
            analysis_timestamp: Utc::now(),
            total_images: images.len(),
            images,
        }
    }

    /// `image_analysis_<url without scheme, '/' as '_'>_<YYYYmmdd_HHMMSS>.json`
    pub fn file_name(&self) -> String {
        let safe_url = self
            .url
            .replace("https://", "")
            .replace("http://", "")
            .replace('/', "_");
        format!(
            "image_analysis_{}_{}.json",
            safe_url,
            self.analysis_timestamp.format("%Y%m%d_%H%M%S")
        )
    }
}

/// Write `report` as pretty JSON into `dir`, creating it if needed.
pub fn save_report(report: &AnalysisReport, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let path = dir.join(report.file_name());
    let json = serde_json::to_string_pretty(report)?;
    fs::write(&path, json)?;

    log::info!("Saved report with {} images to {}", report.total_images, path.display());
    Ok(path)
}

pub fn load_report(path: impl AsRef<Path>) -> Result<AnalysisReport> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
