//! Application configuration structures.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// How a site is reduced before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Whole-page content signature, one boolean change per site
    #[default]
    Signature,
    /// Structured event records compared by set difference
    Events,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Signature => f.write_str("signature"),
            RunMode::Events => f.write_str("events"),
        }
    }
}

impl FromStr for RunMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "signature" | "page" => Ok(RunMode::Signature),
            "events" | "event" => Ok(RunMode::Events),
            other => Err(AppError::validation(format!("unknown run mode '{other}'"))),
        }
    }
}

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Representation used for every site in a run
    #[serde(default)]
    pub mode: RunMode,

    /// HTTP fetch behavior
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// File locations, relative to the storage directory
    #[serde(default)]
    pub paths: PathsConfig,

    /// Extraction limits
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Report rendering limits
    #[serde(default)]
    pub report: ReportConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        if !path.as_ref().exists() {
            log::debug!("No config at {:?}, using defaults", path.as_ref());
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetcher.user_agent is empty"));
        }
        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::validation("fetcher.timeout_secs must be > 0"));
        }
        if self.fetcher.max_concurrent == 0 {
            return Err(AppError::validation("fetcher.max_concurrent must be > 0"));
        }
        if self.extraction.max_containers == 0 {
            return Err(AppError::validation(
                "extraction.max_containers must be > 0",
            ));
        }
        if self.extraction.hash_prefix_len == 0 || self.extraction.hash_prefix_len > 64 {
            return Err(AppError::validation(
                "extraction.hash_prefix_len must be within 1..=64",
            ));
        }
        if self.report.preview_limit < 4 {
            return Err(AppError::validation("report.preview_limit must be >= 4"));
        }
        if self.paths.state_file.trim().is_empty() || self.paths.report_file.trim().is_empty() {
            return Err(AppError::validation("paths must not be empty"));
        }
        Ok(())
    }

    /// Resolve the sites file against the storage directory.
    pub fn sites_path(&self, root: &Path) -> PathBuf {
        root.join(&self.paths.sites_file)
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum sites fetched at once (1 = sequential)
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// File names used by a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "defaults::sites_file")]
    pub sites_file: String,

    #[serde(default = "defaults::state_file")]
    pub state_file: String,

    #[serde(default = "defaults::report_file")]
    pub report_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            sites_file: defaults::sites_file(),
            state_file: defaults::state_file(),
            report_file: defaults::report_file(),
        }
    }
}

/// Limits applied while reducing a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Maximum container elements considered per page
    #[serde(default = "defaults::max_containers")]
    pub max_containers: usize,

    /// Maximum characters kept from an event description
    #[serde(default = "defaults::description_limit")]
    pub description_limit: usize,

    /// Maximum characters of page text kept in a fallback record
    #[serde(default = "defaults::content_preview_limit")]
    pub content_preview_limit: usize,

    /// Hex characters of the content hash kept in a fallback record
    #[serde(default = "defaults::hash_prefix_len")]
    pub hash_prefix_len: usize,

    /// Lines must be longer than this to count towards a page signature
    #[serde(default = "defaults::min_line_chars")]
    pub min_line_chars: usize,

    /// Block elements scanned for signature previews
    #[serde(default = "defaults::preview_scan_limit")]
    pub preview_scan_limit: usize,

    /// Snippets shorter than this are not used as previews
    #[serde(default = "defaults::preview_min_chars")]
    pub preview_min_chars: usize,

    /// Characters kept per preview snippet
    #[serde(default = "defaults::preview_snippet_chars")]
    pub preview_snippet_chars: usize,

    /// Maximum previews kept per signature
    #[serde(default = "defaults::max_previews")]
    pub max_previews: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_containers: defaults::max_containers(),
            description_limit: defaults::description_limit(),
            content_preview_limit: defaults::content_preview_limit(),
            hash_prefix_len: defaults::hash_prefix_len(),
            min_line_chars: defaults::min_line_chars(),
            preview_scan_limit: defaults::preview_scan_limit(),
            preview_min_chars: defaults::preview_min_chars(),
            preview_snippet_chars: defaults::preview_snippet_chars(),
            max_previews: defaults::max_previews(),
        }
    }
}

/// Report rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Maximum characters of any preview or description in the report
    #[serde(default = "defaults::preview_limit")]
    pub preview_limit: usize,

    /// Previews rendered per changed site in signature mode
    #[serde(default = "defaults::max_previews")]
    pub max_previews: usize,

    /// Maximum characters of a description rendered in event mode
    #[serde(default = "defaults::description_limit")]
    pub description_limit: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            preview_limit: defaults::preview_limit(),
            max_previews: defaults::max_previews(),
            description_limit: defaults::description_limit(),
        }
    }
}

mod defaults {
    // Fetcher defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_concurrent() -> usize {
        1
    }

    // Path defaults
    pub fn sites_file() -> String {
        "sites_config.json".into()
    }
    pub fn state_file() -> String {
        "last_state.json".into()
    }
    pub fn report_file() -> String {
        "report.md".into()
    }

    // Extraction defaults
    pub fn max_containers() -> usize {
        20
    }
    pub fn description_limit() -> usize {
        300
    }
    pub fn content_preview_limit() -> usize {
        500
    }
    pub fn hash_prefix_len() -> usize {
        16
    }
    pub fn min_line_chars() -> usize {
        10
    }
    pub fn preview_scan_limit() -> usize {
        5
    }
    pub fn preview_min_chars() -> usize {
        50
    }
    pub fn preview_snippet_chars() -> usize {
        200
    }
    pub fn max_previews() -> usize {
        3
    }

    // Report defaults
    pub fn preview_limit() -> usize {
        150
    }
}
