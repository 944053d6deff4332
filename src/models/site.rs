// src/models/site.rs

//! Monitored site definitions.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use super::SelectorRules;
use crate::error::{AppError, Result};

/// One independently monitored web page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteConfig {
    /// Unique site name, used as the snapshot key
    pub name: String,

    /// Page URL
    pub url: String,

    /// Disabled sites are never fetched or reported
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Extraction rules; without them only the page hash is tracked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selectors: Option<SelectorRules>,
}

fn default_enabled() -> bool {
    true
}

impl SiteConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            enabled: true,
            selectors: None,
        }
    }

    pub fn with_selectors(mut self, selectors: SelectorRules) -> Self {
        self.selectors = Some(selectors);
        self
    }
}

/// The sites file: `{"sites": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SitesFile {
    pub sites: Vec<SiteConfig>,
}

impl SitesFile {
    /// Load and validate the sites file.
    ///
    /// Any failure here is a [`AppError::Config`], which aborts the run.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("cannot read {}: {e}", path.display())))?;
        Self::parse(&content)
            .map_err(|e| AppError::config(format!("invalid sites file {}: {e}", path.display())))
    }

    /// Parse and validate sites JSON.
    pub fn parse(content: &str) -> Result<Self> {
        let file: SitesFile = serde_json::from_str(content)?;
        file.validate()?;
        Ok(file)
    }

    /// Enforce unique names and absolute http(s) URLs.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for site in &self.sites {
            if site.name.trim().is_empty() {
                return Err(AppError::validation("site with empty name"));
            }
            if !names.insert(site.name.as_str()) {
                return Err(AppError::validation(format!(
                    "duplicate site name '{}'",
                    site.name
                )));
            }
            let url = Url::parse(&site.url).map_err(|e| {
                AppError::validation(format!("site '{}' has invalid url: {e}", site.name))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(AppError::validation(format!(
                    "site '{}' must use http or https",
                    site.name
                )));
            }
        }
        Ok(())
    }

    /// Sites that should be checked this run, in configuration order.
    pub fn enabled(&self) -> impl Iterator<Item = &SiteConfig> {
        self.sites.iter().filter(|s| s.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_defaults_to_true() {
        let file = SitesFile::parse(
            r#"{"sites":[
                {"name":"A","url":"http://x"},
                {"name":"B","url":"http://y","enabled":false}
            ]}"#,
        )
        .unwrap();

        assert!(file.sites[0].enabled);
        assert!(file.sites[0].selectors.is_none());
        let enabled: Vec<_> = file.enabled().map(|s| s.name.as_str()).collect();
        assert_eq!(enabled, vec!["A"]);
    }

    #[test]
    fn test_empty_selectors_object_is_present() {
        let file = SitesFile::parse(
            r#"{"sites":[{"name":"A","url":"http://x","enabled":true,"selectors":{}}]}"#,
        )
        .unwrap();

        assert_eq!(file.sites[0].selectors, Some(SelectorRules::default()));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = SitesFile::parse(
            r#"{"sites":[{"name":"A","url":"http://x"},{"name":"A","url":"http://y"}]}"#,
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_non_http_url_rejected() {
        let result = SitesFile::parse(r#"{"sites":[{"name":"A","url":"ftp://x"}]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = SitesFile::load("/no/such/sites_config.json");
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
