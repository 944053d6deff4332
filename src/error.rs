// src/error.rs

//! Unified error handling for the watcher.
//!
//! Only [`AppError::Config`] is fatal for a run. Fetch and parse failures are
//! scoped to a single site and recovered by the orchestrator.

use std::fmt;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Page could not be fetched
    #[error("Fetch error for {site}: {message}")]
    Fetch { site: String, message: String },

    /// Page content could not be reduced to any representation
    #[error("Parse error for {site}: {message}")]
    Parse { site: String, message: String },
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a fetch error for a site.
    pub fn fetch(site: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            site: site.into(),
            message: message.to_string(),
        }
    }

    /// Create a parse error for a site.
    pub fn parse(site: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parse {
            site: site.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error is scoped to one site and must not abort the run.
    pub fn is_site_local(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Parse { .. } | Self::Http(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_errors_are_local() {
        assert!(AppError::fetch("A", "timeout").is_site_local());
        assert!(AppError::parse("A", "empty body").is_site_local());
        assert!(!AppError::config("missing sites file").is_site_local());
    }

    #[test]
    fn test_display_includes_site() {
        let err = AppError::fetch("Campus Events", "HTTP 503");
        assert_eq!(err.to_string(), "Fetch error for Campus Events: HTTP 503");
    }
}
