// src/utils/http.rs

//! HTTP fetching for monitored pages.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::FetcherConfig;

/// Source of raw page content.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page body. Any failure is a [`AppError::Fetch`].
    async fn fetch(&self, site: &str, url: &str) -> Result<String>;
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &FetcherConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Single GET per page: no retries, one timeout, non-2xx is a failure.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, site: &str, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::fetch(site, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(site, format!("HTTP {status} from {url}")));
        }

        response.text().await.map_err(|e| AppError::fetch(site, e))
    }
}
