//! Page fetching abstraction.
//!
//! Provides the [`PageSource`] trait as a port for anything that can return
//! the HTML of a wiki page, along with the reqwest-backed HTTP adapter.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::SiteConfig;
use crate::error::WikiError;

/// Port for page fetching implementations.
///
/// Implementations must be thread-safe (`Send + Sync`) so one source can be
/// shared by every bot handler.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the HTML body at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`WikiError::Fetch`] on transport failure or a non-success status.
    async fn fetch(&self, url: &str) -> Result<String, WikiError>;
}

/// Fetches pages over HTTP with reqwest.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: reqwest::Client,
}

impl HttpPageSource {
    /// Build an HTTP source with the timeout and user agent from `[site]`.
    ///
    /// # Errors
    ///
    /// Returns [`WikiError::Fetch`] if the HTTP client cannot be built.
    pub fn from_config(config: &SiteConfig) -> Result<Self, WikiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| WikiError::Fetch(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &str) -> Result<String, WikiError> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WikiError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WikiError::Fetch(format!("{} returned {}", url, status)));
        }

        response
            .text()
            .await
            .map_err(|e| WikiError::Fetch(e.to_string()))
    }
}
