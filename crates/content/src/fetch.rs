use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};
use url::Url;

use crate::ContentError;

/// Path the deck fragment is served under.
pub const CONTENT_FRAGMENT_PATH: &str = "/content-fragment";

/// Source of the raw deck fragment. Called at most once per page lifetime.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch_fragment(&self) -> Result<String, ContentError>;
}

pub struct HttpContentFetcher {
    client: Client,
    url: Url,
}

impl HttpContentFetcher {
    pub fn new(server_url: &str) -> Result<Self, ContentError> {
        Self::with_path(server_url, CONTENT_FRAGMENT_PATH)
    }

    pub fn with_path(server_url: &str, path: &str) -> Result<Self, ContentError> {
        let base = Url::parse(server_url).map_err(|source| ContentError::InvalidUrl {
            url: server_url.to_string(),
            source,
        })?;
        let url = base.join(path).map_err(|source| ContentError::InvalidUrl {
            url: format!("{server_url}{path}"),
            source,
        })?;
        Ok(Self {
            client: Client::new(),
            url,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl ContentFetcher for HttpContentFetcher {
    async fn fetch_fragment(&self) -> Result<String, ContentError> {
        let url = self.url.to_string();
        let response = self
            .client
            .get(self.url.clone())
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|source| ContentError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "content fragment request rejected");
            return Err(ContentError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| ContentError::Transport {
                url: url.clone(),
                source,
            })?;
        info!(%url, bytes = body.len(), "fetched content fragment");
        Ok(body)
    }
}

/// Fetcher returning a fixed fragment, or a fixed failure when `None`.
#[derive(Debug, Clone)]
pub struct StaticContentFetcher {
    fragment: Option<String>,
}

impl StaticContentFetcher {
    pub fn new(fragment: impl Into<String>) -> Self {
        Self {
            fragment: Some(fragment.into()),
        }
    }

    pub fn failing() -> Self {
        Self { fragment: None }
    }
}

#[async_trait]
impl ContentFetcher for StaticContentFetcher {
    async fn fetch_fragment(&self) -> Result<String, ContentError> {
        self.fragment
            .clone()
            .ok_or_else(|| ContentError::Unavailable("no fragment configured".to_string()))
    }
}

#[cfg(test)]
#[path = "tests/fetch_tests.rs"]
mod tests;
