use crate::config::Config;
use crate::error::{Error, Result};
use async_trait::async_trait;

/// Status and body of a plain-text endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextResponse {
    pub status: u16,
    pub body: String,
}

/// Downloads artifacts and reads version endpoints.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fails with [`Error::Download`] on a non-success status.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;

    /// Returns whatever status the endpoint answered with.
    async fn fetch_text(&self, url: &str) -> Result<TextResponse>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(HttpFetcher {
            client: config.http_client()?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Download {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn fetch_text(&self, url: &str) -> Result<TextResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TextResponse { status, body })
    }
}
