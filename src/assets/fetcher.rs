use crate::error::{Result, VisionError};
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// One GET of a JSON asset. Non-2xx statuses are errors.
    async fn fetch(&self, url: &str) -> Result<Value>;
}

#[derive(Clone, Default)]
pub struct HttpAssetFetcher {
    client: reqwest::Client,
}

impl HttpAssetFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AssetFetcher for HttpAssetFetcher {
    async fn fetch(&self, url: &str) -> Result<Value> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(VisionError::Api {
                status: status.as_u16(),
                message: format!("GET {url} failed"),
            });
        }
        Ok(response.json::<Value>().await?)
    }
}
