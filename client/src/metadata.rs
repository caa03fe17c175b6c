use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Off-chain document the item's metadata uri points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMetadata {
    pub name: String,
    pub image: String,
    pub description: String,
}

impl ItemMetadata {
    pub fn from_slice(body: &[u8]) -> Result<Self, ClientError> {
        serde_json::from_slice(body)
            .map_err(|err| ClientError::MetadataFetch(format!("malformed metadata document: {err}")))
    }
}

pub trait MetadataSource: Send + Sync {
    fn fetch(&self, uri: &str) -> impl Future<Output = Result<ItemMetadata, ClientError>> + Send;
}

pub struct HttpMetadataSource {
    http: reqwest::Client,
}

impl HttpMetadataSource {
    pub const TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new() -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Self::TIMEOUT)
            .build()
            .map_err(|err| ClientError::Network(err.to_string()))?;
        Ok(Self { http })
    }
}

impl MetadataSource for HttpMetadataSource {
    async fn fetch(&self, uri: &str) -> Result<ItemMetadata, ClientError> {
        let response = self
            .http
            .get(uri)
            .send()
            .await
            .map_err(|err| ClientError::MetadataFetch(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::MetadataFetch(format!("{uri} returned {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| ClientError::MetadataFetch(err.to_string()))?;
        ItemMetadata::from_slice(&body)
    }
}
