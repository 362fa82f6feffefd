use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::direction::Direction;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/convert";

/// Body sent to the conversion service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionRequest {
    pub direction: Direction,
    pub data: String,
}

/// Body of a successful reply. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConvertedBody {
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub original_size: Option<u64>,
    #[serde(default)]
    pub output_size: Option<u64>,
    #[serde(default)]
    pub reduction: Option<String>,
    #[serde(default)]
    pub increase: Option<String>,
}

/// What the service answered, before the orchestrator interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceReply {
    Converted(ConvertedBody),
    Rejected { error: Option<String> },
}

/// Failures that happen before a reply could be obtained.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid reply body: {0}")]
    MalformedReply(#[from] serde_json::Error),
    #[error("conversion task failed: {0}")]
    Task(String),
}

#[async_trait]
pub trait ConversionService: Send + Sync {
    async fn convert(&self, request: &ConversionRequest) -> Result<ServiceReply, ConversionError>;
}

#[derive(Clone)]
pub struct HttpConversionClient {
    client: Client,
    endpoint: String,
}

impl HttpConversionClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl ConversionService for HttpConversionClient {
    async fn convert(&self, request: &ConversionRequest) -> Result<ServiceReply, ConversionError> {
        tracing::debug!(endpoint = %self.endpoint, direction = request.direction.as_str(), "sending conversion request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(%status, bytes = body.len(), "conversion service replied");

        parse_reply(status.is_success(), &body)
    }
}

/// Classify a raw reply. A non-success body that isn't JSON still counts as a
/// rejection, just without an error message.
pub fn parse_reply(success: bool, body: &str) -> Result<ServiceReply, ConversionError> {
    if success {
        let converted: ConvertedBody = serde_json::from_str(body)?;
        return Ok(ServiceReply::Converted(converted));
    }

    let error = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("error").and_then(|e| e.as_str()).map(str::to_owned));

    Ok(ServiceReply::Rejected { error })
}
