use crate::config::ClientConfig;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("response is not the expected JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{} GraphQL errors: {}", .0.len(), .0.join("; "))]
    GraphQl(Vec<String>),
}

/// `{query, variables}` POST body.
#[derive(Debug, Clone, Serialize)]
pub struct GraphqlRequest {
    pub query:     &'static str,
    pub variables: Map<String, Value>,
}

/// One HTTP round trip. Retry and pagination live in `Fetcher`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, request: &GraphqlRequest) -> Result<Value, TransportError>;
}

pub struct ReqwestTransport {
    client:   reqwest::Client,
    endpoint: String,
    token:    String,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            token:    config.token.clone(),
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post(&self, request: &GraphqlRequest) -> Result<Value, TransportError> {
        let resp = self.client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }

        let raw = resp.text().await?;
        Ok(serde_json::from_str(&raw)?)
    }
}
