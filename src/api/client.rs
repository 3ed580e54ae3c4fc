use crate::api::models::{ChatRequest, ChatResponse, CHAT_MESSAGE_PATH, HEALTH_PATH};
use crate::error::{ChatError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;

/// The two calls the chat client makes against the agent service.
#[async_trait]
pub trait AgentApi: Send + Sync {
    /// Send one user message and wait for the agent's reply.
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse>;

    /// Probe the service. The payload is only returned for diagnostics.
    async fn health(&self) -> Result<Value>;
}

pub struct HttpAgentClient {
    client: reqwest::Client,
    base_url: String,
    health_timeout: Duration,
}

impl HttpAgentClient {
    pub fn new(
        base_url: &str,
        request_timeout: Option<Duration>,
        health_timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            health_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl AgentApi for HttpAgentClient {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let response = self
            .client
            .post(self.url(CHAT_MESSAGE_PATH))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ChatError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn health(&self) -> Result<Value> {
        let response = self
            .client
            .get(self.url(HEALTH_PATH))
            .timeout(self.health_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ChatError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
