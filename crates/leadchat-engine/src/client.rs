//! HTTP implementation of [`ConversationService`].

use crate::config::Config;
use crate::message::ChatMessage;
use crate::schedule::{ScheduleRequest, ScheduleResponse};
use crate::service::{ConversationService, ServiceError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Client for the leadchat backend HTTP API.
#[derive(Debug, Clone)]
pub struct HttpConversationService {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    history: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatResponse {
    response: String,
}

#[derive(Deserialize)]
struct HealthResponse {
    message: String,
}

impl HttpConversationService {
    /// Create a client for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Create a client from configuration.
    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        Self::new(
            &config.api_url,
            Duration::from_secs(config.request_timeout_seconds),
        )
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn check(res: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
        if res.status().is_success() {
            return Ok(res);
        }
        let status = res.status().as_u16();
        let body = res.text().await.unwrap_or_default();
        warn!(status, %body, "backend returned error status");
        Err(ServiceError::Status { status, body })
    }
}

#[async_trait]
impl ConversationService for HttpConversationService {
    /// POST /chat
    async fn send_message(&self, history: &[ChatMessage]) -> Result<String, ServiceError> {
        let url = format!("{}/chat", self.base_url);
        debug!(%url, messages = history.len(), "sending chat history");
        let res = self
            .client
            .post(&url)
            .json(&ChatRequest { history })
            .send()
            .await?;
        let data: ChatResponse = Self::check(res).await?.json().await?;
        Ok(data.response)
    }

    /// POST /schedule
    async fn confirm_schedule(
        &self,
        request: &ScheduleRequest,
    ) -> Result<ScheduleResponse, ServiceError> {
        let url = format!("{}/schedule", self.base_url);
        debug!(%url, start_time = %request.slot_info.start_time, "confirming schedule");
        let res = self.client.post(&url).json(request).send().await?;
        Ok(Self::check(res).await?.json().await?)
    }

    /// GET /
    async fn health(&self) -> Result<String, ServiceError> {
        let url = format!("{}/", self.base_url);
        let res = self.client.get(&url).send().await?;
        let data: HealthResponse = Self::check(res).await?.json().await?;
        Ok(data.message)
    }
}
