//! The backend seen from the client: two conversation operations and a probe.

use crate::message::ChatMessage;
use crate::schedule::{ScheduleRequest, ScheduleResponse};
use async_trait::async_trait;

/// Remote conversational backend.
///
/// [`crate::HttpConversationService`] is the production implementation; tests
/// substitute in-memory fakes.
#[async_trait]
pub trait ConversationService: Send + Sync {
    /// Send the full history and return the raw reply string.
    async fn send_message(&self, history: &[ChatMessage]) -> Result<String, ServiceError>;

    /// Book the chosen slot for the held lead.
    async fn confirm_schedule(
        &self,
        request: &ScheduleRequest,
    ) -> Result<ScheduleResponse, ServiceError>;

    /// Check that the backend is reachable, returning its status message.
    async fn health(&self) -> Result<String, ServiceError>;
}

/// Errors that can occur while talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Transport, timeout, or body decoding failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never completed (its task was cancelled or panicked).
    #[error("request interrupted: {0}")]
    Interrupted(String),
}
