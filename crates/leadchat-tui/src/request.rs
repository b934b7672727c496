//! Backend requests issued by the app and run off the UI loop.

use leadchat_engine::{
    ChatMessage, ConversationService, ScheduleRequest, ScheduleResponse, ServiceError,
};
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::debug;

/// A request the app wants sent.
#[derive(Debug, Clone)]
pub enum Request {
    Chat(Vec<ChatMessage>),
    Schedule(ScheduleRequest),
}

/// The backend's answer to a [`Request`].
#[derive(Debug)]
pub enum Outcome {
    Chat(Result<String, ServiceError>),
    Schedule(Result<ScheduleResponse, ServiceError>),
}

/// Send `request` and wait for the answer.
pub async fn dispatch(service: &dyn ConversationService, request: Request) -> Outcome {
    match request {
        Request::Chat(history) => Outcome::Chat(service.send_message(&history).await),
        Request::Schedule(request) => Outcome::Schedule(service.confirm_schedule(&request).await),
    }
}

/// Holds the single request in flight.
#[derive(Default)]
pub struct InFlight {
    handle: Option<JoinHandle<Outcome>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `request` on the runtime. The app's phase guarantees only one at a time.
    pub fn spawn(&mut self, service: &Arc<dyn ConversationService>, request: Request) {
        let service = Arc::clone(service);
        debug!(?request, "dispatching request");
        self.handle = Some(tokio::spawn(async move {
            dispatch(service.as_ref(), request).await
        }));
    }

    /// Collect the outcome if the task has finished, without blocking otherwise.
    pub async fn take_finished(&mut self) -> Option<Result<Outcome, JoinError>> {
        if !self.handle.as_ref().is_some_and(JoinHandle::is_finished) {
            return None;
        }
        let handle = self.handle.take()?;
        Some(handle.await)
    }

    pub fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
