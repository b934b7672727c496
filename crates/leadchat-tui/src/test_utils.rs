//! Test utilities for leadchat-tui rendering and integration tests.

use crate::app::App;
use crate::screens::Screen as ScreenTrait;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use leadchat_engine::{
    ChatMessage, ConversationService, ScheduleRequest, ScheduleResponse, ServiceError,
};
use ratatui::{buffer::Buffer, layout::Rect};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

pub use crate::headless::buffer_to_string;

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Backend URL used by test apps.
pub const TEST_API_URL: &str = "http://localhost:8000";

/// Create a test app with an empty conversation.
pub fn create_test_app() -> App {
    App::new(TEST_API_URL)
}

/// A `show_slots` reply offering `count` hourly slots from 2024-01-01 10:00 UTC.
pub fn slots_reply(count: i64) -> String {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
    let slots: Vec<_> = (0..count)
        .map(|h| serde_json::json!({ "start_time": (start + ChronoDuration::hours(h)).to_rfc3339() }))
        .collect();
    serde_json::json!({
        "action": "show_slots",
        "slots": slots,
        "lead_data": {"name": "Ana"},
        "pipefy_card_id": "42"
    })
    .to_string()
}

/// Render a screen to a buffer and return it as a string.
pub fn render_screen_to_string<S: ScreenTrait>(screen: &S, app: &App) -> String {
    let area = Rect::new(0, 0, TEST_WIDTH, TEST_HEIGHT);
    let mut buffer = Buffer::empty(area);
    screen.render(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

/// In-memory backend: scripted chat replies, every booking succeeds.
#[derive(Default)]
pub struct FakeService {
    replies: Mutex<VecDeque<String>>,
    histories: Mutex<Vec<Vec<ChatMessage>>>,
    bookings: Mutex<Vec<ScheduleRequest>>,
    delay: Option<Duration>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw chat reply. Unscripted turns answer "ok".
    #[must_use]
    pub fn reply(self, raw: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(raw.into());
        self
    }

    /// Hold every answer back by `delay`.
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn histories(&self) -> Vec<Vec<ChatMessage>> {
        self.histories.lock().unwrap().clone()
    }

    pub fn bookings(&self) -> Vec<ScheduleRequest> {
        self.bookings.lock().unwrap().clone()
    }

    async fn wait(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ConversationService for FakeService {
    async fn send_message(&self, history: &[ChatMessage]) -> Result<String, ServiceError> {
        self.wait().await;
        self.histories.lock().unwrap().push(history.to_vec());
        let reply = self.replies.lock().unwrap().pop_front();
        Ok(reply.unwrap_or_else(|| "ok".to_string()))
    }

    async fn confirm_schedule(
        &self,
        request: &ScheduleRequest,
    ) -> Result<ScheduleResponse, ServiceError> {
        self.wait().await;
        self.bookings.lock().unwrap().push(request.clone());
        Ok(ScheduleResponse {
            message: "Meeting booked".to_string(),
            meeting_link: Some("https://meet.example.com/abc".to_string()),
            meeting_datetime: None,
        })
    }

    async fn health(&self) -> Result<String, ServiceError> {
        Ok("fake backend".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_app() {
        let app = create_test_app();
        assert_eq!(app.api_url, TEST_API_URL);
        assert!(app.conversation.messages().is_empty());
    }

    #[test]
    fn test_slots_reply_parses() {
        let reply = leadchat_engine::Reply::parse(&slots_reply(3)).unwrap();
        let leadchat_engine::Reply::ShowSlots { slots, lead } = reply else {
            panic!("expected slot offer");
        };
        assert_eq!(slots.len(), 3);
        assert_eq!(lead.card_id.as_deref(), Some("42"));
    }
}
