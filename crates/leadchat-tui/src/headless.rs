//! Headless driver: the same app loop rendered into a `TestBackend`.
//!
//! Actions go in over a channel; after every frame the rendered text and a few
//! app flags are published on a watch channel for the caller to inspect.

use crate::app::App;
use crate::event::Action;
use crate::request::InFlight;
use crate::screens;
use leadchat_engine::{ConversationService, Phase};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// What the last frame looked like.
#[derive(Debug, Clone, Default)]
pub struct HeadlessState {
    /// Rendered text, one line per terminal row.
    pub screen_contents: String,
    pub should_quit: bool,
    pub show_help: bool,
    pub phase: Phase,
}

/// Drives a running headless session.
pub struct HeadlessHandle {
    actions: mpsc::UnboundedSender<Action>,
    frames: watch::Receiver<HeadlessState>,
}

impl HeadlessHandle {
    /// Queue an action. Returns `false` once the session has ended.
    pub fn send_action(&self, action: Action) -> bool {
        self.actions.send(action).is_ok()
    }

    /// Queue one `Insert` per character of `text`.
    pub fn type_text(&self, text: &str) -> bool {
        text.chars().all(|c| self.send_action(Action::Insert(c)))
    }

    pub fn state(&self) -> HeadlessState {
        self.frames.borrow().clone()
    }

    pub fn has_quit(&self) -> bool {
        self.frames.borrow().should_quit
    }

    /// Wait for a frame satisfying `condition`, or `None` after `timeout`.
    pub async fn wait_for<F>(&mut self, condition: F, timeout: Duration) -> Option<HeadlessState>
    where
        F: Fn(&HeadlessState) -> bool,
    {
        let frames = &mut self.frames;
        let matched = tokio::time::timeout(timeout, frames.wait_for(|s| condition(s))).await;
        match matched {
            Ok(Ok(state)) => Some(state.clone()),
            // Timed out, or the session ended first
            Ok(Err(_)) | Err(_) => None,
        }
    }

    pub async fn wait_for_text(&mut self, text: &str, timeout: Duration) -> Option<HeadlessState> {
        self.wait_for(|s| s.screen_contents.contains(text), timeout)
            .await
    }

    pub async fn wait_for_phase(&mut self, phase: Phase, timeout: Duration) -> Option<HeadlessState> {
        self.wait_for(|s| s.phase == phase, timeout).await
    }
}

/// Terminal size and pacing of a headless session.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    pub width: u16,
    pub height: u16,
    pub tick_rate_ms: u64,
    /// Shown in the status bar.
    pub api_url: String,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
            tick_rate_ms: 50,
            api_url: "headless".to_string(),
        }
    }
}

/// Start a headless session talking to `service`.
///
/// ```ignore
/// let (mut handle, task) = run_tui_headless(service, HeadlessConfig::default());
/// handle.type_text("hi");
/// handle.send_action(Action::Submit);
/// handle.wait_for_text("Agent:", Duration::from_secs(1)).await;
/// handle.send_action(Action::Quit);
/// ```
pub fn run_tui_headless(
    service: Arc<dyn ConversationService>,
    config: HeadlessConfig,
) -> (HeadlessHandle, JoinHandle<Result<(), String>>) {
    let (actions, action_rx) = mpsc::unbounded_channel();
    let (frame_tx, frames) = watch::channel(HeadlessState::default());

    let task = tokio::spawn(async move {
        headless_loop(service, config, action_rx, frame_tx)
            .await
            .map_err(|e| e.to_string())
    });

    (HeadlessHandle { actions, frames }, task)
}

async fn headless_loop(
    service: Arc<dyn ConversationService>,
    config: HeadlessConfig,
    mut action_rx: mpsc::UnboundedReceiver<Action>,
    frame_tx: watch::Sender<HeadlessState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut terminal = Terminal::new(TestBackend::new(config.width, config.height))?;
    let mut app = App::new(config.api_url);
    let mut in_flight = InFlight::new();
    let tick = Duration::from_millis(config.tick_rate_ms);

    loop {
        terminal.draw(|frame| {
            app.resize(frame.area());
            screens::draw(&app, frame.area(), frame.buffer_mut());
        })?;

        frame_tx.send_replace(HeadlessState {
            screen_contents: buffer_to_string(terminal.backend().buffer()),
            should_quit: app.should_quit,
            show_help: app.show_help,
            phase: app.conversation.phase(),
        });

        if app.should_quit {
            in_flight.abort();
            return Ok(());
        }

        if let Some(joined) = in_flight.take_finished().await {
            match joined {
                Ok(outcome) => app.apply(outcome),
                Err(e) => app.interrupt(e.to_string()),
            }
            continue;
        }

        let action = tokio::select! {
            Some(action) = action_rx.recv() => action,
            () = tokio::time::sleep(tick) => {
                app.tick();
                Action::None
            }
        };

        if let Some(request) = app.handle_action(action) {
            in_flight.spawn(&service, request);
        }
    }
}

/// Buffer text with trailing blanks trimmed from each row.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let rows: Vec<String> = (area.top()..area.bottom())
        .map(|y| {
            let row: String = (area.left()..area.right())
                .filter_map(|x| buffer.cell((x, y)).map(|cell| cell.symbol()))
                .collect();
            row.trim_end_matches(' ').to_string()
        })
        .collect();
    rows.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{slots_reply, FakeService};
    use ratatui::layout::Rect;
    use ratatui::style::Style;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn test_buffer_to_string_trims_rows() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 8, 3));
        buffer.set_string(0, 0, "top", Style::default());
        buffer.set_string(2, 2, "end", Style::default());
        assert_eq!(buffer_to_string(&buffer), "top\n\n  end");
    }

    #[tokio::test]
    async fn test_chat_and_book_end_to_end() {
        let fake = Arc::new(FakeService::new().reply(slots_reply(2)));
        let service: Arc<dyn ConversationService> = fake.clone();
        let (mut handle, task) = run_tui_headless(service, HeadlessConfig::default());

        assert!(handle.wait_for_text("Say hello", WAIT).await.is_some());

        handle.type_text("I'd like a demo");
        handle.send_action(Action::Submit);
        let state = handle
            .wait_for_text("Available times", WAIT)
            .await
            .expect("slot picker never appeared");
        assert!(state.screen_contents.contains("You: I'd like a demo"));
        assert_eq!(state.phase, Phase::Idle);

        // Slots are focused after an offer, so a digit books directly
        handle.send_action(Action::Insert('2'));
        let state = handle
            .wait_for_text("Meeting booked", WAIT)
            .await
            .expect("booking never confirmed");
        assert!(state.screen_contents.contains("Meeting link: https://meet.example.com/abc"));
        assert!(!state.screen_contents.contains("Available times"));

        let bookings = fake.bookings();
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].pipefy_card_id.as_deref(), Some("42"));
        assert_eq!(fake.histories()[0].len(), 1);

        handle.send_action(Action::Quit);
        task.await.unwrap().unwrap();
        assert!(handle.has_quit());
    }

    #[tokio::test]
    async fn test_help_overlay() {
        let service: Arc<dyn ConversationService> = Arc::new(FakeService::new());
        let (mut handle, task) = run_tui_headless(service, HeadlessConfig::default());

        handle.send_action(Action::Help);
        let state = handle
            .wait_for(|s| s.show_help, WAIT)
            .await
            .expect("help never opened");
        assert!(state.screen_contents.contains("Toggle this help"));

        handle.send_action(Action::Insert('x'));
        assert!(handle.wait_for(|s| !s.show_help, WAIT).await.is_some());

        handle.send_action(Action::Quit);
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_busy_phase_is_reported() {
        let service: Arc<dyn ConversationService> =
            Arc::new(FakeService::new().delay(Duration::from_millis(300)));
        let (mut handle, task) = run_tui_headless(service, HeadlessConfig::default());

        handle.type_text("hi");
        handle.send_action(Action::Submit);
        let state = handle
            .wait_for_phase(Phase::Sending, WAIT)
            .await
            .expect("never started sending");
        assert!(state.screen_contents.contains("Please wait..."));

        assert!(handle.wait_for_text("Agent: ok", WAIT).await.is_some());

        handle.send_action(Action::Quit);
        task.await.unwrap().unwrap();
    }
}
