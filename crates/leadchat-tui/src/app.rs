//! Application state and update logic for the leadchat TUI.

use crate::event::Action;
use crate::request::{Outcome, Request};
use crate::ui::widgets::transcript::transcript_lines;
use crate::ui::widgets::Composer;
use crate::ui::{chat_layout, main_layout};
use leadchat_engine::{Conversation, Phase, ServiceError};
use ratatui::layout::Rect;
use ratatui::widgets::{Block, Borders};
use tracing::{debug, warn};

/// Lines moved per PgUp/PgDn.
const SCROLL_STEP: usize = 5;

/// Which pane receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Slots,
}

/// Main application state.
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether help overlay is visible.
    pub show_help: bool,

    pub conversation: Conversation,

    pub composer: Composer,

    pub focus: Focus,

    /// Index of the highlighted slot while slots are offered.
    pub selected_slot: usize,

    /// Lines scrolled back from the newest message.
    pub transcript_scroll: usize,

    /// Tick counter for the spinner.
    pub tick: usize,

    /// Backend base URL, shown in the status bar.
    pub api_url: String,

    /// Last known terminal area.
    pub area: Rect,
}

impl App {
    /// Create a new app talking to `api_url`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            conversation: Conversation::new(),
            composer: Composer::new(),
            focus: Focus::Input,
            selected_slot: 0,
            transcript_scroll: 0,
            tick: 0,
            api_url: api_url.into(),
            area: Rect::new(0, 0, 80, 24),
        }
    }

    /// Record the terminal size used for scroll limits.
    pub fn resize(&mut self, area: Rect) {
        self.area = area;
        self.transcript_scroll = self.transcript_scroll.min(self.max_scroll());
    }

    /// Handle an action, returning a request to send if one was started.
    pub fn handle_action(&mut self, action: Action) -> Option<Request> {
        // Any key closes help
        if self.show_help {
            if action != Action::None {
                self.show_help = false;
            }
            return None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
                None
            }
            Action::Help => {
                self.show_help = true;
                None
            }
            Action::ToggleFocus => {
                self.focus = match self.focus {
                    Focus::Input if !self.conversation.slots().is_empty() => Focus::Slots,
                    _ => Focus::Input,
                };
                None
            }
            Action::ScrollUp => {
                self.transcript_scroll = (self.transcript_scroll + SCROLL_STEP).min(self.max_scroll());
                None
            }
            Action::ScrollDown => {
                self.transcript_scroll = self.transcript_scroll.saturating_sub(SCROLL_STEP);
                None
            }
            Action::None => None,
            _ => match self.focus {
                Focus::Input => self.handle_input_action(action),
                Focus::Slots => self.handle_slot_action(action),
            },
        }
    }

    fn handle_input_action(&mut self, action: Action) -> Option<Request> {
        // Input is disabled while a request is in flight
        if self.conversation.is_busy() {
            return None;
        }

        match action {
            Action::Submit => {
                if self.composer.is_empty() {
                    return None;
                }
                let history = self.conversation.begin_send(&self.composer.text())?;
                self.composer.take();
                self.transcript_scroll = 0;
                Some(Request::Chat(history))
            }
            Action::Insert(c) => {
                self.composer.type_char(c);
                None
            }
            Action::Backspace => {
                self.composer.erase_back();
                None
            }
            Action::Delete => {
                self.composer.erase_forward();
                None
            }
            Action::Left => {
                self.composer.caret_left();
                None
            }
            Action::Right => {
                self.composer.caret_right();
                None
            }
            Action::Home => {
                self.composer.caret_home();
                None
            }
            Action::End => {
                self.composer.caret_end();
                None
            }
            Action::Up => {
                self.composer.recall_older();
                None
            }
            Action::Down => {
                self.composer.recall_newer();
                None
            }
            _ => None,
        }
    }

    fn handle_slot_action(&mut self, action: Action) -> Option<Request> {
        let count = self.conversation.slots().len();
        if count == 0 {
            self.focus = Focus::Input;
            return self.handle_input_action(action);
        }

        match action {
            Action::Up => {
                self.selected_slot = self.selected_slot.saturating_sub(1);
                None
            }
            Action::Down => {
                self.selected_slot = (self.selected_slot + 1).min(count - 1);
                None
            }
            Action::Submit => self.book(self.selected_slot),
            Action::Insert(c) => match c.to_digit(10) {
                Some(n @ 1..=9) if (n as usize) <= count => {
                    self.selected_slot = n as usize - 1;
                    self.book(self.selected_slot)
                }
                Some(_) => None,
                // Typing anywhere else goes to the input
                None => {
                    self.focus = Focus::Input;
                    self.handle_input_action(action)
                }
            },
            _ => None,
        }
    }

    fn book(&mut self, index: usize) -> Option<Request> {
        let request = self.conversation.begin_schedule_at(index)?;
        self.focus = Focus::Input;
        self.selected_slot = 0;
        self.transcript_scroll = 0;
        Some(Request::Schedule(request))
    }

    /// Apply the backend's answer to the request in flight.
    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Chat(result) => {
                self.conversation.finish_send(result);
                if self.conversation.slots().is_empty() {
                    self.focus = Focus::Input;
                } else {
                    debug!("focusing offered slots");
                    self.focus = Focus::Slots;
                    self.selected_slot = 0;
                }
            }
            Outcome::Schedule(result) => {
                self.conversation.finish_schedule(result);
                self.focus = Focus::Input;
            }
        }
        self.transcript_scroll = 0;
    }

    /// Fail the request in flight because its task never produced an answer.
    pub fn interrupt(&mut self, reason: impl Into<String>) {
        let error = ServiceError::Interrupted(reason.into());
        warn!(%error, phase = ?self.conversation.phase(), "request task ended without an answer");
        match self.conversation.phase() {
            Phase::Sending => self.apply(Outcome::Chat(Err(error))),
            Phase::Scheduling => self.apply(Outcome::Schedule(Err(error))),
            Phase::Idle => {}
        }
    }

    /// Handle tick event.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// How far the transcript can scroll back at the current size.
    fn max_scroll(&self) -> usize {
        let (body, _) = main_layout(self.area);
        let areas = chat_layout(body, self.conversation.slots().len());
        let inner = Block::default().borders(Borders::ALL).inner(areas.transcript);
        let lines = transcript_lines(self.conversation.messages(), inner.width as usize).len();
        lines.saturating_sub(inner.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, slots_reply};
    use leadchat_engine::{ChatMessage, Role, ScheduleResponse, NO_SLOTS, SLOTS_INTRO};

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_action(Action::Insert(c));
        }
    }

    /// Send `text` and answer the chat turn with `reply`.
    fn chat_turn(app: &mut App, text: &str, reply: &str) {
        type_text(app, text);
        let request = app.handle_action(Action::Submit);
        assert!(matches!(request, Some(Request::Chat(_))));
        app.apply(Outcome::Chat(Ok(reply.to_string())));
    }

    #[test]
    fn test_submit_starts_chat_request() {
        let mut app = create_test_app();
        type_text(&mut app, "hi there");

        let Some(Request::Chat(history)) = app.handle_action(Action::Submit) else {
            panic!("expected a chat request");
        };
        assert_eq!(history, vec![ChatMessage::user("hi there")]);
        assert!(app.composer.is_empty());
        assert_eq!(app.conversation.phase(), Phase::Sending);
    }

    #[test]
    fn test_blank_submit_does_nothing() {
        let mut app = create_test_app();
        type_text(&mut app, "   ");
        assert!(app.handle_action(Action::Submit).is_none());
        assert!(app.conversation.messages().is_empty());
        assert_eq!(app.composer.text(), "   ");
    }

    #[test]
    fn test_input_disabled_while_busy() {
        let mut app = create_test_app();
        type_text(&mut app, "hi");
        app.handle_action(Action::Submit);

        type_text(&mut app, "more");
        assert!(app.composer.is_empty());
        assert!(app.handle_action(Action::Submit).is_none());
        assert_eq!(app.conversation.messages().len(), 1);
    }

    #[test]
    fn test_plain_reply_returns_to_input() {
        let mut app = create_test_app();
        chat_turn(&mut app, "hi", "Hello! How can I help?");

        assert_eq!(app.conversation.phase(), Phase::Idle);
        assert_eq!(app.focus, Focus::Input);
        let last = app.conversation.messages().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "Hello! How can I help?");
    }

    #[test]
    fn test_slot_offer_focuses_picker() {
        let mut app = create_test_app();
        chat_turn(&mut app, "book a call", &slots_reply(3));

        assert_eq!(app.focus, Focus::Slots);
        assert_eq!(app.selected_slot, 0);
        assert_eq!(app.conversation.slots().len(), 3);
        assert_eq!(app.conversation.messages().last().unwrap().content, SLOTS_INTRO);
    }

    #[test]
    fn test_empty_slot_offer_stays_on_input() {
        let mut app = create_test_app();
        chat_turn(&mut app, "book a call", &slots_reply(0));
        assert_eq!(app.focus, Focus::Input);
        assert_eq!(app.conversation.messages().last().unwrap().content, NO_SLOTS);
    }

    #[test]
    fn test_slot_navigation_and_enter_books() {
        let mut app = create_test_app();
        chat_turn(&mut app, "book", &slots_reply(3));

        app.handle_action(Action::Up);
        assert_eq!(app.selected_slot, 0);
        app.handle_action(Action::Down);
        app.handle_action(Action::Down);
        app.handle_action(Action::Down);
        assert_eq!(app.selected_slot, 2);

        let expected = app.conversation.slots()[2].clone();
        let Some(Request::Schedule(request)) = app.handle_action(Action::Submit) else {
            panic!("expected a schedule request");
        };
        assert_eq!(request.slot_info, expected);
        assert!(app.conversation.slots().is_empty());
        assert_eq!(app.conversation.phase(), Phase::Scheduling);
        assert_eq!(app.focus, Focus::Input);
    }

    #[test]
    fn test_digit_picks_slot() {
        let mut app = create_test_app();
        chat_turn(&mut app, "book", &slots_reply(2));

        // Out of range digits are ignored
        assert!(app.handle_action(Action::Insert('5')).is_none());
        assert!(app.handle_action(Action::Insert('0')).is_none());

        let expected = app.conversation.slots()[1].clone();
        let Some(Request::Schedule(request)) = app.handle_action(Action::Insert('2')) else {
            panic!("expected a schedule request");
        };
        assert_eq!(request.slot_info, expected);
    }

    #[test]
    fn test_digit_in_input_is_text() {
        let mut app = create_test_app();
        chat_turn(&mut app, "book", &slots_reply(2));
        app.handle_action(Action::ToggleFocus);
        assert_eq!(app.focus, Focus::Input);

        assert!(app.handle_action(Action::Insert('1')).is_none());
        assert_eq!(app.composer.text(), "1");
        assert_eq!(app.conversation.slots().len(), 2);
    }

    #[test]
    fn test_typing_in_picker_moves_to_input() {
        let mut app = create_test_app();
        chat_turn(&mut app, "book", &slots_reply(2));

        app.handle_action(Action::Insert('n'));
        assert_eq!(app.focus, Focus::Input);
        assert_eq!(app.composer.text(), "n");
    }

    #[test]
    fn test_toggle_focus_requires_slots() {
        let mut app = create_test_app();
        app.handle_action(Action::ToggleFocus);
        assert_eq!(app.focus, Focus::Input);
    }

    #[test]
    fn test_schedule_outcome_appends_confirmation() {
        let mut app = create_test_app();
        chat_turn(&mut app, "book", &slots_reply(1));
        app.handle_action(Action::Submit);

        app.apply(Outcome::Schedule(Ok(ScheduleResponse {
            message: "Meeting booked".to_string(),
            meeting_link: None,
            meeting_datetime: None,
        })));

        assert_eq!(app.conversation.phase(), Phase::Idle);
        assert!(app.conversation.lead().is_none());
        assert_eq!(app.conversation.messages().last().unwrap().content, "Meeting booked");
    }

    #[test]
    fn test_interrupt_reports_error() {
        let mut app = create_test_app();
        type_text(&mut app, "hi");
        app.handle_action(Action::Submit);

        app.interrupt("task panicked");
        assert_eq!(app.conversation.phase(), Phase::Idle);
        let last = app.conversation.messages().last().unwrap();
        assert!(last.content.starts_with("Sorry, an error occurred:"));
        assert!(last.content.contains("task panicked"));
    }

    #[test]
    fn test_interrupt_when_idle_is_noop() {
        let mut app = create_test_app();
        app.interrupt("nothing running");
        assert!(app.conversation.messages().is_empty());
    }

    #[test]
    fn test_help_overlay_toggle() {
        let mut app = create_test_app();
        app.handle_action(Action::Help);
        assert!(app.show_help);

        // Any key closes help, including quit
        app.handle_action(Action::Quit);
        assert!(!app.show_help);
        assert!(!app.should_quit);

        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut app = create_test_app();
        app.handle_action(Action::ScrollUp);
        assert_eq!(app.transcript_scroll, 0);

        for i in 0..20 {
            chat_turn(&mut app, &format!("message {i}"), "ok");
        }
        app.handle_action(Action::ScrollUp);
        assert_eq!(app.transcript_scroll, SCROLL_STEP);

        for _ in 0..100 {
            app.handle_action(Action::ScrollUp);
        }
        assert_eq!(app.transcript_scroll, app.max_scroll());

        app.handle_action(Action::ScrollDown);
        assert_eq!(app.transcript_scroll, app.max_scroll() - SCROLL_STEP);
    }

    #[test]
    fn test_history_recall() {
        let mut app = create_test_app();
        chat_turn(&mut app, "first", "ok");
        app.handle_action(Action::Up);
        assert_eq!(app.composer.text(), "first");
        app.handle_action(Action::Down);
        assert!(app.composer.is_empty());
    }
}
