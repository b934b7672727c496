//! leadchat-tui: Terminal chat view for the leadchat client
//!
//! This crate provides the TUI layer for leadchat:
//! - Chat screen with transcript, slot picker and input line
//! - Background dispatch of backend requests
//! - Headless mode for testing and automation

mod app;
mod event;
pub mod headless;
mod request;
mod screens;
#[cfg(test)]
pub mod test_utils;
pub mod ui;

pub use app::{App, Focus};
pub use event::{Action, Event, EventHandler};
pub use request::{Outcome, Request};
pub use leadchat_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use leadchat_engine::ConversationService;
use ratatui::{backend::CrosstermBackend, Terminal};
use request::InFlight;
use std::io::{self, stdout};
use std::sync::Arc;
use tracing::info;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application against `service`.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on exit.
pub async fn run_tui(
    service: Arc<dyn ConversationService>,
    api_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(api_url);
    info!(api_url, "chat session started");

    // 4 Hz tick drives the spinner and request polling
    let mut events = EventHandler::new(250);

    let result = run_loop(&mut terminal, &mut app, &mut events, &service).await;

    terminal.show_cursor()?;
    info!(messages = app.conversation.messages().len(), "chat session ended");

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    service: &Arc<dyn ConversationService>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut in_flight = InFlight::new();

    loop {
        terminal.draw(|frame| {
            app.resize(frame.area());
            screens::draw(app, frame.area(), frame.buffer_mut());
        })?;

        if app.should_quit {
            in_flight.abort();
            break;
        }

        if let Some(joined) = in_flight.take_finished().await {
            match joined {
                Ok(outcome) => app.apply(outcome),
                Err(e) => app.interrupt(e.to_string()),
            }
            continue;
        }

        let action = match events.next().await {
            Some(Event::Key(key)) => event::key_to_action(key),
            Some(Event::Mouse(mouse)) => match mouse.kind {
                MouseEventKind::ScrollUp => Action::ScrollUp,
                MouseEventKind::ScrollDown => Action::ScrollDown,
                _ => Action::None,
            },
            Some(Event::Tick) => {
                app.tick();
                Action::None
            }
            // Redrawn at the top of the loop
            Some(Event::Resize(_, _)) => Action::None,
            None => break,
        };

        if let Some(request) = app.handle_action(action) {
            in_flight.spawn(service, request);
        }
    }

    Ok(())
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}


#[cfg(test)]
mod snapshot_tests {
    use crate::screens;
    use crate::test_utils::{buffer_to_string, create_test_app};
    use insta::assert_snapshot;
    use ratatui::{buffer::Buffer, layout::Rect};

    fn render(app: &crate::App, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        screens::draw(app, area, &mut buf);
        buffer_to_string(&buf)
    }

    #[test]
    fn test_snapshot_empty_chat() {
        let app = create_test_app();
        assert_snapshot!(render(&app, 60, 7), @r"
        ┌ Conversation ────────────────────────────────────────────┐
        │Say hello to start the conversation.                      │
        └──────────────────────────────────────────────────────────┘
        ┌ Message ─────────────────────────────────────────────────┐
        │> _Type a message and press Enter                         │
        └──────────────────────────────────────────────────────────┘
         READY   Enter  Send  F1  Help  Esc  Quit
        ");
    }
}
