//! Screens of the leadchat TUI. There is one: the chat.

pub mod chat;

use crate::app::App;
use crate::ui::centered_fixed;
use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Draw a full frame: the chat screen plus the help overlay when open.
pub fn draw(app: &App, area: Rect, buf: &mut Buffer) {
    chat::ChatScreen.render(app, area, buf);
    if app.show_help {
        render_help_overlay(area, buf);
    }
}

const HELP_KEYS: [(&str, &str); 7] = [
    ("Enter", "Send message / book slot"),
    ("Up/Down", "History / pick slot"),
    ("Tab", "Switch input and slots"),
    ("1-9", "Book slot by number"),
    ("PgUp/PgDn", "Scroll conversation"),
    ("F1", "Toggle this help"),
    ("Esc / Ctrl+C", "Quit"),
];

fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    let mut lines = vec![Line::default()];
    lines.extend(HELP_KEYS.iter().map(|(key, what)| {
        Line::from(vec![
            Span::styled(format!("  {key:<16}"), Styles::title()),
            Span::raw(*what),
        ])
    }));
    lines.push(Line::default());
    lines.push(Line::styled("  Press any key to close", Styles::dim()));

    #[allow(clippy::cast_possible_truncation)]
    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let overlay = centered_fixed(50.min(area.width.saturating_sub(4)), height, area);
    Clear.render(overlay, buf);

    let block = Block::default()
        .title(" Help ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());
    Paragraph::new(lines).block(block).render(overlay, buf);
}
