//! Bottom status line: mode badge, key hints, and the backend URL.

use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

#[derive(Debug, Clone, Copy)]
pub struct KeyHint {
    pub key: &'static str,
    pub label: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

#[derive(Debug, Clone)]
pub struct StatusBar<'a> {
    mode: &'a str,
    hints: Vec<KeyHint>,
    right: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    pub fn new(mode: &'a str) -> Self {
        Self {
            mode,
            hints: Vec::new(),
            right: None,
        }
    }

    #[must_use]
    pub fn hints(mut self, hints: Vec<KeyHint>) -> Self {
        self.hints = hints;
        self
    }

    /// Right-aligned text, omitted when it would run into the hints.
    #[must_use]
    pub fn right(mut self, text: &'a str) -> Self {
        self.right = Some(text);
        self
    }

    fn left_line(&self) -> Line<'static> {
        let mut spans = vec![
            Span::styled(format!(" {} ", self.mode), Styles::mode_badge()),
            Span::styled(" ", Styles::status_bar()),
        ];
        for hint in &self.hints {
            spans.push(Span::styled(format!(" {} ", hint.key), Styles::key_hint()));
            spans.push(Span::styled(format!(" {} ", hint.label), Styles::status_bar()));
        }
        Line::from(spans)
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let row = Rect { height: 1, ..area };
        buf.set_style(row, Styles::status_bar());

        let left = self.left_line();
        buf.set_line(row.x, row.y, &left, row.width);

        if let Some(text) = self.right {
            let width = text.chars().count();
            let free = usize::from(row.width).saturating_sub(left.width() + 1);
            if width < free {
                if let Ok(width) = u16::try_from(width) {
                    buf.set_string(row.right() - width - 1, row.y, text, Styles::status_bar());
                }
            }
        }
    }
}
