//! Transcript widget: the scrollable list of conversation messages.

use crate::ui::theme::Styles;
use leadchat_engine::{ChatMessage, Role};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

/// Hint shown before the first message.
const EMPTY_HINT: &str = "Say hello to start the conversation.";

/// Renders messages so the newest stays at the bottom once the pane is full,
/// offset `scroll` lines back in history.
pub struct Transcript<'a> {
    messages: &'a [ChatMessage],
    scroll: usize,
    block: Option<Block<'a>>,
}

impl<'a> Transcript<'a> {
    pub fn new(messages: &'a [ChatMessage]) -> Self {
        Self {
            messages,
            scroll: 0,
            block: None,
        }
    }

    /// Lines scrolled up from the bottom (0 follows the newest message).
    #[must_use]
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    #[must_use]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

/// Wrap every message to `width`, with a blank line between messages.
pub fn transcript_lines(messages: &[ChatMessage], width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, message) in messages.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        lines.extend(message_lines(message, width));
    }
    lines
}

fn message_lines(message: &ChatMessage, width: usize) -> Vec<Line<'static>> {
    let label = format!("{}: ", message.role.label());
    let indent = " ".repeat(label.len());
    let label_style = match message.role {
        Role::User => Styles::user_label(),
        Role::Assistant => Styles::agent_label(),
    };
    let width = width.max(label.len() + 1);

    let mut lines = Vec::new();
    for (i, paragraph) in message.content.split('\n').enumerate() {
        let first_indent = if i == 0 { label.as_str() } else { indent.as_str() };
        let options = textwrap::Options::new(width)
            .initial_indent(first_indent)
            .subsequent_indent(&indent);

        for wrapped in textwrap::wrap(paragraph, options) {
            let line = match wrapped.strip_prefix(label.as_str()) {
                Some(rest) if lines.is_empty() => Line::from(vec![
                    Span::styled(label.clone(), label_style),
                    Span::styled(rest.to_string(), Styles::default()),
                ]),
                _ => Line::from(Span::styled(wrapped.to_string(), Styles::default())),
            };
            lines.push(line);
        }
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(label, label_style)));
    }
    lines
}

impl Widget for Transcript<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if inner.height < 1 || inner.width < 1 {
            return;
        }

        if self.messages.is_empty() {
            Paragraph::new(Line::from(Span::styled(EMPTY_HINT, Styles::dim()))).render(inner, buf);
            return;
        }

        let lines = transcript_lines(self.messages, inner.width as usize);
        let height = inner.height as usize;
        let max_scroll = lines.len().saturating_sub(height);
        let top = max_scroll - self.scroll.min(max_scroll);
        let visible: Vec<Line<'static>> = lines.into_iter().skip(top).take(height).collect();

        Paragraph::new(visible).render(inner, buf);
    }
}
