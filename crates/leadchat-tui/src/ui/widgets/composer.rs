//! The message line under the transcript.
//!
//! [`Composer`] owns the draft being typed and the messages already sent from
//! it; [`ComposerView`] draws it behind a `> ` prompt with a caret.

use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

const PROMPT: &str = "> ";
const CARET_END: char = '_';
const CARET_MID: char = '|';

/// Draft text, caret and sent-message recall.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    draft: Vec<char>,
    caret: usize,
    sent: Vec<String>,
    /// How far back recall currently is; `None` while editing a fresh draft.
    recall: Option<usize>,
    stash: Vec<char>,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.draft.iter().collect()
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn is_empty(&self) -> bool {
        self.draft.is_empty()
    }

    pub fn type_char(&mut self, ch: char) {
        self.draft.insert(self.caret, ch);
        self.caret += 1;
    }

    pub fn erase_back(&mut self) {
        if let Some(prev) = self.caret.checked_sub(1) {
            self.draft.remove(prev);
            self.caret = prev;
        }
    }

    pub fn erase_forward(&mut self) {
        if self.caret < self.draft.len() {
            self.draft.remove(self.caret);
        }
    }

    pub fn caret_left(&mut self) {
        self.caret = self.caret.saturating_sub(1);
    }

    pub fn caret_right(&mut self) {
        self.caret = (self.caret + 1).min(self.draft.len());
    }

    pub fn caret_home(&mut self) {
        self.caret = 0;
    }

    pub fn caret_end(&mut self) {
        self.caret = self.draft.len();
    }

    /// Empty the draft and return it. Non-blank drafts become recallable.
    pub fn take(&mut self) -> String {
        let text: String = std::mem::take(&mut self.draft).into_iter().collect();
        self.caret = 0;
        self.recall = None;
        self.stash.clear();
        if !text.trim().is_empty() {
            self.sent.push(text.clone());
        }
        text
    }

    /// Step back to an older sent message, stashing the draft on the first step.
    pub fn recall_older(&mut self) {
        let depth = match self.recall {
            None if self.sent.is_empty() => return,
            None => {
                self.stash = std::mem::take(&mut self.draft);
                0
            }
            Some(d) if d + 1 < self.sent.len() => d + 1,
            Some(_) => return,
        };
        self.show_sent(depth);
    }

    /// Step toward the present; past the newest message the stashed draft returns.
    pub fn recall_newer(&mut self) {
        match self.recall {
            None => {}
            Some(0) => {
                self.recall = None;
                self.draft = std::mem::take(&mut self.stash);
                self.caret_end();
            }
            Some(d) => self.show_sent(d - 1),
        }
    }

    fn show_sent(&mut self, depth: usize) {
        self.recall = Some(depth);
        self.draft = self.sent[self.sent.len() - 1 - depth].chars().collect();
        self.caret_end();
    }

    pub fn view(&self) -> ComposerView<'_> {
        ComposerView {
            composer: self,
            block: None,
            focused: true,
            placeholder: "",
        }
    }
}

/// Widget for a [`Composer`].
pub struct ComposerView<'a> {
    composer: &'a Composer,
    block: Option<Block<'a>>,
    focused: bool,
    placeholder: &'a str,
}

impl<'a> ComposerView<'a> {
    #[must_use]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// An unfocused view draws no caret.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Dim text shown while the draft is empty.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Draft text with the caret drawn in, clipped on the left to `room` columns.
    fn visible_text(&self, room: usize) -> String {
        let Composer { draft, caret, .. } = self.composer;
        let first = caret.saturating_sub(room);
        let mut out = String::new();
        for (i, ch) in draft.iter().enumerate().skip(first) {
            if self.focused && i == *caret {
                out.push(CARET_MID);
            }
            out.push(*ch);
        }
        if self.focused && *caret >= draft.len() {
            out.push(CARET_END);
        }
        out
    }
}

impl Widget for ComposerView<'_> {
    fn render(mut self, area: Rect, buf: &mut Buffer) {
        let area = match self.block.take() {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        if area.is_empty() {
            return;
        }

        let mut spans = vec![Span::styled(PROMPT, Styles::active())];
        if self.composer.is_empty() {
            if self.focused {
                spans.push(Span::styled(CARET_END.to_string(), Styles::active()));
            }
            spans.push(Span::styled(self.placeholder, Styles::dim()));
        } else {
            // One column stays free for the caret
            let room = usize::from(area.width)
                .saturating_sub(PROMPT.len() + 1)
                .max(1);
            spans.push(Span::styled(self.visible_text(room), Styles::default()));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
