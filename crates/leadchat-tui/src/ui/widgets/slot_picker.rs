//! Slot picker: numbered list of offered meeting times.

use crate::ui::theme::{Styles, Symbols};
use leadchat_engine::Slot;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

pub struct SlotPicker<'a> {
    slots: &'a [Slot],
    selected: usize,
    focused: bool,
    block: Option<Block<'a>>,
}

impl<'a> SlotPicker<'a> {
    pub fn new(slots: &'a [Slot], selected: usize) -> Self {
        Self {
            slots,
            selected,
            focused: false,
            block: None,
        }
    }

    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    #[must_use]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for SlotPicker<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let height = inner.height as usize;
        if height == 0 {
            return;
        }

        // Scroll just enough to keep the selection visible.
        let first = (self.selected + 1).saturating_sub(height);

        let lines: Vec<Line<'_>> = self
            .slots
            .iter()
            .enumerate()
            .skip(first)
            .take(height)
            .map(|(i, slot)| {
                let is_selected = self.focused && i == self.selected;
                let (marker, style) = if is_selected {
                    (Symbols::SELECTED, Styles::highlight())
                } else {
                    ("  ", Styles::default())
                };
                Line::from(vec![
                    Span::styled(marker, style),
                    Span::styled(format!("{}. {}", i + 1, slot.display_local()), style),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
