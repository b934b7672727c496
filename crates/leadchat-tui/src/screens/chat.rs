//! Chat screen: transcript, slot picker, input line and status bar.

use super::Screen;
use crate::app::{App, Focus};
use crate::ui::theme::{spinner, Styles};
use crate::ui::widgets::{KeyHint, SlotPicker, StatusBar, Transcript};
use crate::ui::{chat_layout, main_layout};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block, Borders, Widget},
};

const INPUT_PLACEHOLDER: &str = "Type a message and press Enter";
const BUSY_PLACEHOLDER: &str = "Please wait...";

pub struct ChatScreen;

fn pane<'a>(title: &'a str, active: bool) -> Block<'a> {
    Block::default()
        .title(title)
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(if active {
            Styles::border_active()
        } else {
            Styles::border()
        })
}

fn hints(app: &App) -> Vec<KeyHint> {
    if app.conversation.is_busy() {
        return vec![KeyHint::new("F1", "Help"), KeyHint::new("Esc", "Quit")];
    }
    match app.focus {
        Focus::Slots => vec![
            KeyHint::new("Enter", "Book"),
            KeyHint::new("1-9", "Pick"),
            KeyHint::new("Tab", "Input"),
            KeyHint::new("Esc", "Quit"),
        ],
        Focus::Input if !app.conversation.slots().is_empty() => vec![
            KeyHint::new("Enter", "Send"),
            KeyHint::new("Tab", "Slots"),
            KeyHint::new("Esc", "Quit"),
        ],
        Focus::Input => vec![
            KeyHint::new("Enter", "Send"),
            KeyHint::new("F1", "Help"),
            KeyHint::new("Esc", "Quit"),
        ],
    }
}

impl Screen for ChatScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let (body, status_area) = main_layout(area);
        let slots = app.conversation.slots();
        let areas = chat_layout(body, slots.len());
        let busy = app.conversation.is_busy();

        Transcript::new(app.conversation.messages())
            .scroll(app.transcript_scroll)
            .block(pane(" Conversation ", false))
            .render(areas.transcript, buf);

        if let Some(slot_area) = areas.slots {
            let focused = app.focus == Focus::Slots;
            SlotPicker::new(slots, app.selected_slot)
                .focused(focused)
                .block(pane(" Available times ", focused))
                .render(slot_area, buf);
        }

        let input_active = app.focus == Focus::Input && !busy;
        app.composer
            .view()
            .focused(input_active)
            .placeholder(if busy { BUSY_PLACEHOLDER } else { INPUT_PLACEHOLDER })
            .block(pane(" Message ", input_active))
            .render(areas.input, buf);

        let phase = app.conversation.phase().label().to_uppercase();
        let mode = if busy {
            format!("{} {phase}", spinner(app.tick))
        } else {
            phase
        };
        StatusBar::new(&mode)
            .hints(hints(app))
            .right(&app.api_url)
            .render(status_area, buf);
    }
}
