//! Layout helpers for the leadchat TUI.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Create a centered rect with fixed dimensions.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Create the main layout with status bar at bottom.
pub fn main_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Areas of the chat view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatAreas {
    pub transcript: Rect,
    /// Present only while slots are on offer.
    pub slots: Option<Rect>,
    pub input: Rect,
}

/// Maximum number of slot rows shown before the picker stops growing.
const MAX_SLOT_ROWS: u16 = 6;

/// Height of the bordered single-line input.
const INPUT_HEIGHT: u16 = 3;

/// Split the body into transcript, optional slot picker, and input.
#[allow(clippy::cast_possible_truncation)]
pub fn chat_layout(area: Rect, slot_count: usize) -> ChatAreas {
    if slot_count == 0 {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(INPUT_HEIGHT)])
            .split(area);
        return ChatAreas {
            transcript: chunks[0],
            slots: None,
            input: chunks[1],
        };
    }

    let rows = (slot_count.min(MAX_SLOT_ROWS as usize) as u16) + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(rows),
            Constraint::Length(INPUT_HEIGHT),
        ])
        .split(area);
    ChatAreas {
        transcript: chunks[0],
        slots: Some(chunks[1]),
        input: chunks[2],
    }
}
