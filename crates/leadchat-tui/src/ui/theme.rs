//! Colors, symbols and styles for the chat view.

use ratatui::style::{Color, Modifier, Style};

/// Color palette.
pub struct Palette;

impl Palette {
    pub const BG: Color = Color::Rgb(24, 26, 33);
    pub const FG: Color = Color::Rgb(215, 218, 224);
    pub const MUTED: Color = Color::Rgb(125, 132, 150);

    // Speakers
    pub const USER: Color = Color::Rgb(110, 180, 255);
    pub const AGENT: Color = Color::Rgb(120, 210, 160);

    // Status bar
    pub const BAR_BG: Color = Color::Rgb(38, 42, 54);
    pub const BAR_KEY_BG: Color = Color::Rgb(64, 82, 120);

    pub const FRAME: Color = Color::Rgb(70, 76, 94);
    pub const FRAME_FOCUS: Color = Color::Rgb(110, 180, 255);
}

pub struct Symbols;

impl Symbols {
    pub const SPINNER: [&'static str; 4] = ["|", "/", "-", "\\"];
    /// Marker in front of the highlighted slot.
    pub const SELECTED: &'static str = "> ";
}

/// Named styles; widgets never build colors themselves.
pub struct Styles;

impl Styles {
    pub fn default() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BG)
    }

    /// Hints and placeholders.
    pub fn dim() -> Style {
        Style::default().fg(Palette::MUTED).bg(Palette::BG)
    }

    /// The highlighted slot.
    pub fn highlight() -> Style {
        Self::active().add_modifier(Modifier::BOLD)
    }

    /// Prompt and cursor of the focused input.
    pub fn active() -> Style {
        Style::default().fg(Palette::USER).bg(Palette::BG)
    }

    pub fn user_label() -> Style {
        Self::highlight()
    }

    pub fn agent_label() -> Style {
        Style::default()
            .fg(Palette::AGENT)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title() -> Style {
        Style::default().fg(Palette::FG).add_modifier(Modifier::BOLD)
    }

    /// Mode badge on the left of the status bar.
    pub fn mode_badge() -> Style {
        Style::default()
            .fg(Palette::BG)
            .bg(Palette::USER)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key_hint() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::BAR_KEY_BG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BAR_BG)
    }

    pub fn border() -> Style {
        Style::default().fg(Palette::FRAME)
    }

    pub fn border_active() -> Style {
        Style::default().fg(Palette::FRAME_FOCUS)
    }
}

/// Spinner frame for the given tick.
pub fn spinner(tick: usize) -> &'static str {
    Symbols::SPINNER[tick % Symbols::SPINNER.len()]
}
