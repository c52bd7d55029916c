use ratatui::style::{Color, Modifier, Style};

use crate::platform::Tone;

// Color palette
pub const FG: Color = Color::White;
pub const ACCENT: Color = Color::Cyan;
pub const ERROR_FG: Color = Color::Red;
pub const BORDER: Color = Color::DarkGray;
pub const MUTED: Color = Color::DarkGray;

pub fn style_default() -> Style {
    Style::default().fg(FG)
}

pub fn style_title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn style_muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn style_error() -> Style {
    Style::default().fg(ERROR_FG)
}

pub fn style_border() -> Style {
    Style::default().fg(BORDER)
}

pub fn style_for(tone: Tone) -> Style {
    match tone {
        Tone::Title => style_title(),
        Tone::Text => style_default(),
        Tone::Warning => style_error(),
        Tone::Erase => Style::default(),
    }
}
