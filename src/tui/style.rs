//! Color scheme and styles.

use ratatui::style::{Color, Modifier, Style};

use crate::table::CellStyle;

/// Color palette.
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Reset;
    pub const HEADER_BG: Color = Color::Blue;
    pub const CURSOR_BG: Color = Color::DarkGray;

    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;
    pub const HEADER_FG: Color = Color::White;

    pub const ACCENT: Color = Color::Cyan;
    pub const LINK: Color = Color::Blue;
    pub const NUMERIC: Color = Color::Yellow;
    pub const WARNING: Color = Color::Red;
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Theme::FG).bg(Theme::BG)
    }

    /// Header bar style.
    pub fn header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Table header style.
    pub fn table_header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Focused column switch.
    pub fn cursor() -> Style {
        Style::default()
            .bg(Theme::CURSOR_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Enabled column switch.
    pub fn switch_on() -> Style {
        Style::default()
            .fg(Theme::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Dimmed text style.
    pub fn dim() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    /// Status line for errors.
    pub fn warning() -> Style {
        Style::default()
            .fg(Theme::WARNING)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for a rendered cell.
    pub fn cell(style: CellStyle) -> Style {
        match style {
            CellStyle::Plain => Self::default(),
            CellStyle::Placeholder => Style::default()
                .fg(Theme::FG_DIM)
                .add_modifier(Modifier::ITALIC),
            CellStyle::Link => Style::default()
                .fg(Theme::LINK)
                .add_modifier(Modifier::UNDERLINED),
            CellStyle::Numeric => Style::default().fg(Theme::NUMERIC),
        }
    }
}
