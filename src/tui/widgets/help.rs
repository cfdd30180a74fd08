//! Help popup widget.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::style::{Styles, Theme};

const KEYS: &[(&str, &str)] = &[
    ("j / k, ↓ / ↑", "scroll one line"),
    ("PgDn / PgUp", "scroll one screen"),
    ("g / Home", "scroll to top"),
    ("G / End", "scroll to bottom"),
    ("f", "fetch the next page (retries a failed one first)"),
    ("← / →", "focus a column switch"),
    ("Space / Enter", "show or hide the focused column"),
    ("Esc", "clear the status line"),
    ("?", "toggle this help"),
    ("q", "quit"),
];

/// Renders the help popup centered on screen with scroll support.
pub fn render_help(frame: &mut Frame, area: Rect, scroll: &mut usize) {
    let popup_width = (area.width * 60 / 100).clamp(40, 72).min(area.width);
    let popup_height = (area.height * 80 / 100).clamp(8, 20).min(area.height);

    let popup_x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Styles::default().fg(Theme::ACCENT));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

    let content = help_lines();
    let max_scroll = content.len().saturating_sub(chunks[0].height as usize);
    if *scroll > max_scroll {
        *scroll = max_scroll;
    }

    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .scroll((*scroll as u16, 0))
        .style(Styles::default());
    frame.render_widget(paragraph, chunks[0]);

    let scroll_info = if max_scroll > 0 {
        format!(" [{}/{}]", *scroll + 1, max_scroll + 1)
    } else {
        String::new()
    };
    let key = Styles::default().fg(Theme::NUMERIC);
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("Press ", Styles::dim()),
        Span::styled("?", key),
        Span::styled(" or ", Styles::dim()),
        Span::styled("Esc", key),
        Span::styled(" to close", Styles::dim()),
        Span::styled(scroll_info, Styles::dim()),
    ]));
    frame.render_widget(footer, chunks[1]);
}

fn help_lines() -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            "Only rows inside the viewport are rendered; pages load on demand.",
            Styles::dim(),
        )),
        Line::from(""),
    ];
    lines.extend(KEYS.iter().map(|(keys, what)| {
        Line::from(vec![
            Span::styled(format!("  {:<16}", keys), Styles::default().fg(Theme::NUMERIC)),
            Span::raw(*what),
        ])
    }));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Switches shown as (·) belong to columns that cannot be hidden.",
        Styles::dim(),
    )));
    lines
}
