//! Main rendering logic for TUI.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::state::{AppState, StatusKind};
use super::style::Styles;
use super::widgets::{
    render_header, render_help, render_quit_confirm, render_table, render_toggles,
};
use crate::table::RowSource;

/// Main render function.
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Length(1), // Column switches
        Constraint::Min(2),    // Table
        Constraint::Length(1), // Status line
    ])
    .split(area);

    render_header(frame, chunks[0], state);
    render_toggles(frame, chunks[1], state);
    render_table(frame, chunks[2], state);
    render_status(frame, chunks[3], state);

    if state.show_help {
        render_help(frame, area, &mut state.help_scroll);
    }

    // Rendered last to overlay everything.
    if state.show_quit_confirm {
        render_quit_confirm(frame, area);
    }
}

/// Status line: last message on the left, window position on the right.
fn render_status(frame: &mut Frame, area: Rect, state: &mut AppState) {
    let chunks = Layout::horizontal([Constraint::Min(10), Constraint::Length(30)]).split(area);

    let message = match &state.status {
        Some((StatusKind::Error, msg)) => Span::styled(format!(" {}", msg), Styles::warning()),
        Some((StatusKind::Info, msg)) => Span::styled(format!(" {}", msg), Styles::default()),
        None => Span::styled(" ? for help", Styles::dim()),
    };
    frame.render_widget(Paragraph::new(Line::from(message)), chunks[0]);

    let position = match state.virtualizer.visible_range() {
        Some(range) => format!(
            "rows {}-{} of {} ",
            range.start() + 1,
            range.end() + 1,
            state.rows.len()
        ),
        None => String::new(),
    };
    frame.render_widget(
        Paragraph::new(Line::from(position).right_aligned()).style(Styles::dim()),
        chunks[1],
    );
}
