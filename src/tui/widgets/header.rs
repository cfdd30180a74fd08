//! Header bar: data source, load progress and fetch button hint.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::table::RowSource;
use crate::tui::state::AppState;
use crate::tui::style::Styles;

const SPINNER: &[char] = &['|', '/', '-', '\\'];

/// Renders the header bar.
pub fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::horizontal([
        Constraint::Min(20),    // Source
        Constraint::Length(28), // Rows / pages
        Constraint::Length(22), // Fetch
    ])
    .split(area);

    let source = Paragraph::new(format!(" pagetab: {}", state.source)).style(Styles::header());
    frame.render_widget(source, chunks[0]);

    let loaded = format!(
        "{} rows, {} pages ",
        state.rows.len(),
        state.rows.page_count()
    );
    frame.render_widget(Paragraph::new(loaded).style(Styles::header()), chunks[1]);

    frame.render_widget(
        Paragraph::new(fetch_label(state)).style(Styles::header()),
        chunks[2],
    );
}

/// Label of the fetch "button".
fn fetch_label(state: &AppState) -> Line<'static> {
    if !state.pending.is_empty() {
        let spin = SPINNER[(state.ticks as usize) % SPINNER.len()];
        let pages: Vec<String> = state.pending.iter().map(|p| (p + 1).to_string()).collect();
        return Line::from(format!("{} loading {}", spin, pages.join(",")));
    }
    if state.exhausted {
        return Line::from(Span::styled("all pages loaded", Styles::header()));
    }
    let next = state.failed.first().copied().unwrap_or(state.next_page);
    Line::from(format!("[f] Fetch Page {}", next + 1))
}
