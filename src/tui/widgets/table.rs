//! Virtualized table body.
//!
//! Only the rows of the current window are composed. Each row is painted at
//! `start - scroll_offset` lines from the top of the body, so a row cut by
//! the top edge shows only its lower lines. Rows whose cells wrap are
//! measured here and fed back to the virtualizer.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use tracing::trace;

use crate::table::{HeaderCell, RenderedRow, RenderedTable};
use crate::tui::state::AppState;
use crate::tui::style::Styles;

/// Blank cells between columns.
const COLUMN_GAP: u16 = 1;

/// Compose/measure rounds per frame before painting what we have.
const MAX_MEASURE_PASSES: usize = 8;

/// Renders the column headers, the visible rows and a scrollbar.
pub fn render_table(frame: &mut Frame, area: Rect, state: &mut AppState) {
    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).split(area);
    let [rows_area, bar_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(1)]).areas(chunks[1]);

    state
        .virtualizer
        .set_viewport_extent(f64::from(rows_area.height));

    // Measuring can grow rows above or inside the window, which moves the
    // window itself; repeat until the layout settles.
    for _ in 0..MAX_MEASURE_PASSES {
        let heights = {
            let table = state
                .renderer
                .render(&mut state.virtualizer, &state.columns, &state.rows);
            measure_rows(table, rows_area, state.max_row_lines)
        };
        let mut changed = false;
        for (index, lines) in heights {
            changed |= state.virtualizer.measure(index, f64::from(lines));
        }
        if !changed {
            break;
        }
        trace!("row measurements changed, recomposing");
        if state.stick_to_end {
            state.pin_to_bottom();
        }
    }

    let table = state
        .renderer
        .render(&mut state.virtualizer, &state.columns, &state.rows);

    let buf = frame.buffer_mut();
    paint_headers(buf, chunks[0], &table.headers);
    if table.row_count == 0 {
        let empty = Paragraph::new("No rows loaded. Press f to fetch a page.")
            .alignment(Alignment::Center)
            .style(Styles::dim());
        frame.render_widget(empty, rows_area);
        return;
    }
    for row in &table.rows {
        paint_row(buf, rows_area, &table.headers, row, table.scroll_offset);
    }

    if table.total_extent > table.viewport_extent {
        let mut bar = ScrollbarState::new(table.total_extent.ceil() as usize)
            .viewport_content_length(rows_area.height as usize)
            .position(table.scroll_offset.round() as usize);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            bar_area,
            &mut bar,
        );
    }
}

/// Line count of every composed row as painted into `area`, capped at
/// `max_lines`.
fn measure_rows(table: &RenderedTable, area: Rect, max_lines: u16) -> Vec<(usize, u16)> {
    table
        .rows
        .iter()
        .map(|row| {
            let lines = column_spans(area, &table.headers)
                .zip(&row.cells)
                .map(|((_, width, _), cell)| wrap_cell(&cell.text, width).len())
                .max()
                .unwrap_or(1)
                .clamp(1, max_lines.max(1) as usize);
            (row.index, lines as u16)
        })
        .collect()
}

fn paint_headers(buf: &mut Buffer, area: Rect, headers: &[HeaderCell]) {
    buf.set_style(area, Styles::table_header());
    for (x, width, header) in column_spans(area, headers) {
        buf.set_stringn(x, area.y, &header.header, width, Styles::table_header());
    }
}

fn paint_row(buf: &mut Buffer, area: Rect, headers: &[HeaderCell], row: &RenderedRow, scroll: f64) {
    let top = (row.start - scroll).round() as i64;
    let lines = row.size.round().max(1.0) as i64;
    for ((x, width, _), cell) in column_spans(area, headers).zip(&row.cells) {
        let wrapped = wrap_cell(&cell.text, width);
        let style = Styles::cell(cell.style);
        for line in 0..lines {
            let y = top + line;
            if y < 0 || y >= i64::from(area.height) {
                continue;
            }
            let Some(text) = wrapped.get(line as usize) else {
                break;
            };
            let text = if line == lines - 1 && wrapped.len() as i64 > lines {
                elide(text, width)
            } else {
                text.clone()
            };
            buf.set_stringn(x, area.y + y as u16, text, width, style);
        }
    }
}

/// Screen x and usable width of each header, cut at the right edge.
fn column_spans<'a>(
    area: Rect,
    headers: &'a [HeaderCell],
) -> impl Iterator<Item = (u16, usize, &'a HeaderCell)> + 'a {
    let right = area.right();
    headers
        .iter()
        .scan(area.x, move |x, header| {
            if *x >= right {
                return None;
            }
            let start = *x;
            let width = header.width.min(right - start);
            *x = start.saturating_add(header.width).saturating_add(COLUMN_GAP);
            Some((start, width as usize, header))
        })
}

/// Word-wraps `text` to `width` columns. Words longer than a line are split.
pub(crate) fn wrap_cell(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        let sep = usize::from(current_len > 0);
        if current_len + sep + word.len() <= width {
            if sep == 1 {
                current.push(' ');
            }
            current.extend(word.iter());
            current_len += sep + word.len();
            continue;
        }
        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
        }
        while word.len() > width {
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        current_len = word.len();
        current = word.into_iter().collect();
    }
    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Truncates a line to leave room for an ellipsis.
fn elide(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
