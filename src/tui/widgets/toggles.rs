//! Column switch bar, one switch per column.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::state::AppState;
use crate::tui::style::Styles;

/// Renders the column switches; the focused one is highlighted.
pub fn render_toggles(frame: &mut Frame, area: Rect, state: &AppState) {
    frame.render_widget(Paragraph::new(toggle_line(state)), area);
}

fn toggle_line(state: &AppState) -> Line<'static> {
    let mut spans = vec![Span::styled(" Columns: ", Styles::dim())];
    for (i, col) in state.columns.columns().iter().enumerate() {
        let mark = match (col.is_visible(), col.can_hide) {
            (true, true) => "[x]",
            (false, _) => "[ ]",
            (true, false) => "(·)",
        };
        let mut style = if !col.can_hide {
            Styles::dim()
        } else if col.is_visible() {
            Styles::switch_on()
        } else {
            Styles::default()
        };
        if i == state.column_cursor {
            style = style.patch(Styles::cursor());
        }
        spans.push(Span::styled(format!("{} {}", mark, col.header), style));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::state::ViewOptions;

    #[test]
    fn switches_reflect_visibility() {
        let state = AppState::new("test", &ViewOptions::default()).unwrap();
        let text = toggle_line(&state).to_string();
        assert!(text.contains("[x] Image"));
        assert!(text.contains("(·) Name"));
        assert!(text.contains("[ ] URL"));
    }
}
