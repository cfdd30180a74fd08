//! Input handling and keybindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::AppState;

/// Result of handling a key event.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// No action, continue.
    None,
    /// Quit the application.
    Quit,
    /// Send a request for this page to the fetch worker.
    FetchPage(u32),
}

/// Handles key input and updates state.
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> KeyAction {
    if state.show_quit_confirm {
        return handle_quit_confirm(state, key);
    }
    if state.show_help {
        return handle_help(state, key);
    }
    handle_normal_mode(state, key)
}

fn handle_quit_confirm(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('Q') => {
            state.show_quit_confirm = false;
            KeyAction::Quit
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.show_quit_confirm = false;
            KeyAction::Quit
        }
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
            state.show_quit_confirm = false;
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

fn handle_help(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('H') => {
            state.show_help = false;
            state.help_scroll = 0;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            // Clamped during render.
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            state.show_help = false;
            state.show_quit_confirm = true;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return KeyAction::Quit;
        }
        _ => {}
    }
    KeyAction::None
}

/// Handles keys in normal mode.
fn handle_normal_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            state.show_quit_confirm = true;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return KeyAction::Quit;
        }
        KeyCode::Char('?') | KeyCode::Char('H') => {
            state.show_help = true;
        }

        // Scrolling
        KeyCode::Up | KeyCode::Char('k') => state.scroll_lines(-1.0),
        KeyCode::Down | KeyCode::Char('j') => state.scroll_lines(1.0),
        KeyCode::PageUp => state.scroll_pages(-1.0),
        KeyCode::PageDown => state.scroll_pages(1.0),
        KeyCode::Home | KeyCode::Char('g') => state.scroll_to_top(),
        KeyCode::End | KeyCode::Char('G') => state.scroll_to_bottom(),

        // Paging
        KeyCode::Char('f') | KeyCode::Char('F') => {
            if let Some(page) = state.begin_fetch() {
                return KeyAction::FetchPage(page);
            }
        }

        // Column switches
        KeyCode::Left | KeyCode::Char('h') => state.move_column_cursor(-1),
        KeyCode::Right | KeyCode::Char('l') => state.move_column_cursor(1),
        KeyCode::Char(' ') | KeyCode::Enter => state.toggle_focused_column(),

        KeyCode::Esc => state.status = None,
        _ => {}
    }
    KeyAction::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{FetchOutcome, MockProvider, PageProvider};
    use crate::tui::state::ViewOptions;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn loaded_state(total: u32) -> AppState {
        let mut state = AppState::new("test", &ViewOptions::default()).unwrap();
        let mut provider = MockProvider::new(total, total);
        let page = state.begin_fetch().unwrap();
        state.apply_fetch(FetchOutcome {
            page,
            result: provider.fetch_page(page),
        });
        state.virtualizer.set_viewport_extent(10.0);
        state
    }

    #[test]
    fn quit_requires_confirmation_and_quits_on_qq() {
        let mut state = loaded_state(5);

        let action = handle_key(&mut state, key(KeyCode::Char('q')));
        assert_eq!(action, KeyAction::None);
        assert!(state.show_quit_confirm);

        let action = handle_key(&mut state, key(KeyCode::Char('q')));
        assert_eq!(action, KeyAction::Quit);
        assert!(!state.show_quit_confirm);
    }

    #[test]
    fn quit_confirm_cancels_on_esc() {
        let mut state = loaded_state(5);
        handle_key(&mut state, key(KeyCode::Char('q')));
        assert_eq!(handle_key(&mut state, key(KeyCode::Esc)), KeyAction::None);
        assert!(!state.show_quit_confirm);
    }

    #[test]
    fn f_requests_the_next_page() {
        let mut state = AppState::new("test", &ViewOptions::default()).unwrap();
        assert_eq!(
            handle_key(&mut state, key(KeyCode::Char('f'))),
            KeyAction::FetchPage(0)
        );
        assert_eq!(
            handle_key(&mut state, key(KeyCode::Char('f'))),
            KeyAction::FetchPage(1)
        );
    }

    #[test]
    fn f_after_exhaustion_does_nothing() {
        let mut state = loaded_state(5);
        assert!(state.exhausted);
        assert_eq!(handle_key(&mut state, key(KeyCode::Char('f'))), KeyAction::None);
    }

    #[test]
    fn scroll_keys_move_the_viewport() {
        let mut state = loaded_state(100);

        handle_key(&mut state, key(KeyCode::Char('j')));
        handle_key(&mut state, key(KeyCode::Down));
        assert_eq!(state.virtualizer.scroll_offset(), 2.0);

        handle_key(&mut state, key(KeyCode::Char('k')));
        assert_eq!(state.virtualizer.scroll_offset(), 1.0);

        handle_key(&mut state, key(KeyCode::PageDown));
        assert_eq!(state.virtualizer.scroll_offset(), 11.0);

        handle_key(&mut state, key(KeyCode::Char('G')));
        assert_eq!(state.virtualizer.scroll_offset(), 90.0);

        handle_key(&mut state, key(KeyCode::Char('g')));
        assert_eq!(state.virtualizer.scroll_offset(), 0.0);

        handle_key(&mut state, key(KeyCode::Up));
        assert_eq!(state.virtualizer.scroll_offset(), 0.0);
    }

    #[test]
    fn space_toggles_focused_column() {
        let mut state = loaded_state(5);
        handle_key(&mut state, key(KeyCode::Right));
        handle_key(&mut state, key(KeyCode::Right));
        assert_eq!(state.column_cursor, 2);

        handle_key(&mut state, key(KeyCode::Char(' ')));
        assert!(!state.columns.is_visible("height"));
        handle_key(&mut state, key(KeyCode::Char(' ')));
        assert!(state.columns.is_visible("height"));
    }

    #[test]
    fn help_swallows_navigation() {
        let mut state = loaded_state(100);
        handle_key(&mut state, key(KeyCode::Char('?')));
        assert!(state.show_help);

        handle_key(&mut state, key(KeyCode::Char('j')));
        assert_eq!(state.help_scroll, 1);
        assert_eq!(state.virtualizer.scroll_offset(), 0.0);

        handle_key(&mut state, key(KeyCode::Esc));
        assert!(!state.show_help);
        assert_eq!(state.help_scroll, 0);
    }
}
