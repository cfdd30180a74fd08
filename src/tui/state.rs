//! Application state for the TUI.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use crate::provider::{FetchOutcome, Page, ProviderError};
use crate::species::{self, Species};
use crate::table::{ColumnError, ColumnModel, PagedRows, RowSource, TableRenderer};
use crate::virtualizer::{Align, DEFAULT_OVERSCAN, Virtualizer};

/// Startup options for the table view.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    /// Size estimate for unmeasured rows, in terminal lines.
    pub row_height: f64,
    /// Upper bound for a measured row, in terminal lines.
    pub max_row_lines: u16,
    pub overscan: usize,
    /// Column ids hidden at startup.
    pub hidden: Vec<String>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            row_height: 1.0,
            max_row_lines: 3,
            overscan: DEFAULT_OVERSCAN,
            hidden: species::DEFAULT_HIDDEN.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Severity of the status line message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// Main application state.
pub struct AppState {
    pub virtualizer: Virtualizer,
    pub columns: ColumnModel<Species>,
    pub rows: PagedRows<Species>,
    pub renderer: TableRenderer,
    pub max_row_lines: u16,

    /// Human-readable name of the page provider.
    pub source: String,
    /// Lowest page number never requested.
    pub next_page: u32,
    /// Next page to append; pages only join `rows` in order.
    pub next_append: u32,
    /// Requested, not yet answered.
    pub pending: BTreeSet<u32>,
    /// Failed pages, retried before `next_page` advances.
    pub failed: BTreeSet<u32>,
    /// Pages that arrived ahead of `next_append`.
    pub arrived: BTreeMap<u32, Page<Species>>,
    /// Set once the provider reports there is nothing more.
    pub exhausted: bool,

    /// Index into `columns.columns()` of the focused switch.
    pub column_cursor: usize,
    pub show_help: bool,
    pub help_scroll: usize,
    pub show_quit_confirm: bool,
    pub status: Option<(StatusKind, String)>,
    /// Set by "scroll to bottom"; keeps the last row in view while rows
    /// near the end are measured. Any other scroll clears it.
    pub stick_to_end: bool,
    /// Ticks since startup, drives the fetch spinner.
    pub ticks: u64,
}

impl AppState {
    /// Creates the state with the species column set.
    pub fn new(source: impl Into<String>, options: &ViewOptions) -> Result<Self, ColumnError> {
        let mut columns = species::columns()?;
        columns.apply_visibility(options.hidden.iter().map(|id| (id.as_str(), false)));
        let row_height = options.row_height;
        Ok(Self {
            virtualizer: Virtualizer::new(0, move |_| row_height).with_overscan(options.overscan),
            columns,
            rows: PagedRows::new(),
            renderer: TableRenderer::new(),
            max_row_lines: options.max_row_lines.max(1),
            source: source.into(),
            next_page: 0,
            next_append: 0,
            pending: BTreeSet::new(),
            failed: BTreeSet::new(),
            arrived: BTreeMap::new(),
            exhausted: false,
            column_cursor: 0,
            show_help: false,
            help_scroll: 0,
            show_quit_confirm: false,
            status: None,
            stick_to_end: false,
            ticks: 0,
        })
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some((StatusKind::Info, text.into()));
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some((StatusKind::Error, text.into()));
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|(_, text)| text.as_str())
    }

    /// Picks the next page to request and marks it pending.
    ///
    /// Failed pages are retried first. Returns `None` when the dataset is
    /// exhausted or the page is already in flight.
    pub fn begin_fetch(&mut self) -> Option<u32> {
        if self.exhausted {
            self.set_status("No more pages");
            return None;
        }
        let page = match self.failed.first() {
            Some(&page) => page,
            None => self.next_page,
        };
        if self.pending.contains(&page) {
            self.set_status(format!("Page {} is already loading", page + 1));
            return None;
        }
        self.failed.remove(&page);
        self.pending.insert(page);
        if page == self.next_page {
            self.next_page += 1;
        }
        debug!(page, "page requested");
        Some(page)
    }

    /// Records a request that never reached the worker.
    pub fn abort_fetch(&mut self, page: u32, error: &ProviderError) {
        self.pending.remove(&page);
        self.failed.insert(page);
        self.set_error(format!("Cannot fetch page {}: {}", page + 1, error));
    }

    /// Applies a completed fetch.
    ///
    /// Pages are appended strictly in page order; a page that arrives
    /// early waits in `arrived` until its predecessors are in.
    pub fn apply_fetch(&mut self, outcome: FetchOutcome<Species>) {
        let FetchOutcome { page, result } = outcome;
        if !self.pending.remove(&page) {
            debug!(page, "dropping unrequested page");
            return;
        }
        match result {
            Ok(fetched) => {
                self.arrived.insert(page, fetched);
                self.drain_arrived();
            }
            Err(ProviderError::NotFound(_)) => {
                info!(page, "provider has no more pages");
                self.mark_exhausted(page);
            }
            Err(e) => {
                warn!(page, error = %e, "fetch failed");
                self.failed.insert(page);
                self.set_error(format!("Page {} failed: {} (f to retry)", page + 1, e));
            }
        }
    }

    fn drain_arrived(&mut self) {
        while let Some(fetched) = self.arrived.remove(&self.next_append) {
            let page = self.next_append;
            let added = self.rows.append_page(page, fetched.rows);
            self.next_append += 1;
            self.virtualizer.set_count(self.rows.len());
            self.set_status(format!("Loaded page {} ({} rows)", page + 1, added.len()));
            if !fetched.has_more {
                self.mark_exhausted(page + 1);
                break;
            }
        }
    }

    /// Nothing exists at or past `first_missing`.
    fn mark_exhausted(&mut self, first_missing: u32) {
        self.exhausted = true;
        self.next_page = self.next_page.min(first_missing);
        self.failed.retain(|&p| p < first_missing);
        self.arrived.retain(|&p, _| p < first_missing);
        if self.rows.is_empty() {
            self.set_status("No rows available");
        } else {
            self.set_status(format!("All {} rows loaded", self.rows.len()));
        }
    }

    /// Moves the column cursor by `delta`, clamped to the column list.
    pub fn move_column_cursor(&mut self, delta: isize) {
        let last = self.columns.len().saturating_sub(1);
        self.column_cursor = self.column_cursor.saturating_add_signed(delta).min(last);
    }

    /// Toggles the focused column, honoring its `can_hide` flag.
    pub fn toggle_focused_column(&mut self) {
        let Some(col) = self.columns.columns().get(self.column_cursor) else {
            return;
        };
        let id = col.id.clone();
        if col.is_visible() && !col.can_hide {
            let msg = format!("Column '{}' cannot be hidden", col.header);
            self.set_status(msg);
            return;
        }
        self.columns.toggle(&id);
        // Row heights depend on which cells are shown.
        self.virtualizer.reset_measurements();
        debug!(column = %id, visible = self.columns.is_visible(&id), "column toggled");
    }

    pub fn scroll_lines(&mut self, lines: f64) {
        self.stick_to_end = false;
        self.virtualizer.scroll_by(lines);
    }

    pub fn scroll_pages(&mut self, pages: f64) {
        self.stick_to_end = false;
        let step = self.virtualizer.viewport_extent().max(1.0);
        self.virtualizer.scroll_by(step * pages);
    }

    pub fn scroll_to_top(&mut self) {
        self.stick_to_end = false;
        self.virtualizer.scroll_to_index(0, Align::Start);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.stick_to_end = true;
        self.pin_to_bottom();
    }

    /// Brings the last row fully into view without touching `stick_to_end`.
    pub fn pin_to_bottom(&mut self) {
        let last = self.rows.len().saturating_sub(1);
        self.virtualizer.scroll_to_index(last, Align::End);
        // End alignment lands on the row's leading edge; pull the row itself in.
        let size = self.virtualizer.size_of(last);
        self.virtualizer.scroll_by(size);
    }

    /// Advances the tick counter.
    pub fn tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MockProvider, PageProvider};

    fn state() -> AppState {
        AppState::new("test", &ViewOptions::default()).unwrap()
    }

    fn outcome(provider: &mut MockProvider, page: u32) -> FetchOutcome<Species> {
        FetchOutcome {
            page,
            result: provider.fetch_page(page),
        }
    }

    #[test]
    fn url_is_hidden_by_default() {
        let s = state();
        assert!(!s.columns.is_visible("url"));
        assert!(s.columns.is_visible("name"));
    }

    #[test]
    fn pages_are_requested_in_sequence() {
        let mut s = state();
        assert_eq!(s.begin_fetch(), Some(0));
        assert_eq!(s.begin_fetch(), Some(1));
        assert_eq!(s.pending.len(), 2);
    }

    #[test]
    fn out_of_order_pages_wait_for_predecessors() {
        let mut p = MockProvider::new(100, 10);
        let mut s = state();
        s.begin_fetch();
        s.begin_fetch();

        s.apply_fetch(outcome(&mut p, 1));
        assert_eq!(s.rows.len(), 0);
        assert!(s.arrived.contains_key(&1));

        s.apply_fetch(outcome(&mut p, 0));
        assert_eq!(s.rows.len(), 20);
        assert_eq!(s.virtualizer.count(), 20);
        assert!(s.arrived.is_empty());
        assert_eq!(s.rows.as_slice()[10].id, 11);
    }

    #[test]
    fn unrequested_pages_are_ignored() {
        let mut p = MockProvider::new(100, 10);
        let mut s = state();
        s.apply_fetch(outcome(&mut p, 0));
        assert_eq!(s.rows.len(), 0);
    }

    #[test]
    fn last_page_exhausts_the_source() {
        let mut p = MockProvider::new(15, 10);
        let mut s = state();
        for _ in 0..2 {
            let page = s.begin_fetch().unwrap();
            s.apply_fetch(outcome(&mut p, page));
        }
        assert_eq!(s.rows.len(), 15);
        assert!(s.exhausted);
        assert_eq!(s.begin_fetch(), None);
        assert_eq!(s.status_text(), Some("No more pages"));
    }

    #[test]
    fn failed_page_is_retried_first() {
        let mut s = state();
        assert_eq!(s.begin_fetch(), Some(0));
        s.apply_fetch(FetchOutcome {
            page: 0,
            result: Err(ProviderError::Io("boom".into())),
        });
        assert!(s.failed.contains(&0));
        assert!(s.status_text().unwrap().contains("boom"));

        assert_eq!(s.begin_fetch(), Some(0));
        assert_eq!(s.begin_fetch(), Some(1));
    }

    #[test]
    fn in_flight_retry_is_not_duplicated() {
        let mut s = state();
        s.begin_fetch();
        s.abort_fetch(0, &ProviderError::Disconnected);
        assert_eq!(s.begin_fetch(), Some(0));
        s.failed.insert(0);
        assert_eq!(s.begin_fetch(), None);
    }

    #[test]
    fn not_found_exhausts_without_rows() {
        let mut s = state();
        s.begin_fetch();
        s.apply_fetch(FetchOutcome {
            page: 0,
            result: Err(ProviderError::NotFound(0)),
        });
        assert!(s.exhausted);
        assert_eq!(s.status_text(), Some("No rows available"));
    }

    #[test]
    fn name_column_refuses_to_hide() {
        let mut s = state();
        s.column_cursor = 1;
        s.toggle_focused_column();
        assert!(s.columns.is_visible("name"));
        assert!(s.status_text().unwrap().contains("cannot be hidden"));
    }

    #[test]
    fn toggling_resets_measurements() {
        let mut p = MockProvider::new(10, 10);
        let mut s = state();
        s.begin_fetch();
        s.apply_fetch(outcome(&mut p, 0));
        s.virtualizer.measure(3, 2.0);
        assert_eq!(s.virtualizer.size_of(3), 2.0);

        s.column_cursor = 4;
        s.toggle_focused_column();
        assert!(!s.columns.is_visible("types"));
        assert_eq!(s.virtualizer.size_of(3), 1.0);
    }

    #[test]
    fn fetch_errors_are_error_status() {
        let mut s = state();
        s.begin_fetch();
        s.apply_fetch(FetchOutcome {
            page: 0,
            result: Err(ProviderError::Parse("bad json".into())),
        });
        assert!(matches!(s.status, Some((StatusKind::Error, _))));

        s.begin_fetch();
        s.apply_fetch(FetchOutcome {
            page: 0,
            result: MockProvider::new(10, 10).fetch_page(0),
        });
        assert!(matches!(s.status, Some((StatusKind::Info, _))));
    }

    #[test]
    fn only_scroll_to_bottom_sticks_to_end() {
        let mut p = MockProvider::new(100, 100);
        let mut s = state();
        s.begin_fetch();
        s.apply_fetch(outcome(&mut p, 0));
        s.virtualizer.set_viewport_extent(10.0);

        s.scroll_to_bottom();
        assert!(s.stick_to_end);
        assert_eq!(s.virtualizer.scroll_offset(), 90.0);

        s.scroll_lines(-1.0);
        assert!(!s.stick_to_end);

        s.scroll_to_bottom();
        s.scroll_to_top();
        assert!(!s.stick_to_end);
    }

    #[test]
    fn column_cursor_is_clamped() {
        let mut s = state();
        s.move_column_cursor(-1);
        assert_eq!(s.column_cursor, 0);
        s.move_column_cursor(100);
        assert_eq!(s.column_cursor, s.columns.len() - 1);
    }
}
