//! Composition of column model, row source and virtualizer window into
//! concrete render instructions.

use tracing::{debug, warn};

use crate::virtualizer::Virtualizer;

use super::{ColumnModel, RenderedCell, RowSource};

/// Header of one visible column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub id: String,
    pub header: String,
    pub width: u16,
}

/// One materialized row, positioned along the scroll axis.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    pub index: usize,
    pub start: f64,
    pub size: f64,
    /// One cell per visible column, in column order.
    pub cells: Vec<RenderedCell>,
}

/// Everything the presentation layer needs to paint one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderedTable {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<RenderedRow>,
    pub row_count: usize,
    pub total_extent: f64,
    pub scroll_offset: f64,
    pub viewport_extent: f64,
}

/// Inputs a frame depends on. A frame is recomputed only when one changes.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FrameKey {
    row_count: usize,
    scroll_offset: f64,
    viewport_extent: f64,
    overscan: usize,
    layout_generation: u64,
    column_generation: u64,
}

/// Builds [`RenderedTable`]s and caches the last one.
///
/// Recompute triggers are exactly the fields of the cache key: row count,
/// scroll offset, viewport extent, overscan, row measurements and column
/// visibility. Row contents are never re-read for an unchanged key, which is
/// sound because rows are immutable once appended. After replacing a row
/// source wholesale, call [`TableRenderer::invalidate`].
#[derive(Debug, Default)]
pub struct TableRenderer {
    cached: Option<(FrameKey, RenderedTable)>,
    recomputes: u64,
}

impl TableRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces the next [`render`](Self::render) to recompute.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Number of frames computed so far.
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }

    /// Returns the frame for the current inputs.
    pub fn render<S: RowSource>(
        &mut self,
        virtualizer: &mut Virtualizer,
        columns: &ColumnModel<S::Row>,
        rows: &S,
    ) -> &RenderedTable {
        virtualizer.set_count(rows.len());
        let key = FrameKey {
            row_count: rows.len(),
            scroll_offset: virtualizer.scroll_offset(),
            viewport_extent: virtualizer.viewport_extent(),
            overscan: virtualizer.overscan(),
            layout_generation: virtualizer.layout_generation(),
            column_generation: columns.generation(),
        };

        let frame = match self.cached.take() {
            Some((cached_key, frame)) if cached_key == key => frame,
            _ => {
                let frame = compose(virtualizer, columns, rows);
                self.recomputes += 1;
                debug!(
                    rows = frame.rows.len(),
                    columns = frame.headers.len(),
                    total = frame.row_count,
                    "table frame recomputed"
                );
                frame
            }
        };
        &self.cached.insert((key, frame)).1
    }
}

/// Computes one frame without caching.
pub fn compose<S: RowSource>(
    virtualizer: &mut Virtualizer,
    columns: &ColumnModel<S::Row>,
    rows: &S,
) -> RenderedTable {
    virtualizer.set_count(rows.len());
    let visible: Vec<_> = columns.visible_columns().collect();
    let headers = visible
        .iter()
        .map(|c| HeaderCell {
            id: c.id.clone(),
            header: c.header.clone(),
            width: c.width(),
        })
        .collect();

    let mut rendered = Vec::new();
    for item in virtualizer.virtual_items() {
        let Some(row) = rows.at(item.index) else {
            warn!(index = item.index, "row source has no row for in-window index");
            continue;
        };
        let cells = visible
            .iter()
            .map(|c| c.render_cell(item.index, row))
            .collect();
        rendered.push(RenderedRow {
            index: item.index,
            start: item.start,
            size: item.size,
            cells,
        });
    }

    RenderedTable {
        headers,
        rows: rendered,
        row_count: rows.len(),
        total_extent: virtualizer.total_extent(),
        scroll_offset: virtualizer.scroll_offset(),
        viewport_extent: virtualizer.viewport_extent(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{CellValue, ColumnDef, PagedRows};
    use crate::virtualizer::Align;

    #[derive(Debug, Clone)]
    struct Rec {
        n: u32,
    }

    fn columns() -> ColumnModel<Rec> {
        ColumnModel::new(vec![
            ColumnDef::new("n", "N", |r: &Rec| CellValue::Number(r.n.into())).fixed_size(5),
            ColumnDef::new("sq", "Square", |r: &Rec| {
                CellValue::Number(f64::from(r.n) * f64::from(r.n))
            }),
            ColumnDef::new("label", "Label", |r: &Rec| CellValue::Text(format!("#{}", r.n))),
        ])
        .unwrap()
    }

    fn rows(n: u32) -> PagedRows<Rec> {
        let mut rows = PagedRows::new();
        rows.append_page(0, (0..n).map(|n| Rec { n }).collect());
        rows
    }

    fn texts(row: &RenderedRow) -> Vec<&str> {
        row.cells.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn frame_maps_window_through_rows_and_columns() {
        let mut v = Virtualizer::fixed(0, 1.0)
            .with_viewport_extent(4.0)
            .with_overscan(1);
        let cols = columns();
        let data = rows(100);

        v.set_scroll_offset(10.0);
        let frame = compose(&mut v, &cols, &data);

        assert_eq!(frame.row_count, 100);
        assert_eq!(frame.total_extent, 100.0);
        let idx: Vec<usize> = frame.rows.iter().map(|r| r.index).collect();
        assert_eq!(idx, (9..=15).collect::<Vec<_>>());
        assert_eq!(texts(&frame.rows[1]), ["10", "100", "#10"]);
        assert_eq!(frame.rows[1].start, 10.0);
        assert_eq!(frame.headers.len(), 3);
        assert_eq!(frame.headers[0].width, 5);
    }

    #[test]
    fn hidden_columns_are_not_rendered() {
        let mut v = Virtualizer::fixed(0, 1.0).with_viewport_extent(2.0);
        let mut cols = columns();
        let data = rows(3);

        cols.set_visible("sq", false);
        let frame = compose(&mut v, &cols, &data);
        let ids: Vec<&str> = frame.headers.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, ["n", "label"]);
        assert_eq!(texts(&frame.rows[2]), ["2", "#2"]);
    }

    #[test]
    fn materialized_rows_do_not_depend_on_row_count() {
        let cols = columns();
        let mut small = Virtualizer::fixed(0, 1.0).with_viewport_extent(10.0);
        let mut large = Virtualizer::fixed(0, 1.0).with_viewport_extent(10.0);
        let a = compose(&mut small, &cols, &rows(1_000));
        let b = compose(&mut large, &cols, &rows(1_000_000));
        assert_eq!(a.rows.len(), b.rows.len());
        assert_eq!(b.total_extent, 1_000_000.0);
    }

    #[test]
    fn empty_source_yields_empty_frame() {
        let mut v = Virtualizer::fixed(0, 1.0).with_viewport_extent(10.0);
        let frame = compose(&mut v, &columns(), &rows(0));
        assert!(frame.rows.is_empty());
        assert_eq!(frame.total_extent, 0.0);
    }

    #[test]
    fn cache_recomputes_only_on_input_change() {
        let mut renderer = TableRenderer::new();
        let mut v = Virtualizer::fixed(0, 1.0).with_viewport_extent(5.0);
        let mut cols = columns();
        let mut data = rows(50);

        let first = renderer.render(&mut v, &cols, &data).clone();
        let again = renderer.render(&mut v, &cols, &data).clone();
        assert_eq!(first, again);
        assert_eq!(renderer.recomputes(), 1);

        v.scroll_by(3.0);
        renderer.render(&mut v, &cols, &data);
        assert_eq!(renderer.recomputes(), 2);

        v.set_viewport_extent(8.0);
        renderer.render(&mut v, &cols, &data);
        assert_eq!(renderer.recomputes(), 3);

        cols.toggle("label");
        renderer.render(&mut v, &cols, &data);
        assert_eq!(renderer.recomputes(), 4);

        data.append_page(1, vec![Rec { n: 50 }]);
        let frame = renderer.render(&mut v, &cols, &data);
        assert_eq!(frame.row_count, 51);
        assert_eq!(renderer.recomputes(), 5);

        v.measure(4, 3.0);
        renderer.render(&mut v, &cols, &data);
        assert_eq!(renderer.recomputes(), 6);

        renderer.invalidate();
        renderer.render(&mut v, &cols, &data);
        assert_eq!(renderer.recomputes(), 7);
    }

    #[test]
    fn append_grows_total_extent_and_keeps_offsets() {
        let mut renderer = TableRenderer::new();
        let mut v = Virtualizer::fixed(0, 2.0).with_viewport_extent(6.0);
        let cols = columns();
        let mut data = rows(10);

        let before = renderer.render(&mut v, &cols, &data).clone();
        data.append_page(1, (10..15).map(|n| Rec { n }).collect());
        let after = renderer.render(&mut v, &cols, &data).clone();

        assert_eq!(after.total_extent, before.total_extent + 5.0 * 2.0);
        for (a, b) in before.rows.iter().zip(after.rows.iter()) {
            assert_eq!(a.index, b.index);
            assert_eq!(a.start, b.start);
        }
    }

    #[test]
    fn scroll_to_bottom_renders_last_row() {
        let mut renderer = TableRenderer::new();
        let mut v = Virtualizer::fixed(0, 1.0).with_viewport_extent(5.0);
        let cols = columns();
        let data = rows(40);

        renderer.render(&mut v, &cols, &data);
        v.scroll_to_index(data.len() - 1, Align::End);
        let frame = renderer.render(&mut v, &cols, &data);
        assert_eq!(frame.rows.last().map(|r| r.index), Some(39));
    }

    #[test]
    fn missing_rows_are_skipped() {
        struct Short(Vec<Rec>);
        impl RowSource for Short {
            type Row = Rec;
            fn len(&self) -> usize {
                self.0.len() + 2
            }
            fn at(&self, index: usize) -> Option<&Rec> {
                self.0.get(index)
            }
        }

        let mut v = Virtualizer::fixed(0, 1.0).with_viewport_extent(10.0);
        let frame = compose(&mut v, &columns(), &Short(vec![Rec { n: 1 }, Rec { n: 2 }]));
        assert_eq!(frame.row_count, 4);
        assert_eq!(frame.rows.len(), 2);
    }
}
