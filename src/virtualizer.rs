//! Windowed virtualizer: maps a scroll position to the minimal range of rows
//! that must be materialized.
//!
//! Row sizes come from a caller-supplied estimate until a real measurement is
//! recorded with [`Virtualizer::measure`]. Offsets are kept in a prefix-sum
//! table that is rebuilt lazily from the first invalidated index, so appending
//! rows or measuring rows near the end of the table never touches the prefix
//! before them.
//!
//! Measurements are assumed stable. If a row's rendered size changes after it
//! was measured, the caller must call [`Virtualizer::invalidate`] (or
//! [`Virtualizer::reset_measurements`]) and measure it again.

use std::fmt;
use std::ops::RangeInclusive;

use tracing::trace;

/// Smallest extent a row may occupy. Estimates and measurements below this
/// (or non-finite ones) are clamped so the offset table stays strictly
/// increasing.
pub const MIN_ITEM_EXTENT: f64 = 1.0;

/// Default number of rows materialized beyond each viewport edge.
pub const DEFAULT_OVERSCAN: usize = 5;

/// Size estimate for a row that has not been measured yet.
pub type EstimateFn = Box<dyn Fn(usize) -> f64>;

/// Alignment used by [`Virtualizer::scroll_to_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Row start lands on the viewport's leading edge.
    #[default]
    Start,
    /// Row start lands one viewport length below the scroll offset.
    End,
}

/// One materialized row of the visible window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualItem {
    pub index: usize,
    /// Absolute offset of the row along the scroll axis.
    pub start: f64,
    pub size: f64,
}

impl VirtualItem {
    /// Offset just past the row.
    pub fn end(&self) -> f64 {
        self.start + self.size
    }
}

/// Virtualization state for a single scrollable list.
pub struct Virtualizer {
    count: usize,
    estimate: EstimateFn,
    measured: Vec<Option<f64>>,
    /// `offsets[i]` is the start of row `i`; `offsets[count]` is the total extent.
    offsets: Vec<f64>,
    /// Number of leading entries of `offsets` that are up to date.
    valid: usize,
    scroll_offset: f64,
    viewport_extent: f64,
    overscan: usize,
    /// Bumped whenever any row offset may have changed.
    layout_generation: u64,
}

impl fmt::Debug for Virtualizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Virtualizer")
            .field("count", &self.count)
            .field("valid", &self.valid)
            .field("scroll_offset", &self.scroll_offset)
            .field("viewport_extent", &self.viewport_extent)
            .field("overscan", &self.overscan)
            .field("layout_generation", &self.layout_generation)
            .finish_non_exhaustive()
    }
}

fn clamp_extent(size: f64) -> f64 {
    if size.is_finite() && size >= MIN_ITEM_EXTENT {
        size
    } else {
        MIN_ITEM_EXTENT
    }
}

impl Virtualizer {
    /// Creates a virtualizer over `count` rows sized by `estimate`.
    pub fn new(count: usize, estimate: impl Fn(usize) -> f64 + 'static) -> Self {
        Self {
            count,
            estimate: Box::new(estimate),
            measured: vec![None; count],
            offsets: vec![0.0; count + 1],
            valid: 1,
            scroll_offset: 0.0,
            viewport_extent: 0.0,
            overscan: DEFAULT_OVERSCAN,
            layout_generation: 0,
        }
    }

    /// Creates a virtualizer where every row is estimated at `size`.
    pub fn fixed(count: usize, size: f64) -> Self {
        Self::new(count, move |_| size)
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_viewport_extent(mut self, extent: f64) -> Self {
        self.set_viewport_extent(extent);
        self
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn viewport_extent(&self) -> f64 {
        self.viewport_extent
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    pub fn layout_generation(&self) -> u64 {
        self.layout_generation
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.overscan = overscan;
    }

    /// Sets the visible length of the viewport. Negative or non-finite values
    /// collapse the viewport to zero.
    pub fn set_viewport_extent(&mut self, extent: f64) {
        self.viewport_extent = if extent.is_finite() && extent > 0.0 {
            extent
        } else {
            0.0
        };
    }

    /// Sets the scroll position as reported by the presentation layer.
    ///
    /// Only the lower bound is enforced here; a surface may legitimately
    /// overshoot the end (e.g. while content is still being appended).
    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.scroll_offset = if offset.is_finite() && offset > 0.0 {
            offset
        } else {
            0.0
        };
    }

    /// Scrolls by `delta`, clamped to `[0, max_scroll_offset]`.
    pub fn scroll_by(&mut self, delta: f64) {
        let max = self.max_scroll_offset();
        let target = self.scroll_offset + delta;
        self.scroll_offset = if target.is_finite() {
            target.clamp(0.0, max)
        } else {
            self.scroll_offset.min(max)
        };
    }

    /// Largest offset at which the viewport still ends inside the content.
    pub fn max_scroll_offset(&mut self) -> f64 {
        (self.total_extent() - self.viewport_extent).max(0.0)
    }

    /// Updates the row count.
    ///
    /// Growing keeps every existing measurement and offset; the new rows are
    /// sized by the estimate. Shrinking drops the measurements of removed rows,
    /// so a reset followed by growth starts from estimates again.
    pub fn set_count(&mut self, count: usize) {
        if count == self.count {
            return;
        }
        trace!(from = self.count, to = count, "virtualizer count changed");
        self.measured.resize(count, None);
        self.offsets.resize(count + 1, 0.0);
        self.valid = self.valid.min(count + 1);
        self.count = count;
        self.layout_generation += 1;
    }

    /// Replaces the size estimate. Measured rows keep their measurements.
    pub fn set_estimate(&mut self, estimate: impl Fn(usize) -> f64 + 'static) {
        self.estimate = Box::new(estimate);
        self.invalidate_from(0);
    }

    /// Size of row `index`: its measurement if known, else the clamped estimate.
    pub fn size_of(&self, index: usize) -> f64 {
        match self.measured.get(index).copied().flatten() {
            Some(size) => size,
            None => clamp_extent((self.estimate)(index)),
        }
    }

    /// Records the rendered size of a row. Returns `true` if the layout changed.
    pub fn measure(&mut self, index: usize, size: f64) -> bool {
        if index >= self.count {
            return false;
        }
        let size = clamp_extent(size);
        if self.measured[index] == Some(size) {
            return false;
        }
        if self.measured[index].is_none() && self.size_of(index) == size {
            // Matches the estimate: record it without moving any offset.
            self.measured[index] = Some(size);
            return false;
        }
        self.measured[index] = Some(size);
        self.invalidate_from(index);
        true
    }

    /// Forgets the measurement of a single row.
    pub fn invalidate(&mut self, index: usize) {
        if let Some(slot) = self.measured.get_mut(index)
            && slot.take().is_some()
        {
            self.invalidate_from(index);
        }
    }

    /// Forgets every measurement; all rows fall back to the estimate.
    pub fn reset_measurements(&mut self) {
        self.measured.iter_mut().for_each(|m| *m = None);
        self.invalidate_from(0);
    }

    fn invalidate_from(&mut self, index: usize) {
        self.valid = self.valid.min(index + 1);
        self.layout_generation += 1;
    }

    /// Rebuilds the stale suffix of the offset table.
    fn ensure_offsets(&mut self) {
        if self.valid > self.count {
            return;
        }
        trace!(from = self.valid, to = self.count, "rebuilding offsets");
        for i in self.valid..=self.count {
            let next = self.offsets[i - 1] + self.size_of(i - 1);
            self.offsets[i] = next;
        }
        self.valid = self.count + 1;
    }

    /// Offset of the start of row `index`; `offset_of(count)` is the total extent.
    pub fn offset_of(&mut self, index: usize) -> f64 {
        self.ensure_offsets();
        self.offsets[index.min(self.count)]
    }

    /// Sum of every row's size, estimated where unmeasured.
    pub fn total_extent(&mut self) -> f64 {
        self.offset_of(self.count)
    }

    /// Rows that intersect the viewport, before overscan.
    fn strict_range(&mut self) -> Option<(usize, usize)> {
        if self.count == 0 {
            return None;
        }
        self.ensure_offsets();
        let starts = &self.offsets[..self.count];
        let scroll = self.scroll_offset;
        let far_edge = scroll + self.viewport_extent;

        // Row containing the scroll offset.
        let start = starts.partition_point(|&o| o <= scroll).saturating_sub(1);
        // First row starting at or past the far edge of the viewport.
        let end = starts
            .partition_point(|&o| o < far_edge)
            .min(self.count - 1)
            .max(start);
        Some((start, end))
    }

    /// Index range to materialize, overscan included.
    pub fn visible_range(&mut self) -> Option<RangeInclusive<usize>> {
        let (start, end) = self.strict_range()?;
        let first = start.saturating_sub(self.overscan);
        let last = end.saturating_add(self.overscan).min(self.count - 1);
        Some(first..=last)
    }

    /// Visible window: one entry per materialized row, in index order.
    pub fn virtual_items(&mut self) -> Vec<VirtualItem> {
        let Some(range) = self.visible_range() else {
            return Vec::new();
        };
        range
            .map(|index| VirtualItem {
                index,
                start: self.offsets[index],
                size: self.offsets[index + 1] - self.offsets[index],
            })
            .collect()
    }

    /// Moves the scroll offset so that row `index` is aligned as requested.
    ///
    /// `index` is clamped to the last row; an empty list leaves the offset as is.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) {
        if self.count == 0 {
            return;
        }
        let index = index.min(self.count - 1);
        let start = self.offset_of(index);
        let target = match align {
            Align::Start => start,
            Align::End => start - self.viewport_extent,
        };
        let max = self.max_scroll_offset();
        self.scroll_offset = target.clamp(0.0, max);
    }
}
