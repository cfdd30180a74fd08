//! Column definitions and the visibility model.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use super::{CellValue, RenderedCell, RowContext};

/// Width used for columns without an explicit size, in terminal cells.
pub const DEFAULT_COLUMN_SIZE: u16 = 16;

type Accessor<R> = Box<dyn Fn(&R) -> CellValue>;
type CellRenderer<R> = Box<dyn Fn(&CellValue, &RowContext<'_, R>) -> RenderedCell>;

/// Column width specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnSize {
    Fixed(u16),
    /// Falls back to [`DEFAULT_COLUMN_SIZE`].
    #[default]
    Auto,
}

impl ColumnSize {
    pub fn extent(self) -> u16 {
        match self {
            ColumnSize::Fixed(w) => w,
            ColumnSize::Auto => DEFAULT_COLUMN_SIZE,
        }
    }
}

/// Error building a [`ColumnModel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnError {
    DuplicateId(String),
}

impl fmt::Display for ColumnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnError::DuplicateId(id) => write!(f, "duplicate column id '{}'", id),
        }
    }
}

impl std::error::Error for ColumnError {}

/// A displayable field of `R`.
pub struct ColumnDef<R> {
    pub id: String,
    pub header: String,
    pub size: ColumnSize,
    /// Advisory: presentation layers should not offer to hide this column.
    pub can_hide: bool,
    visible: bool,
    accessor: Accessor<R>,
    renderer: CellRenderer<R>,
}

impl<R> fmt::Debug for ColumnDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("size", &self.size)
            .field("can_hide", &self.can_hide)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

impl<R: 'static> ColumnDef<R> {
    /// Creates a visible, hideable column that renders its value as plain text.
    pub fn new(
        id: impl Into<String>,
        header: impl Into<String>,
        accessor: impl Fn(&R) -> CellValue + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            size: ColumnSize::Auto,
            can_hide: true,
            visible: true,
            accessor: Box::new(accessor),
            renderer: Box::new(|value, _| RenderedCell::plain(value.to_string())),
        }
    }

    /// Sets the cell renderer.
    pub fn cell(
        mut self,
        renderer: impl Fn(&CellValue, &RowContext<'_, R>) -> RenderedCell + 'static,
    ) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn fixed_size(mut self, width: u16) -> Self {
        self.size = ColumnSize::Fixed(width);
        self
    }

    /// Starts the column hidden.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn not_hideable(mut self) -> Self {
        self.can_hide = false;
        self
    }
}

impl<R> ColumnDef<R> {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn width(&self) -> u16 {
        self.size.extent()
    }

    pub fn value(&self, row: &R) -> CellValue {
        (self.accessor)(row)
    }

    /// Evaluates the accessor and renderer for one row.
    pub fn render_cell(&self, index: usize, row: &R) -> RenderedCell {
        let value = self.value(row);
        (self.renderer)(&value, &RowContext { index, row })
    }
}

/// Ordered set of columns with per-column visibility.
pub struct ColumnModel<R> {
    columns: Vec<ColumnDef<R>>,
    generation: u64,
}

impl<R> fmt::Debug for ColumnModel<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnModel")
            .field("columns", &self.columns)
            .field("generation", &self.generation)
            .finish()
    }
}

impl<R> ColumnModel<R> {
    /// Builds a model; column ids must be unique.
    pub fn new(columns: Vec<ColumnDef<R>>) -> Result<Self, ColumnError> {
        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.id.as_str()) {
                return Err(ColumnError::DuplicateId(col.id.clone()));
            }
        }
        Ok(Self {
            columns,
            generation: 0,
        })
    }

    /// All columns in insertion order.
    pub fn columns(&self) -> &[ColumnDef<R>] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ColumnDef<R>> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Bumped on every effective visibility change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Unknown ids report `false`.
    pub fn is_visible(&self, id: &str) -> bool {
        self.get(id).is_some_and(|c| c.visible)
    }

    /// Shows or hides a column. Unknown ids are ignored.
    ///
    /// `can_hide` is not enforced here; it is up to the caller to honour it.
    pub fn set_visible(&mut self, id: &str, visible: bool) {
        let Some(col) = self.columns.iter_mut().find(|c| c.id == id) else {
            debug!(id, "visibility toggle for unknown column ignored");
            return;
        };
        if col.visible != visible {
            col.visible = visible;
            self.generation += 1;
            debug!(id, visible, "column visibility changed");
        }
    }

    /// Flips a column's visibility. Unknown ids are ignored.
    pub fn toggle(&mut self, id: &str) {
        if let Some(visible) = self.get(id).map(|c| c.visible) {
            self.set_visible(id, !visible);
        }
    }

    /// Applies initial visibility overrides.
    pub fn apply_visibility<'a>(&mut self, overrides: impl IntoIterator<Item = (&'a str, bool)>) {
        for (id, visible) in overrides {
            self.set_visible(id, visible);
        }
    }

    /// Visible columns, in insertion order.
    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnDef<R>> {
        self.columns.iter().filter(|c| c.visible)
    }
}
