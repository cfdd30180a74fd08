//! Tabular state: column model, row source and the composition of both with
//! the virtualizer window.

pub mod column;
pub mod renderer;
pub mod rows;

pub use column::{ColumnDef, ColumnError, ColumnModel, ColumnSize, DEFAULT_COLUMN_SIZE};
pub use renderer::{HeaderCell, RenderedRow, RenderedTable, TableRenderer};
pub use rows::{PagedRows, RowSource};

use std::fmt;

/// Value produced by a column accessor.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Reference to an image (URL or path).
    Image(String),
    Text(String),
    Number(f64),
    TextList(Vec<String>),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Image(src) => write!(f, "{}", src),
            CellValue::Text(text) => write!(f, "{}", text),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::TextList(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

/// Hint for how the presentation layer should style a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellStyle {
    #[default]
    Plain,
    /// Stand-in text for something the surface cannot show (e.g. an image).
    Placeholder,
    Link,
    Numeric,
}

/// Output of a column's cell renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCell {
    pub text: String,
    pub style: CellStyle,
}

impl RenderedCell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: CellStyle::Plain,
        }
    }

    pub fn styled(text: impl Into<String>, style: CellStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Row the cell belongs to, handed to cell renderers.
#[derive(Debug)]
pub struct RowContext<'a, R> {
    pub index: usize,
    pub row: &'a R,
}
