//! Page providers: the data sources that feed the row source.
//!
//! A `PageProvider` turns a page number into a batch of rows. Providers are
//! blocking; the TUI drives them from a [`FetchWorker`] thread so the table
//! keeps scrolling while a page is in flight.

mod json;
mod mock;
mod worker;

pub use json::JsonDirProvider;
pub use mock::MockProvider;
pub use worker::{FetchOutcome, FetchWorker};

/// Error types that can occur while fetching a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// I/O error while reading page data.
    Io(String),
    /// Page data could not be decoded.
    Parse(String),
    /// The provider has no such page.
    NotFound(u32),
    /// The fetch worker is no longer running.
    Disconnected,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::Io(msg) => write!(f, "I/O error: {}", msg),
            ProviderError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ProviderError::NotFound(page) => write!(f, "Page {} not found", page),
            ProviderError::Disconnected => write!(f, "Fetch worker disconnected"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// One fetched page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    pub number: u32,
    pub rows: Vec<R>,
    /// `false` once the provider knows there is nothing after this page.
    pub has_more: bool,
}

/// Source of paged rows.
///
/// Implementations do not retry; a failed fetch is reported once and the
/// caller decides whether to ask again.
pub trait PageProvider: Send {
    type Row: Send + 'static;

    /// Fetches page `page` (0-based). May block.
    fn fetch_page(&mut self, page: u32) -> Result<Page<Self::Row>, ProviderError>;

    /// Short human-readable description, shown in the header.
    fn describe(&self) -> String;
}

impl<P: PageProvider + ?Sized> PageProvider for Box<P> {
    type Row = P::Row;

    fn fetch_page(&mut self, page: u32) -> Result<Page<Self::Row>, ProviderError> {
        (**self).fetch_page(page)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
