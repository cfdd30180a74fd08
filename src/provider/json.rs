//! Pages stored as JSON files in a directory.
//!
//! Page `n` lives in `page-<n>.json` and has the shape
//! `{ "results": [Species, ...], "next": "..." | null }`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use super::{Page, PageProvider, ProviderError};
use crate::species::Species;

#[derive(Debug, Deserialize)]
struct PageFile {
    results: Vec<Species>,
    #[serde(default)]
    next: Option<String>,
}

/// Reads pages from `page-<n>.json` files.
#[derive(Debug, Clone)]
pub struct JsonDirProvider {
    dir: PathBuf,
}

impl JsonDirProvider {
    /// Opens a page directory. Fails if `dir` is not a directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let dir = dir.as_ref();
        let meta = fs::metadata(dir).map_err(|e| ProviderError::Io(e.to_string()))?;
        if !meta.is_dir() {
            return Err(ProviderError::Io(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn page_path(&self, page: u32) -> PathBuf {
        self.dir.join(format!("page-{}.json", page))
    }
}

impl PageProvider for JsonDirProvider {
    type Row = Species;

    fn fetch_page(&mut self, page: u32) -> Result<Page<Species>, ProviderError> {
        let path = self.page_path(page);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(ProviderError::NotFound(page)),
            Err(e) => return Err(ProviderError::Io(format!("{}: {}", path.display(), e))),
        };
        let file: PageFile = serde_json::from_str(&text).map_err(|e| {
            warn!(path = %path.display(), error = %e, "malformed page file");
            ProviderError::Parse(format!("{}: {}", path.display(), e))
        })?;
        let has_more = file.next.is_some() || self.page_path(page.saturating_add(1)).exists();
        debug!(page, rows = file.results.len(), has_more, "page file loaded");
        Ok(Page {
            number: page,
            rows: file.results,
            has_more,
        })
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}
