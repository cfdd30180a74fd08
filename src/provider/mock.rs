//! Deterministic synthetic species pages.

use std::thread;
use std::time::Duration;

use tracing::debug;

use super::{Page, PageProvider, ProviderError};
use crate::species::Species;

const PREFIXES: &[&str] = &[
    "bulb", "char", "squir", "pid", "rat", "spear", "ek", "sand", "nido", "clef", "vul", "zub",
    "odd", "para", "veno", "dig", "meow", "psy", "mank", "grow", "poli", "abr", "mach", "bell",
];
const SUFFIXES: &[&str] = &[
    "asaur", "mander", "tle", "gey", "tata", "row", "ans", "shrew", "ran", "fairy", "pix", "bat",
    "ish", "sect", "nat", "lett", "th", "duck", "ey", "lithe",
];
const TYPES: &[&str] = &[
    "normal", "fire", "water", "grass", "electric", "ice", "fighting", "poison", "ground",
    "flying", "psychic", "bug", "rock", "ghost", "dragon", "dark", "steel", "fairy",
];

/// Generates species pages without any I/O.
#[derive(Debug, Clone)]
pub struct MockProvider {
    total: u32,
    page_size: u32,
    latency: Duration,
}

impl MockProvider {
    /// Creates a provider over `total` species served `page_size` at a time.
    pub fn new(total: u32, page_size: u32) -> Self {
        Self {
            total,
            page_size: page_size.max(1),
            latency: Duration::ZERO,
        }
    }

    /// Simulated fetch latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Builds the species with the given 1-based id.
    pub fn species(id: u32) -> Species {
        let n = id as usize;
        let name = format!(
            "{}{}",
            PREFIXES[n % PREFIXES.len()],
            SUFFIXES[(n / PREFIXES.len()) % SUFFIXES.len()]
        );
        let primary = TYPES[n % TYPES.len()];
        let mut types = vec![primary.to_string()];
        let secondary = TYPES[(n * 7 + 3) % TYPES.len()];
        if n % 3 == 0 && secondary != primary {
            types.push(secondary.to_string());
        }
        Species {
            id,
            name,
            image: format!(
                "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/{}.png",
                id
            ),
            height: 3 + (id * 7) % 40,
            weight: 20 + (id * 37) % 2000,
            types,
            url: format!("https://pokeapi.co/api/v2/pokemon/{}/", id),
        }
    }
}

impl PageProvider for MockProvider {
    type Row = Species;

    fn fetch_page(&mut self, page: u32) -> Result<Page<Species>, ProviderError> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        let start = page.saturating_mul(self.page_size);
        let end = start.saturating_add(self.page_size).min(self.total);
        let rows: Vec<Species> = (start..end).map(|i| Self::species(i + 1)).collect();
        debug!(page, rows = rows.len(), "mock page generated");
        Ok(Page {
            number: page,
            rows,
            has_more: end < self.total,
        })
    }

    fn describe(&self) -> String {
        format!("synthetic ({} species)", self.total)
    }
}
