//! pagetab - virtualized table library.
//!
//! The core is three independent pieces:
//! - [`virtualizer`] - which rows intersect the viewport and where they sit
//! - [`table`] - column model, row sources and the composition of both with
//!   the virtualizer window
//! - [`provider`] - paged data sources and the background fetch worker
//!
//! [`tui`] paints the composed table in a terminal.

pub mod provider;
pub mod species;
pub mod table;
pub mod tui;
pub mod virtualizer;
