//! Terminal User Interface for pagetab.
//!
//! Paints the virtualized table in a terminal and drives the page worker
//! from keyboard input.

mod app;
mod event;
mod input;
mod render;
mod state;
mod style;
mod widgets;

pub use app::App;
pub use state::{AppState, StatusKind, ViewOptions};
