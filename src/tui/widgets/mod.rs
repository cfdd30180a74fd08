//! TUI widgets for pagetab.

mod header;
mod help;
mod quit_confirm;
mod table;
mod toggles;

pub use header::render_header;
pub use help::render_help;
pub use quit_confirm::render_quit_confirm;
pub use table::render_table;
pub use toggles::render_toggles;
