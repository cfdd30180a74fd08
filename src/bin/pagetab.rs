//! pagetab - Virtualized terminal table over a paginated dataset.
//!
//! Usage:
//!   pagetab                       # synthetic dataset, 20 rows per page
//!   pagetab --total 100000        # bigger synthetic dataset
//!   pagetab --dir ./pages         # read page-0.json, page-1.json, ...
//!   pagetab --hide ''             # show every column, URL included
//!   pagetab --log-file pagetab.log -v

use tikv_jemallocator::Jemalloc;
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use pagetab::provider::{JsonDirProvider, MockProvider, PageProvider};
use pagetab::species::Species;
use pagetab::tui::{App, ViewOptions};
use pagetab::virtualizer::DEFAULT_OVERSCAN;

/// Virtualized table viewer for paginated data.
#[derive(Parser)]
#[command(name = "pagetab", about = "Virtualized table viewer for paginated data", version)]
struct Args {
    /// Directory with page-<n>.json files. A synthetic dataset is used when absent.
    #[arg(short, long, value_name = "PATH")]
    dir: Option<PathBuf>,

    /// Rows per synthetic page.
    #[arg(long, default_value_t = 20)]
    page_size: u32,

    /// Size of the synthetic dataset.
    #[arg(long, default_value_t = 1000)]
    total: u32,

    /// Simulated latency of a synthetic page fetch, in milliseconds.
    #[arg(long, default_value_t = 300)]
    fetch_delay_ms: u64,

    /// Estimated row height in lines, used until a row is measured.
    #[arg(long, default_value_t = 1.0)]
    row_height: f64,

    /// Rows taller than this many lines are cut.
    #[arg(long, default_value_t = 3)]
    max_row_lines: u16,

    /// Rows rendered beyond each edge of the viewport.
    #[arg(long, default_value_t = DEFAULT_OVERSCAN)]
    overscan: usize,

    /// Comma-separated column ids hidden at startup.
    #[arg(long, value_name = "ID", value_delimiter = ',', default_value = "url")]
    hide: Vec<String>,

    /// Redraw interval in milliseconds.
    #[arg(long, default_value_t = 250)]
    tick_ms: u64,

    /// Write logs to this file. The terminal belongs to the UI, so without
    /// it nothing is logged.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only log errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber, writing to `log_file` if given.
fn init_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> io::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pagetab={}", level)));
    let file = File::create(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(args.verbose, args.quiet, args.log_file.as_deref()) {
        eprintln!("Error: cannot open log file: {}", e);
        std::process::exit(1);
    }

    let provider: Box<dyn PageProvider<Row = Species>> = match args.dir {
        Some(ref dir) => match JsonDirProvider::open(dir) {
            Ok(p) => Box::new(p),
            Err(e) => {
                eprintln!("Error opening '{}': {}", dir.display(), e);
                std::process::exit(1);
            }
        },
        None => Box::new(
            MockProvider::new(args.total, args.page_size)
                .with_latency(Duration::from_millis(args.fetch_delay_ms)),
        ),
    };

    let options = ViewOptions {
        row_height: args.row_height,
        max_row_lines: args.max_row_lines,
        overscan: args.overscan,
        hidden: args.hide,
    };
    let app = match App::new(provider, &options) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = app.run(Duration::from_millis(args.tick_ms.max(10))) {
        eprintln!("Error running TUI: {}", e);
        std::process::exit(1);
    }
}
