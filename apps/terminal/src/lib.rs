//! # Lomi Terminal Library
//!
//! Counter terminal for Lomi POS. Reads one command per line, runs it
//! against the session and prints the result.
//!
//! ## Module Organization
//! ```text
//! lomi_terminal/
//! ├── lib.rs          ◄─── You are here (startup & command loop)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── session.rs  ◄─── Cart, checkout and cashier
//! │   ├── history.rs  ◄─── Completed orders and report
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Parser and dispatcher
//! │   ├── auth.rs     ◄─── Login, logout, staff list
//! │   ├── product.rs  ◄─── Menu search
//! │   ├── cart.rs     ◄─── Cart manipulation
//! │   ├── payment.rs  ◄─── Payment workflow
//! │   └── report.rs   ◄─── History and totals
//! ├── view.rs         ◄─── Text rendering
//! └── error.rs        ◄─── Command and startup errors
//! ```

pub mod commands;
pub mod error;
pub mod state;
pub mod view;

use std::io::{self, BufRead, Write};

use lomi_core::Catalog;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use commands::{auth, Reply, Terminal};
use error::AppError;
use state::ConfigState;

/// Menu used when `LOMI_CATALOG` is not set.
const DEMO_CATALOG: &str = include_str!("../data/catalog.json");

/// Runs the terminal on stdin/stdout until `quit` or end of input.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Terminal Startup                                  │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, to stderr                     │
/// │     • Default: info,lomi=debug, can be overridden with RUST_LOG         │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • LOMI_STORE_NAME, LOMI_TAX_RATE, LOMI_DELIVERY_FEE, LOMI_CATALOG   │
/// │                                                                         │
/// │  3. Load Catalog ─────────────────────────────────────────────────────► │
/// │     • JSON file from LOMI_CATALOG, or the embedded demo menu            │
/// │                                                                         │
/// │  4. Initialize State Objects ─────────────────────────────────────────► │
/// │     • SessionState: empty cart priced from the configuration            │
/// │     • SalesLog: empty                                                   │
/// │                                                                         │
/// │  5. Command Loop ─────────────────────────────────────────────────────► │
/// │     • Each line parsed by clap, verb first                              │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> Result<(), AppError> {
    init_tracing();

    let config = ConfigState::from_env();
    info!(store = %config.store_name, tax_bps = config.tax_rate.bps(), "Starting Lomi terminal");

    let catalog = load_catalog(&config)?;
    info!(products = catalog.len(), "Catalog loaded");

    let terminal = Terminal::new(config, catalog, auth::demo_directory());

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_loop(&terminal, stdin.lock(), stdout.lock())
}

/// Feeds `input` line by line to the terminal, writing replies to `output`.
pub fn run_loop(
    terminal: &Terminal,
    input: impl BufRead,
    mut output: impl Write,
) -> Result<(), AppError> {
    writeln!(
        output,
        "{}: type `help` for commands",
        terminal.config.store_name
    )?;

    for line in input.lines() {
        let line = line?;
        match terminal.handle_line(&line) {
            Ok(Reply::Text(text)) if text.is_empty() => {}
            Ok(Reply::Text(text)) => writeln!(output, "{}", text)?,
            Ok(Reply::Quit) => break,
            Err(e) => writeln!(output, "{}", e)?,
        }
        output.flush()?;
    }

    info!(orders = terminal.sales.report().order_count, "Terminal closed");
    Ok(())
}

/// Parses the embedded demo menu.
pub fn demo_catalog() -> Result<Catalog, AppError> {
    Ok(Catalog::from_json(DEMO_CATALOG)?)
}

/// Loads the catalog named by the configuration.
pub fn load_catalog(config: &ConfigState) -> Result<Catalog, AppError> {
    let Some(path) = &config.catalog_path else {
        return demo_catalog();
    };

    let json = std::fs::read_to_string(path).map_err(|source| AppError::CatalogRead {
        path: path.clone(),
        source,
    })?;
    let catalog = Catalog::from_json(&json)?;
    if catalog.is_empty() {
        warn!(path = %path.display(), "Catalog file has no products");
    }
    Ok(catalog)
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so they never mix with the operator's output.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=lomi=trace` - Show trace for lomi crates only
/// - Default: `info,lomi=debug`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lomi=debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
