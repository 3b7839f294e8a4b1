//! # Lomi Terminal Entry Point
//!
//! Counter terminal for Lomi POS: one command per line on stdin.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration from the environment
//! 3. Load the catalog (`LOMI_CATALOG` or the embedded demo menu)
//! 4. Create state objects (SessionState, SalesLog, ConfigState)
//! 5. Run the command loop until `quit` or end of input

use std::process::ExitCode;

fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    match lomi_terminal::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("lomi-terminal: {e}");
            ExitCode::FAILURE
        }
    }
}
