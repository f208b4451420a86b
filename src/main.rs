//! hexpatch CLI entry point
//!
//! Parses arguments, delegates to the CLI module, prints errors to stderr
//! and exits non-zero on failure. All logic lives in `cli`.

use hexpatch::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
