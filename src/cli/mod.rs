//! CLI module for hexpatch
//!
//! Thin I/O wrapper around the record store:
//! - reads lines from a file or stdin and appends them
//! - applies `--address`/`--data` byte edits
//! - writes the edited image to stdout in its original layout

mod args;
mod commands;
mod errors;
mod io;

pub use args::{ByteList, Cli, Edit};
pub use commands::{apply_edits, ingest, run, run_with, verify, RunSummary};
pub use errors::{CliError, CliResult};
pub use io::{is_blank, read_lines, write_records};
