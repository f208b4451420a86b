//! CLI-specific error types
//!
//! Every CLI error aborts the run; `main` prints it and exits with 1.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::errors::HexError;
use crate::record::Address;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Input file could not be opened
    #[error("Error '{source}' while opening file: {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An input line failed to append
    #[error("Error '{}' while parsing line {line_number}: '{line}'", .source.kind())]
    Parse {
        line_number: u64,
        line: String,
        #[source]
        source: HexError,
    },

    /// An edit address is not covered by any data record
    #[error("Data address {address:x} could not be overwritten.")]
    Overwrite {
        address: Address,
        #[source]
        source: HexError,
    },

    /// `--verify` found records with wrong checksums
    #[error("{count} record(s) failed checksum verification")]
    Checksum { count: usize },

    /// Configuration file error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// I/O error (stdin/stdout)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Open { .. } => "HEXPATCH_CLI_OPEN_FAILED",
            CliError::Parse { .. } => "HEXPATCH_CLI_PARSE_FAILED",
            CliError::Overwrite { .. } => "HEXPATCH_CLI_OVERWRITE_FAILED",
            CliError::Checksum { .. } => "HEXPATCH_CLI_CHECKSUM_FAILED",
            CliError::Config(_) => "HEXPATCH_CLI_CONFIG_ERROR",
            CliError::Io(_) => "HEXPATCH_CLI_IO_ERROR",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
