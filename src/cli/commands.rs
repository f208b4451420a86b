//! CLI command implementation
//!
//! A run has four stages, each optional except ingestion:
//!
//! 1. Ingest lines from the file or stdin into a `RecordStore`
//! 2. Verify stored checksums (`--verify`)
//! 3. Apply byte edits (only when `--address` was given)
//! 4. Write the image to stdout (`--stdout`)
//!
//! The first failing line or edit aborts the run.

use std::io::{self, BufRead, Write};

use crate::config::EditorConfig;
use crate::observability::{log_event, log_event_with_fields, trace_event, Event, Logger};
use crate::store::RecordStore;

use super::args::{Cli, Edit};
use super::errors::{CliError, CliResult};
use super::io::{is_blank, open_input, read_lines, write_records};

/// Counters reported by a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records ingested
    pub records: usize,
    /// Bytes overwritten
    pub bytes_edited: usize,
    /// Records written to the output
    pub records_written: usize,
}

/// Parse process arguments and run against the real stdin/stdout
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_with(&cli, stdin.lock(), &mut stdout.lock())?;
    Ok(())
}

/// Run with explicit input and output streams
pub fn run_with<R: BufRead, W: Write>(
    cli: &Cli,
    stdin: R,
    stdout: &mut W,
) -> CliResult<RunSummary> {
    let config = resolve_config(cli)?;
    Logger::set_min_severity(config.min_severity()?);

    let mut store = RecordStore::with_config(config.store_config());
    let mut summary = RunSummary::default();

    if cli.stdin {
        summary.records = ingest(&mut store, stdin)?;
    } else if let Some(ref path) = cli.file {
        summary.records = ingest(&mut store, open_input(path)?)?;
    }

    if cli.verify {
        verify(&store)?;
    }

    if cli.address_set() {
        summary.bytes_edited = apply_edits(&mut store, &cli.edits, config.recompute_checksum)?;
    } else if !cli.edits.is_empty() {
        Logger::warn(
            "EDITS_IGNORED",
            &[("reason", "no --address given"), ("lists", &cli.edits.len().to_string())],
        );
    }

    if cli.stdout {
        write_records(&store, stdout)?;
        summary.records_written = store.len();
        log_event_with_fields(
            Event::OutputWritten,
            &[("records", &summary.records_written.to_string())],
        );
    }

    Ok(summary)
}

/// Config file values with command-line overrides applied
fn resolve_config(cli: &Cli) -> CliResult<EditorConfig> {
    let mut config = match cli.config {
        Some(ref path) => {
            let config = EditorConfig::load(path)?;
            log_event_with_fields(Event::ConfigLoaded, &[("path", &path.display().to_string())]);
            config
        }
        None => EditorConfig::default(),
    };

    if cli.max_jump.is_some() {
        config.max_jump = cli.max_jump;
    }
    if cli.no_checksum {
        config.recompute_checksum = false;
    }
    Ok(config)
}

/// Appends every non-blank line; returns the number of records appended.
///
/// # Errors
///
/// The first line that fails to append, with its line number.
pub fn ingest<R: BufRead>(store: &mut RecordStore, reader: R) -> CliResult<usize> {
    log_event(Event::IngestStart);

    let mut appended = 0;
    for (line_number, line) in read_lines(reader) {
        let line = line?;
        if is_blank(&line) {
            continue;
        }

        match store.append(&line) {
            Ok(outcome) => {
                appended += 1;
                trace_event(
                    Event::RecordAppended,
                    &[
                        ("line", &line_number.to_string()),
                        ("base", &format!("{:#X}", outcome.base)),
                    ],
                );
            }
            Err(source) => {
                log_event_with_fields(
                    Event::RecordRejected,
                    &[
                        ("error", source.kind().name()),
                        ("line", &line_number.to_string()),
                    ],
                );
                return Err(CliError::Parse {
                    line_number,
                    line,
                    source,
                });
            }
        }
    }

    log_event_with_fields(
        Event::IngestComplete,
        &[
            ("records", &appended.to_string()),
            ("program_size", &store.program_size().to_string()),
            ("current_address", &format!("{:#X}", store.current_address())),
        ],
    );
    Ok(appended)
}

/// Fails if any stored checksum does not verify
pub fn verify(store: &RecordStore) -> CliResult<()> {
    let bad = store.verify_checksums();
    for &position in &bad {
        let record = &store.records()[position];
        log_event_with_fields(
            Event::ChecksumMismatch,
            &[
                ("record", &position.to_string()),
                ("line", &record.to_string()),
            ],
        );
    }
    if bad.is_empty() {
        Ok(())
    } else {
        Err(CliError::Checksum { count: bad.len() })
    }
}

/// Writes every edit; returns the number of bytes written.
///
/// # Errors
///
/// The first edit reaching an address no data record covers, reported at
/// the edit's start address. Bytes before the uncovered one stay written.
pub fn apply_edits(
    store: &mut RecordStore,
    edits: &[Edit],
    recompute_checksum: bool,
) -> CliResult<usize> {
    let mut written = 0;
    for edit in edits {
        match store.overwrite_bytes(edit.address, &edit.bytes, recompute_checksum) {
            Ok(count) => {
                trace_event(
                    Event::OverwriteApplied,
                    &[
                        ("address", &format!("{:#X}", edit.address)),
                        ("bytes", &count.to_string()),
                    ],
                );
                written += count;
            }
            Err(source) => {
                log_event_with_fields(
                    Event::OverwriteFailed,
                    &[
                        ("address", &format!("{:#X}", edit.address)),
                        ("error", source.message()),
                    ],
                );
                return Err(CliError::Overwrite {
                    address: edit.address,
                    source,
                });
            }
        }
    }
    if written > 0 {
        log_event_with_fields(Event::OverwriteApplied, &[("bytes", &written.to_string())]);
    }
    Ok(written)
}
