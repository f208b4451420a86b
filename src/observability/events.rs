//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events in hexpatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration file loaded
    ConfigLoaded,

    // Ingestion
    /// Line ingestion started
    IngestStart,
    /// One record appended
    RecordAppended,
    /// All lines ingested
    IngestComplete,
    /// A line failed to append
    RecordRejected,

    // Editing
    /// A byte was overwritten
    OverwriteApplied,
    /// An edit address is not covered by any data record
    OverwriteFailed,

    // Verification and output
    /// A record's stored checksum does not verify
    ChecksumMismatch,
    /// Records written to the output stream
    OutputWritten,
}

impl Event {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::IngestStart => "INGEST_START",
            Event::RecordAppended => "RECORD_APPENDED",
            Event::IngestComplete => "INGEST_COMPLETE",
            Event::RecordRejected => "RECORD_REJECTED",
            Event::OverwriteApplied => "OVERWRITE_APPLIED",
            Event::OverwriteFailed => "OVERWRITE_FAILED",
            Event::ChecksumMismatch => "CHECKSUM_MISMATCH",
            Event::OutputWritten => "OUTPUT_WRITTEN",
        }
    }

    /// Returns true if this event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::RecordRejected | Event::OverwriteFailed | Event::ChecksumMismatch
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_events() {
        assert!(Event::RecordRejected.is_failure());
        assert!(Event::ChecksumMismatch.is_failure());
        assert!(!Event::IngestComplete.is_failure());
        assert!(!Event::OverwriteApplied.is_failure());
    }

    #[test]
    fn test_names_upper_snake() {
        for event in [Event::IngestStart, Event::OutputWritten, Event::ConfigLoaded] {
            let name = event.as_str();
            assert!(name.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }
}
