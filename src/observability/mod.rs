//! Observability for hexpatch
//!
//! Structured JSON logging of typed events. Logging is read-only: it
//! never changes what the editor does, and failures to write a log line
//! are ignored.
//!
//! # Usage
//!
//! ```ignore
//! use hexpatch::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::IngestComplete, &[("records", "42")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log an event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log an event with fields.
///
/// Failure events are logged at WARN, everything else at INFO.
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_failure() {
        Severity::Warn
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}

/// Log an event at TRACE level
pub fn trace_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(Severity::Trace, event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // This just verifies no panic
        log_event(Event::IngestStart);
        log_event(Event::IngestComplete);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::RecordRejected, &[("line", "3")]);
        trace_event(Event::OverwriteApplied, &[("address", "0x100")]);
    }
}
