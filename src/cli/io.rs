//! Line I/O for the CLI
//!
//! Input is read line by line from a file or stdin. Lines are split on
//! raw bytes and converted lossily, so a non-UTF-8 byte never aborts the
//! read: after the checksum it is ignored, inside a field the line is
//! malformed. Output is the canonical text of every record, written to
//! stdout.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use crate::store::RecordStore;

use super::errors::{CliError, CliResult};

/// Numbered lines of `reader`, starting at 1, without `\n` or `\r\n`
pub fn read_lines<R: BufRead>(mut reader: R) -> impl Iterator<Item = (u64, io::Result<String>)> {
    let lines = std::iter::from_fn(move || {
        let mut buf = Vec::new();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                if buf.ends_with(b"\n") {
                    buf.pop();
                    if buf.ends_with(b"\r") {
                        buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    });
    (1u64..).zip(lines)
}

/// True for lines the ingestion loop skips
pub fn is_blank(line: &str) -> bool {
    line.is_empty() || line.starts_with('\n') || line.starts_with('\r')
}

/// Open an input file for buffered line reading
pub fn open_input(path: &Path) -> CliResult<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| CliError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Write every record of the store and flush
pub fn write_records<W: Write>(store: &RecordStore, writer: &mut W) -> CliResult<()> {
    store.write_to(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_lines_numbers_from_one() {
        let input = io::Cursor::new("a\n\nb\r\n");
        let lines: Vec<_> = read_lines(input)
            .map(|(n, l)| (n, l.unwrap()))
            .collect();
        assert_eq!(
            lines,
            vec![(1, "a".to_string()), (2, String::new()), (3, "b".to_string())]
        );
    }

    #[test]
    fn test_read_lines_keeps_invalid_utf8() {
        let input = io::Cursor::new(&b":00000001FF\xB5\r\nlast"[..]);
        let lines: Vec<_> = read_lines(input)
            .map(|(n, l)| (n, l.unwrap()))
            .collect();
        assert_eq!(
            lines,
            vec![
                (1, ":00000001FF\u{FFFD}".to_string()),
                (2, "last".to_string())
            ]
        );
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("\r"));
        assert!(!is_blank(":00000001FF"));
        assert!(!is_blank(" "));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = open_input(&dir.path().join("nope.hex")).unwrap_err();
        assert_eq!(err.code(), "HEXPATCH_CLI_OPEN_FAILED");
    }
}
