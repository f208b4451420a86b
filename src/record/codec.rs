//! Line codec: text line <-> `Record`
//!
//! Decoding strips any mix of leading spaces, tabs and `:` characters,
//! then consumes fixed-width hex fields in order:
//! byte count (2), address (4), record type (2), payload (2 per byte),
//! checksum (2). Anything after the checksum is ignored.
//!
//! Fields parse leniently: leading whitespace inside a field is skipped
//! and the value is the longest leading run of hex digits, so `" F"`
//! reads as `0x0F`. A field with no hex digit is malformed.
//!
//! Encoding always produces uppercase, fixed-width fields.

use std::io::{self, Write};

use crate::errors::{HexError, HexResult};

use super::record::{Record, START_CODE};

/// Byte count + address + record type, in characters
const HEADER_CHARS: usize = 2 + 4 + 2;

/// Minimum characters after the prefix (header + checksum)
const MIN_LINE_CHARS: usize = HEADER_CHARS + 2;

/// Parses one fixed-width field.
fn parse_field(field: &[u8]) -> Option<u32> {
    let digits = field
        .iter()
        .skip_while(|b| b.is_ascii_whitespace())
        .map_while(|&b| char::from(b).to_digit(16));

    let mut value = None;
    for digit in digits {
        value = Some(value.unwrap_or(0u32) << 4 | digit);
    }
    value
}

/// Reads the field at `[*pos, *pos + width)` and advances `pos`.
fn take_field(bytes: &[u8], pos: &mut usize, width: usize, name: &str) -> HexResult<u32> {
    let end = *pos + width;
    let field = bytes
        .get(*pos..end)
        .ok_or_else(|| HexError::malformed(format!("line truncated in {} field", name)))?;
    let value = parse_field(field).ok_or_else(|| {
        HexError::malformed(format!("{} field is not hexadecimal", name))
            .with_details(format!("'{}'", String::from_utf8_lossy(field)))
    })?;
    *pos = end;
    Ok(value)
}

/// Decodes one text line into a record.
///
/// The checksum is taken as written.
///
/// # Errors
///
/// `Malformed` when fewer than ten characters follow the prefix, any
/// field is not hexadecimal, or the line is too short for the declared
/// payload and checksum.
pub fn decode(line: &str) -> HexResult<Record> {
    let bytes = line.as_bytes();
    let start = bytes
        .iter()
        .position(|&b| b != b' ' && b != b'\t' && b != START_CODE as u8)
        .unwrap_or(bytes.len());
    let bytes = &bytes[start..];

    if bytes.len() < MIN_LINE_CHARS {
        return Err(HexError::malformed(format!(
            "expected at least {} characters, found {}",
            MIN_LINE_CHARS,
            bytes.len()
        )));
    }

    let mut pos = 0;
    let byte_count = take_field(bytes, &mut pos, 2, "byte count")? as u8;
    let address = take_field(bytes, &mut pos, 4, "address")? as u16;
    let record_type = take_field(bytes, &mut pos, 2, "record type")? as u8;

    let needed = 2 * (byte_count as usize + 1);
    if bytes.len() - pos < needed {
        return Err(HexError::malformed(format!(
            "byte count {} needs {} more characters, found {}",
            byte_count,
            needed,
            bytes.len() - pos
        )));
    }

    let mut data = Vec::with_capacity(byte_count as usize);
    for _ in 0..byte_count {
        data.push(take_field(bytes, &mut pos, 2, "data")? as u8);
    }

    let checksum = take_field(bytes, &mut pos, 2, "checksum")? as u8;

    Ok(Record {
        start_code: START_CODE,
        byte_count,
        address,
        record_type,
        data,
        checksum,
    })
}

/// Encodes a record as its canonical line, terminator included.
pub fn encode(record: &Record) -> String {
    let mut line = String::with_capacity(1 + MIN_LINE_CHARS + 2 * record.data.len() + 1);
    line.push_str(&record.to_string());
    line.push('\n');
    line
}

/// Writes the canonical line for a record to a writer
pub fn write_to<W: Write>(record: &Record, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{}", record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    const SAMPLE: &str = ":10010000214601360121470136007EFE09D2190140";

    #[test]
    fn test_decode_sample() {
        let record = decode(SAMPLE).unwrap();
        assert_eq!(record.start_code, ':');
        assert_eq!(record.byte_count, 0x10);
        assert_eq!(record.address, 0x0100);
        assert_eq!(record.record_type, 0x00);
        assert_eq!(record.data.len(), 16);
        assert_eq!(record.data[0], 0x21);
        assert_eq!(record.data[15], 0x01);
        assert_eq!(record.checksum, 0x40);
    }

    #[test]
    fn test_round_trip_normalizes_case_and_prefix() {
        let messy = " \t::10010000214601360121470136007efe09d2190140";
        assert_eq!(encode(&decode(messy).unwrap()), format!("{}\n", SAMPLE));
    }

    #[test]
    fn test_prefix_is_optional() {
        let record = decode("00000001FF").unwrap();
        assert_eq!(record.record_type, 0x01);
        assert_eq!(record.checksum, 0xFF);
    }

    #[test]
    fn test_trailing_characters_ignored() {
        let record = decode(":00000001FF\r").unwrap();
        assert_eq!(encode(&record), ":00000001FF\n");

        let record = decode(":00000001FFjunk").unwrap();
        assert_eq!(record.checksum, 0xFF);
    }

    #[test]
    fn test_field_with_leading_space() {
        let record = decode(":02000004FFFF FC").unwrap();
        assert_eq!(record.record_type, 0x04);
        assert_eq!(record.data, vec![0xFF, 0xFF]);
        assert_eq!(record.checksum, 0x0F);
    }

    #[test]
    fn test_too_short() {
        for line in ["", ":", "   ", ":0000000", ":00000001F"] {
            let err = decode(line).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Malformed, "line {:?}", line);
        }
    }

    #[test]
    fn test_non_hex_header() {
        for line in [":G0000001FF", ":00Z00001FF", ":000000X1FF"] {
            assert_eq!(decode(line).unwrap_err().kind(), ErrorKind::Malformed);
        }
    }

    #[test]
    fn test_non_hex_payload_byte() {
        let err = decode(":0200000012ZZ00").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn test_non_hex_checksum() {
        let err = decode(":00000001QQ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn test_declared_count_exceeds_line() {
        // Declares 4 bytes, carries 2 plus checksum
        let err = decode(":040000000102FF").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn test_non_ascii_is_malformed() {
        let err = decode(":00000001é").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn test_write_to() {
        let record = decode(SAMPLE).unwrap();
        let mut out = Vec::new();
        write_to(&record, &mut out).unwrap();
        assert_eq!(out, format!("{}\n", SAMPLE).into_bytes());
    }
}
