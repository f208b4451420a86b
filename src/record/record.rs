//! Intel HEX record types and structures
//!
//! Each line of an Intel HEX image decodes into one record:
//!
//! ```text
//! :  BB  AAAA  TT  DD..DD  CC
//! |  |   |     |   |       +-- checksum (two's complement of the byte sum)
//! |  |   |     |   +---------- payload, BB bytes
//! |  |   |     +-------------- record type
//! |  |   +-------------------- 16-bit address field
//! |  +------------------------ byte count
//! +--------------------------- start code
//! ```

use std::fmt;

/// Resolved 64-bit address
pub type Address = u64;

/// Start code every line begins with
pub const START_CODE: char = ':';

/// Named record types.
///
/// Records keep their raw type byte; this enum only names the codes the
/// format defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordType {
    /// Payload bytes at the current address
    Data = 0x00,
    /// End of file marker
    EndOfFile = 0x01,
    /// Segment base (payload << 4)
    ExtendedSegmentAddress = 0x02,
    /// CS:IP start address
    StartSegmentAddress = 0x03,
    /// Linear base (payload << 32 in this engine)
    ExtendedLinearAddress = 0x04,
    /// EIP start address
    StartLinearAddress = 0x05,
}

impl RecordType {
    /// Convert from u8, returns None for codes the format does not name
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(RecordType::Data),
            0x01 => Some(RecordType::EndOfFile),
            0x02 => Some(RecordType::ExtendedSegmentAddress),
            0x03 => Some(RecordType::StartSegmentAddress),
            0x04 => Some(RecordType::ExtendedLinearAddress),
            0x05 => Some(RecordType::StartLinearAddress),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// One decoded line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Always `:`
    pub start_code: char,
    /// Declared payload length
    pub byte_count: u8,
    /// 16-bit address field as written
    pub address: u16,
    /// Raw record type code
    pub record_type: u8,
    /// Payload bytes
    pub data: Vec<u8>,
    /// Checksum as written, not verified on decode
    pub checksum: u8,
}

impl Record {
    /// Create a record with the given fields.
    ///
    /// `byte_count` is taken from `data.len()` truncated to a byte; use
    /// [`Record::with_byte_count`] to declare a different count.
    pub fn new(address: u16, record_type: u8, data: Vec<u8>, checksum: u8) -> Self {
        Self {
            start_code: START_CODE,
            byte_count: data.len() as u8,
            address,
            record_type,
            data,
            checksum,
        }
    }

    /// Create a data record with a repaired checksum
    pub fn data(address: u16, data: Vec<u8>) -> Self {
        let mut record = Self::new(address, RecordType::Data.as_u8(), data, 0);
        crate::record::checksum::repair(&mut record);
        record
    }

    /// Create an end-of-file record (`:00000001FF`)
    pub fn end_of_file() -> Self {
        Self::new(0, RecordType::EndOfFile.as_u8(), Vec::new(), 0xFF)
    }

    /// Create an extended linear address record for the given upper word
    pub fn extended_linear(upper: u16) -> Self {
        let mut record = Self::new(
            0,
            RecordType::ExtendedLinearAddress.as_u8(),
            upper.to_be_bytes().to_vec(),
            0,
        );
        crate::record::checksum::repair(&mut record);
        record
    }

    /// Create an extended segment address record for the given segment
    pub fn extended_segment(segment: u16) -> Self {
        let mut record = Self::new(
            0,
            RecordType::ExtendedSegmentAddress.as_u8(),
            segment.to_be_bytes().to_vec(),
            0,
        );
        crate::record::checksum::repair(&mut record);
        record
    }

    /// Override the declared byte count
    pub fn with_byte_count(mut self, byte_count: u8) -> Self {
        self.byte_count = byte_count;
        self
    }

    /// Named type, if the code is one the format defines
    pub fn kind(&self) -> Option<RecordType> {
        RecordType::from_u8(self.record_type)
    }

    /// True for type 0x00
    pub fn is_data(&self) -> bool {
        self.record_type == RecordType::Data.as_u8()
    }

    /// True when the payload length matches the declared byte count
    pub fn is_consistent(&self) -> bool {
        self.data.len() == self.byte_count as usize
    }

    /// Payload read as a big-endian integer.
    ///
    /// Bits shifted past 64 are discarded.
    pub fn payload_value(&self) -> u64 {
        self.data
            .iter()
            .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:02X}{:04X}{:02X}",
            self.start_code, self.byte_count, self.address, self.record_type
        )?;
        for byte in &self.data {
            write!(f, "{:02X}", byte)?;
        }
        write!(f, "{:02X}", self.checksum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_codes() {
        for code in 0u8..=5 {
            let kind = RecordType::from_u8(code).unwrap();
            assert_eq!(kind.as_u8(), code);
        }
        assert_eq!(RecordType::from_u8(0x06), None);
        assert_eq!(RecordType::from_u8(0xFF), None);
    }

    #[test]
    fn test_payload_value_big_endian() {
        let record = Record::new(0, 0x04, vec![0x12, 0x34], 0);
        assert_eq!(record.payload_value(), 0x1234);
    }

    #[test]
    fn test_payload_value_discards_excess_bits() {
        let record = Record::new(0, 0x02, vec![0xAB; 9], 0);
        assert_eq!(record.payload_value(), 0xABAB_ABAB_ABAB_ABAB);
    }

    #[test]
    fn test_display_is_uppercase_fixed_width() {
        let record = Record::new(0x0A, 0x00, vec![0x0b, 0xc0], 0x1f);
        assert_eq!(record.to_string(), ":02000A000BC01F");
    }

    #[test]
    fn test_end_of_file() {
        assert_eq!(Record::end_of_file().to_string(), ":00000001FF");
    }

    #[test]
    fn test_extended_linear_checksum() {
        assert_eq!(Record::extended_linear(0x0800).to_string(), ":020000040800F2");
    }

    #[test]
    fn test_with_byte_count_marks_inconsistent() {
        let record = Record::new(0, 0, vec![1, 2, 3], 0).with_byte_count(4);
        assert!(!record.is_consistent());
    }
}
