//! Record checksum computation
//!
//! The checksum byte is the two's complement of the 8-bit sum of
//! byte count, both address bytes, record type and every payload byte,
//! so the sum of all record bytes including the checksum is 0 mod 256.
//!
//! Checksums are never checked on decode. Callers verify or repair them
//! explicitly.

use crate::errors::{HexError, HexResult};

use super::record::Record;

/// Sum of every field except the checksum, mod 256
fn field_sum(record: &Record) -> u8 {
    let [address_hi, address_lo] = record.address.to_be_bytes();
    record.data.iter().fold(
        record
            .byte_count
            .wrapping_add(address_hi)
            .wrapping_add(address_lo)
            .wrapping_add(record.record_type),
        |sum, &byte| sum.wrapping_add(byte),
    )
}

/// Computes the checksum a record should carry.
///
/// This function is deterministic and does not touch the record.
pub fn compute(record: &Record) -> u8 {
    field_sum(record).wrapping_neg()
}

/// Overwrites the record's checksum with the computed value and returns it.
pub fn repair(record: &mut Record) -> u8 {
    record.checksum = compute(record);
    record.checksum
}

/// True when the full byte sum, checksum included, is 0 mod 256
pub fn is_valid(record: &Record) -> bool {
    field_sum(record).wrapping_add(record.checksum) == 0
}

/// Verifies the stored checksum.
///
/// # Errors
///
/// `Checksum` when the stored value differs from [`compute`].
pub fn verify(record: &Record) -> HexResult<()> {
    let computed = compute(record);
    if computed != record.checksum {
        return Err(HexError::checksum(record.checksum, computed));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn sample() -> Record {
        // :10010000214601360121470136007EFE09D2190140
        Record::new(
            0x0100,
            0x00,
            vec![
                0x21, 0x46, 0x01, 0x36, 0x01, 0x21, 0x47, 0x01, 0x36, 0x00, 0x7E, 0xFE, 0x09,
                0xD2, 0x19, 0x01,
            ],
            0x40,
        )
    }

    #[test]
    fn test_compute_known_record() {
        assert_eq!(compute(&sample()), 0x40);
    }

    #[test]
    fn test_repair_zeroes_byte_sum() {
        let mut record = sample();
        record.data[3] = 0x99;
        let fixed = repair(&mut record);
        assert_eq!(fixed, record.checksum);

        let [hi, lo] = record.address.to_be_bytes();
        let header = [record.byte_count, hi, lo, record.record_type, record.checksum];
        let total: u32 = header
            .iter()
            .chain(&record.data)
            .map(|&b| u32::from(b))
            .sum();
        assert_eq!(total % 256, 0);
        assert!(is_valid(&record));
    }

    #[test]
    fn test_empty_payload() {
        let record = Record::new(0, 0x01, Vec::new(), 0);
        assert_eq!(compute(&record), 0xFF);
    }

    #[test]
    fn test_zero_sum_checksum_is_zero() {
        let record = Record::new(0, 0x00, vec![0x80, 0x80], 0);
        // 02 + 80 + 80 = 0x102 -> 0x02 -> checksum 0xFE
        assert_eq!(compute(&record), 0xFE);
        let record = Record::new(0, 0x00, vec![0xFE], 0).with_byte_count(2);
        assert_eq!(compute(&record), 0x00);
    }

    #[test]
    fn test_verify_detects_mismatch() {
        let mut record = sample();
        assert!(verify(&record).is_ok());

        record.checksum ^= 0x01;
        let err = verify(&record).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Checksum);
        assert!(!is_valid(&record));
    }
}
