//! Intel HEX records
//!
//! A record is one line of an image. This module owns the record type,
//! the line codec and the checksum engine. None of it performs I/O beyond
//! writing to a caller-supplied writer.

pub mod checksum;
mod codec;
#[allow(clippy::module_inception)]
mod record;

pub use codec::{decode, encode, write_to};
pub use record::{Address, Record, RecordType, START_CODE};
