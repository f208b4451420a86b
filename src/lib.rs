//! hexpatch - edit Intel HEX images without disturbing their layout
//!
//! Lines are decoded into records and kept in their original order, while
//! an address index over the data records supports point lookups and
//! byte overwrites with checksum repair. Writing the store back out
//! reproduces the original record layout.

pub mod cli;
pub mod config;
pub mod errors;
pub mod observability;
pub mod record;
pub mod store;

pub use errors::{ErrorKind, HexError, HexResult};
pub use record::{Address, Record, RecordType};
pub use store::RecordStore;
