//! Record store and address resolution
//!
//! The store keeps two views of the same records:
//!
//! - the ordered arena, which is the file layout and is what gets written
//!   back out;
//! - the address index, mapping each data record's resolved 64-bit base
//!   to its arena position.
//!
//! # Invariants
//!
//! - Append order is preserved; records are never reordered or merged
//! - Every data record has exactly one index entry, at its own base
//! - Non-data records are never indexed
//! - A failed append changes nothing (arena, index and cursor)

pub mod cursor;
#[allow(clippy::module_inception)]
mod store;

pub use cursor::{AddressCursor, Transition};
pub use store::{AppendOutcome, RecordStore};
