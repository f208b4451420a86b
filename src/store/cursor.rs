//! Address cursor
//!
//! The cursor is the 64-bit address at which the next record is expected
//! to land. Each appended record moves it according to its type:
//!
//! | Type                        | Effect                                  |
//! |-----------------------------|-----------------------------------------|
//! | 0x00 Data                   | advance by byte count                   |
//! | 0x02 Extended Segment Addr. | replace with payload << 4               |
//! | 0x04 Extended Linear Addr.  | replace with payload << 32              |
//! | anything else               | advance by byte count                   |
//!
//! Before dispatch the record's 16-bit address field replaces the low
//! 16 bits of the cursor (see [`rebase`]).
//!
//! Transitions are computed by pure functions so the store can validate
//! a record completely before mutating anything.

use crate::errors::{HexError, HexResult};
use crate::record::{Address, Record, RecordType};

const LOW_MASK: Address = 0xFFFF;

/// Replaces the low 16 bits of `cursor` with `field`.
///
/// High bits set by earlier extended-addressing records are kept.
pub fn rebase(cursor: Address, field: u16) -> Address {
    if cursor as u16 == field {
        return cursor;
    }
    (cursor & !LOW_MASK) | Address::from(field)
}

/// Result of applying one record to the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Cursor moves forward by the record's byte count
    Advance {
        /// Cursor before the record
        from: Address,
        /// Cursor after the record
        to: Address,
    },
    /// Extended segment address replaced the cursor
    Segment {
        /// New segment base
        to: Address,
    },
    /// Extended linear address replaced the cursor
    Linear {
        /// New linear base
        to: Address,
    },
    /// Advancing would wrap the 64-bit space
    Overflow {
        /// Cursor before the record
        at: Address,
        /// Byte count that did not fit
        byte_count: u8,
    },
}

impl Transition {
    /// The cursor after this transition, or None on overflow
    pub fn target(&self) -> Option<Address> {
        match *self {
            Transition::Advance { to, .. } => Some(to),
            Transition::Segment { to } | Transition::Linear { to } => Some(to),
            Transition::Overflow { .. } => None,
        }
    }

    /// Converts overflow into an error and anything else into the new cursor
    pub fn into_result(self) -> HexResult<Address> {
        match self {
            Transition::Overflow { at, byte_count } => Err(HexError::overflow(at, byte_count)),
            other => Ok(other.target().unwrap_or_default()),
        }
    }
}

/// Computes the transition for `record` applied at `cursor`.
///
/// `cursor` must already be rebased onto the record's address field.
pub fn transition(cursor: Address, record: &Record) -> Transition {
    match RecordType::from_u8(record.record_type) {
        Some(RecordType::ExtendedSegmentAddress) => Transition::Segment {
            to: record.payload_value() << 4,
        },
        Some(RecordType::ExtendedLinearAddress) => Transition::Linear {
            to: record.payload_value() << 32,
        },
        _ => match cursor.checked_add(Address::from(record.byte_count)) {
            Some(to) => Transition::Advance { from: cursor, to },
            None => Transition::Overflow {
                at: cursor,
                byte_count: record.byte_count,
            },
        },
    }
}

/// The store's running write address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddressCursor {
    current: Address,
}

impl AddressCursor {
    /// Cursor at address 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Current address
    pub fn current(&self) -> Address {
        self.current
    }

    /// Cursor rebased onto a record's address field, without committing
    pub fn rebased(&self, field: u16) -> Address {
        rebase(self.current, field)
    }

    /// Commit a new address
    pub fn set(&mut self, address: Address) {
        self.current = address;
    }

    /// Back to 0
    pub fn reset(&mut self) {
        self.current = 0;
    }
}
