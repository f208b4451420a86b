//! Record store
//!
//! Records live in an append-only arena whose order is the file layout.
//! Data records are additionally indexed by their resolved base address:
//! `BTreeMap<Address, Vec<usize>>` maps each base to the arena positions
//! of the data records that started there, ascending. Positions never
//! change because records are never removed individually.
//!
//! When several data records share a base, the most recently appended one
//! answers lookups and overwrites. The others stay in the layout.

use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::config::StoreConfig;
use crate::errors::{ErrorKind, HexError, HexResult};
use crate::record::{self, checksum, Address, Record};

use super::cursor::{self, AddressCursor, Transition};

/// What a successful append did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendOutcome {
    /// Arena position of the new record
    pub position: usize,
    /// Resolved address the record starts at
    pub base: Address,
    /// Cursor movement caused by the record
    pub transition: Transition,
}

/// Ordered records plus an address index over the data records.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    index: BTreeMap<Address, Vec<usize>>,
    cursor: AddressCursor,
    config: StoreConfig,
}

impl RecordStore {
    /// Empty store with no jump limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store with the given settings
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Store settings
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Decodes `line` and appends it.
    ///
    /// On error nothing changes: the arena, the index and the cursor are
    /// exactly as before the call.
    ///
    /// # Errors
    ///
    /// `Malformed`, `InvalidJumpSize`, `InvalidDataSize` or `Overflow`.
    pub fn append(&mut self, line: &str) -> HexResult<AppendOutcome> {
        let record = record::decode(line)?;
        self.append_record(record)
    }

    /// Appends an already decoded record.
    ///
    /// Every check runs before the first mutation, so a failed append
    /// leaves no trace.
    pub fn append_record(&mut self, record: Record) -> HexResult<AppendOutcome> {
        let base = self.cursor.rebased(record.address);

        if let Some(limit) = self.config.max_jump {
            if base > limit {
                return Err(HexError::invalid_jump_size(base, limit));
            }
        }

        if !record.is_consistent() {
            return Err(HexError::invalid_data_size(
                record.byte_count,
                record.data.len(),
            ));
        }

        let transition = cursor::transition(base, &record);
        let next = transition.into_result()?;

        // Commit
        let position = self.records.len();
        if record.is_data() {
            self.index.entry(base).or_default().push(position);
        }
        self.records.push(record);
        self.cursor.set(next);

        Ok(AppendOutcome {
            position,
            base,
            transition,
        })
    }

    /// Empties the store and resets the cursor to 0.
    ///
    /// Settings are kept.
    pub fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
        self.cursor.reset();
    }

    /// Address the next record is expected at
    pub fn current_address(&self) -> Address {
        self.cursor.current()
    }

    /// Number of records of every type
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no record has been appended
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of distinct indexed base addresses
    pub fn indexed_len(&self) -> usize {
        self.index.len()
    }

    /// Total payload bytes held by data records
    pub fn program_size(&self) -> u64 {
        self.records
            .iter()
            .filter(|r| r.is_data())
            .map(|r| r.data.len() as u64)
            .sum()
    }

    /// Records in layout order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterate records in layout order
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Indexed base addresses, ascending
    pub fn addresses(&self) -> impl Iterator<Item = Address> + '_ {
        self.index.keys().copied()
    }

    fn latest_at(&self, base: Address) -> Option<usize> {
        self.index.get(&base).and_then(|positions| positions.last().copied())
    }

    /// Greatest indexed base <= `address` and the arena position serving it
    fn floor(&self, address: Address) -> Option<(Address, usize)> {
        self.index
            .range(..=address)
            .next_back()
            .and_then(|(&base, positions)| positions.last().map(|&p| (base, p)))
    }

    /// Locates the data byte at `address`: (arena position, payload offset)
    fn locate(&self, address: Address) -> Option<(usize, usize)> {
        let (base, position) = self.floor(address)?;
        let offset = usize::try_from(address - base).ok()?;
        if offset < self.records[position].data.len() {
            Some((position, offset))
        } else {
            None
        }
    }

    /// True if a data record starts exactly at `address`
    pub fn contains(&self, address: Address) -> bool {
        self.index.contains_key(&address)
    }

    /// Data record starting exactly at `address`
    pub fn get(&self, address: Address) -> Option<&Record> {
        self.latest_at(address).map(|p| &self.records[p])
    }

    fn latest_mut(&mut self, address: Address) -> Option<&mut Record> {
        let position = self.latest_at(address)?;
        self.records.get_mut(position)
    }

    /// Like [`get`](Self::get) but reports `AddressNotFound`
    pub fn record_at(&self, address: Address) -> HexResult<&Record> {
        self.get(address)
            .ok_or_else(|| HexError::address_not_found(address))
    }

    /// Byte stored at `address`.
    ///
    /// # Errors
    ///
    /// `AddressNotFound` if no data record covers the address.
    pub fn value_at(&self, address: Address) -> HexResult<u8> {
        self.locate(address)
            .map(|(position, offset)| self.records[position].data[offset])
            .ok_or_else(|| HexError::address_not_found(address))
    }

    /// Largest indexed base strictly below `address`.
    ///
    /// # Errors
    ///
    /// `LowerAddressNotFound` (sentinel `Address::MIN`) when `address` is
    /// at or before the smallest indexed base, or the store is empty.
    pub fn lower_address(&self, address: Address) -> HexResult<Address> {
        self.index
            .range(..address)
            .next_back()
            .map(|(&base, _)| base)
            .ok_or_else(|| HexError::lower_address_not_found(address))
    }

    /// Smallest indexed base strictly above `address`.
    ///
    /// # Errors
    ///
    /// `UpperAddressNotFound` (sentinel `Address::MAX`) when none exists.
    pub fn upper_address(&self, address: Address) -> HexResult<Address> {
        use std::ops::Bound;

        self.index
            .range((Bound::Excluded(address), Bound::Unbounded))
            .next()
            .map(|(&base, _)| base)
            .ok_or_else(|| HexError::upper_address_not_found(address))
    }

    /// Overwrites the byte at `address` inside an existing data record.
    ///
    /// The record chosen is the one with the greatest base <= `address`;
    /// the address must fall inside its payload. With
    /// `recompute_checksum` the record's checksum is repaired afterwards.
    /// Never creates new coverage.
    ///
    /// # Errors
    ///
    /// `AddressNotFound` with no mutation when the address is uncovered.
    pub fn overwrite(
        &mut self,
        address: Address,
        byte: u8,
        recompute_checksum: bool,
    ) -> HexResult<()> {
        let (position, offset) = self
            .locate(address)
            .ok_or_else(|| HexError::address_not_found(address))?;

        let record = &mut self.records[position];
        record.data[offset] = byte;
        if recompute_checksum {
            checksum::repair(record);
        }
        Ok(())
    }

    /// Writes consecutive bytes starting at `address`.
    ///
    /// Stops at the first uncovered address; bytes before it stay written.
    /// Returns the number of bytes written.
    pub fn overwrite_bytes(
        &mut self,
        address: Address,
        bytes: &[u8],
        recompute_checksum: bool,
    ) -> HexResult<usize> {
        for (i, &byte) in bytes.iter().enumerate() {
            let target = address.checked_add(i as u64).ok_or_else(|| {
                HexError::new(ErrorKind::Overflow, "edit runs past the 64-bit address space")
            })?;
            self.overwrite(target, byte, recompute_checksum)?;
        }
        Ok(bytes.len())
    }

    /// Repairs the checksum of the data record starting at `address`
    pub fn repair_checksum(&mut self, address: Address) -> HexResult<u8> {
        let record = self
            .latest_mut(address)
            .ok_or_else(|| HexError::address_not_found(address))?;
        Ok(checksum::repair(record))
    }

    /// Arena positions of records whose stored checksum does not verify
    pub fn verify_checksums(&self) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| !checksum::is_valid(r))
            .map(|(position, _)| position)
            .collect()
    }

    /// Repairs every record's checksum; returns how many changed
    pub fn repair_checksums(&mut self) -> usize {
        self.records
            .iter_mut()
            .filter(|r| !checksum::is_valid(r))
            .map(checksum::repair)
            .count()
    }

    /// Canonical text of every record, in layout order
    pub fn encode(&self) -> String {
        self.records.iter().map(record::encode).collect()
    }

    /// Writes every record, in layout order
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for record in &self.records {
            record::write_to(record, writer)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
