//! Error types for the record core
//!
//! Every core operation returns its own `HexResult`. Error kinds carry a
//! stable name used in diagnostics:
//!
//! - `Malformed` (line could not be decoded)
//! - `InvalidJumpSize` (resolved address beyond the configured bound)
//! - `InvalidDataSize` (payload length differs from the byte count)
//! - `Checksum` (explicit verification failed)
//! - `AddressNotFound` / `LowerAddressNotFound` / `UpperAddressNotFound`
//! - `Overflow` (64-bit address space exhausted)

use std::fmt;

use crate::record::Address;

/// Error kinds with stable diagnostic names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No error
    None,
    /// Line could not be processed
    Malformed,
    /// Resolved address exceeds the configured jump bound
    InvalidJumpSize,
    /// Payload length does not match the declared byte count
    InvalidDataSize,
    /// Stored checksum does not match the record contents
    Checksum,
    /// No data record covers the address
    AddressNotFound,
    /// No indexed base below the address
    LowerAddressNotFound,
    /// No indexed base above the address
    UpperAddressNotFound,
    /// 64-bit addressing overflowed
    Overflow,
    /// Anything else
    Unknown,
}

impl ErrorKind {
    /// All kinds, in declaration order
    pub const ALL: [ErrorKind; 10] = [
        ErrorKind::None,
        ErrorKind::Malformed,
        ErrorKind::InvalidJumpSize,
        ErrorKind::InvalidDataSize,
        ErrorKind::Checksum,
        ErrorKind::AddressNotFound,
        ErrorKind::LowerAddressNotFound,
        ErrorKind::UpperAddressNotFound,
        ErrorKind::Overflow,
        ErrorKind::Unknown,
    ];

    /// Returns the stable name of this kind
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::None => "None",
            ErrorKind::Malformed => "Malformed",
            ErrorKind::InvalidJumpSize => "InvalidJumpSize",
            ErrorKind::InvalidDataSize => "InvalidDataSize",
            ErrorKind::Checksum => "Checksum",
            ErrorKind::AddressNotFound => "AddressNotFound",
            ErrorKind::LowerAddressNotFound => "LowerAddressNotFound",
            ErrorKind::UpperAddressNotFound => "UpperAddressNotFound",
            ErrorKind::Overflow => "Overflow",
            ErrorKind::Unknown => "Unknown",
        }
    }

    /// Parses a stable name back into its kind.
    ///
    /// Unrecognized names map to `Unknown`.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == name)
            .unwrap_or(ErrorKind::Unknown)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Core error with kind, message and optional context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexError {
    kind: ErrorKind,
    message: String,
    details: Option<String>,
}

impl HexError {
    /// Create an error of the given kind
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Attach context details
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Line could not be decoded
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Malformed, reason)
    }

    /// Resolved address exceeds the jump bound
    pub fn invalid_jump_size(resolved: Address, limit: Address) -> Self {
        Self::new(
            ErrorKind::InvalidJumpSize,
            format!("address {:#X} exceeds maximum jump {:#X}", resolved, limit),
        )
    }

    /// Payload length differs from the declared byte count
    pub fn invalid_data_size(declared: u8, actual: usize) -> Self {
        Self::new(
            ErrorKind::InvalidDataSize,
            format!("byte count {} but payload holds {} bytes", declared, actual),
        )
    }

    /// Stored checksum differs from the computed one
    pub fn checksum(stored: u8, computed: u8) -> Self {
        Self::new(
            ErrorKind::Checksum,
            format!("stored {:02X}, computed {:02X}", stored, computed),
        )
    }

    /// No data record covers `address`
    pub fn address_not_found(address: Address) -> Self {
        Self::new(
            ErrorKind::AddressNotFound,
            format!("no data at address {:#X}", address),
        )
    }

    /// No indexed base below `address`
    pub fn lower_address_not_found(address: Address) -> Self {
        Self::new(
            ErrorKind::LowerAddressNotFound,
            format!("no indexed address below {:#X}", address),
        )
    }

    /// No indexed base above `address`
    pub fn upper_address_not_found(address: Address) -> Self {
        Self::new(
            ErrorKind::UpperAddressNotFound,
            format!("no indexed address above {:#X}", address),
        )
    }

    /// Cursor would wrap past the 64-bit range
    pub fn overflow(cursor: Address, byte_count: u8) -> Self {
        Self::new(
            ErrorKind::Overflow,
            format!("advancing {:#X} by {} wraps the address space", cursor, byte_count),
        )
    }

    /// Returns the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Boundary value a neighbor query reports when it finds nothing
    pub fn sentinel(&self) -> Option<Address> {
        match self.kind {
            ErrorKind::LowerAddressNotFound => Some(Address::MIN),
            ErrorKind::UpperAddressNotFound => Some(Address::MAX),
            _ => None,
        }
    }
}

impl fmt::Display for HexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for HexError {}

/// Result type for core operations
pub type HexResult<T> = Result<T, HexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_stable() {
        let names: Vec<_> = ErrorKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(
            names,
            vec![
                "None",
                "Malformed",
                "InvalidJumpSize",
                "InvalidDataSize",
                "Checksum",
                "AddressNotFound",
                "LowerAddressNotFound",
                "UpperAddressNotFound",
                "Overflow",
                "Unknown",
            ]
        );
    }

    #[test]
    fn test_from_name() {
        for kind in ErrorKind::ALL {
            assert_eq!(ErrorKind::from_name(kind.name()), kind);
        }
        assert_eq!(ErrorKind::from_name("NotAKind"), ErrorKind::Unknown);
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(HexError::lower_address_not_found(5).sentinel(), Some(0));
        assert_eq!(
            HexError::upper_address_not_found(5).sentinel(),
            Some(u64::MAX)
        );
        assert_eq!(HexError::address_not_found(5).sentinel(), None);
    }

    #[test]
    fn test_display_contains_kind_and_details() {
        let err = HexError::malformed("bad hex").with_details("line 7");
        let display = format!("{}", err);
        assert!(display.contains("[Malformed]"));
        assert!(display.contains("bad hex"));
        assert!(display.contains("line 7"));
    }
}
