//! Error types for eyefi-core



/// Result type alias for eyefi operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Payload does not match the size of the record it should hold
    #[error("Size mismatch decoding {record}: expected {expected} bytes, got {actual} bytes")]
    SizeMismatch {
        record: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Network key length outside {5, 13, 32}
    #[error("Invalid network key length: {0} (expected 5, 13 or 32)")]
    InvalidKeyLength(u8),

    /// Card info sub-command outside the known catalog
    #[error("Unknown card info sub-command: 0x{0:02X}")]
    UnknownSubcommand(u8),

    /// Unknown command tag
    #[error("Unknown command tag: 0x{0:02X}")]
    UnknownCommand(u8),

    /// Pascal string length byte larger than its buffer
    #[error("Invalid string length: {length} (max: {max})")]
    InvalidStringLength {
        length: usize,
        max: usize,
    },

    /// More values than a count byte can describe
    #[error("Too many values: {count} (max: {max})")]
    TooManyValues {
        count: usize,
        max: usize,
    },

    /// Network list count larger than the list can hold
    #[error("Too many networks: {count} (max: {max})")]
    TooManyNetworks {
        count: u8,
        max: usize,
    },

    /// Log offsets in the first chunk do not fit the log buffer
    #[error("Invalid log header: start={log_start}, end={log_end}, capacity={capacity}")]
    InvalidLogHeader {
        log_start: u32,
        log_end: u32,
        capacity: u32,
    },

    /// Decoded response has a different shape than the caller asked for
    #[error("Unexpected response shape for {subcommand}: got {shape}")]
    UnexpectedShape {
        subcommand: crate::command::InfoSubcommand,
        shape: &'static str,
    },

    /// Domain value rejected
    #[error(transparent)]
    Types(#[from] eyefi_types::Error),
}

impl Error {
    /// Check if the error was caused by caller input rather than the card
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidKeyLength(_)
                | Self::UnknownSubcommand(_)
                | Self::TooManyValues { .. }
                | Self::Types(_)
        )
    }

    /// Check if the card answered with something that breaks the protocol
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            Self::SizeMismatch { .. }
                | Self::InvalidStringLength { .. }
                | Self::TooManyNetworks { .. }
                | Self::InvalidLogHeader { .. }
                | Self::UnexpectedShape { .. }
        )
    }
}
