//! Protocol constants

/// Size of every request and response file exchanged with the card
pub const EYEFI_BUF_SIZE: usize = 16384;

/// Default time to wait for a response (seconds)
pub const DEFAULT_TIMEOUT: u64 = 5;

/// Capacity of a pascal string value
pub const PASCAL_STRING_CAPACITY: usize = 32;

/// Fixed width of an ESSID field
pub const ESSID_LEN: usize = 32;

/// Maximum number of entries in a network list
pub const MAX_NETWORKS: usize = 100;

/// Network key sizes
pub mod keys {
    /// WPA pre-shared key
    pub const WPA_KEY_BYTES: usize = 32;

    /// WEP-104 key
    pub const WEP_KEY_BYTES: usize = 13;

    /// WEP-40 key
    pub const WEP_40_KEY_BYTES: usize = 5;

    /// PBKDF2 rounds for the WPA passphrase transform
    pub const WPA_PBKDF2_ROUNDS: u32 = 4096;
}

/// Log retrieval layout
pub mod log {
    use super::EYEFI_BUF_SIZE;

    /// `log_end` + `log_start` at the front of the chunk at offset 0
    pub const LOG_HEADER_SIZE: usize = 8;

    /// Data bytes carried by the chunk at offset 0
    pub const FIRST_CHUNK_DATA: usize = EYEFI_BUF_SIZE - LOG_HEADER_SIZE;
}
