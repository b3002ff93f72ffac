pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid transfer mode: {0}")]
    InvalidTransferMode(u8),
    
    #[error("ESSID too long: {len} bytes (max: {max} bytes)")]
    EssidTooLong {
        len: usize,
        max: usize,
    },
}
