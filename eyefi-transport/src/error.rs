//! Transport errors

use std::io;
use std::path::PathBuf;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No response after {waited:?}")]
    Timeout {
        waited: Duration,
    },
    
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    
    #[error("Not a card control directory: {}", .0.display())]
    NotADirectory(PathBuf),
    
    #[error("Request too large: {size} bytes (max: {max} bytes)")]
    RequestTooLarge {
        size: usize,
        max: usize,
    },
}

impl Error {
    /// Check if the card simply did not answer in time
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
