//! High-level error types

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] eyefi_core::Error),
    
    #[error("Transport error: {0}")]
    Transport(#[from] eyefi_transport::Error),
    
    #[error("Type error: {0}")]
    Types(#[from] eyefi_types::Error),
    
    #[error("Log retrieval failed at offset {offset}: {source}")]
    IncompleteLog {
        offset: u32,
        #[source]
        source: Box<Error>,
    },
    
    #[error("Operation not supported: {0}")]
    NotSupported(String),
    
    #[error("Invalid response from card: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// Check if the card did not answer in time
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            Self::IncompleteLog { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
    
    /// Check if retrying the same call might succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Transport(eyefi_transport::Error::Timeout { .. })
            | Self::Transport(eyefi_transport::Error::Io(_)) => true,
            Self::IncompleteLog { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}
