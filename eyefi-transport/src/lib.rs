//! Transport layer for the Eye-Fi protocol
//!
//! The card has no socket: requests are files written into its control
//! directory and responses are files it writes back.

pub mod error;
pub mod file;

pub use error::{Error, Result};
pub use file::{ControlFile, FileTransport};

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use eyefi_core::SequenceNumber;

/// Ticket for one outstanding request, redeemed with [`Transport::receive`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestHandle(SequenceNumber);

impl RequestHandle {
    pub fn new(sequence: SequenceNumber) -> Self {
        Self(sequence)
    }

    pub fn sequence(&self) -> SequenceNumber {
        self.0
    }
}

impl fmt::Display for RequestHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request {}", self.0)
    }
}

/// Transport trait for different ways of reaching the card
///
/// The protocol allows one outstanding request per card; implementations
/// serialize access if they are shared.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Write a request payload
    async fn send(&mut self, data: &[u8]) -> Result<RequestHandle>;
    
    /// Wait for the response to `handle`, failing with
    /// [`Error::Timeout`] once `timeout` has elapsed
    async fn receive(&mut self, handle: RequestHandle, timeout: Duration) -> Result<BytesMut>;
    
    /// Where the card is reached, for logging
    fn location(&self) -> String;
}
