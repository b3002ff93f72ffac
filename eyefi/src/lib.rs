//! # eyefi
//!
//! Rust implementation of the Eye-Fi card configuration protocol.
//!
//! ## Features
//!
//! - Type-safe request and response records
//! - Async/await API using Tokio
//! - Comprehensive error handling
//! - Card info, transfer mode, network management and log retrieval
//!
//! ## Quick Start
//!
//! ```no_run
//! use eyefi::{Card, TransferMode};
//!
//! #[tokio::main]
//! async fn main() -> eyefi::Result<()> {
//!     // Control directory of the mounted card
//!     let mut card = Card::open("/media/EYE-FI/EYEFI").await?;
//!
//!     println!("Transfer mode: {}", card.transfer_mode().await?);
//!     card.set_transfer_mode(TransferMode::Selective).await?;
//!
//!     let log = card.fetch_log().await?;
//!     println!("{}", String::from_utf8_lossy(&log));
//!
//!     Ok(())
//! }
//! ```

pub mod card;
pub mod error;
pub mod log;

// Re-exports
pub use card::Card;
pub use error::{Error, Result};

// Re-export types
pub use eyefi_core::{Command, InfoResponse, InfoSubcommand, Request};
pub use eyefi_transport::{FileTransport, RequestHandle, Transport};
pub use eyefi_types::{
    ConfiguredNetwork, Essid, MacAddress, NetTestState, NetType, ScannedNetwork, TransferMode,
};
