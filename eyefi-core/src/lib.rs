//! # eyefi-core
//!
//! Core protocol implementation for Eye-Fi wireless memory cards.
//!
//! This crate provides the low-level protocol primitives:
//! - Packed record encoding/decoding (big-endian integers, pascal strings)
//! - Command and card info sub-command definitions
//! - Network key packing
//! - Log ring layout
//! - Protocol constants

pub mod codec;
pub mod command;
pub mod constants;
pub mod error;
pub mod info;
pub mod log;
pub mod network;
pub mod request;
pub mod sequence;

pub use codec::{be32_to_host, host_to_be32, PascalString, WireRecord};
pub use command::{Command, InfoSubcommand};
pub use error::{Error, Result};
pub use info::{InfoResponse, InfoShape, LogLength, MacAddressRecord, VarBytes};
pub use log::{LogChunk, LogHeader, LogLayout, LogPiece};
pub use network::{
    pack_network_key, ConfiguredNetworkList, NetworkKey, NetworkRequest, ScannedNetworkList,
};
pub use request::Request;
pub use sequence::SequenceNumber;

pub use constants::EYEFI_BUF_SIZE;
