//! Type definitions for eyefi

pub mod card;
pub mod error;
pub mod network;

pub use card::{MacAddress, TransferMode};
pub use error::{Error, Result};
pub use network::{ConfiguredNetwork, Essid, NetTestState, NetType, ScannedNetwork};
