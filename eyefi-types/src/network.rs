//! Wireless network descriptions

use std::fmt;

use crate::error::{Error, Result};

/// Network name, at most 32 bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Essid(Vec<u8>);

impl Essid {
    /// Maximum ESSID length in bytes
    pub const MAX_LEN: usize = 32;

    /// Create an ESSID from raw bytes
    ///
    /// # Errors
    ///
    /// Returns [`Error::EssidTooLong`] when `bytes` exceeds 32 bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.len() > Self::MAX_LEN {
            return Err(Error::EssidTooLong {
                len: bytes.len(),
                max: Self::MAX_LEN,
            });
        }
        Ok(Self(bytes))
    }

    /// Build an ESSID from a fixed, NUL-padded wire field
    ///
    /// The name ends at the first NUL byte.
    pub fn from_padded(field: &[u8; Self::MAX_LEN]) -> Self {
        let end = field.iter().position(|&b| b == 0).unwrap_or(Self::MAX_LEN);
        Self(field[..end].to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<&str> for Essid {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value.as_bytes())
    }
}

impl fmt::Display for Essid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&String::from_utf8_lossy(&self.0))
    }
}

/// Security type of a scanned network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetType {
    Unsecured,
    Wep,
    Wpa,
    Wpa2,
    /// Value the card reported that has no known meaning
    Unknown(u8),
}

impl NetType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Unsecured => "No security",
            Self::Wep => "WEP",
            Self::Wpa => "WPA",
            Self::Wpa2 => "WPA2",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl From<u8> for NetType {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Unsecured,
            1 => Self::Wep,
            2 => Self::Wpa,
            3 => Self::Wpa2,
            other => Self::Unknown(other),
        }
    }
}

impl From<NetType> for u8 {
    fn from(value: NetType) -> u8 {
        match value {
            NetType::Unsecured => 0,
            NetType::Wep => 1,
            NetType::Wpa => 2,
            NetType::Wpa2 => 3,
            NetType::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for NetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Progress of a network test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetTestState {
    NotScanning,
    Locating,
    VerifyingKey,
    WaitingForDhcp,
    TestingServer,
    Success,
    Unknown(u8),
}

impl NetTestState {
    /// Whether the card has finished testing successfully
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::NotScanning => "not scanning",
            Self::Locating => "locating network",
            Self::VerifyingKey => "verifying network key",
            Self::WaitingForDhcp => "waiting for DHCP",
            Self::TestingServer => "testing connectivity to Eye-Fi server",
            Self::Success => "success",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl From<u8> for NetTestState {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::NotScanning,
            1 => Self::Locating,
            2 => Self::VerifyingKey,
            3 => Self::WaitingForDhcp,
            4 => Self::TestingServer,
            5 => Self::Success,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for NetTestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Network seen by the card during a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedNetwork {
    pub essid: Essid,

    /// Signal strength as reported by the card
    pub strength: i8,

    pub net_type: NetType,
}

impl fmt::Display for ScannedNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' type({}): {} strength: {}",
            self.essid,
            u8::from(self.net_type),
            self.net_type,
            self.strength
        )
    }
}

/// Network stored in the card's configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredNetwork {
    pub essid: Essid,
}

impl fmt::Display for ConfiguredNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.essid)
    }
}
