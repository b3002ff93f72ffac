//! Card identity and configuration values

use std::fmt;

use crate::error::{Error, Result};

/// Card MAC address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddress(pub [u8; MacAddress::LEN]);

impl MacAddress {
    /// Number of address bytes
    pub const LEN: usize = 6;

    pub fn new(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    pub fn octets(&self) -> [u8; Self::LEN] {
        self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// How the card decides which photos to upload
///
/// Stored on the card and read/written through the `TransferMode`
/// info sub-command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TransferMode {
    /// Upload every new photo
    Auto = 0,

    /// Upload only photos selected on the camera
    Selective = 1,

    /// Upload and share only selected photos
    SelectiveShare = 2,
}

impl TransferMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Selective => "selective",
            Self::SelectiveShare => "selective share",
        }
    }
}

impl From<TransferMode> for u8 {
    fn from(mode: TransferMode) -> u8 {
        mode as u8
    }
}

impl TryFrom<u8> for TransferMode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Auto),
            1 => Ok(Self::Selective),
            2 => Ok(Self::SelectiveShare),
            _ => Err(Error::InvalidTransferMode(value)),
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mac_display() {
        let mac = MacAddress::new([0x00, 0x18, 0x56, 0xAA, 0xD5, 0x42]);
        assert_eq!(mac.to_string(), "00:18:56:aa:d5:42");
    }

    #[test]
    fn test_transfer_mode_conversion() {
        assert_eq!(u8::from(TransferMode::SelectiveShare), 2);
        assert_eq!(TransferMode::try_from(1).unwrap(), TransferMode::Selective);
    }

    #[test]
    fn test_invalid_transfer_mode() {
        let result = TransferMode::try_from(3);
        assert!(matches!(result, Err(Error::InvalidTransferMode(3))));
    }
}
