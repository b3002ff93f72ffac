//! Eye-Fi command catalog

use std::fmt;

use crate::error::{Error, Result};

/// Request command tags
///
/// Each request starts with a single ASCII tag byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    // Card information
    CardInfo = b'o',
    CardConfig = b'O',

    // Networks
    ScanNetworks = b'g',
    ConfiguredNetworks = b'l',
    AddNetwork = b'a',
    RemoveNetwork = b'd',
    TestNetwork = b't',
    NetworkTestStatus = b's',

    // Log
    FetchLog = b'm',

    // Card control
    Reboot = b'b',
    Init = b'i',
}

impl Command {
    /// Check if this command is sent as a bare tag byte
    pub fn is_noarg(self) -> bool {
        matches!(
            self,
            Self::ScanNetworks
                | Self::ConfiguredNetworks
                | Self::NetworkTestStatus
                | Self::Reboot
                | Self::Init
        )
    }

    /// Check if this command carries a network request
    pub fn is_network_action(self) -> bool {
        matches!(
            self,
            Self::AddNetwork | Self::RemoveNetwork | Self::TestNetwork
        )
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::CardInfo => "CARD_INFO",
            Self::CardConfig => "CARD_CONFIG",
            Self::ScanNetworks => "SCAN_NETS",
            Self::ConfiguredNetworks => "LIST_NETS",
            Self::AddNetwork => "ADD_NET",
            Self::RemoveNetwork => "DEL_NET",
            Self::TestNetwork => "TEST_NET",
            Self::NetworkTestStatus => "TEST_STATUS",
            Self::FetchLog => "FETCH_LOG",
            Self::Reboot => "REBOOT",
            Self::Init => "INIT",
        }
    }
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> u8 {
        cmd as u8
    }
}

impl TryFrom<u8> for Command {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            b'o' => Ok(Self::CardInfo),
            b'O' => Ok(Self::CardConfig),
            b'g' => Ok(Self::ScanNetworks),
            b'l' => Ok(Self::ConfiguredNetworks),
            b'a' => Ok(Self::AddNetwork),
            b'd' => Ok(Self::RemoveNetwork),
            b't' => Ok(Self::TestNetwork),
            b's' => Ok(Self::NetworkTestStatus),
            b'm' => Ok(Self::FetchLog),
            b'b' => Ok(Self::Reboot),
            b'i' => Ok(Self::Init),
            _ => Err(Error::UnknownCommand(value)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}('{}')", self.name(), *self as u8 as char)
    }
}

/// Sub-commands multiplexed over [`Command::CardInfo`]
///
/// The catalog is closed: tags outside it are rejected with
/// [`Error::UnknownSubcommand`] before anything is sent.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum InfoSubcommand {
    MacAddress = 1,
    FirmwareInfo = 2,
    CardKey = 3,
    ApiUrl = 4,
    /// Possibly a checksum
    Unknown5 = 5,
    /// Possibly a checksum
    Unknown6 = 6,
    LogLength = 7,
    WlanEnabled = 10,
    /// Looks like the ASCII SSID of the last or current network
    Unknown13 = 13,
    TransferMode = 17,
    /// Seen from Nikon cameras; looks like a count followed by 8-byte entries
    UnknownFf = 0xFF,
}

impl InfoSubcommand {
    /// Every sub-command in the catalog
    pub const ALL: [InfoSubcommand; 11] = [
        Self::MacAddress,
        Self::FirmwareInfo,
        Self::CardKey,
        Self::ApiUrl,
        Self::Unknown5,
        Self::Unknown6,
        Self::LogLength,
        Self::WlanEnabled,
        Self::Unknown13,
        Self::TransferMode,
        Self::UnknownFf,
    ];

    /// Check if the card accepts this sub-command with [`Command::CardConfig`]
    pub fn is_settable(self) -> bool {
        matches!(self, Self::WlanEnabled | Self::TransferMode)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::MacAddress => "MAC_ADDRESS",
            Self::FirmwareInfo => "FIRMWARE_INFO",
            Self::CardKey => "CARD_KEY",
            Self::ApiUrl => "API_URL",
            Self::Unknown5 => "UNKNOWN_5",
            Self::Unknown6 => "UNKNOWN_6",
            Self::LogLength => "LOG_LEN",
            Self::WlanEnabled => "WLAN_ENABLED",
            Self::Unknown13 => "UNKNOWN_13",
            Self::TransferMode => "TRANSFER_MODE",
            Self::UnknownFf => "UNKNOWN_ff",
        }
    }
}

impl From<InfoSubcommand> for u8 {
    fn from(sub: InfoSubcommand) -> u8 {
        sub as u8
    }
}

impl TryFrom<u8> for InfoSubcommand {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::MacAddress),
            2 => Ok(Self::FirmwareInfo),
            3 => Ok(Self::CardKey),
            4 => Ok(Self::ApiUrl),
            5 => Ok(Self::Unknown5),
            6 => Ok(Self::Unknown6),
            7 => Ok(Self::LogLength),
            10 => Ok(Self::WlanEnabled),
            13 => Ok(Self::Unknown13),
            17 => Ok(Self::TransferMode),
            0xFF => Ok(Self::UnknownFf),
            _ => Err(Error::UnknownSubcommand(value)),
        }
    }
}

impl fmt::Display for InfoSubcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), *self as u8)
    }
}
