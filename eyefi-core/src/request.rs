//! Eye-Fi request encoding/decoding

use bytes::{Buf, BufMut, BytesMut};
use std::fmt;

use crate::{
    codec::{ensure_size, get_be32, put_be32, WireRecord},
    command::{Command, InfoSubcommand},
    error::{Error, Result},
    info::VarBytes,
    network::NetworkRequest,
};

/// Request written to the card
///
/// # Layouts
///
/// ```text
/// CardInfo    ┌─────┬────────────┐
///             │ 'o' │ subcommand │                       2 bytes
///             └─────┴────────────┘
/// CardConfig  ┌─────┬────────────┬─────┬──────────┐
///             │ 'O' │ subcommand │ len │ values.. │      3+ bytes
///             └─────┴────────────┴─────┴──────────┘
/// NoArg       ┌─────┐
///             │ tag │                                    1 byte
///             └─────┘
/// FetchLog    ┌─────┬──────────────────┐
///             │ 'm' │ offset (BE u32)  │                 5 bytes
///             └─────┴──────────────────┘
/// Network     see [`NetworkRequest`]                     67 bytes
/// ```
///
/// # Examples
///
/// ```
/// use eyefi_core::{InfoSubcommand, Request};
///
/// let request = Request::CardInfo(InfoSubcommand::MacAddress);
/// assert_eq!(&request.encode()[..], &[b'o', 1]);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub enum Request {
    CardInfo(InfoSubcommand),
    CardConfig {
        subcommand: InfoSubcommand,
        value: VarBytes,
    },
    NoArg(Command),
    Network(NetworkRequest),
    FetchLog {
        offset: u32,
    },
}

impl Request {
    /// Size of a fetch-log request
    pub const FETCH_LOG_SIZE: usize = 5;

    /// Command tag this request starts with
    pub fn command(&self) -> Command {
        match self {
            Self::CardInfo(_) => Command::CardInfo,
            Self::CardConfig { .. } => Command::CardConfig,
            Self::NoArg(command) => *command,
            Self::Network(req) => req.command,
            Self::FetchLog { .. } => Command::FetchLog,
        }
    }

    /// Encode request to bytes
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.size());

        match self {
            Self::CardInfo(subcommand) => {
                buf.put_u8(Command::CardInfo.into());
                buf.put_u8((*subcommand).into());
            }
            Self::CardConfig { subcommand, value } => {
                buf.put_u8(Command::CardConfig.into());
                buf.put_u8((*subcommand).into());
                value.encode_into(&mut buf);
            }
            Self::NoArg(command) => {
                buf.put_u8((*command).into());
            }
            Self::Network(req) => {
                req.encode_into(&mut buf);
            }
            Self::FetchLog { offset } => {
                buf.put_u8(Command::FetchLog.into());
                put_be32(&mut buf, *offset);
            }
        }

        buf
    }

    /// Decode a request from the front of `buf`
    ///
    /// Request files are zero padded, so trailing bytes are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Buffer is shorter than the request its tag announces
    /// - Tag or sub-command is unknown
    /// - Embedded network request is malformed
    pub fn decode(buf: &[u8]) -> Result<Self> {
        ensure_size("request", buf, 1)?;

        let command = Command::try_from(buf[0])?;
        let mut body = &buf[1..];

        match command {
            Command::CardInfo => {
                ensure_size("card_info_req", buf, 2)?;
                Ok(Self::CardInfo(InfoSubcommand::try_from(body.get_u8())?))
            }
            Command::CardConfig => {
                ensure_size("card_config_req", buf, 3)?;
                let subcommand = InfoSubcommand::try_from(body.get_u8())?;
                let value = VarBytes::decode(body)?;
                Ok(Self::CardConfig { subcommand, value })
            }
            Command::FetchLog => {
                ensure_size("fetch_log_cmd", buf, Self::FETCH_LOG_SIZE)?;
                Ok(Self::FetchLog {
                    offset: get_be32(&mut body),
                })
            }
            cmd if cmd.is_network_action() => Ok(Self::Network(NetworkRequest::decode(buf)?)),
            cmd if cmd.is_noarg() => Ok(Self::NoArg(cmd)),
            cmd => Err(Error::UnknownCommand(cmd.into())),
        }
    }

    /// Get encoded request size
    pub fn size(&self) -> usize {
        match self {
            Self::CardInfo(_) => 2,
            Self::CardConfig { value, .. } => 2 + value.size(),
            Self::NoArg(_) => 1,
            Self::Network(_) => NetworkRequest::SIZE,
            Self::FetchLog { .. } => Self::FETCH_LOG_SIZE,
        }
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CardInfo(sub) => f.debug_tuple("CardInfo").field(sub).finish(),
            Self::CardConfig { subcommand, value } => f
                .debug_struct("CardConfig")
                .field("subcommand", subcommand)
                .field("value", &value.values())
                .finish(),
            Self::NoArg(command) => f.debug_tuple("NoArg").field(command).finish(),
            Self::Network(req) => f
                .debug_struct("Network")
                .field("command", &req.command)
                .field("essid", &req.essid.to_string())
                .field("key_len", &req.key.map(|k| k.len()).unwrap_or(0))
                .finish(),
            Self::FetchLog { offset } => f
                .debug_struct("FetchLog")
                .field("offset", &format!("0x{:08X}", offset))
                .finish(),
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CardInfo(sub) | Self::CardConfig { subcommand: sub, .. } => {
                write!(f, "Request[{}]({}, len={})", self.command(), sub, self.size())
            }
            Self::FetchLog { offset } => {
                write!(f, "Request[{}](offset={}, len={})", self.command(), offset, self.size())
            }
            _ => write!(f, "Request[{}](len={})", self.command(), self.size()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkKey;
    use eyefi_types::Essid;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_card_info_request() {
        let request = Request::CardInfo(InfoSubcommand::TransferMode);
        assert_eq!(&request.encode()[..], &[b'o', 17]);
        assert_eq!(request.command(), Command::CardInfo);
    }

    #[test]
    fn test_noarg_request() {
        let request = Request::NoArg(Command::Reboot);
        assert_eq!(&request.encode()[..], b"b");
        assert_eq!(request.size(), 1);
    }

    #[test]
    fn test_fetch_log_request() {
        let request = Request::FetchLog { offset: 16384 };
        assert_eq!(&request.encode()[..], &[b'm', 0x00, 0x00, 0x40, 0x00]);
    }

    #[test]
    fn test_card_config_request() {
        // Seen from a Nikon D90 turning the radio off
        let request = Request::CardConfig {
            subcommand: InfoSubcommand::WlanEnabled,
            value: VarBytes::single(0),
        };
        assert_eq!(&request.encode()[..], &[0x4F, 0x0A, 0x01, 0x00]);
    }

    #[test]
    fn test_decode_padded_request() {
        let mut file = BytesMut::zeroed(crate::constants::EYEFI_BUF_SIZE);
        file[..2].copy_from_slice(&[b'o', 7]);

        let decoded = Request::decode(&file).unwrap();
        assert_eq!(decoded, Request::CardInfo(InfoSubcommand::LogLength));
    }

    #[test]
    fn test_decode_network_request() {
        let req = NetworkRequest::test(
            Essid::try_from("cafe").unwrap(),
            NetworkKey::Wep104([7; 13]),
        );
        let request = Request::Network(req);
        assert_eq!(Request::decode(&request.encode()).unwrap(), request);
    }

    #[test]
    fn test_decode_unknown_subcommand() {
        let result = Request::decode(&[b'o', 8]);
        assert!(matches!(result, Err(Error::UnknownSubcommand(8))));
    }

    #[test]
    fn test_decode_truncated() {
        assert!(matches!(Request::decode(&[]), Err(Error::SizeMismatch { .. })));
        assert!(matches!(
            Request::decode(&[b'm', 0, 0]),
            Err(Error::SizeMismatch { expected: 5, actual: 3, .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_fetch_log_roundtrip(offset in any::<u32>()) {
            let request = Request::FetchLog { offset };
            let encoded = request.encode();
            prop_assert_eq!(encoded.len(), Request::FETCH_LOG_SIZE);
            prop_assert_eq!(Request::decode(&encoded).unwrap(), request);
        }
    }
}
