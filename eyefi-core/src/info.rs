//! Card info responses
//!
//! The `o` command answers with a different record for each
//! [`InfoSubcommand`]. [`InfoSubcommand::shape`] is the single table
//! mapping a sub-command to the record it returns, and [`InfoShape`]
//! knows the minimum size and the decoder for each record.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use eyefi_types::MacAddress;

use crate::{
    codec::{ensure_size, get_be32, put_be32, PascalString, WireRecord},
    command::InfoSubcommand,
    error::{Error, Result},
};

/// `length` + 6 raw address bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddressRecord {
    pub length: u8,
    pub mac: MacAddress,
}

impl WireRecord for MacAddressRecord {
    const NAME: &'static str = "mac_address";
    const SIZE: usize = 1 + MacAddress::LEN;

    fn encode_into(&self, buf: &mut BytesMut) {
        buf.put_u8(self.length);
        buf.put_slice(&self.mac.octets());
    }

    fn decode(mut buf: &[u8]) -> Result<Self> {
        ensure_size(Self::NAME, buf, Self::SIZE)?;

        let length = buf.get_u8();
        let mut mac = [0u8; MacAddress::LEN];
        buf.copy_to_slice(&mut mac);

        Ok(Self {
            length,
            mac: MacAddress::new(mac),
        })
    }
}

/// Log buffer capacity: `len` + big-endian value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLength {
    pub len: u8,
    pub val: u32,
}

impl WireRecord for LogLength {
    const NAME: &'static str = "log_len";
    const SIZE: usize = 5;

    fn encode_into(&self, buf: &mut BytesMut) {
        buf.put_u8(self.len);
        put_be32(buf, self.val);
    }

    fn decode(mut buf: &[u8]) -> Result<Self> {
        ensure_size(Self::NAME, buf, Self::SIZE)?;

        let len = buf.get_u8();
        let val = get_be32(&mut buf);
        Ok(Self { len, val })
    }
}

/// Count byte followed by that many single-byte values
///
/// Used for the WLAN and transfer mode settings, both when reading them
/// and when writing them back with the config command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VarBytes {
    values: Vec<u8>,
}

impl VarBytes {
    pub const NAME: &'static str = "var_byte_response";

    /// Wrap values
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooManyValues`] if more than 255 values are given;
    /// the count byte cannot describe them.
    pub fn new(values: impl Into<Vec<u8>>) -> Result<Self> {
        let values = values.into();
        if values.len() > u8::MAX as usize {
            return Err(Error::TooManyValues {
                count: values.len(),
                max: u8::MAX as usize,
            });
        }
        Ok(Self { values })
    }

    /// A single value
    pub fn single(value: u8) -> Self {
        Self { values: vec![value] }
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn first(&self) -> Option<u8> {
        self.values.first().copied()
    }

    /// Encoded size
    pub fn size(&self) -> usize {
        1 + self.values.len()
    }

    pub fn encode_into(&self, buf: &mut BytesMut) {
        buf.put_u8(self.values.len() as u8);
        buf.put_slice(&self.values);
    }

    pub fn decode(mut buf: &[u8]) -> Result<Self> {
        ensure_size(Self::NAME, buf, 1)?;

        let len = buf.get_u8() as usize;
        ensure_size(Self::NAME, buf, len).map_err(|_| Error::SizeMismatch {
            record: Self::NAME,
            expected: 1 + len,
            actual: 1 + buf.len(),
        })?;

        Ok(Self {
            values: buf[..len].to_vec(),
        })
    }
}

/// Record returned for a sub-command
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum InfoShape {
    MacAddress,
    PascalString,
    LogLength,
    VarBytes,
    /// Undocumented layout; bytes are handed back untouched
    Raw,
}

impl InfoShape {
    /// Smallest response that can hold this record
    ///
    /// For [`InfoShape::VarBytes`] this is the count byte alone; the full
    /// size depends on the count and is checked while decoding.
    pub fn min_size(self) -> usize {
        match self {
            Self::MacAddress => MacAddressRecord::SIZE,
            Self::PascalString => PascalString::SIZE,
            Self::LogLength => LogLength::SIZE,
            Self::VarBytes => 1,
            Self::Raw => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::MacAddress => MacAddressRecord::NAME,
            Self::PascalString => PascalString::NAME,
            Self::LogLength => LogLength::NAME,
            Self::VarBytes => VarBytes::NAME,
            Self::Raw => "raw",
        }
    }

    /// Decode a response body into this shape
    pub fn decode(self, buf: &[u8]) -> Result<InfoResponse> {
        ensure_size(self.name(), buf, self.min_size())?;

        Ok(match self {
            Self::MacAddress => InfoResponse::MacAddress(MacAddressRecord::decode(buf)?),
            Self::PascalString => InfoResponse::Text(PascalString::decode(buf)?),
            Self::LogLength => InfoResponse::LogLength(LogLength::decode(buf)?),
            Self::VarBytes => InfoResponse::Bytes(VarBytes::decode(buf)?),
            Self::Raw => InfoResponse::Raw(Bytes::copy_from_slice(buf)),
        })
    }
}

impl InfoSubcommand {
    /// Record the card answers this sub-command with
    pub fn shape(self) -> InfoShape {
        match self {
            Self::MacAddress => InfoShape::MacAddress,
            Self::FirmwareInfo | Self::CardKey | Self::ApiUrl => InfoShape::PascalString,
            Self::LogLength => InfoShape::LogLength,
            Self::WlanEnabled | Self::TransferMode => InfoShape::VarBytes,
            Self::Unknown5 | Self::Unknown6 | Self::Unknown13 | Self::UnknownFf => {
                InfoShape::Raw
            }
        }
    }
}

/// Decoded card info response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoResponse {
    MacAddress(MacAddressRecord),
    Text(PascalString),
    LogLength(LogLength),
    Bytes(VarBytes),
    Raw(Bytes),
}

impl InfoResponse {
    /// Shape of the record held
    pub fn shape(&self) -> InfoShape {
        match self {
            Self::MacAddress(_) => InfoShape::MacAddress,
            Self::Text(_) => InfoShape::PascalString,
            Self::LogLength(_) => InfoShape::LogLength,
            Self::Bytes(_) => InfoShape::VarBytes,
            Self::Raw(_) => InfoShape::Raw,
        }
    }

    pub fn into_mac_address(self, sub: InfoSubcommand) -> Result<MacAddressRecord> {
        match self {
            Self::MacAddress(record) => Ok(record),
            other => Err(other.unexpected(sub)),
        }
    }

    pub fn into_text(self, sub: InfoSubcommand) -> Result<PascalString> {
        match self {
            Self::Text(s) => Ok(s),
            other => Err(other.unexpected(sub)),
        }
    }

    pub fn into_log_length(self, sub: InfoSubcommand) -> Result<LogLength> {
        match self {
            Self::LogLength(len) => Ok(len),
            other => Err(other.unexpected(sub)),
        }
    }

    pub fn into_bytes(self, sub: InfoSubcommand) -> Result<VarBytes> {
        match self {
            Self::Bytes(values) => Ok(values),
            other => Err(other.unexpected(sub)),
        }
    }

    fn unexpected(&self, subcommand: InfoSubcommand) -> Error {
        Error::UnexpectedShape {
            subcommand,
            shape: self.shape().name(),
        }
    }
}
