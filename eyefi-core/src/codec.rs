//! Packed wire records
//!
//! Every structure exchanged with the card is packed with no padding
//! between fields. Multi-byte integers are big-endian on the wire and are
//! converted to host order here, at the codec boundary, and nowhere else.

use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use bytes::{Buf, BufMut, BytesMut};

use crate::{
    constants::PASCAL_STRING_CAPACITY,
    error::{Error, Result},
};

/// Convert a big-endian wire value to host order
pub fn be32_to_host(wire: [u8; 4]) -> u32 {
    BigEndian::read_u32(&wire)
}

/// Convert a host value to big-endian wire order
pub fn host_to_be32(value: u32) -> [u8; 4] {
    let mut wire = [0u8; 4];
    BigEndian::write_u32(&mut wire, value);
    wire
}

/// Read a big-endian `u32` from the front of `buf`
pub(crate) fn get_be32(buf: &mut &[u8]) -> u32 {
    let mut wire = [0u8; 4];
    buf.copy_to_slice(&mut wire);
    be32_to_host(wire)
}

/// Append a `u32` to `buf` in big-endian order
pub(crate) fn put_be32(buf: &mut BytesMut, value: u32) {
    buf.put_slice(&host_to_be32(value));
}

/// Fail with [`Error::SizeMismatch`] when `buf` is shorter than `expected`
pub fn ensure_size(record: &'static str, buf: &[u8], expected: usize) -> Result<()> {
    if buf.len() < expected {
        return Err(Error::SizeMismatch {
            record,
            expected,
            actual: buf.len(),
        });
    }
    Ok(())
}

/// Fixed-layout record with a declared wire size
///
/// `decode` reads the first [`WireRecord::SIZE`] bytes and ignores
/// anything after them; response files are always a full card buffer.
pub trait WireRecord: Sized {
    /// Record name used in errors and logs
    const NAME: &'static str;

    /// Declared size on the wire
    const SIZE: usize;

    /// Append the packed record to `buf`
    fn encode_into(&self, buf: &mut BytesMut);

    /// Decode from the front of `buf`
    fn decode(buf: &[u8]) -> Result<Self>;

    /// Encode to a fresh buffer of exactly [`WireRecord::SIZE`] bytes
    fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(Self::SIZE);
        self.encode_into(&mut buf);
        debug_assert_eq!(buf.len(), Self::SIZE);
        buf
    }
}

/// Length-prefixed string with a fixed 32-byte body
///
/// ```text
/// ┌──────────┬──────────────────────────┐
/// │  length  │          value           │
/// │  1 byte  │  32 bytes (zero padded)  │
/// └──────────┴──────────────────────────┘
/// ```
///
/// Only the first `length` bytes of `value` carry content.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct PascalString {
    length: u8,
    value: [u8; PASCAL_STRING_CAPACITY],
}

impl PascalString {
    /// Create a pascal string holding `bytes`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStringLength`] if `bytes` is longer than 32.
    pub fn new(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > PASCAL_STRING_CAPACITY {
            return Err(Error::InvalidStringLength {
                length: bytes.len(),
                max: PASCAL_STRING_CAPACITY,
            });
        }
        let mut value = [0u8; PASCAL_STRING_CAPACITY];
        value[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            length: bytes.len() as u8,
            value,
        })
    }

    /// Meaningful content bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.value[..self.length as usize]
    }

    pub fn len(&self) -> usize {
        self.length as usize
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Content as text, replacing invalid UTF-8
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }
}

impl WireRecord for PascalString {
    const NAME: &'static str = "pascal_string";
    const SIZE: usize = 1 + PASCAL_STRING_CAPACITY;

    fn encode_into(&self, buf: &mut BytesMut) {
        buf.put_u8(self.length);
        buf.put_slice(&self.value);
    }

    fn decode(mut buf: &[u8]) -> Result<Self> {
        ensure_size(Self::NAME, buf, Self::SIZE)?;

        let length = buf.get_u8();
        if length as usize > PASCAL_STRING_CAPACITY {
            return Err(Error::InvalidStringLength {
                length: length as usize,
                max: PASCAL_STRING_CAPACITY,
            });
        }

        // Bytes past `length` are garbage on some firmware
        Self::new(&buf[..length as usize])
    }
}

impl fmt::Debug for PascalString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PascalString")
            .field("length", &self.length)
            .field("value", &self.to_string_lossy())
            .finish()
    }
}

impl fmt::Display for PascalString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}
