//! Request sequence numbers
//!
//! Each request is announced by writing a sequence number to the
//! request-control file; the card copies the same number into the
//! response-control file once the matching response is ready.
//!
//! The number is a plain `u32` in the card's byte order (little-endian),
//! unlike the big-endian fields inside requests.

use std::fmt;

use byteorder::{ByteOrder, LittleEndian};

use crate::{
    codec::ensure_size,
    error::Result,
};

/// Sequence number carried by the control files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SequenceNumber(pub u32);

impl SequenceNumber {
    /// Encoded size
    pub const SIZE: usize = 4;

    /// Following sequence number, wrapping at `u32::MAX`
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn encode(self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        LittleEndian::write_u32(&mut buf, self.0);
        buf
    }

    pub fn decode(buf: &[u8]) -> Result<Self> {
        ensure_size("card_seq_num", buf, Self::SIZE)?;
        Ok(Self(LittleEndian::read_u32(buf)))
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_sequence_wraps() {
        assert_eq!(SequenceNumber(u32::MAX).next(), SequenceNumber(0));
        assert_eq!(SequenceNumber(7).next().value(), 8);
    }

    #[test]
    fn test_sequence_byte_order() {
        let seq = SequenceNumber(0x0102_0304);
        assert_eq!(seq.encode(), [0x04, 0x03, 0x02, 0x01]);
        assert_eq!(SequenceNumber::decode(&seq.encode()).unwrap(), seq);
    }

    #[test]
    fn test_sequence_too_short() {
        assert!(matches!(
            SequenceNumber::decode(&[1, 2]),
            Err(Error::SizeMismatch { .. })
        ));
    }
}
