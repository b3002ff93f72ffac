//! Card log layout
//!
//! The card keeps its log in a ring buffer and hands it out in
//! [`EYEFI_BUF_SIZE`] chunks addressed by byte offset. The chunk at offset
//! 0 starts with two big-endian offsets, `log_end` and `log_start`, that
//! locate the log inside the ring.
//!
//! Offsets index the log stream, which is the ring's data region: every
//! raw byte after that 8-byte header. In a ring of `C` bytes the stream
//! holds `C - 8` bytes, so stream byte `p` is raw byte `8 + p % (C - 8)`.
//!
//! ```text
//! raw:    │ hdr │ chunk 0 data (16376) │ chunk 16384 (16384) │ ... │ C
//! stream:       0                    16376                 32760
//! ```
//!
//! When `log_start > log_end` the log has wrapped: the oldest bytes run
//! from `log_start` to `C`, the newest from 0 to `log_end`. Stream bytes
//! at `C - 8` and beyond fold back to the start of the data region; no
//! chunk at or past `C` is ever addressed.

use std::collections::BTreeMap;
use std::ops::Range;

use bytes::{Bytes, BytesMut, BufMut};

use crate::{
    codec::{ensure_size, get_be32, put_be32, WireRecord},
    constants::{log::LOG_HEADER_SIZE, EYEFI_BUF_SIZE},
    error::{Error, Result},
};

/// Offsets at the front of the chunk at offset 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogHeader {
    pub log_end: u32,
    pub log_start: u32,
}

impl LogHeader {
    /// Check if the log wrapped around the end of the ring
    pub fn is_wrapped(&self) -> bool {
        self.log_start > self.log_end
    }
}

impl WireRecord for LogHeader {
    const NAME: &'static str = "first_log_response";
    const SIZE: usize = LOG_HEADER_SIZE;

    fn encode_into(&self, buf: &mut BytesMut) {
        put_be32(buf, self.log_end);
        put_be32(buf, self.log_start);
    }

    fn decode(mut buf: &[u8]) -> Result<Self> {
        ensure_size(Self::NAME, buf, Self::SIZE)?;

        let log_end = get_be32(&mut buf);
        let log_start = get_be32(&mut buf);
        Ok(Self { log_end, log_start })
    }
}

/// One chunk of the log as returned by the card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogChunk {
    offset: u32,
    raw: Bytes,
}

impl LogChunk {
    pub const NAME: &'static str = "log_chunk";

    /// Wrap a fetch-log response
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeMismatch`] if `raw` is shorter than a full
    /// card buffer.
    pub fn new(offset: u32, raw: Bytes) -> Result<Self> {
        ensure_size(Self::NAME, &raw, EYEFI_BUF_SIZE)?;
        Ok(Self {
            offset,
            raw: raw.slice(..EYEFI_BUF_SIZE),
        })
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// All bytes, header included
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Log bytes carried by this chunk
    pub fn data(&self) -> &[u8] {
        if self.offset == 0 {
            &self.raw[LOG_HEADER_SIZE..]
        } else {
            &self.raw
        }
    }

    /// Header offsets; only meaningful for the chunk at offset 0
    pub fn header(&self) -> Result<LogHeader> {
        LogHeader::decode(&self.raw)
    }
}

/// Part of the log held by one chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPiece {
    /// Offset of the chunk to fetch
    pub chunk_offset: u32,

    /// Byte range inside the chunk's raw buffer
    pub range: Range<usize>,
}

/// Where the log lives in the ring and which chunks cover it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLayout {
    header: LogHeader,
    capacity: u32,
}

impl LogLayout {
    /// Largest ring whose chunk offsets still fit the fetch request
    pub const MAX_CAPACITY: u32 = u32::MAX - EYEFI_BUF_SIZE as u32;

    /// Place `header` in a ring of `capacity` bytes
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLogHeader`] if either offset falls outside
    /// the ring or the ring size is unusable.
    pub fn new(header: LogHeader, capacity: u32) -> Result<Self> {
        if capacity <= LOG_HEADER_SIZE as u32
            || capacity > Self::MAX_CAPACITY
            || header.log_start >= capacity
            || header.log_end >= capacity
        {
            return Err(Error::InvalidLogHeader {
                log_start: header.log_start,
                log_end: header.log_end,
                capacity,
            });
        }

        Ok(Self { header, capacity })
    }

    pub fn header(&self) -> LogHeader {
        self.header
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Log size in bytes: `(log_end - log_start) mod capacity`
    pub fn len(&self) -> usize {
        let LogHeader { log_start, log_end } = self.header;
        if log_start <= log_end {
            (log_end - log_start) as usize
        } else {
            (self.capacity - log_start + log_end) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stream ranges holding the log, oldest first
    pub fn spans(&self) -> Vec<Range<u32>> {
        let LogHeader { log_start, log_end } = self.header;
        let spans = if log_start <= log_end {
            vec![log_start..log_end]
        } else {
            vec![log_start..self.capacity, 0..log_end]
        };

        spans.into_iter().filter(|span| !span.is_empty()).collect()
    }

    /// Chunk slices that make up the log, in log order
    ///
    /// Every piece lies inside the ring: chunk offsets are below
    /// [`LogLayout::capacity`].
    pub fn pieces(&self) -> Vec<LogPiece> {
        let chunk = EYEFI_BUF_SIZE as u64;
        let header = LOG_HEADER_SIZE as u64;
        let data_len = self.capacity as u64 - header;
        let mut pieces = Vec::new();

        for span in self.spans() {
            let mut pos = span.start as u64;
            let end = span.end as u64;

            while pos < end {
                // Contiguous run inside the data region
                let folded = pos % data_len;
                let run = (end - pos).min(data_len - folded);
                let mut raw = header + folded;
                let raw_end = raw + run;

                while raw < raw_end {
                    let chunk_offset = raw / chunk * chunk;
                    let piece_end = raw_end.min(chunk_offset + chunk);
                    pieces.push(LogPiece {
                        // raw < capacity <= MAX_CAPACITY
                        chunk_offset: chunk_offset as u32,
                        range: (raw - chunk_offset) as usize..(piece_end - chunk_offset) as usize,
                    });
                    raw = piece_end;
                }

                pos += run;
            }
        }

        pieces
    }

    /// Distinct chunk offsets in the order the log first needs them
    pub fn chunk_offsets(&self) -> Vec<u32> {
        let mut offsets: Vec<u32> = Vec::new();
        for piece in self.pieces() {
            if !offsets.contains(&piece.chunk_offset) {
                offsets.push(piece.chunk_offset);
            }
        }
        offsets
    }

    /// Concatenate the log from fetched chunks
    ///
    /// Returns `None` if a chunk listed by [`LogLayout::chunk_offsets`] is
    /// missing from `chunks`.
    pub fn assemble(&self, chunks: &BTreeMap<u32, LogChunk>) -> Option<Bytes> {
        let mut log = BytesMut::with_capacity(self.len());
        for piece in self.pieces() {
            let chunk = chunks.get(&piece.chunk_offset)?;
            log.put_slice(&chunk.raw()[piece.range]);
        }

        debug_assert_eq!(log.len(), self.len());
        Some(log.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::log::FIRST_CHUNK_DATA;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn header(log_start: u32, log_end: u32) -> LogHeader {
        LogHeader { log_end, log_start }
    }

    /// Chunk whose raw byte `i` is `(offset + i) % 251`, header patched in
    fn chunk(offset: u32, header: Option<LogHeader>) -> LogChunk {
        let mut raw: Vec<u8> = (0..EYEFI_BUF_SIZE)
            .map(|i| ((offset as usize + i) % 251) as u8)
            .collect();
        if let Some(h) = header {
            raw[..8].copy_from_slice(&h.encode());
        }
        LogChunk::new(offset, Bytes::from(raw)).unwrap()
    }

    #[test]
    fn test_header_decode() {
        let raw = [0x00, 0x00, 0x3E, 0x80, 0x00, 0x00, 0x00, 0x64];
        let h = LogHeader::decode(&raw).unwrap();
        assert_eq!(h, header(100, 16000));
        assert!(!h.is_wrapped());
    }

    #[test]
    fn test_chunk_data_regions() {
        let first = chunk(0, Some(header(0, 0)));
        assert_eq!(first.data().len(), FIRST_CHUNK_DATA);

        let rest = chunk(16384, None);
        assert_eq!(rest.data().len(), EYEFI_BUF_SIZE);
    }

    #[test]
    fn test_short_chunk_rejected() {
        let result = LogChunk::new(0, Bytes::from(vec![0u8; EYEFI_BUF_SIZE - 1]));
        assert!(matches!(
            result,
            Err(Error::SizeMismatch { expected: 16384, actual: 16383, .. })
        ));
    }

    #[test]
    fn test_contiguous_layout() {
        let layout = LogLayout::new(header(100, 16000), 32768).unwrap();

        assert_eq!(layout.len(), 15900);
        assert_eq!(layout.chunk_offsets(), vec![0]);
        assert_eq!(
            layout.pieces(),
            vec![LogPiece {
                chunk_offset: 0,
                range: 108..16008
            }]
        );
    }

    #[test]
    fn test_wrapped_layout() {
        let layout = LogLayout::new(header(16000, 100), 32768).unwrap();

        assert_eq!(layout.len(), 16868);
        assert_eq!(layout.spans(), vec![16000..32768, 0..100]);
        // Two-chunk ring: nothing at 32768 exists
        assert_eq!(layout.chunk_offsets(), vec![0, 16384]);
        assert_eq!(
            layout.pieces(),
            vec![
                LogPiece { chunk_offset: 0, range: 16008..16384 },
                LogPiece { chunk_offset: 16384, range: 0..16384 },
                // Stream 32760..32768 folds back to the data start
                LogPiece { chunk_offset: 0, range: 8..16 },
                LogPiece { chunk_offset: 0, range: 8..108 },
            ]
        );
    }

    #[test]
    fn test_wrapped_assembly_order() {
        let h = header(16000, 100);
        let layout = LogLayout::new(h, 32768).unwrap();

        let mut chunks = BTreeMap::new();
        for offset in layout.chunk_offsets() {
            let c = chunk(offset, (offset == 0).then_some(h));
            chunks.insert(offset, c);
        }

        let log = layout.assemble(&chunks).unwrap();
        assert_eq!(log.len(), 16868);

        // Tail first: stream byte 16000 is raw byte 16008 of chunk 0
        assert_eq!(log[0], (16008 % 251) as u8);
        // Last byte of the ring, raw 32767, sits in chunk 16384
        assert_eq!(log[16759], (32767 % 251) as u8);
        // Head last: stream bytes 0..100 are chunk 0 raw 8..108
        let head = &log[log.len() - 100..];
        let expected: Vec<u8> = (8..108).map(|i| (i % 251) as u8).collect();
        assert_eq!(head, expected.as_slice());
    }

    #[test]
    fn test_contiguous_span_near_ring_end() {
        let layout = LogLayout::new(header(32700, 32767), 32768).unwrap();

        assert_eq!(layout.len(), 67);
        assert_eq!(
            layout.pieces(),
            vec![
                LogPiece { chunk_offset: 16384, range: 16324..16384 },
                LogPiece { chunk_offset: 0, range: 8..15 },
            ]
        );
    }

    #[test]
    fn test_assemble_missing_chunk() {
        let layout = LogLayout::new(header(16000, 100), 32768).unwrap();
        let mut chunks = BTreeMap::new();
        chunks.insert(0, chunk(0, None));
        assert!(layout.assemble(&chunks).is_none());
    }

    #[test]
    fn test_empty_log() {
        let layout = LogLayout::new(header(500, 500), 32768).unwrap();
        assert!(layout.is_empty());
        assert!(layout.pieces().is_empty());
        assert!(layout.chunk_offsets().is_empty());
    }

    #[test]
    fn test_wrap_to_zero_end() {
        let layout = LogLayout::new(header(30000, 0), 32768).unwrap();
        assert_eq!(layout.len(), 2768);
        assert_eq!(layout.spans(), vec![30000..32768]);
    }

    #[test]
    fn test_offsets_outside_ring() {
        assert!(matches!(
            LogLayout::new(header(0, 32768), 32768),
            Err(Error::InvalidLogHeader { .. })
        ));
        assert!(matches!(
            LogLayout::new(header(40000, 10), 32768),
            Err(Error::InvalidLogHeader { .. })
        ));
        assert!(LogLayout::new(header(0, 0), 0).is_err());
        assert!(LogLayout::new(header(0, 0), 8).is_err());
    }

    proptest! {
        #[test]
        fn prop_pieces_stay_inside_ring(
            chunks in 1u32..8,
            start_frac in 0.0f64..1.0,
            end_frac in 0.0f64..1.0,
        ) {
            let capacity = chunks * EYEFI_BUF_SIZE as u32;
            let log_start = (capacity as f64 * start_frac) as u32;
            let log_end = (capacity as f64 * end_frac) as u32;
            let layout = LogLayout::new(header(log_start, log_end), capacity).unwrap();

            let mut total = 0;
            for piece in layout.pieces() {
                prop_assert!(piece.chunk_offset < capacity);
                prop_assert!(piece.range.end <= EYEFI_BUF_SIZE);
                // Header bytes never leak into the log
                prop_assert!(piece.chunk_offset != 0 || piece.range.start >= LOG_HEADER_SIZE);
                total += piece.range.len();
            }
            prop_assert_eq!(total, layout.len());
        }
    }
}
