//! Card log retrieval
//!
//! The log is read chunk by chunk. The chunk at offset 0 says where the
//! log starts and ends in the ring; [`LogLayout`] turns that into the list
//! of chunks to fetch and the order to stitch them in.

use std::collections::BTreeMap;

use bytes::Bytes;
use tracing::{debug, trace};

use eyefi_core::{LogChunk, LogLayout};

use crate::card::Card;
use crate::error::{Error, Result};

/// Position of the retrieval in progress
///
/// Lives only as long as one call to [`Card::fetch_log`]; every retrieval
/// starts again at offset 0.
#[derive(Debug, Default)]
struct LogCursor {
    offset: u32,
}

impl LogCursor {
    fn seek(&mut self, offset: u32) {
        self.offset = offset;
    }
}

impl Card {
    /// Read the whole card log, oldest entry first
    ///
    /// The ring size is taken from the card's log length.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::IncompleteLog`] naming the offset of the first
    /// chunk that could not be fetched; no partial log is returned.
    pub async fn fetch_log(&mut self) -> Result<Bytes> {
        let capacity = self.log_length().await?;
        self.fetch_log_with_capacity(capacity).await
    }

    /// Read the whole card log from a ring of `capacity` bytes
    pub async fn fetch_log_with_capacity(&mut self, capacity: u32) -> Result<Bytes> {
        let mut cursor = LogCursor::default();

        let first = self.fetch_at(&cursor).await?;
        let header = first.header()?;
        let layout = LogLayout::new(header, capacity)?;

        debug!(
            "Log: start={}, end={}, capacity={}, wrapped={}, {} bytes",
            header.log_start,
            header.log_end,
            capacity,
            header.is_wrapped(),
            layout.len()
        );

        let mut chunks = BTreeMap::new();
        chunks.insert(first.offset(), first);

        for offset in layout.chunk_offsets() {
            if chunks.contains_key(&offset) {
                continue;
            }
            cursor.seek(offset);
            let chunk = self.fetch_at(&cursor).await?;
            chunks.insert(offset, chunk);
        }

        let log = layout.assemble(&chunks).ok_or_else(|| {
            Error::InvalidResponse("log chunk missing after fetch".into())
        })?;

        debug!("Fetched {} log bytes from {} chunks", log.len(), chunks.len());

        Ok(log)
    }

    async fn fetch_at(&mut self, cursor: &LogCursor) -> Result<LogChunk> {
        trace!("Log cursor at {}", cursor.offset);

        self.fetch_log_chunk(cursor.offset)
            .await
            .map_err(|e| Error::IncompleteLog {
                offset: cursor.offset,
                source: Box::new(e),
            })
    }
}
