//! File-drop transport for Eye-Fi cards
//!
//! The card firmware watches four files in its control directory:
//!
//! | file   | direction | content                     |
//! |--------|-----------|-----------------------------|
//! | `REQM` | to card   | request payload             |
//! | `REQC` | to card   | request sequence number     |
//! | `RSPM` | from card | response payload            |
//! | `RSPC` | from card | sequence number answered    |
//!
//! Every file is a full, zero-padded card buffer. A request is sent by
//! writing `REQM` and then bumping the number in `REQC`; the response is
//! ready once `RSPC` holds that same number.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use eyefi_core::{SequenceNumber, EYEFI_BUF_SIZE};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::time::{sleep, timeout};
use tracing::{debug, trace, warn};

use crate::{error::*, RequestHandle, Transport};

/// Files in the card's control directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFile {
    /// Request control (sequence number)
    Reqc,
    /// Request payload
    Reqm,
    /// Response control (sequence number)
    Rspc,
    /// Response payload
    Rspm,
}

impl ControlFile {
    pub fn name(self) -> &'static str {
        match self {
            Self::Reqc => "REQC",
            Self::Reqm => "REQM",
            Self::Rspc => "RSPC",
            Self::Rspm => "RSPM",
        }
    }
}

/// Transport over the card's control directory
///
/// Locating the mounted card is up to the caller; this only needs the
/// directory holding the control files.
pub struct FileTransport {
    dir: PathBuf,
    sequence: SequenceNumber,
    poll_interval: Duration,
    max_poll_interval: Duration,
}

impl FileTransport {
    /// Open the control directory and pick up the card's sequence number
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotADirectory`] if `dir` is missing or not a
    /// directory.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();

        match fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => {}
            _ => return Err(Error::NotADirectory(dir)),
        }

        let mut transport = Self {
            dir,
            sequence: SequenceNumber::default(),
            poll_interval: Duration::from_millis(10),
            max_poll_interval: Duration::from_millis(500),
        };

        // Continue from whatever the card answered last
        if let Some(sequence) = transport.read_response_sequence().await? {
            transport.sequence = sequence;
        }

        debug!(
            "Opened card control directory {} (sequence={})",
            transport.dir.display(),
            transport.sequence
        );

        Ok(transport)
    }

    /// Set the first delay between response polls
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the ceiling the poll delay backs off to
    pub fn with_max_poll_interval(mut self, interval: Duration) -> Self {
        self.max_poll_interval = interval;
        self
    }

    /// Sequence number of the last request sent
    pub fn sequence(&self) -> SequenceNumber {
        self.sequence
    }

    /// Path of a control file
    pub fn path(&self, file: ControlFile) -> PathBuf {
        self.dir.join(file.name())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `data` as a full zero-padded card buffer
    async fn write_buffer(&self, file: ControlFile, data: &[u8]) -> Result<()> {
        let mut buf = vec![0u8; EYEFI_BUF_SIZE];
        buf[..data.len()].copy_from_slice(data);

        let mut out = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path(file))
            .await?;
        out.write_all(&buf).await?;
        // The card reads the media, not our page cache
        out.sync_all().await?;

        Ok(())
    }

    /// Sequence number in `RSPC`, if the file exists and is complete
    async fn read_response_sequence(&self) -> Result<Option<SequenceNumber>> {
        match fs::read(self.path(ControlFile::Rspc)).await {
            Ok(buf) => Ok(SequenceNumber::decode(&buf).ok()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Poll `RSPC` with exponential backoff until it reports `sequence`
    async fn wait_for(&self, sequence: SequenceNumber) -> Result<()> {
        let mut delay = self.poll_interval;

        loop {
            let answered = self.read_response_sequence().await?;
            if answered == Some(sequence) {
                return Ok(());
            }

            trace!(
                "Waiting for {} (card at {:?}), next poll in {:?}",
                sequence,
                answered,
                delay
            );

            sleep(delay).await;
            delay = (delay * 2).min(self.max_poll_interval);
        }
    }
}

#[async_trait]
impl Transport for FileTransport {
    async fn send(&mut self, data: &[u8]) -> Result<RequestHandle> {
        if data.len() > EYEFI_BUF_SIZE {
            return Err(Error::RequestTooLarge {
                size: data.len(),
                max: EYEFI_BUF_SIZE,
            });
        }

        trace!("Sending {} bytes: {:02X?}", data.len(), &data[..data.len().min(32)]);

        self.write_buffer(ControlFile::Reqm, data).await?;

        let sequence = self.sequence.next();
        self.write_buffer(ControlFile::Reqc, &sequence.encode()).await?;
        self.sequence = sequence;

        Ok(RequestHandle::new(sequence))
    }

    async fn receive(&mut self, handle: RequestHandle, waited: Duration) -> Result<BytesMut> {
        timeout(waited, self.wait_for(handle.sequence()))
            .await
            .map_err(|_| {
                warn!("No response to {} after {:?}", handle, waited);
                Error::Timeout { waited }
            })??;

        let buf = fs::read(self.path(ControlFile::Rspm)).await.map_err(|e| {
            warn!("Read error: {}", e);
            Error::Io(e)
        })?;

        trace!(
            "Received {} bytes: {:02X?}",
            buf.len(),
            &buf[..buf.len().min(32)]
        );

        Ok(BytesMut::from(&buf[..]))
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }
}
