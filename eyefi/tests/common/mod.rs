//! In-process card firmware for integration tests.
//!
//! `FakeCard` decodes every request with the real codec, answers from its
//! state and records what it was asked. Clones share state, so a test can
//! hand one clone to `Card::new` and inspect the other.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::{BufMut, BytesMut};
use parking_lot::Mutex;

use eyefi_core::{
    Command, ConfiguredNetworkList, InfoSubcommand, LogHeader, LogLength, MacAddressRecord,
    PascalString, Request, ScannedNetworkList, SequenceNumber, VarBytes, WireRecord,
    EYEFI_BUF_SIZE,
};
use eyefi_transport::{Error, RequestHandle, Result, Transport};
use eyefi_types::{ConfiguredNetwork, MacAddress};

pub struct CardState {
    pub requests: Vec<Request>,
    pub mac: MacAddress,
    pub firmware: String,
    pub api_url: String,
    pub card_key: Vec<u8>,
    pub transfer_mode: u8,
    pub wlan_enabled: u8,
    pub test_state: u8,
    pub scanned: ScannedNetworkList,
    pub configured: ConfiguredNetworkList,
    pub log_capacity: u32,
    pub log_header: LogHeader,
    /// Log offsets that never get an answer, on top of those past the ring
    pub silent_log_offsets: Vec<u32>,
    /// Cut every response down to this many bytes
    pub truncate_to: Option<usize>,
    /// Never answer anything
    pub silent: bool,
    sequence: SequenceNumber,
    pending: HashMap<SequenceNumber, BytesMut>,
}

impl Default for CardState {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
            mac: MacAddress::new([0x00, 0x18, 0x56, 0x01, 0x02, 0x03]),
            firmware: "Eye-Fi Card 4.5139".into(),
            api_url: "http://api.eye.fi/api/soap/eyefilm/v1".into(),
            card_key: vec![0xAB; 16],
            transfer_mode: 0,
            wlan_enabled: 1,
            test_state: 0,
            scanned: ScannedNetworkList::default(),
            configured: ConfiguredNetworkList::default(),
            log_capacity: 32768,
            log_header: LogHeader {
                log_end: 0,
                log_start: 0,
            },
            silent_log_offsets: Vec::new(),
            truncate_to: None,
            silent: false,
            sequence: SequenceNumber::default(),
            pending: HashMap::new(),
        }
    }
}

#[derive(Clone, Default)]
pub struct FakeCard {
    state: Arc<Mutex<CardState>>,
}

impl FakeCard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> parking_lot::MutexGuard<'_, CardState> {
        self.state.lock()
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<Request> {
        self.state.lock().requests.clone()
    }

    /// Offsets of fetch-log requests, in the order received
    pub fn log_fetches(&self) -> Vec<u32> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                Request::FetchLog { offset } => Some(offset),
                _ => None,
            })
            .collect()
    }
}

/// Raw log chunk content: byte `i` of the chunk at `offset` is
/// `(offset + i) % 251`
pub fn log_byte(raw_position: usize) -> u8 {
    (raw_position % 251) as u8
}

fn log_chunk(offset: u32, header: LogHeader) -> BytesMut {
    let mut chunk: BytesMut = (0..EYEFI_BUF_SIZE)
        .map(|i| log_byte(offset as usize + i))
        .collect();
    if offset == 0 {
        chunk[..LogHeader::SIZE].copy_from_slice(&header.encode());
    }
    chunk
}

fn ack() -> BytesMut {
    BytesMut::from(&[0u8][..])
}

impl CardState {
    fn respond(&mut self, request: &Request) -> BytesMut {
        match request {
            Request::CardInfo(sub) => self.info(*sub),
            Request::CardConfig { subcommand, value } => {
                let value = value.first().unwrap_or(0);
                match subcommand {
                    InfoSubcommand::TransferMode => self.transfer_mode = value,
                    InfoSubcommand::WlanEnabled => self.wlan_enabled = value,
                    _ => {}
                }
                ack()
            }
            Request::NoArg(Command::ScanNetworks) => self.scanned.encode(),
            Request::NoArg(Command::ConfiguredNetworks) => self.configured.encode(),
            Request::NoArg(Command::NetworkTestStatus) => {
                BytesMut::from(&[self.test_state][..])
            }
            Request::NoArg(_) => ack(),
            Request::Network(req) => {
                match req.command {
                    Command::AddNetwork => self.configured.networks.push(ConfiguredNetwork {
                        essid: req.essid.clone(),
                    }),
                    Command::RemoveNetwork => {
                        self.configured.networks.retain(|n| n.essid != req.essid)
                    }
                    Command::TestNetwork => self.test_state = 5,
                    _ => {}
                }
                ack()
            }
            Request::FetchLog { offset } => log_chunk(*offset, self.log_header),
        }
    }

    fn info(&self, sub: InfoSubcommand) -> BytesMut {
        let text = |s: &[u8]| PascalString::new(s).unwrap().encode();
        let mut buf = BytesMut::new();
        match sub {
            InfoSubcommand::MacAddress => {
                return MacAddressRecord {
                    length: 6,
                    mac: self.mac,
                }
                .encode();
            }
            InfoSubcommand::FirmwareInfo => return text(self.firmware.as_bytes()),
            InfoSubcommand::ApiUrl => return text(self.api_url.as_bytes()),
            InfoSubcommand::CardKey => return text(&self.card_key),
            InfoSubcommand::LogLength => {
                return LogLength {
                    len: 4,
                    val: self.log_capacity,
                }
                .encode();
            }
            InfoSubcommand::TransferMode => {
                VarBytes::single(self.transfer_mode).encode_into(&mut buf)
            }
            InfoSubcommand::WlanEnabled => VarBytes::single(self.wlan_enabled).encode_into(&mut buf),
            InfoSubcommand::Unknown13 => {
                buf.put_u8(4);
                buf.put_slice(b"home");
            }
            _ => buf.put_u8(0),
        }
        buf
    }
}

#[async_trait]
impl Transport for FakeCard {
    async fn send(&mut self, data: &[u8]) -> Result<RequestHandle> {
        let mut state = self.state.lock();
        let request = Request::decode(data).expect("card received a malformed request");

        let mut response = match &request {
            Request::FetchLog { offset } if state.silent_log_offsets.contains(offset) => None,
            // No such chunk on the card
            Request::FetchLog { offset } if *offset >= state.log_capacity => None,
            _ if state.silent => None,
            _ => Some(state.respond(&request)),
        };

        // The card always answers with a full buffer
        if let Some(buf) = response.as_mut() {
            if buf.len() < EYEFI_BUF_SIZE {
                buf.resize(EYEFI_BUF_SIZE, 0);
            }
            if let Some(len) = state.truncate_to {
                buf.truncate(len);
            }
        }

        state.requests.push(request);
        state.sequence = state.sequence.next();
        let sequence = state.sequence;
        if let Some(buf) = response {
            state.pending.insert(sequence, buf);
        }

        Ok(RequestHandle::new(sequence))
    }

    async fn receive(&mut self, handle: RequestHandle, timeout: Duration) -> Result<BytesMut> {
        self.state
            .lock()
            .pending
            .remove(&handle.sequence())
            .ok_or(Error::Timeout { waited: timeout })
    }

    fn location(&self) -> String {
        "fake card".into()
    }
}
