//! High-level card interface

use std::path::PathBuf;
use std::time::Duration;

use bytes::BytesMut;
use tracing::{debug, trace, warn};

use eyefi_core::{
    constants::DEFAULT_TIMEOUT, pack_network_key, Command, ConfiguredNetworkList, InfoResponse,
    InfoSubcommand, LogChunk, NetworkRequest, PascalString, Request, ScannedNetworkList,
    VarBytes, EYEFI_BUF_SIZE,
};
use eyefi_transport::{FileTransport, Transport};
use eyefi_types::{Essid, MacAddress, NetTestState, TransferMode};

use crate::error::{Error, Result};

/// Eye-Fi card
///
/// High-level interface for configuring an Eye-Fi card. Every method is a
/// single request/response exchange; nothing is cached and nothing is
/// retried.
///
/// # Examples
///
/// ```no_run
/// use eyefi::Card;
///
/// #[tokio::main]
/// async fn main() -> eyefi::Result<()> {
///     let mut card = Card::open("/media/EYE-FI/EYEFI").await?;
///
///     println!("MAC: {}", card.mac_address().await?);
///     println!("Firmware: {}", card.firmware_info().await?);
///
///     for net in card.scan_networks().await?.networks {
///         println!("{}", net);
///     }
///     Ok(())
/// }
/// ```
pub struct Card {
    transport: Box<dyn Transport>,
    timeout: Duration,
}

impl Card {
    /// Create a card over any transport
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
        }
    }

    /// Open the card through its control directory on the mounted filesystem
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let transport = FileTransport::open(dir).await?;
        Ok(Self::new(transport))
    }

    /// Set how long to wait for each response
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Where the card is reached
    pub fn location(&self) -> String {
        self.transport.location()
    }

    /// Send one request and wait for its response
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The transport fails to write the request or read the response
    /// - The card does not answer within the timeout
    /// - The response is larger than a card buffer
    pub async fn exchange(&mut self, request: &Request) -> Result<BytesMut> {
        trace!("Sending: {:?}", request);

        let data = request.encode();
        let handle = self.transport.send(&data).await?;
        let response = self.transport.receive(handle, self.timeout).await?;

        if response.len() > EYEFI_BUF_SIZE {
            warn!("Oversized response to {}: {} bytes", request, response.len());
            return Err(eyefi_core::Error::SizeMismatch {
                record: "response",
                expected: EYEFI_BUF_SIZE,
                actual: response.len(),
            }
            .into());
        }

        trace!("Received {} bytes for {}", response.len(), request);

        Ok(response)
    }

    /// Query one card info sub-command
    ///
    /// The response is decoded into the record the sub-command is
    /// defined to return.
    pub async fn card_info(&mut self, subcommand: InfoSubcommand) -> Result<InfoResponse> {
        debug!("Getting card info {}...", subcommand);

        let response = self.exchange(&Request::CardInfo(subcommand)).await?;
        let info = subcommand.shape().decode(&response).inspect_err(|e| {
            warn!("Bad response to {}: {}", subcommand, e);
        })?;

        debug!("Card info {}: {:?}", subcommand, info);

        Ok(info)
    }

    /// Query a card info sub-command by raw tag
    ///
    /// Tags outside the known catalog are rejected before anything is sent.
    pub async fn card_info_raw(&mut self, tag: u8) -> Result<InfoResponse> {
        let subcommand = InfoSubcommand::try_from(tag)?;
        self.card_info(subcommand).await
    }

    /// Get the card's MAC address
    pub async fn mac_address(&mut self) -> Result<MacAddress> {
        let sub = InfoSubcommand::MacAddress;
        let record = self.card_info(sub).await?.into_mac_address(sub)?;
        Ok(record.mac)
    }

    /// Get the firmware description
    pub async fn firmware_info(&mut self) -> Result<String> {
        let sub = InfoSubcommand::FirmwareInfo;
        Ok(self.card_info(sub).await?.into_text(sub)?.to_string_lossy())
    }

    /// Get the upload key
    pub async fn card_key(&mut self) -> Result<PascalString> {
        let sub = InfoSubcommand::CardKey;
        Ok(self.card_info(sub).await?.into_text(sub)?)
    }

    /// Get the upload service URL
    pub async fn api_url(&mut self) -> Result<String> {
        let sub = InfoSubcommand::ApiUrl;
        Ok(self.card_info(sub).await?.into_text(sub)?.to_string_lossy())
    }

    /// Get the size of the card's log ring
    pub async fn log_length(&mut self) -> Result<u32> {
        let sub = InfoSubcommand::LogLength;
        Ok(self.card_info(sub).await?.into_log_length(sub)?.val)
    }

    /// Check whether the card's radio is enabled
    pub async fn wlan_enabled(&mut self) -> Result<bool> {
        Ok(self.setting(InfoSubcommand::WlanEnabled).await? != 0)
    }

    /// Turn the card's radio on or off
    pub async fn set_wlan_enabled(&mut self, enabled: bool) -> Result<()> {
        self.configure(InfoSubcommand::WlanEnabled, VarBytes::single(enabled as u8))
            .await
    }

    /// Get the transfer mode stored on the card
    pub async fn transfer_mode(&mut self) -> Result<TransferMode> {
        let raw = self.setting(InfoSubcommand::TransferMode).await?;
        Ok(TransferMode::try_from(raw)?)
    }

    /// Store a new transfer mode on the card
    pub async fn set_transfer_mode(&mut self, mode: TransferMode) -> Result<()> {
        debug!("Setting transfer mode to {}...", mode);
        self.configure(InfoSubcommand::TransferMode, VarBytes::single(mode.into()))
            .await
    }

    /// Scan for networks in range
    pub async fn scan_networks(&mut self) -> Result<ScannedNetworkList> {
        debug!("Scanning networks...");

        let response = self.exchange(&Request::NoArg(Command::ScanNetworks)).await?;
        let list = ScannedNetworkList::decode(&response)?;

        debug!("Scan found {} networks", list.len());
        Ok(list)
    }

    /// List networks stored on the card
    pub async fn configured_networks(&mut self) -> Result<ConfiguredNetworkList> {
        debug!("Getting configured networks...");

        let response = self
            .exchange(&Request::NoArg(Command::ConfiguredNetworks))
            .await?;
        let list = ConfiguredNetworkList::decode(&response)?;

        debug!("Card has {} configured networks", list.len());
        Ok(list)
    }

    /// Store a network and its key on the card
    ///
    /// `passphrase` is either a hex key (10 or 26 digits for WEP, 64 for
    /// a raw WPA key) or a WPA passphrase.
    pub async fn add_network(&mut self, essid: &str, passphrase: &str) -> Result<()> {
        let essid = Essid::try_from(essid)?;
        let key = pack_network_key(passphrase, &essid);

        debug!("Adding network '{}' ({} byte key)...", essid, key.len());
        self.network_action(NetworkRequest::add(essid, key)).await
    }

    /// Remove a stored network
    pub async fn remove_network(&mut self, essid: &str) -> Result<()> {
        let essid = Essid::try_from(essid)?;

        debug!("Removing network '{}'...", essid);
        self.network_action(NetworkRequest::remove(essid)).await
    }

    /// Start testing a network; follow progress with
    /// [`Card::network_test_state`]
    pub async fn test_network(&mut self, essid: &str, passphrase: &str) -> Result<()> {
        let essid = Essid::try_from(essid)?;
        let key = pack_network_key(passphrase, &essid);

        debug!("Testing network '{}'...", essid);
        self.network_action(NetworkRequest::test(essid, key)).await
    }

    /// Get the progress of the last network test
    pub async fn network_test_state(&mut self) -> Result<NetTestState> {
        let ack = self.noarg(Command::NetworkTestStatus).await?;
        let state = NetTestState::from(ack);

        debug!("Network test state: {}", state);
        Ok(state)
    }

    /// Reboot the card
    pub async fn reboot(&mut self) -> Result<()> {
        warn!("Rebooting card...");
        self.noarg(Command::Reboot).await?;
        Ok(())
    }

    /// Initialize the card's configuration interface
    pub async fn init(&mut self) -> Result<()> {
        debug!("Initializing card...");
        self.noarg(Command::Init).await?;
        Ok(())
    }

    /// Fetch one raw log chunk
    pub async fn fetch_log_chunk(&mut self, offset: u32) -> Result<LogChunk> {
        trace!("Fetching log chunk at {}...", offset);

        let response = self.exchange(&Request::FetchLog { offset }).await?;
        Ok(LogChunk::new(offset, response.freeze())?)
    }

    // Helper methods

    /// First value of a settable sub-command
    async fn setting(&mut self, sub: InfoSubcommand) -> Result<u8> {
        let values = self.card_info(sub).await?.into_bytes(sub)?;
        values
            .first()
            .ok_or_else(|| Error::InvalidResponse(format!("{} returned no value", sub)))
    }

    async fn configure(&mut self, subcommand: InfoSubcommand, value: VarBytes) -> Result<()> {
        if !subcommand.is_settable() {
            return Err(Error::NotSupported(format!("setting {}", subcommand)));
        }

        let request = Request::CardConfig { subcommand, value };
        let response = self.exchange(&request).await?;
        expect_ack(&request, &response)?;

        debug!("Set {}", subcommand);
        Ok(())
    }

    async fn network_action(&mut self, req: NetworkRequest) -> Result<()> {
        let request = Request::Network(req);
        let response = self.exchange(&request).await?;
        expect_ack(&request, &response)?;
        Ok(())
    }

    async fn noarg(&mut self, command: Command) -> Result<u8> {
        let request = Request::NoArg(command);
        let response = self.exchange(&request).await?;
        expect_ack(&request, &response)
    }
}

/// Acknowledgement byte at the front of a response
fn expect_ack(request: &Request, response: &[u8]) -> Result<u8> {
    match response.first() {
        Some(&ack) => {
            trace!("{} acknowledged with 0x{:02X}", request, ack);
            Ok(ack)
        }
        None => Err(eyefi_core::Error::SizeMismatch {
            record: "ack",
            expected: 1,
            actual: 0,
        }
        .into()),
    }
}
