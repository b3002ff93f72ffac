//! Network credentials and network lists

use bytes::{Buf, BufMut, BytesMut};
use eyefi_types::{ConfiguredNetwork, Essid, NetType, ScannedNetwork};
use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use tracing::debug;

use crate::{
    codec::{ensure_size, WireRecord},
    command::Command,
    constants::{
        keys::{WEP_40_KEY_BYTES, WEP_KEY_BYTES, WPA_KEY_BYTES, WPA_PBKDF2_ROUNDS},
        ESSID_LEN, MAX_NETWORKS,
    },
    error::{Error, Result},
};

/// Key for joining a network
///
/// On the wire the key is a length byte followed by a 32-byte slot, the
/// size of the largest key. The length alone says which kind of key the
/// slot holds; WEP keys sit at the start of the slot and the rest is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkKey {
    /// WPA pre-shared key
    Wpa([u8; WPA_KEY_BYTES]),

    /// 40-bit WEP key
    Wep40([u8; WEP_40_KEY_BYTES]),

    /// 104-bit WEP key
    Wep104([u8; WEP_KEY_BYTES]),
}

impl NetworkKey {
    /// Length byte sent ahead of the key slot
    pub fn len(&self) -> u8 {
        self.as_bytes().len() as u8
    }

    /// Key bytes without slot padding
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Wpa(key) => key,
            Self::Wep40(key) => key,
            Self::Wep104(key) => key,
        }
    }

    pub fn is_wep(&self) -> bool {
        !matches!(self, Self::Wpa(_))
    }

    /// Write an absent key: zero length and an empty slot
    fn encode_none(buf: &mut BytesMut) {
        buf.put_u8(0);
        buf.put_bytes(0, WPA_KEY_BYTES);
    }
}

impl WireRecord for NetworkKey {
    const NAME: &'static str = "network_key";
    const SIZE: usize = 1 + WPA_KEY_BYTES;

    fn encode_into(&self, buf: &mut BytesMut) {
        let key = self.as_bytes();
        buf.put_u8(key.len() as u8);
        buf.put_slice(key);
        buf.put_bytes(0, WPA_KEY_BYTES - key.len());
    }

    fn decode(mut buf: &[u8]) -> Result<Self> {
        ensure_size(Self::NAME, buf, Self::SIZE)?;

        let len = buf.get_u8();
        match len as usize {
            WPA_KEY_BYTES => {
                let mut key = [0u8; WPA_KEY_BYTES];
                buf.copy_to_slice(&mut key);
                Ok(Self::Wpa(key))
            }
            WEP_KEY_BYTES => {
                let mut key = [0u8; WEP_KEY_BYTES];
                buf.copy_to_slice(&mut key);
                Ok(Self::Wep104(key))
            }
            WEP_40_KEY_BYTES => {
                let mut key = [0u8; WEP_40_KEY_BYTES];
                buf.copy_to_slice(&mut key);
                Ok(Self::Wep40(key))
            }
            _ => Err(Error::InvalidKeyLength(len)),
        }
    }
}

/// Turn a user-supplied passphrase into a network key
///
/// - 26 hex digits: raw WEP-104 key
/// - 10 hex digits: raw WEP-40 key
/// - 64 hex digits: raw WPA pre-shared key
/// - anything else: WPA passphrase, run through PBKDF2-HMAC-SHA1 with the
///   ESSID as salt and 4096 rounds (IEEE 802.11i)
///
/// # Examples
///
/// ```
/// use eyefi_core::network::{pack_network_key, NetworkKey};
/// use eyefi_types::Essid;
///
/// let essid = Essid::try_from("home").unwrap();
/// let key = pack_network_key("0123456789", &essid);
/// assert_eq!(key, NetworkKey::Wep40([0x01, 0x23, 0x45, 0x67, 0x89]));
/// ```
pub fn pack_network_key(passphrase: &str, essid: &Essid) -> NetworkKey {
    match passphrase.len() {
        len if len == WPA_KEY_BYTES * 2 => {
            let mut key = [0u8; WPA_KEY_BYTES];
            if hex::decode_to_slice(passphrase, &mut key).is_ok() {
                debug!("Interpreting passphrase as hex WPA key");
                return NetworkKey::Wpa(key);
            }
        }
        len if len == WEP_KEY_BYTES * 2 => {
            let mut key = [0u8; WEP_KEY_BYTES];
            if hex::decode_to_slice(passphrase, &mut key).is_ok() {
                debug!("Interpreting passphrase as hex WEP key");
                return NetworkKey::Wep104(key);
            }
        }
        len if len == WEP_40_KEY_BYTES * 2 => {
            let mut key = [0u8; WEP_40_KEY_BYTES];
            if hex::decode_to_slice(passphrase, &mut key).is_ok() {
                debug!("Interpreting passphrase as hex WEP-40 key");
                return NetworkKey::Wep40(key);
            }
        }
        _ => {}
    }

    debug!("Interpreting passphrase as ASCII WPA");
    NetworkKey::Wpa(derive_wpa_psk(passphrase.as_bytes(), essid))
}

/// WPA passphrase to pre-shared key
pub fn derive_wpa_psk(passphrase: &[u8], essid: &Essid) -> [u8; WPA_KEY_BYTES] {
    let mut psk = [0u8; WPA_KEY_BYTES];
    pbkdf2_hmac::<Sha1>(passphrase, essid.as_bytes(), WPA_PBKDF2_ROUNDS, &mut psk);
    psk
}

fn put_essid(buf: &mut BytesMut, essid: &Essid) {
    buf.put_slice(essid.as_bytes());
    buf.put_bytes(0, ESSID_LEN - essid.len());
}

fn get_essid_field(buf: &mut &[u8]) -> [u8; ESSID_LEN] {
    let mut field = [0u8; ESSID_LEN];
    buf.copy_to_slice(&mut field);
    field
}

/// Add, remove or test a network
///
/// ```text
/// ┌─────┬───────────┬────────────┬─────────┬──────────────┐
/// │ tag │ essid_len │   essid    │ key_len │   key slot   │
/// │  1  │     1     │  32 bytes  │    1    │   32 bytes   │
/// └─────┴───────────┴────────────┴─────────┴──────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRequest {
    pub command: Command,
    pub essid: Essid,
    pub key: Option<NetworkKey>,
}

impl NetworkRequest {
    pub fn add(essid: Essid, key: NetworkKey) -> Self {
        Self {
            command: Command::AddNetwork,
            essid,
            key: Some(key),
        }
    }

    pub fn remove(essid: Essid) -> Self {
        Self {
            command: Command::RemoveNetwork,
            essid,
            key: None,
        }
    }

    pub fn test(essid: Essid, key: NetworkKey) -> Self {
        Self {
            command: Command::TestNetwork,
            essid,
            key: Some(key),
        }
    }
}

impl WireRecord for NetworkRequest {
    const NAME: &'static str = "net_request";
    const SIZE: usize = 1 + 1 + ESSID_LEN + NetworkKey::SIZE;

    fn encode_into(&self, buf: &mut BytesMut) {
        buf.put_u8(self.command.into());
        buf.put_u8(self.essid.len() as u8);
        put_essid(buf, &self.essid);
        match &self.key {
            Some(key) => key.encode_into(buf),
            None => NetworkKey::encode_none(buf),
        }
    }

    fn decode(mut buf: &[u8]) -> Result<Self> {
        ensure_size(Self::NAME, buf, Self::SIZE)?;

        let command = Command::try_from(buf.get_u8())?;
        let essid_len = buf.get_u8() as usize;
        if essid_len > ESSID_LEN {
            return Err(eyefi_types::Error::EssidTooLong {
                len: essid_len,
                max: ESSID_LEN,
            }
            .into());
        }
        let field = get_essid_field(&mut buf);
        let essid = Essid::new(&field[..essid_len])?;

        let key = match buf[0] {
            0 => None,
            _ => Some(NetworkKey::decode(buf)?),
        };

        Ok(Self {
            command,
            essid,
            key,
        })
    }
}

/// Networks visible to the card, in scan order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScannedNetworkList {
    pub networks: Vec<ScannedNetwork>,
}

impl ScannedNetworkList {
    pub const NAME: &'static str = "scanned_net_list";

    /// `essid` + `strength` + `type`
    pub const ENTRY_SIZE: usize = ESSID_LEN + 2;

    /// Count byte plus a full entry array
    pub const MAX_SIZE: usize = 1 + MAX_NETWORKS * Self::ENTRY_SIZE;

    pub fn decode(buf: &[u8]) -> Result<Self> {
        let count = decode_count(Self::NAME, buf, Self::ENTRY_SIZE)?;

        let mut entries = &buf[1..];
        let mut networks = Vec::with_capacity(count);
        for _ in 0..count {
            let field = get_essid_field(&mut entries);
            let strength = entries.get_i8();
            let net_type = NetType::from(entries.get_u8());
            networks.push(ScannedNetwork {
                essid: Essid::from_padded(&field),
                strength,
                net_type,
            });
        }

        Ok(Self { networks })
    }

    pub fn encode(&self) -> BytesMut {
        let count = self.networks.len().min(MAX_NETWORKS);
        let mut buf = BytesMut::with_capacity(1 + count * Self::ENTRY_SIZE);
        buf.put_u8(count as u8);
        for net in &self.networks[..count] {
            put_essid(&mut buf, &net.essid);
            buf.put_i8(net.strength);
            buf.put_u8(net.net_type.into());
        }
        buf
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

/// Networks stored on the card
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfiguredNetworkList {
    pub networks: Vec<ConfiguredNetwork>,
}

impl ConfiguredNetworkList {
    pub const NAME: &'static str = "configured_net_list";
    pub const ENTRY_SIZE: usize = ESSID_LEN;
    pub const MAX_SIZE: usize = 1 + MAX_NETWORKS * Self::ENTRY_SIZE;

    pub fn decode(buf: &[u8]) -> Result<Self> {
        let count = decode_count(Self::NAME, buf, Self::ENTRY_SIZE)?;

        let mut entries = &buf[1..];
        let networks = (0..count)
            .map(|_| ConfiguredNetwork {
                essid: Essid::from_padded(&get_essid_field(&mut entries)),
            })
            .collect();

        Ok(Self { networks })
    }

    pub fn encode(&self) -> BytesMut {
        let count = self.networks.len().min(MAX_NETWORKS);
        let mut buf = BytesMut::with_capacity(1 + count * Self::ENTRY_SIZE);
        buf.put_u8(count as u8);
        for net in &self.networks[..count] {
            put_essid(&mut buf, &net.essid);
        }
        buf
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

/// Read and validate the count byte of a network list
fn decode_count(record: &'static str, buf: &[u8], entry_size: usize) -> Result<usize> {
    ensure_size(record, buf, 1)?;

    let count = buf[0];
    if count as usize > MAX_NETWORKS {
        return Err(Error::TooManyNetworks {
            count,
            max: MAX_NETWORKS,
        });
    }

    let count = count as usize;
    ensure_size(record, buf, 1 + count * entry_size)?;
    Ok(count)
}
