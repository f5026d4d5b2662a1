//! Shared record types for the wifi-survey pipeline.
//!
//! These value objects travel between the beacon decoder, the statistics
//! extractors, and the reporting layer. All "unavailable" states are
//! `Option::None` or a dedicated enum variant, never a numeric or string
//! sentinel, so downstream consumers can tell "absent" from "zero".

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// BssidId -- Value Object
// ---------------------------------------------------------------------------

/// A 6-byte IEEE 802.11 MAC address identifying an access point.
///
/// Two values are equal when their MAC bytes match. Displays (and
/// serializes) in the conventional `aa:bb:cc:dd:ee:ff` form.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct BssidId(pub [u8; 6]);

impl BssidId {
    /// Create a `BssidId` from a byte slice of exactly 6 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        let arr: [u8; 6] = bytes
            .try_into()
            .map_err(|_| CoreError::InvalidMac { len: bytes.len() })?;
        Ok(Self(arr))
    }

    /// Parse a colon-separated hex string such as `"aa:bb:cc:dd:ee:ff"`.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let mut bytes = [0u8; 6];
        let mut count = 0;
        for part in s.split(':') {
            if count == 6 {
                return Err(CoreError::MacParseFailed { input: s.to_owned() });
            }
            bytes[count] = u8::from_str_radix(part, 16)
                .map_err(|_| CoreError::MacParseFailed { input: s.to_owned() })?;
            count += 1;
        }
        if count != 6 {
            return Err(CoreError::MacParseFailed { input: s.to_owned() });
        }
        Ok(Self(bytes))
    }

    /// The raw MAC bytes.
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl fmt::Debug for BssidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BssidId({self})")
    }
}

impl fmt::Display for BssidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl std::str::FromStr for BssidId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl Serialize for BssidId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for BssidId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Amendment -- Value Object
// ---------------------------------------------------------------------------

/// The highest 802.11 amendment detected among a beacon's elements.
///
/// Ordered: `Unknown < N < Ac < Ax`, so the decoder can keep the maximum
/// as it walks the element set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Amendment {
    /// No recognizable operation/capability element (legacy or unresolved).
    #[cfg_attr(feature = "serde", serde(rename = "unknown"))]
    Unknown,
    /// 802.11n (Wi-Fi 4).
    #[cfg_attr(feature = "serde", serde(rename = "11n"))]
    N,
    /// 802.11ac (Wi-Fi 5).
    #[cfg_attr(feature = "serde", serde(rename = "11ac"))]
    Ac,
    /// 802.11ax (Wi-Fi 6 / 6E).
    #[cfg_attr(feature = "serde", serde(rename = "11ax"))]
    Ax,
}

impl fmt::Display for Amendment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::N => write!(f, "11n"),
            Self::Ac => write!(f, "11ac"),
            Self::Ax => write!(f, "11ax"),
        }
    }
}

// ---------------------------------------------------------------------------
// ConnectionState -- Value Object
// ---------------------------------------------------------------------------

/// Whether the scanning station was associated with the beacon's AP.
///
/// Scan snapshots taken outside a test window cannot attribute a
/// connection, hence the explicit third state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConnectionState {
    /// The station was associated with this AP during the scan.
    Connected,
    /// A neighboring AP the station was not associated with.
    NotConnected,
    /// The scan could not attribute a connection either way.
    Unknown,
}

impl ConnectionState {
    /// Whether this is the connected AP.
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Whether this record counts as a neighbor for overlap aggregation.
    pub fn is_neighbor(self) -> bool {
        matches!(self, Self::NotConnected)
    }
}

// ---------------------------------------------------------------------------
// Deployment -- Value Object
// ---------------------------------------------------------------------------

/// 6 GHz AP deployment class from the regulatory-info field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Deployment {
    /// Low-power indoor.
    #[cfg_attr(feature = "serde", serde(rename = "LPI"))]
    Lpi,
    /// Standard power.
    #[cfg_attr(feature = "serde", serde(rename = "SP"))]
    Sp,
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lpi => write!(f, "LPI"),
            Self::Sp => write!(f, "SP"),
        }
    }
}

// ---------------------------------------------------------------------------
// ResolvedChannel -- decoder output record
// ---------------------------------------------------------------------------

/// One decoded beacon: channel, bandwidth, amendment, and capabilities.
///
/// Created once per beacon per scan by the decoder and consumed
/// immediately by aggregation; never mutated afterwards. A record only
/// exists with a nonzero `bw_mhz`: beacons whose bandwidth cannot be
/// resolved are dropped before this type is constructed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResolvedChannel {
    /// MAC address of the access point.
    pub bssid: BssidId,
    /// Advertised network name; may be empty for hidden networks.
    pub ssid: String,
    /// Beacon RSSI in dBm, when the scan reported one.
    pub rssi_dbm: Option<f64>,
    /// Association state of the scanning station relative to this AP.
    pub connected: ConnectionState,
    /// Primary channel number as advertised in the beacon header.
    pub primary_channel: u16,
    /// Primary channel center frequency in MHz.
    pub primary_freq_mhz: u32,
    /// Resolved channel number (may be a bonded channel).
    pub channel: u16,
    /// Center frequency of the first frequency segment in MHz.
    pub center_freq0_mhz: u32,
    /// Center frequency of the second segment in MHz; 0 when unused.
    pub center_freq1_mhz: u32,
    /// Resolved occupied bandwidth in MHz (always nonzero).
    pub bw_mhz: u32,
    /// Highest amendment detected among the beacon's elements.
    pub amendment: Amendment,
    /// 6 GHz deployment class, when the beacon advertised regulatory info.
    pub deployment: Option<Deployment>,
    /// Maximum receive spatial streams from the MCS support maps.
    pub max_rx_streams: Option<u8>,
    /// Maximum transmit spatial streams from the MCS support maps.
    pub max_tx_streams: Option<u8>,
    /// Maximum A-MPDU size in bytes, from the HT/VHT length exponent.
    pub ampdu_max_bytes: Option<u64>,
    /// HE-extended maximum A-MPDU size in bytes, when both a prior
    /// exponent and an HE exponent extension were advertised.
    pub ampdu_ext_max_bytes: Option<u64>,
    /// Transmit power in dBm from the TPC report element.
    pub tx_power_dbm: Option<f64>,
    /// Link margin in dB from the TPC report element.
    pub link_margin_db: Option<f64>,
    /// Associated station count from the BSS load element.
    pub sta_count: Option<u16>,
    /// Channel utilization (0-255 scale) from the BSS load element.
    pub ch_utilization: Option<u8>,
    /// Available admission capacity in seconds (32 µs ticks × 32 / 1e6).
    pub available_admission_capacity_sec: Option<f64>,
    /// AP device name from a matching vendor-specific element.
    pub device_name: Option<String>,
}

impl ResolvedChannel {
    /// The record's governing center frequency: the second segment when
    /// present, otherwise the first.
    pub fn center_freq_mhz(&self) -> u32 {
        if self.center_freq1_mhz != 0 {
            self.center_freq1_mhz
        } else {
            self.center_freq0_mhz
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bssid_display_round_trip() {
        let id = BssidId([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
        assert_eq!(id.to_string(), "aa:bb:cc:dd:ee:ff");
        assert_eq!(BssidId::parse("aa:bb:cc:dd:ee:ff").unwrap(), id);
        assert_eq!("AA:BB:CC:DD:EE:FF".parse::<BssidId>().unwrap(), id);
    }

    #[test]
    fn bssid_parse_rejects_malformed_input() {
        assert!(BssidId::parse("aa:bb:cc").is_err());
        assert!(BssidId::parse("aa:bb:cc:dd:ee:ff:00").is_err());
        assert!(BssidId::parse("zz:bb:cc:dd:ee:ff").is_err());
        assert!(BssidId::parse("").is_err());
        assert!(BssidId::from_bytes(&[1, 2, 3]).is_err());
    }

    #[test]
    fn amendment_ordering_tracks_the_standard_generations() {
        assert!(Amendment::Unknown < Amendment::N);
        assert!(Amendment::N < Amendment::Ac);
        assert!(Amendment::Ac < Amendment::Ax);
        assert_eq!(Amendment::Ac.max(Amendment::N), Amendment::Ac);
        assert_eq!(Amendment::Ax.to_string(), "11ax");
    }

    #[test]
    fn center_freq_prefers_the_second_segment() {
        let mut record = sample_record();
        record.center_freq0_mhz = 5180;
        record.center_freq1_mhz = 0;
        assert_eq!(record.center_freq_mhz(), 5180);
        record.center_freq1_mhz = 5250;
        assert_eq!(record.center_freq_mhz(), 5250);
    }

    fn sample_record() -> ResolvedChannel {
        ResolvedChannel {
            bssid: BssidId([0; 6]),
            ssid: String::new(),
            rssi_dbm: None,
            connected: ConnectionState::Unknown,
            primary_channel: 36,
            primary_freq_mhz: 5180,
            channel: 36,
            center_freq0_mhz: 5180,
            center_freq1_mhz: 0,
            bw_mhz: 20,
            amendment: Amendment::Unknown,
            deployment: None,
            max_rx_streams: None,
            max_tx_streams: None,
            ampdu_max_bytes: None,
            ampdu_ext_max_bytes: None,
            tx_power_dbm: None,
            link_margin_db: None,
            sta_count: None,
            ch_utilization: None,
            available_admission_capacity_sec: None,
            device_name: None,
        }
    }
}
