//! Raw beacon records as produced by the scan-ingestion collaborator.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use wifi_survey_core::{BssidId, ConnectionState};

use crate::element::Element;

/// One beacon observation from a scan, prior to channel resolution.
///
/// Read-only input to the decoder. The element list is carried as-is;
/// the decoder builds its own per-kind index over it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawBeacon {
    /// MAC address of the access point.
    pub bssid: BssidId,
    /// Advertised network name; empty for hidden networks.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ssid: String,
    /// Beacon RSSI in dBm. Scan logs report this either as a number or as
    /// a formatted `"N dBm"` string; both forms deserialize here, and an
    /// unparseable string becomes `None` rather than an error.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "rssi", default, deserialize_with = "de_rssi")
    )]
    pub rssi_dbm: Option<f64>,
    /// Primary channel number.
    pub primary_channel: u16,
    /// Primary channel center frequency in MHz.
    pub primary_freq_mhz: u32,
    /// Association state; logs encode this as `true`, `false`, or the
    /// string `"unknown"`.
    #[cfg_attr(
        feature = "serde",
        serde(default = "unknown_connection", deserialize_with = "de_connected")
    )]
    pub connected: ConnectionState,
    /// Information elements carried by the beacon, order irrelevant.
    #[cfg_attr(feature = "serde", serde(default))]
    pub elements: Vec<Element>,
}

#[cfg(feature = "serde")]
fn unknown_connection() -> ConnectionState {
    ConnectionState::Unknown
}

#[cfg(feature = "serde")]
fn de_rssi<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Num(f64),
        Text(String),
    }

    Ok(match Option::<Repr>::deserialize(deserializer)? {
        Some(Repr::Num(v)) => Some(v),
        Some(Repr::Text(s)) => {
            wifi_survey_core::parse::parse_dbm(&s).or_else(|| s.trim().parse().ok())
        }
        None => None,
    })
}

#[cfg(feature = "serde")]
fn de_connected<'de, D>(deserializer: D) -> Result<ConnectionState, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Flag(bool),
        Label(String),
    }

    match Option::<Repr>::deserialize(deserializer)? {
        Some(Repr::Flag(true)) => Ok(ConnectionState::Connected),
        Some(Repr::Flag(false)) => Ok(ConnectionState::NotConnected),
        Some(Repr::Label(s)) => match s.as_str() {
            "connected" => Ok(ConnectionState::Connected),
            "not_connected" => Ok(ConnectionState::NotConnected),
            "unknown" => Ok(ConnectionState::Unknown),
            other => Err(serde::de::Error::custom(format!(
                "invalid connection state '{other}'"
            ))),
        },
        None => Ok(ConnectionState::Unknown),
    }
}
