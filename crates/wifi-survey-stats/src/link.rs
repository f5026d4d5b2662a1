//! Connected-link statistics extraction.
//!
//! Station drivers attach raw per-link samples to each scan: signal
//! strength as `"N dBm"` strings and TX/RX bitrates as `"N MBit/s"`
//! strings. This module parses them and produces one [`LinkStatistics`]
//! per snapshot. Samples that fail to parse are excluded from the
//! statistic; they are never treated as zero.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use wifi_survey_core::parse::{parse_dbm, parse_mbit_per_sec};

use crate::summary::Summary;

/// One raw link-quality sample as reported by the driver.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct LinkSample {
    /// Signal strength, e.g. `"-67 dBm"`.
    pub signal: Option<String>,
    /// Transmit bitrate, e.g. `"866.7 MBit/s VHT-MCS 9"`.
    pub tx_bitrate: Option<String>,
    /// Receive bitrate, e.g. `"780.0 MBit/s"`.
    pub rx_bitrate: Option<String>,
}

/// Summary statistics over the connected link's samples.
///
/// Each field is present only when at least one sample of that quantity
/// parsed. RSSI uses the power-domain mean; bitrates are plain linear.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkStatistics {
    /// Signal strength statistics in dBm.
    pub rssi_dbm: Option<Summary>,
    /// Transmit bitrate statistics in Mbps.
    pub tx_bitrate_mbps: Option<Summary>,
    /// Receive bitrate statistics in Mbps.
    pub rx_bitrate_mbps: Option<Summary>,
}

impl LinkStatistics {
    /// Whether no quantity produced a statistic at all.
    pub fn is_empty(&self) -> bool {
        self.rssi_dbm.is_none() && self.tx_bitrate_mbps.is_none() && self.rx_bitrate_mbps.is_none()
    }
}

/// Extract link statistics from a snapshot's raw samples.
pub fn extract(samples: &[LinkSample]) -> LinkStatistics {
    let signals: Vec<f64> = samples
        .iter()
        .filter_map(|s| s.signal.as_deref().and_then(parse_dbm))
        .collect();
    let tx: Vec<f64> = samples
        .iter()
        .filter_map(|s| s.tx_bitrate.as_deref().and_then(parse_mbit_per_sec))
        .collect();
    let rx: Vec<f64> = samples
        .iter()
        .filter_map(|s| s.rx_bitrate.as_deref().and_then(parse_mbit_per_sec))
        .collect();

    LinkStatistics {
        rssi_dbm: Summary::log_power(&signals),
        tx_bitrate_mbps: Summary::linear(&tx),
        rx_bitrate_mbps: Summary::linear(&rx),
    }
}
