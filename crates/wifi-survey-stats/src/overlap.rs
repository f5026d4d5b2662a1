//! Spectral overlap aggregation between the connected AP and neighbors.
//!
//! Two overlap predicates exist, both symmetric interval-intersection
//! tests. *Full-channel* overlap intersects each record's entire occupied
//! bandwidth and captures wideband spectral contention; *primary-channel*
//! overlap intersects fixed 20 MHz windows around the primary frequencies
//! and captures co-channel interference on the legacy sub-channel
//! specifically. Both are computed per snapshot.
//!
//! A snapshot without a connected record has no reference interval; its
//! aggregates are reported as absent, which is distinct from a computed
//! aggregate with zero neighbors.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use wifi_survey_core::ResolvedChannel;

use crate::link::{self, LinkStatistics};
use crate::snapshot::ScanSnapshot;
use crate::summary::Summary;

/// Half-width of the fixed primary-channel window in MHz.
const PRIMARY_HALF_WIDTH_MHZ: f64 = 10.0;

// ---------------------------------------------------------------------------
// FreqRange
// ---------------------------------------------------------------------------

/// A closed frequency interval in MHz.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FreqRange {
    /// Lower edge in MHz.
    pub min_mhz: f64,
    /// Upper edge in MHz.
    pub max_mhz: f64,
}

impl FreqRange {
    /// Whether two intervals intersect (closed-interval test, symmetric).
    pub fn overlaps(&self, other: &FreqRange) -> bool {
        self.min_mhz <= other.max_mhz && other.min_mhz <= self.max_mhz
    }
}

// ---------------------------------------------------------------------------
// OverlapMode
// ---------------------------------------------------------------------------

/// Which interval definition an aggregate was computed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OverlapMode {
    /// Each record's full occupied bandwidth, centered on its governing
    /// center frequency.
    FullChannel,
    /// A fixed 20 MHz window around each record's primary frequency,
    /// regardless of total bandwidth.
    PrimaryChannel,
}

impl OverlapMode {
    /// The record's frequency interval under this mode.
    pub fn range_of(self, record: &ResolvedChannel) -> FreqRange {
        match self {
            Self::FullChannel => {
                let center = f64::from(record.center_freq_mhz());
                let half = f64::from(record.bw_mhz) / 2.0;
                FreqRange {
                    min_mhz: center - half,
                    max_mhz: center + half,
                }
            }
            Self::PrimaryChannel => {
                let primary = f64::from(record.primary_freq_mhz);
                FreqRange {
                    min_mhz: primary - PRIMARY_HALF_WIDTH_MHZ,
                    max_mhz: primary + PRIMARY_HALF_WIDTH_MHZ,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// OverlapAggregate
// ---------------------------------------------------------------------------

/// Neighbor statistics over the APs overlapping the connected one.
///
/// Each statistic is present only when at least one overlapping neighbor
/// carried the underlying value; `neighbor_count == 0` with all-absent
/// statistics is a valid computed result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OverlapAggregate {
    /// The interval definition this aggregate used.
    pub mode: OverlapMode,
    /// Number of overlapping neighbor records.
    pub neighbor_count: usize,
    /// Neighbor RSSI in dBm (power-domain mean).
    pub rssi_dbm: Option<Summary>,
    /// Neighbor transmit power in dBm, over records with a TPC report.
    /// Already log-domain by protocol convention; treated as an ordinary
    /// scalar.
    pub tx_power_dbm: Option<Summary>,
    /// Neighbor channel utilization, over records with a BSS load element.
    pub ch_utilization: Option<Summary>,
    /// Neighbor station counts, over records with a BSS load element.
    pub sta_count: Option<Summary>,
}

/// Compute one overlap aggregate for a snapshot's records.
///
/// Returns `None` when no record is connected. Records with an unknown
/// connection state take no part at all: they are neither the reference
/// nor neighbors.
pub fn aggregate(records: &[ResolvedChannel], mode: OverlapMode) -> Option<OverlapAggregate> {
    let connected = records.iter().find(|r| r.connected.is_connected())?;
    let reference = mode.range_of(connected);

    let neighbors: Vec<&ResolvedChannel> = records
        .iter()
        .filter(|r| r.connected.is_neighbor() && mode.range_of(r).overlaps(&reference))
        .collect();

    let rssi: Vec<f64> = neighbors.iter().filter_map(|r| r.rssi_dbm).collect();
    let tx_power: Vec<f64> = neighbors.iter().filter_map(|r| r.tx_power_dbm).collect();
    let utilization: Vec<f64> = neighbors
        .iter()
        .filter_map(|r| r.ch_utilization.map(f64::from))
        .collect();
    let stations: Vec<f64> = neighbors
        .iter()
        .filter_map(|r| r.sta_count.map(f64::from))
        .collect();

    Some(OverlapAggregate {
        mode,
        neighbor_count: neighbors.len(),
        rssi_dbm: Summary::log_power(&rssi),
        tx_power_dbm: Summary::linear(&tx_power),
        ch_utilization: Summary::linear(&utilization),
        sta_count: Summary::linear(&stations),
    })
}

// ---------------------------------------------------------------------------
// Snapshot analysis
// ---------------------------------------------------------------------------

/// Everything the aggregator derives from one scan snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SnapshotAggregates {
    /// Full-channel overlap aggregate; absent without a connected record.
    pub full: Option<OverlapAggregate>,
    /// Primary-channel overlap aggregate; absent without a connected record.
    pub primary: Option<OverlapAggregate>,
    /// Connected-link statistics; absent without a connected record or
    /// without any parseable link sample.
    pub link: Option<LinkStatistics>,
}

/// Compute both overlap aggregates and the link statistics for a snapshot.
pub fn analyze(snapshot: &ScanSnapshot) -> SnapshotAggregates {
    let link = if snapshot.connected().is_some() {
        Some(link::extract(&snapshot.link_samples)).filter(|stats| !stats.is_empty())
    } else {
        None
    };
    SnapshotAggregates {
        full: aggregate(&snapshot.records, OverlapMode::FullChannel),
        primary: aggregate(&snapshot.records, OverlapMode::PrimaryChannel),
        link,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::LinkSample;
    use approx::assert_abs_diff_eq;
    use chrono::DateTime;
    use uuid::Uuid;
    use wifi_survey_core::{Amendment, BssidId, ConnectionState, ResolvedChannel};

    fn record(
        center_mhz: u32,
        bw_mhz: u32,
        primary_freq_mhz: u32,
        connected: ConnectionState,
    ) -> ResolvedChannel {
        ResolvedChannel {
            bssid: BssidId([0; 6]),
            ssid: String::new(),
            rssi_dbm: Some(-60.0),
            connected,
            primary_channel: 0,
            primary_freq_mhz,
            channel: 0,
            center_freq0_mhz: center_mhz,
            center_freq1_mhz: 0,
            bw_mhz,
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

    #[test]
    fn closed_interval_intersection_is_symmetric() {
        let a = FreqRange { min_mhz: 5170.0, max_mhz: 5190.0 };
        let b = FreqRange { min_mhz: 5180.0, max_mhz: 5200.0 };
        let c = FreqRange { min_mhz: 5195.0, max_mhz: 5215.0 };
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
        // Edge touch counts as overlap (closed intervals).
        let d = FreqRange { min_mhz: 5190.0, max_mhz: 5210.0 };
        assert!(a.overlaps(&d));
    }

    #[test]
    fn full_channel_overlap_selects_intersecting_neighbors() {
        // Connected occupies [5170, 5190]; one neighbor at [5180, 5200]
        // overlaps, one at [5195, 5215] does not.
        let records = vec![
            record(5180, 20, 5180, ConnectionState::Connected),
            record(5190, 20, 5190, ConnectionState::NotConnected),
            record(5205, 20, 5205, ConnectionState::NotConnected),
        ];
        let agg = aggregate(&records, OverlapMode::FullChannel).unwrap();
        assert_eq!(agg.neighbor_count, 1);
    }

    #[test]
    fn primary_channel_mode_ignores_total_bandwidth() {
        // An 80 MHz neighbor centered far away but with a nearby primary
        // still collides on the primary window, and vice versa.
        let mut wide = record(5210, 80, 5180, ConnectionState::NotConnected);
        wide.rssi_dbm = Some(-70.0);
        let records = vec![
            record(5180, 20, 5180, ConnectionState::Connected),
            wide,
            record(5250, 20, 5250, ConnectionState::NotConnected),
        ];
        let primary = aggregate(&records, OverlapMode::PrimaryChannel).unwrap();
        assert_eq!(primary.neighbor_count, 1);
        let full = aggregate(&records, OverlapMode::FullChannel).unwrap();
        // Full-channel mode sees the wide neighbor overlap [5170, 5190]
        // through its 80 MHz span as well.
        assert_eq!(full.neighbor_count, 1);
    }

    #[test]
    fn no_connected_record_means_unavailable_not_zero() {
        let records = vec![
            record(5180, 20, 5180, ConnectionState::NotConnected),
            record(5190, 20, 5190, ConnectionState::NotConnected),
        ];
        assert_eq!(aggregate(&records, OverlapMode::FullChannel), None);
        assert_eq!(aggregate(&records, OverlapMode::PrimaryChannel), None);
    }

    #[test]
    fn zero_neighbors_is_a_valid_computed_result() {
        let records = vec![
            record(5180, 20, 5180, ConnectionState::Connected),
            record(5745, 20, 5745, ConnectionState::NotConnected),
        ];
        let agg = aggregate(&records, OverlapMode::FullChannel).unwrap();
        assert_eq!(agg.neighbor_count, 0);
        assert_eq!(agg.rssi_dbm, None);
        assert_eq!(agg.tx_power_dbm, None);
    }

    #[test]
    fn unknown_connection_state_is_excluded_entirely() {
        let records = vec![
            record(5180, 20, 5180, ConnectionState::Connected),
            record(5180, 20, 5180, ConnectionState::Unknown),
        ];
        let agg = aggregate(&records, OverlapMode::FullChannel).unwrap();
        assert_eq!(agg.neighbor_count, 0);
    }

    #[test]
    fn neighbor_rssi_uses_the_power_domain_mean() {
        let mut strong = record(5180, 20, 5180, ConnectionState::NotConnected);
        strong.rssi_dbm = Some(-50.0);
        let mut weak = record(5190, 20, 5190, ConnectionState::NotConnected);
        weak.rssi_dbm = Some(-60.0);
        let records = vec![
            record(5180, 20, 5180, ConnectionState::Connected),
            strong,
            weak,
        ];
        let agg = aggregate(&records, OverlapMode::FullChannel).unwrap();
        let rssi = agg.rssi_dbm.unwrap();
        assert_abs_diff_eq!(rssi.mean, 10.0 * (5.5e-6f64).log10(), epsilon = 1e-9);
        assert_abs_diff_eq!(rssi.median, -55.0);
    }

    #[test]
    fn element_gated_statistics_only_cover_carrying_records() {
        let mut with_load = record(5180, 20, 5180, ConnectionState::NotConnected);
        with_load.tx_power_dbm = Some(17.0);
        with_load.ch_utilization = Some(128);
        with_load.sta_count = Some(4);
        let bare = record(5190, 20, 5190, ConnectionState::NotConnected);
        let records = vec![
            record(5180, 20, 5180, ConnectionState::Connected),
            with_load,
            bare,
        ];
        let agg = aggregate(&records, OverlapMode::FullChannel).unwrap();
        assert_eq!(agg.neighbor_count, 2);
        assert_eq!(agg.tx_power_dbm.as_ref().unwrap().count, 1);
        assert_abs_diff_eq!(agg.tx_power_dbm.unwrap().mean, 17.0);
        assert_eq!(agg.ch_utilization.unwrap().count, 1);
        assert_abs_diff_eq!(agg.sta_count.unwrap().mean, 4.0);
    }

    #[test]
    fn second_segment_governs_the_full_channel_interval() {
        // An 80+80 record centers its full interval on segment 1.
        let mut record_80p80 = record(5210, 160, 5180, ConnectionState::NotConnected);
        record_80p80.center_freq1_mhz = 5530;
        let range = OverlapMode::FullChannel.range_of(&record_80p80);
        assert_abs_diff_eq!(range.min_mhz, 5450.0);
        assert_abs_diff_eq!(range.max_mhz, 5610.0);
    }

    #[test]
    fn analyze_combines_overlap_and_link_statistics() {
        let snapshot = ScanSnapshot {
            test_uuid: Uuid::nil(),
            corr_test: "iperf-dl".to_owned(),
            interface: "wlan0".to_owned(),
            timestamp: DateTime::UNIX_EPOCH,
            records: vec![
                record(5180, 20, 5180, ConnectionState::Connected),
                record(5190, 20, 5190, ConnectionState::NotConnected),
            ],
            link_samples: vec![LinkSample {
                signal: Some("-61 dBm".to_owned()),
                tx_bitrate: Some("866.7 MBit/s".to_owned()),
                rx_bitrate: None,
            }],
        };
        let result = analyze(&snapshot);
        assert_eq!(result.full.unwrap().neighbor_count, 1);
        assert_eq!(result.primary.unwrap().neighbor_count, 1);
        let link = result.link.unwrap();
        assert_abs_diff_eq!(link.rssi_dbm.unwrap().mean, -61.0, epsilon = 1e-9);
        assert_eq!(link.rx_bitrate_mbps, None);
    }

    #[test]
    fn analyze_without_connected_record_yields_nothing() {
        let snapshot = ScanSnapshot {
            test_uuid: Uuid::nil(),
            corr_test: "iperf-ul".to_owned(),
            interface: "wlan0".to_owned(),
            timestamp: DateTime::UNIX_EPOCH,
            records: vec![record(5180, 20, 5180, ConnectionState::NotConnected)],
            link_samples: vec![LinkSample {
                signal: Some("-61 dBm".to_owned()),
                tx_bitrate: None,
                rx_bitrate: None,
            }],
        };
        let result = analyze(&snapshot);
        assert_eq!(result.full, None);
        assert_eq!(result.primary, None);
        assert_eq!(result.link, None);
    }
}
