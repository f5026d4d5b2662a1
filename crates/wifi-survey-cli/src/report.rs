//! Report rows and CSV/JSON emission.
//!
//! The core hands over nested records; reporting flattens them into
//! stable-named columns for CSV and serializes them as-is for JSON.
//! Absent values stay absent: an empty CSV cell or a JSON `null`, never
//! a zero.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use wifi_survey_core::{Amendment, BssidId, ConnectionState, Deployment, ResolvedChannel};
use wifi_survey_stats::{
    LinkStatistics, OverlapAggregate, OverlapMode, ScanSnapshot, SnapshotAggregates, Summary,
};

use crate::ingest::ScanDocument;

// ---------------------------------------------------------------------------
// Resolved-channel rows
// ---------------------------------------------------------------------------

/// One CSV row per resolved beacon record.
#[derive(Debug, Clone, Serialize)]
pub struct ScanRow {
    /// Scan timestamp.
    pub timestamp: DateTime<Utc>,
    /// Test identity, when the scan was correlated.
    pub test_uuid: Option<Uuid>,
    /// Correlated-test label, when known.
    pub corr_test: Option<String>,
    /// Scan interface, when known.
    pub interface: Option<String>,
    /// AP MAC address.
    pub bssid: BssidId,
    /// Network name.
    pub ssid: String,
    /// Beacon RSSI in dBm.
    pub rssi_dbm: Option<f64>,
    /// Association state.
    pub connected: ConnectionState,
    /// Primary channel number.
    pub primary_channel: u16,
    /// Primary frequency in MHz.
    pub primary_freq_mhz: u32,
    /// Resolved channel number.
    pub channel: u16,
    /// Segment-0 center frequency in MHz.
    pub center_freq0_mhz: u32,
    /// Segment-1 center frequency in MHz; 0 when unused.
    pub center_freq1_mhz: u32,
    /// Resolved bandwidth in MHz.
    pub bw_mhz: u32,
    /// Detected amendment.
    pub amendment: Amendment,
    /// 6 GHz deployment class.
    pub deployment: Option<Deployment>,
    /// Maximum RX spatial streams.
    pub max_rx_streams: Option<u8>,
    /// Maximum TX spatial streams.
    pub max_tx_streams: Option<u8>,
    /// Maximum A-MPDU size in bytes.
    pub ampdu_max_bytes: Option<u64>,
    /// HE-extended maximum A-MPDU size in bytes.
    pub ampdu_ext_max_bytes: Option<u64>,
    /// TPC transmit power in dBm.
    pub tx_power_dbm: Option<f64>,
    /// TPC link margin in dB.
    pub link_margin_db: Option<f64>,
    /// BSS load station count.
    pub sta_count: Option<u16>,
    /// BSS load channel utilization (0-255).
    pub ch_utilization: Option<u8>,
    /// Available admission capacity in seconds.
    pub available_admission_capacity_sec: Option<f64>,
    /// Vendor-reported AP device name.
    pub device_name: Option<String>,
}

impl ScanRow {
    fn new(doc: &ScanDocument, record: ResolvedChannel) -> Self {
        Self {
            timestamp: doc.timestamp,
            test_uuid: doc.test_uuid,
            corr_test: doc.corr_test.clone(),
            interface: doc.interface.clone(),
            bssid: record.bssid,
            ssid: record.ssid,
            rssi_dbm: record.rssi_dbm,
            connected: record.connected,
            primary_channel: record.primary_channel,
            primary_freq_mhz: record.primary_freq_mhz,
            channel: record.channel,
            center_freq0_mhz: record.center_freq0_mhz,
            center_freq1_mhz: record.center_freq1_mhz,
            bw_mhz: record.bw_mhz,
            amendment: record.amendment,
            deployment: record.deployment,
            max_rx_streams: record.max_rx_streams,
            max_tx_streams: record.max_tx_streams,
            ampdu_max_bytes: record.ampdu_max_bytes,
            ampdu_ext_max_bytes: record.ampdu_ext_max_bytes,
            tx_power_dbm: record.tx_power_dbm,
            link_margin_db: record.link_margin_db,
            sta_count: record.sta_count,
            ch_utilization: record.ch_utilization,
            available_admission_capacity_sec: record.available_admission_capacity_sec,
            device_name: record.device_name,
        }
    }
}

/// Flatten a document's resolved records into report rows.
pub fn scan_rows(doc: &ScanDocument) -> Vec<ScanRow> {
    doc.resolve()
        .into_iter()
        .map(|record| ScanRow::new(doc, record))
        .collect()
}

// ---------------------------------------------------------------------------
// Aggregate rows
// ---------------------------------------------------------------------------

/// One CSV row per aggregation snapshot.
///
/// Overlap columns are `None` (empty cells) when the snapshot had no
/// connected record, distinguishable from a computed zero-neighbor
/// aggregate, which writes an explicit `0` count.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateRow {
    /// Scan timestamp.
    pub timestamp: DateTime<Utc>,
    /// Test identity.
    pub test_uuid: Uuid,
    /// Correlated-test label (speedtest snapshots appear once per phase).
    pub corr_test: String,
    /// Scan interface.
    pub interface: String,
    /// Connected AP MAC address.
    pub bssid: Option<BssidId>,
    /// Connected AP network name.
    pub ssid: Option<String>,
    /// Connected AP beacon RSSI in dBm.
    pub rssi_dbm: Option<f64>,
    /// Connected AP primary frequency in MHz.
    pub primary_freq_mhz: Option<u32>,
    /// Connected AP governing center frequency in MHz.
    pub center_freq_mhz: Option<u32>,
    /// Lower edge of the connected AP's occupied interval in MHz.
    pub min_freq_mhz: Option<f64>,
    /// Upper edge of the connected AP's occupied interval in MHz.
    pub max_freq_mhz: Option<f64>,
    /// Connected AP bandwidth in MHz.
    pub bw_mhz: Option<u32>,
    /// Connected AP amendment.
    pub amendment: Option<Amendment>,
    /// Connected AP TPC transmit power in dBm.
    pub tx_power_dbm: Option<f64>,
    /// Connected AP TPC link margin in dB.
    pub link_margin_db: Option<f64>,
    /// Connected AP station count.
    pub sta_count: Option<u16>,
    /// Connected AP channel utilization (0-255).
    pub ch_utilization: Option<u8>,
    /// Connected AP available admission capacity in seconds.
    pub available_admission_capacity_sec: Option<f64>,
    /// Link RSSI mean in dBm (power-domain).
    pub link_mean_rssi_dbm: Option<f64>,
    /// Link RSSI median in dBm.
    pub link_median_rssi_dbm: Option<f64>,
    /// Link RSSI minimum in dBm.
    pub link_min_rssi_dbm: Option<f64>,
    /// Link RSSI maximum in dBm.
    pub link_max_rssi_dbm: Option<f64>,
    /// Link TX bitrate mean in Mbps.
    pub link_mean_tx_bitrate_mbps: Option<f64>,
    /// Link RX bitrate mean in Mbps.
    pub link_mean_rx_bitrate_mbps: Option<f64>,
    /// Full-channel overlapping neighbor count.
    pub neighbor_count: Option<usize>,
    /// Full-channel neighbor RSSI mean in dBm (power-domain).
    pub neighbor_mean_rssi_dbm: Option<f64>,
    /// Full-channel neighbor RSSI median in dBm.
    pub neighbor_median_rssi_dbm: Option<f64>,
    /// Full-channel neighbor RSSI minimum in dBm.
    pub neighbor_min_rssi_dbm: Option<f64>,
    /// Full-channel neighbor RSSI maximum in dBm.
    pub neighbor_max_rssi_dbm: Option<f64>,
    /// Neighbors that carried a TPC report.
    pub neighbor_tx_power_count: Option<usize>,
    /// Their mean transmit power in dBm.
    pub neighbor_mean_tx_power_dbm: Option<f64>,
    /// Neighbors that carried a BSS load utilization.
    pub neighbor_util_count: Option<usize>,
    /// Their mean channel utilization (0-255).
    pub neighbor_mean_ch_utilization: Option<f64>,
    /// Neighbors that carried a BSS load station count.
    pub neighbor_sta_records: Option<usize>,
    /// Their mean station count.
    pub neighbor_mean_sta_count: Option<f64>,
    /// Primary-channel overlapping neighbor count.
    pub primary_neighbor_count: Option<usize>,
    /// Primary-channel neighbor RSSI mean in dBm (power-domain).
    pub primary_neighbor_mean_rssi_dbm: Option<f64>,
    /// Primary-channel neighbor RSSI median in dBm.
    pub primary_neighbor_median_rssi_dbm: Option<f64>,
    /// Primary-channel neighbor RSSI minimum in dBm.
    pub primary_neighbor_min_rssi_dbm: Option<f64>,
    /// Primary-channel neighbor RSSI maximum in dBm.
    pub primary_neighbor_max_rssi_dbm: Option<f64>,
    /// Primary-channel neighbors that carried a TPC report.
    pub primary_neighbor_tx_power_count: Option<usize>,
    /// Their mean transmit power in dBm.
    pub primary_neighbor_mean_tx_power_dbm: Option<f64>,
    /// Primary-channel neighbors that carried a BSS load utilization.
    pub primary_neighbor_util_count: Option<usize>,
    /// Their mean channel utilization (0-255).
    pub primary_neighbor_mean_ch_utilization: Option<f64>,
    /// Primary-channel neighbors that carried a station count.
    pub primary_neighbor_sta_records: Option<usize>,
    /// Their mean station count.
    pub primary_neighbor_mean_sta_count: Option<f64>,
}

fn mean_of(summary: &Option<Summary>) -> Option<f64> {
    summary.as_ref().map(|s| s.mean)
}

fn count_of(summary: &Option<Summary>) -> Option<usize> {
    summary.as_ref().map(|s| s.count)
}

/// Flatten a snapshot and its aggregates into one report row.
pub fn aggregate_row(snapshot: &ScanSnapshot, aggregates: &SnapshotAggregates) -> AggregateRow {
    let connected = snapshot.connected();
    let interval = connected.map(|r| OverlapMode::FullChannel.range_of(r));
    let link = aggregates.link.as_ref().cloned().unwrap_or_default();
    let full = aggregates.full.as_ref();
    let primary = aggregates.primary.as_ref();

    AggregateRow {
        timestamp: snapshot.timestamp,
        test_uuid: snapshot.test_uuid,
        corr_test: snapshot.corr_test.clone(),
        interface: snapshot.interface.clone(),
        bssid: connected.map(|r| r.bssid),
        ssid: connected.map(|r| r.ssid.clone()),
        rssi_dbm: connected.and_then(|r| r.rssi_dbm),
        primary_freq_mhz: connected.map(|r| r.primary_freq_mhz),
        center_freq_mhz: connected.map(|r| r.center_freq_mhz()),
        min_freq_mhz: interval.map(|r| r.min_mhz),
        max_freq_mhz: interval.map(|r| r.max_mhz),
        bw_mhz: connected.map(|r| r.bw_mhz),
        amendment: connected.map(|r| r.amendment),
        tx_power_dbm: connected.and_then(|r| r.tx_power_dbm),
        link_margin_db: connected.and_then(|r| r.link_margin_db),
        sta_count: connected.and_then(|r| r.sta_count),
        ch_utilization: connected.and_then(|r| r.ch_utilization),
        available_admission_capacity_sec: connected
            .and_then(|r| r.available_admission_capacity_sec),
        link_mean_rssi_dbm: mean_of(&link.rssi_dbm),
        link_median_rssi_dbm: link.rssi_dbm.as_ref().map(|s| s.median),
        link_min_rssi_dbm: link.rssi_dbm.as_ref().map(|s| s.min),
        link_max_rssi_dbm: link.rssi_dbm.as_ref().map(|s| s.max),
        link_mean_tx_bitrate_mbps: mean_of(&link.tx_bitrate_mbps),
        link_mean_rx_bitrate_mbps: mean_of(&link.rx_bitrate_mbps),
        neighbor_count: full.map(|a| a.neighbor_count),
        neighbor_mean_rssi_dbm: full.and_then(|a| mean_of(&a.rssi_dbm)),
        neighbor_median_rssi_dbm: full.and_then(|a| a.rssi_dbm.as_ref().map(|s| s.median)),
        neighbor_min_rssi_dbm: full.and_then(|a| a.rssi_dbm.as_ref().map(|s| s.min)),
        neighbor_max_rssi_dbm: full.and_then(|a| a.rssi_dbm.as_ref().map(|s| s.max)),
        neighbor_tx_power_count: full.and_then(|a| count_of(&a.tx_power_dbm)),
        neighbor_mean_tx_power_dbm: full.and_then(|a| mean_of(&a.tx_power_dbm)),
        neighbor_util_count: full.and_then(|a| count_of(&a.ch_utilization)),
        neighbor_mean_ch_utilization: full.and_then(|a| mean_of(&a.ch_utilization)),
        neighbor_sta_records: full.and_then(|a| count_of(&a.sta_count)),
        neighbor_mean_sta_count: full.and_then(|a| mean_of(&a.sta_count)),
        primary_neighbor_count: primary.map(|a| a.neighbor_count),
        primary_neighbor_mean_rssi_dbm: primary.and_then(|a| mean_of(&a.rssi_dbm)),
        primary_neighbor_median_rssi_dbm: primary
            .and_then(|a| a.rssi_dbm.as_ref().map(|s| s.median)),
        primary_neighbor_min_rssi_dbm: primary.and_then(|a| a.rssi_dbm.as_ref().map(|s| s.min)),
        primary_neighbor_max_rssi_dbm: primary.and_then(|a| a.rssi_dbm.as_ref().map(|s| s.max)),
        primary_neighbor_tx_power_count: primary.and_then(|a| count_of(&a.tx_power_dbm)),
        primary_neighbor_mean_tx_power_dbm: primary.and_then(|a| mean_of(&a.tx_power_dbm)),
        primary_neighbor_util_count: primary.and_then(|a| count_of(&a.ch_utilization)),
        primary_neighbor_mean_ch_utilization: primary.and_then(|a| mean_of(&a.ch_utilization)),
        primary_neighbor_sta_records: primary.and_then(|a| count_of(&a.sta_count)),
        primary_neighbor_mean_sta_count: primary.and_then(|a| mean_of(&a.sta_count)),
    }
}

// ---------------------------------------------------------------------------
// JSON report shape
// ---------------------------------------------------------------------------

/// Nested JSON report for one aggregation snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    /// Scan timestamp.
    pub timestamp: DateTime<Utc>,
    /// Test identity.
    pub test_uuid: Uuid,
    /// Correlated-test label.
    pub corr_test: String,
    /// Scan interface.
    pub interface: String,
    /// The connected AP's full resolved record, when one exists.
    pub connected: Option<ResolvedChannel>,
    /// Full-channel overlap aggregate.
    pub full: Option<OverlapAggregate>,
    /// Primary-channel overlap aggregate.
    pub primary: Option<OverlapAggregate>,
    /// Connected-link statistics.
    pub link: Option<LinkStatistics>,
}

/// Build the nested JSON report for one snapshot.
pub fn aggregate_report(snapshot: &ScanSnapshot, aggregates: SnapshotAggregates) -> AggregateReport {
    AggregateReport {
        timestamp: snapshot.timestamp,
        test_uuid: snapshot.test_uuid,
        corr_test: snapshot.corr_test.clone(),
        interface: snapshot.interface.clone(),
        connected: snapshot.connected().cloned(),
        full: aggregates.full,
        primary: aggregates.primary,
        link: aggregates.link,
    }
}

// ---------------------------------------------------------------------------
// Emission
// ---------------------------------------------------------------------------

/// Serialize rows as CSV with a header line.
pub fn write_csv<T: Serialize>(rows: &[T], out: impl Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Serialize rows as a pretty-printed JSON array.
pub fn write_json<T: Serialize>(rows: &[T], mut out: impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, rows)?;
    out.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wifi_survey_stats::analyze;

    fn document() -> ScanDocument {
        serde_json::from_str(
            r#"{
            "timestamp": "2024-06-14T17:00:00Z",
            "test_uuid": "1f8f9a50-0a8a-4d39-912e-9b0c3f678d01",
            "corr_test": "iperf-dl",
            "interface": "wlan0",
            "beacons": [
                {"bssid": "aa:bb:cc:dd:ee:01", "ssid": "lab", "rssi": -52,
                 "primary_channel": 36, "primary_freq_mhz": 5180,
                 "connected": true,
                 "elements": [{"type": "VHT Operation", "channel_width": 1,
                               "channel_center_freq_0": 42}]},
                {"bssid": "aa:bb:cc:dd:ee:02", "ssid": "cafe", "rssi": -71,
                 "primary_channel": 40, "primary_freq_mhz": 5200,
                 "connected": false,
                 "elements": [{"type": "HT Operation", "sta_channel_width": 0},
                              {"type": "TPC Report", "tx_power_dbm": 20}]}
            ],
            "link": [{"signal": "-52 dBm", "tx_bitrate": "866.7 MBit/s"}]
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn scan_rows_carry_identity_and_resolution() {
        let rows = scan_rows(&document());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].bw_mhz, 80);
        assert_eq!(rows[0].corr_test.as_deref(), Some("iperf-dl"));
        assert_eq!(rows[1].channel, 40);
    }

    #[test]
    fn csv_output_has_headers_and_empty_cells_for_absent_values() {
        let rows = scan_rows(&document());
        let mut buf = Vec::new();
        write_csv(&rows, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("timestamp,test_uuid,corr_test,interface,bssid,ssid"));
        assert!(header.contains("available_admission_capacity_sec"));
        assert_eq!(lines.count(), 2);
        // The connected record has no deployment: the cell is empty.
        assert!(text.contains(",11ac,,"));
    }

    #[test]
    fn aggregate_row_flattens_both_overlap_modes() {
        let snapshot = document().into_snapshot().unwrap();
        let aggregates = analyze(&snapshot);
        let row = aggregate_row(&snapshot, &aggregates);
        assert_eq!(row.bw_mhz, Some(80));
        assert_eq!(row.center_freq_mhz, Some(5210));
        assert_eq!(row.min_freq_mhz, Some(5170.0));
        assert_eq!(row.max_freq_mhz, Some(5250.0));
        // The 20 MHz neighbor at 5200 overlaps the 80 MHz connected span.
        assert_eq!(row.neighbor_count, Some(1));
        assert_eq!(row.neighbor_tx_power_count, Some(1));
        assert_eq!(row.neighbor_mean_tx_power_dbm, Some(20.0));
        // Primary windows [5170,5190] and [5190,5210] touch at the edge.
        assert_eq!(row.primary_neighbor_count, Some(1));
        assert_eq!(row.link_mean_tx_bitrate_mbps, Some(866.7));
    }

    #[test]
    fn json_report_keeps_the_nested_shape() {
        let snapshot = document().into_snapshot().unwrap();
        let aggregates = analyze(&snapshot);
        let report = aggregate_report(&snapshot, aggregates);
        let mut buf = Vec::new();
        write_json(&[report], &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let entry = &value[0];
        assert_eq!(entry["corr_test"], "iperf-dl");
        assert_eq!(entry["connected"]["bw_mhz"], 80);
        assert_eq!(entry["full"]["neighbor_count"], 1);
        assert_eq!(entry["full"]["rssi_dbm"]["count"], 1);
        assert!(entry["link"]["rx_bitrate_mbps"].is_null());
    }
}
