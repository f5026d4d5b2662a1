//! Scan-log discovery and JSON ingestion.
//!
//! The batch driver operates on an already-downloaded local archive: one
//! JSON document per scan, organized in arbitrary subdirectories (the
//! fleet tooling groups them by station). Discovery is a plain recursive
//! walk; documents that fail to parse are logged and skipped, never fatal
//! to the batch.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};
use uuid::Uuid;

use wifi_survey_beacon::{decode_all, RawBeacon};
use wifi_survey_core::ResolvedChannel;
use wifi_survey_stats::{LinkSample, ScanSnapshot};

/// Correlated-test labels that never take part in aggregation.
const EXCLUDED_CORR_TESTS: [&str; 2] = ["idle", "none"];

/// One scan document as stored in the log archive.
///
/// Identity fields are optional: stations write `"unknown"` (or omit the
/// key) when a scan could not be correlated with a running test. Such
/// documents still contribute resolved-channel records but are excluded
/// from aggregation.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanDocument {
    /// When the scan was taken.
    pub timestamp: DateTime<Utc>,
    /// UUID of the correlated measurement run.
    #[serde(default, deserialize_with = "de_opt_uuid")]
    pub test_uuid: Option<Uuid>,
    /// Correlated-test label, e.g. `"speedtest"` or `"iperf-dl"`.
    #[serde(default, deserialize_with = "de_opt_label")]
    pub corr_test: Option<String>,
    /// Wireless interface the scan ran on.
    #[serde(default, deserialize_with = "de_opt_label")]
    pub interface: Option<String>,
    /// Observed beacons.
    #[serde(default)]
    pub beacons: Vec<RawBeacon>,
    /// Raw link-quality samples for the connected link.
    #[serde(default)]
    pub link: Vec<LinkSample>,
}

impl ScanDocument {
    /// Decode this document's beacons, dropping unresolvable ones.
    pub fn resolve(&self) -> Vec<ResolvedChannel> {
        decode_all(&self.beacons)
    }

    /// Convert into an aggregation snapshot.
    ///
    /// Returns `None` when the document lacks a test identity or carries
    /// an excluded correlated-test label; those scans are report-only.
    pub fn into_snapshot(self) -> Option<ScanSnapshot> {
        let test_uuid = self.test_uuid?;
        let interface = self.interface?;
        let corr_test = self.corr_test?;
        if EXCLUDED_CORR_TESTS.contains(&corr_test.as_str()) {
            return None;
        }
        let records = decode_all(&self.beacons);
        Some(ScanSnapshot {
            test_uuid,
            corr_test,
            interface,
            timestamp: self.timestamp,
            records,
            link_samples: self.link,
        })
    }
}

/// `"unknown"` and unparseable UUIDs both mean "no test identity".
fn de_opt_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let label = Option::<String>::deserialize(deserializer)?;
    Ok(label.as_deref().and_then(|s| Uuid::parse_str(s).ok()))
}

/// `"unknown"` collapses to `None` for label fields.
fn de_opt_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let label = Option::<String>::deserialize(deserializer)?;
    Ok(label.filter(|s| s != "unknown"))
}

/// Recursively collect every file under `dir`, sorted by path.
pub fn discover_logs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_files(dir, &mut files)
        .with_context(|| format!("walking log directory {}", dir.display()))?;
    files.sort();
    Ok(files)
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

/// Load every parseable scan document under `log_dir`.
///
/// Unreadable or malformed files are logged and skipped; one bad file
/// never aborts the rest of the archive.
pub fn load_documents(log_dir: &Path) -> Result<Vec<ScanDocument>> {
    let mut documents = Vec::new();
    for path in discover_logs(log_dir)? {
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!(path = %path.display(), %err, "cannot read log file, skipping");
                continue;
            }
        };
        match serde_json::from_str::<ScanDocument>(&contents) {
            Ok(doc) => documents.push(doc),
            Err(err) => {
                warn!(path = %path.display(), %err, "cannot parse log file, skipping");
            }
        }
    }
    debug!(count = documents.len(), "loaded scan documents");
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    const DOC: &str = r#"{
        "timestamp": "2024-06-14T17:00:00Z",
        "test_uuid": "1f8f9a50-0a8a-4d39-912e-9b0c3f678d01",
        "corr_test": "speedtest",
        "interface": "wlan0",
        "beacons": [
            {"bssid": "aa:bb:cc:dd:ee:01", "ssid": "lab", "rssi": -52,
             "primary_channel": 36, "primary_freq_mhz": 5180,
             "connected": true,
             "elements": [{"type": "VHT Operation", "channel_width": 1,
                           "channel_center_freq_0": 42}]},
            {"bssid": "aa:bb:cc:dd:ee:02", "ssid": "cafe", "rssi": "-71 dBm",
             "primary_channel": 40, "primary_freq_mhz": 5200,
             "connected": false,
             "elements": [{"type": "HT Operation", "sta_channel_width": 0}]},
            {"bssid": "aa:bb:cc:dd:ee:03", "ssid": "ghost", "rssi": -80,
             "primary_channel": 1, "primary_freq_mhz": 2412,
             "connected": false}
        ],
        "link": [{"signal": "-52 dBm", "tx_bitrate": "866.7 MBit/s"}]
    }"#;

    #[test]
    fn parses_and_resolves_a_scan_document() {
        let doc: ScanDocument = serde_json::from_str(DOC).unwrap();
        let records = doc.resolve();
        // The bare 2.4 GHz beacon has no elements and is dropped.
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].bw_mhz, 80);
        assert_eq!(records[1].bw_mhz, 20);
        assert_eq!(records[1].rssi_dbm, Some(-71.0));
    }

    #[test]
    fn snapshot_conversion_keeps_test_identity() {
        let doc: ScanDocument = serde_json::from_str(DOC).unwrap();
        let snapshot = doc.into_snapshot().unwrap();
        assert_eq!(snapshot.corr_test, "speedtest");
        assert_eq!(snapshot.interface, "wlan0");
        assert_eq!(snapshot.records.len(), 2);
        assert!(snapshot.connected().is_some());
        assert_eq!(snapshot.link_samples.len(), 1);
    }

    #[test]
    fn unknown_identity_documents_are_report_only() {
        let doc: ScanDocument = serde_json::from_str(
            r#"{"timestamp": "2024-06-14T17:00:00Z", "test_uuid": "unknown",
                "corr_test": "speedtest", "interface": "wlan0"}"#,
        )
        .unwrap();
        assert!(doc.test_uuid.is_none());
        assert!(doc.into_snapshot().is_none());
    }

    #[test]
    fn idle_and_none_labels_are_excluded_from_aggregation() {
        for label in ["idle", "none"] {
            let doc: ScanDocument = serde_json::from_str(&format!(
                r#"{{"timestamp": "2024-06-14T17:00:00Z",
                    "test_uuid": "1f8f9a50-0a8a-4d39-912e-9b0c3f678d01",
                    "corr_test": "{label}", "interface": "wlan0"}}"#,
            ))
            .unwrap();
            assert!(doc.into_snapshot().is_none());
        }
    }

    #[test]
    fn load_documents_skips_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let station = dir.path().join("b8-27-eb-00-00-01");
        fs::create_dir(&station).unwrap();
        File::create(station.join("scan_1.json"))
            .unwrap()
            .write_all(DOC.as_bytes())
            .unwrap();
        File::create(station.join("scan_2.json"))
            .unwrap()
            .write_all(b"{ not json")
            .unwrap();

        let docs = load_documents(dir.path()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].beacons.len(), 3);
    }
}
