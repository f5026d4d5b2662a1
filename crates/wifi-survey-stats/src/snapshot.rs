//! Scan snapshots: one scan's records under one test identity.

use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wifi_survey_core::ResolvedChannel;

use crate::link::LinkSample;

/// The correlated-test label that marks a speedtest measurement.
pub const SPEEDTEST_LABEL: &str = "speedtest";

/// The three sub-phase labels a speedtest snapshot is replicated under.
pub const SPEEDTEST_PHASES: [&str; 3] = ["speedtest-idle", "speedtest-dl", "speedtest-ul"];

/// All resolved records of one scan, keyed by test identity.
///
/// Identity is the tuple (test UUID, correlated-test label, interface,
/// timestamp). At most one record may be connected; the aggregators treat
/// a snapshot without a connected record as "overlap unavailable".
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanSnapshot {
    /// UUID of the measurement run this scan belongs to.
    pub test_uuid: Uuid,
    /// Correlated-test label, e.g. `"speedtest"` or `"iperf-dl"`.
    pub corr_test: String,
    /// Wireless interface the scan ran on.
    pub interface: String,
    /// When the scan was taken.
    pub timestamp: DateTime<Utc>,
    /// Resolved channel records, connected and neighbors alike.
    pub records: Vec<ResolvedChannel>,
    /// Raw link-quality samples for the connected link.
    #[cfg_attr(feature = "serde", serde(default))]
    pub link_samples: Vec<LinkSample>,
}

impl ScanSnapshot {
    /// The connected record, if the snapshot has one.
    pub fn connected(&self) -> Option<&ResolvedChannel> {
        self.records.iter().find(|r| r.connected.is_connected())
    }

    /// The aggregate key: test UUID joined with the correlated-test label.
    pub fn key(&self) -> String {
        format!("{}-{}", self.test_uuid, self.corr_test)
    }
}

/// Replicate speedtest snapshots under their three sub-phase keys.
///
/// A speedtest's idle, downlink, and uplink phases share a single scan,
/// so each phase must see the identical overlap context; the snapshot is
/// cloned once per phase label. iperf snapshots already carry distinct
/// per-direction labels and pass through unchanged.
pub fn replicate_speedtest(snapshots: Vec<ScanSnapshot>) -> Vec<ScanSnapshot> {
    let mut out = Vec::with_capacity(snapshots.len());
    for snapshot in snapshots {
        if snapshot.corr_test == SPEEDTEST_LABEL {
            for phase in SPEEDTEST_PHASES {
                let mut replica = snapshot.clone();
                replica.corr_test = phase.to_owned();
                out.push(replica);
            }
        } else {
            out.push(snapshot);
        }
    }
    out
}
