//! Beacon channel, bandwidth, amendment, and capability resolution.
//!
//! [`decode`] turns one [`RawBeacon`] into a [`ResolvedChannel`] by walking
//! the beacon's elements in a fixed precedence order: VHT operation first
//! (it gives the most specific geometry), then the 6 GHz HE operation
//! info, then the HT fallback, then HE capability widening. Each VHT width
//! code is handled by its own small pure function returning a
//! [`ChannelResolution`], so the precedence rules stay auditable in
//! isolation instead of being spread across mutations of the output
//! record.
//!
//! A beacon whose bandwidth is still zero after all rules ran is
//! undecodable and dropped; that is the only failure mode and it never
//! affects sibling beacons.

use tracing::debug;

use wifi_survey_core::{
    lookup_by_channel, lookup_by_freq_width, Amendment, Band, ChannelEntry, Deployment,
    ResolvedChannel,
};

use crate::beacon::RawBeacon;
use crate::element::{ElementSet, VhtOperation};

/// The 2-bit MCS map value meaning "this stream count is not supported".
const MCS_UNSUPPORTED: u16 = 0b11;

/// Streams encodable in a 16-bit MCS support map.
const MCS_MAP_STREAMS: u8 = 8;

// ---------------------------------------------------------------------------
// ChannelResolution
// ---------------------------------------------------------------------------

/// Channel geometry produced by one resolution rule.
///
/// `bw_mhz == 0` marks the initial, unresolved state; every rule either
/// replaces the whole value or leaves it untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChannelResolution {
    channel: u16,
    center0_mhz: u32,
    center1_mhz: u32,
    bw_mhz: u32,
}

impl ChannelResolution {
    fn from_entry(entry: &ChannelEntry) -> Self {
        Self {
            channel: entry.channel,
            center0_mhz: entry.center_mhz,
            center1_mhz: 0,
            bw_mhz: entry.width_mhz,
        }
    }
}

fn by_channel(band: Option<Band>, channel: Option<u16>) -> Option<&'static ChannelEntry> {
    lookup_by_channel(band?, channel.filter(|&c| c != 0)?)
}

// ---------------------------------------------------------------------------
// VHT operation width codes
// ---------------------------------------------------------------------------

fn resolve_vht(
    op: &VhtOperation,
    band: Option<Band>,
    fallback: ChannelResolution,
) -> Option<ChannelResolution> {
    match op.channel_width? {
        0 => Some(resolve_narrow(op, band, fallback)),
        1 => resolve_two_segment(band, op.channel_center_freq_0, op.channel_center_freq_1),
        2 => resolve_deprecated_160(op, band),
        3 => resolve_deprecated_80p80(op, band, fallback),
        _ => None,
    }
}

/// Width code 0: 20 or 40 MHz, decided by the segment-0 table entry.
/// A failed lookup means a plain 20 MHz channel at the primary position.
fn resolve_narrow(
    op: &VhtOperation,
    band: Option<Band>,
    fallback: ChannelResolution,
) -> ChannelResolution {
    match by_channel(band, op.channel_center_freq_0) {
        Some(entry) => ChannelResolution::from_entry(entry),
        None => ChannelResolution {
            bw_mhz: 20,
            ..fallback
        },
    }
}

/// Width code 1 (and the 6 GHz operation info): 80, 160, or 80+80 MHz,
/// decided by which frequency segments resolve.
///
/// When both segments resolve the total is 160 MHz either way; the second
/// segment's table width tells the two encodings apart. A 160-wide entry
/// means contiguous 160 MHz centered on segment 1, so segment 1 supplies
/// the reported channel; an 80-wide entry means true 80+80, reported on
/// the segment-0 channel.
fn resolve_two_segment(
    band: Option<Band>,
    seg0: Option<u16>,
    seg1: Option<u16>,
) -> Option<ChannelResolution> {
    let entry0 = by_channel(band, seg0);
    let entry1 = by_channel(band, seg1);
    match (entry0, entry1) {
        (Some(entry0), Some(entry1)) => {
            let channel = if entry1.width_mhz == 160 {
                entry1.channel
            } else {
                entry0.channel
            };
            Some(ChannelResolution {
                channel,
                center0_mhz: entry0.center_mhz,
                center1_mhz: entry1.center_mhz,
                bw_mhz: 160,
            })
        }
        (Some(entry0), None) => Some(ChannelResolution::from_entry(entry0)),
        _ => None,
    }
}

/// Width code 2 (deprecated): contiguous 160 MHz centered on segment 0.
fn resolve_deprecated_160(op: &VhtOperation, band: Option<Band>) -> Option<ChannelResolution> {
    let entry = by_channel(band, op.channel_center_freq_0)?;
    Some(ChannelResolution {
        bw_mhz: 160,
        ..ChannelResolution::from_entry(entry)
    })
}

/// Width code 3 (deprecated): 80+80 MHz. Segment 1 supplies the reported
/// channel when it resolves; segment 0 overwrites it when it also
/// resolves.
fn resolve_deprecated_80p80(
    op: &VhtOperation,
    band: Option<Band>,
    fallback: ChannelResolution,
) -> Option<ChannelResolution> {
    let entry0 = by_channel(band, op.channel_center_freq_0);
    let entry1 = by_channel(band, op.channel_center_freq_1);
    match (entry0, entry1) {
        (Some(entry0), Some(entry1)) => Some(ChannelResolution {
            channel: entry0.channel,
            center0_mhz: entry0.center_mhz,
            center1_mhz: entry1.center_mhz,
            bw_mhz: 160,
        }),
        (Some(entry0), None) => Some(ChannelResolution {
            channel: entry0.channel,
            center0_mhz: entry0.center_mhz,
            center1_mhz: 0,
            bw_mhz: 160,
        }),
        (None, Some(entry1)) => Some(ChannelResolution {
            channel: entry1.channel,
            center1_mhz: entry1.center_mhz,
            bw_mhz: 160,
            ..fallback
        }),
        (None, None) => None,
    }
}

// ---------------------------------------------------------------------------
// HE capability widening
// ---------------------------------------------------------------------------

/// The widest bandwidth declared in an HE channel-width-set bitmask.
/// Bit 0 = 40 MHz, bit 1 = 80 MHz, bits 2-3 = 160 MHz; 160 > 80 > 40 > 20.
fn widest_he_width(mask: u8) -> u32 {
    if mask & 0b1100 != 0 {
        160
    } else if mask & 0b0010 != 0 {
        80
    } else if mask & 0b0001 != 0 {
        40
    } else {
        20
    }
}

// ---------------------------------------------------------------------------
// Capability decoding
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy)]
struct Capabilities {
    max_rx_streams: Option<u8>,
    max_tx_streams: Option<u8>,
    ampdu_max_bytes: Option<u64>,
    ampdu_ext_max_bytes: Option<u64>,
}

/// Maximum A-MPDU size in bytes for a length exponent: 2^(13+exp) - 1.
fn ampdu_bytes(exponent: u8) -> u64 {
    (1u64 << (13 + u32::from(exponent))) - 1
}

/// Highest supported stream count in a 2-bit-per-stream MCS map.
///
/// The reported count is the highest stream index whose field is not the
/// unsupported sentinel, plus one. A gap (supported, unsupported,
/// supported) therefore yields the highest supported index rather than a
/// contiguous prefix count.
fn stream_count(map: u16) -> Option<u8> {
    let mut highest = None;
    for stream in 0..MCS_MAP_STREAMS {
        if (map >> (2 * stream)) & 0b11 != MCS_UNSUPPORTED {
            highest = Some(stream + 1);
        }
    }
    highest
}

/// Decode spatial-stream and A-MPDU capabilities across HT, VHT, and HE
/// capability elements. Later amendments overwrite earlier ones whenever
/// they declare the corresponding field; the A-MPDU exponent used for the
/// HE extension is the last one assigned (VHT over HT).
fn decode_capabilities(set: &ElementSet<'_>) -> Capabilities {
    let mut caps = Capabilities::default();
    let mut exponent: Option<u8> = None;

    if let Some(ht) = set.ht_capabilities() {
        if ht.maximum_rx_a_mpdu_length.is_some() {
            exponent = ht.maximum_rx_a_mpdu_length;
        }
        let rx = ht.rx_mcs_map.and_then(stream_count);
        if rx.is_some() {
            caps.max_rx_streams = rx;
        }
        // HT TX support defaults to the RX stream count unless the beacon
        // declares a distinct TX MCS set.
        let tx = match ht.tx_mcs_map {
            Some(map) => stream_count(map),
            None => rx,
        };
        if tx.is_some() {
            caps.max_tx_streams = tx;
        }
    }

    if let Some(vht) = set.vht_capabilities() {
        if vht.max_a_mpdu_length_exponent.is_some() {
            exponent = vht.max_a_mpdu_length_exponent;
        }
        if let Some(count) = vht.rx_mcs_map.and_then(stream_count) {
            caps.max_rx_streams = Some(count);
        }
        if let Some(count) = vht.tx_mcs_map.and_then(stream_count) {
            caps.max_tx_streams = Some(count);
        }
    }

    if let Some(he) = set.he_capabilities() {
        if let Some(count) = he.rx_mcs_map.and_then(stream_count) {
            caps.max_rx_streams = Some(count);
        }
        if let Some(count) = he.tx_mcs_map.and_then(stream_count) {
            caps.max_tx_streams = Some(count);
        }
        if let (Some(exp), Some(ext)) = (exponent, he.max_a_mpdu_length_exponent_ext) {
            caps.ampdu_ext_max_bytes = Some(ampdu_bytes(exp + ext));
        }
    }

    caps.ampdu_max_bytes = exponent.map(ampdu_bytes);
    caps
}

// ---------------------------------------------------------------------------
// decode
// ---------------------------------------------------------------------------

/// Decode one raw beacon into a resolved channel record.
///
/// Returns `None` only when no rule could resolve a nonzero bandwidth;
/// such beacons are discarded. The function is a pure transform: decoding
/// the same beacon twice yields identical records.
pub fn decode(raw: &RawBeacon) -> Option<ResolvedChannel> {
    let set = ElementSet::new(&raw.elements);
    let band = Band::from_freq(raw.primary_freq_mhz);
    let fallback = ChannelResolution {
        channel: raw.primary_channel,
        center0_mhz: raw.primary_freq_mhz,
        center1_mhz: 0,
        bw_mhz: 0,
    };
    let mut geometry = fallback;
    let mut amendment = Amendment::Unknown;
    let mut deployment = None;

    if let Some(vht) = set.vht_operation() {
        amendment = amendment.max(Amendment::Ac);
        if let Some(resolved) = resolve_vht(vht, band, fallback) {
            geometry = resolved;
        }
    }

    if let Some(info) = set.he_operation().and_then(|op| op.six_ghz_info.as_ref()) {
        if let Some(resolved) = resolve_two_segment(
            Some(Band::Band6GHz),
            info.center_freq_seg0,
            info.center_freq_seg1,
        ) {
            geometry = resolved;
        }
        deployment = info.regulatory_info.map(|reg| {
            if reg == 0 {
                Deployment::Lpi
            } else {
                Deployment::Sp
            }
        });
    }

    if let Some(ht) = set.ht_operation() {
        if amendment == Amendment::Unknown {
            amendment = Amendment::N;
        }
        if geometry.bw_mhz == 0 {
            geometry.bw_mhz = 20;
            if ht.sta_channel_width == Some(1) {
                if let Some(entry) = lookup_by_freq_width(raw.primary_freq_mhz, 40) {
                    geometry = ChannelResolution::from_entry(entry);
                }
            }
        }
    }

    let he_caps = set.he_capabilities();
    if set.he_operation().is_some() || he_caps.is_some() {
        amendment = Amendment::Ax;
    }
    if let Some(caps) = he_caps {
        if let Some(mask) = caps.channel_width_set {
            let widest = widest_he_width(mask);
            if widest > geometry.bw_mhz {
                if let Some(entry) = lookup_by_freq_width(raw.primary_freq_mhz, widest) {
                    geometry.channel = entry.channel;
                    geometry.center0_mhz = entry.center_mhz;
                    geometry.bw_mhz = entry.width_mhz;
                }
            }
        }
    }

    if geometry.bw_mhz == 0 {
        return None;
    }

    let caps = decode_capabilities(&set);
    let tpc = set.tpc_report();
    let bss_load = set.bss_load();
    let vendor = set.vendor_specific().filter(|v| v.matches_wps());

    let mut ssid = raw.ssid.clone();
    if ssid.is_empty() {
        if let Some(vendor_ssid) = vendor.and_then(|v| v.ssid.clone()) {
            ssid = vendor_ssid;
        }
    }

    Some(ResolvedChannel {
        bssid: raw.bssid,
        ssid,
        rssi_dbm: raw.rssi_dbm,
        connected: raw.connected,
        primary_channel: raw.primary_channel,
        primary_freq_mhz: raw.primary_freq_mhz,
        channel: geometry.channel,
        center_freq0_mhz: geometry.center0_mhz,
        center_freq1_mhz: geometry.center1_mhz,
        bw_mhz: geometry.bw_mhz,
        amendment,
        deployment,
        max_rx_streams: caps.max_rx_streams,
        max_tx_streams: caps.max_tx_streams,
        ampdu_max_bytes: caps.ampdu_max_bytes,
        ampdu_ext_max_bytes: caps.ampdu_ext_max_bytes,
        tx_power_dbm: tpc.and_then(|t| t.tx_power_dbm),
        link_margin_db: tpc.and_then(|t| t.link_margin_db),
        sta_count: bss_load.and_then(|b| b.sta_count),
        ch_utilization: bss_load.and_then(|b| b.ch_utilization),
        available_admission_capacity_sec: bss_load
            .and_then(|b| b.available_admission_capacity)
            .map(|ticks| f64::from(ticks) * 32.0 / 1e6),
        device_name: vendor.and_then(|v| v.device_name.clone()),
    })
}

/// Decode a batch of beacons, dropping (and logging) the unresolvable ones.
pub fn decode_all<'a, I>(beacons: I) -> Vec<ResolvedChannel>
where
    I: IntoIterator<Item = &'a RawBeacon>,
{
    beacons
        .into_iter()
        .filter_map(|raw| {
            let record = decode(raw);
            if record.is_none() {
                debug!(
                    bssid = %raw.bssid,
                    freq_mhz = raw.primary_freq_mhz,
                    "dropping beacon with unresolvable bandwidth"
                );
            }
            record
        })
        .collect()
}
