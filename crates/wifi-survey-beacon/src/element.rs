//! Typed beacon information elements.
//!
//! A beacon carries zero or more information elements, each identified by
//! a `type` label in the ingest format. [`Element`] models them as a
//! tagged union with one variant per recognized type; every sub-field is
//! optional because element payloads arrive partially populated and a
//! missing field means "unavailable", not "malformed".
//!
//! [`ElementSet`] is the decoder's view: a per-kind index over a beacon's
//! element list. Element type is not guaranteed unique within a beacon;
//! the set keeps the **first** occurrence of each kind, which is the
//! documented lookup policy everywhere in the decoder.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Element payloads
// ---------------------------------------------------------------------------

/// HT Operation element (802.11n).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct HtOperation {
    /// Primary channel number.
    pub primary_channel: Option<u16>,
    /// STA channel width field: 0 = 20 MHz only, 1 = any supported width.
    pub sta_channel_width: Option<u8>,
}

/// HT Capabilities element (802.11n).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct HtCapabilities {
    /// Maximum RX A-MPDU length exponent (0-3).
    pub maximum_rx_a_mpdu_length: Option<u8>,
    /// RX MCS support map, two bits per spatial stream.
    pub rx_mcs_map: Option<u16>,
    /// TX MCS support map; absent when the TX set is not declared,
    /// in which case TX stream support equals RX.
    pub tx_mcs_map: Option<u16>,
}

/// VHT Operation element (802.11ac).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct VhtOperation {
    /// Channel width code: 0 = 20/40, 1 = 80/160/80+80,
    /// 2 = 160 (deprecated), 3 = 80+80 (deprecated).
    pub channel_width: Option<u8>,
    /// Channel number of frequency segment 0.
    pub channel_center_freq_0: Option<u16>,
    /// Channel number of frequency segment 1; absent or 0 when unused.
    pub channel_center_freq_1: Option<u16>,
}

/// VHT Capabilities element (802.11ac).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct VhtCapabilities {
    /// Maximum A-MPDU length exponent (0-7).
    pub max_a_mpdu_length_exponent: Option<u8>,
    /// RX MCS support map, two bits per spatial stream.
    pub rx_mcs_map: Option<u16>,
    /// TX MCS support map, two bits per spatial stream.
    pub tx_mcs_map: Option<u16>,
}

/// 6 GHz Operation Info sub-element carried inside HE Operation.
///
/// Present on 6 GHz beacons, which advertise their channelization here
/// instead of through HT/VHT operation elements.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SixGhzOperationInfo {
    /// Primary channel number in the 6 GHz numbering.
    pub primary_channel: Option<u16>,
    /// Channel number of frequency segment 0.
    pub center_freq_seg0: Option<u16>,
    /// Channel number of frequency segment 1; absent or 0 when unused.
    pub center_freq_seg1: Option<u16>,
    /// Regulatory info field: 0 = low-power indoor, else standard power.
    pub regulatory_info: Option<u8>,
}

/// HE Operation element (802.11ax).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct HeOperation {
    /// Embedded 6 GHz operation info, when operating in the 6 GHz band.
    pub six_ghz_info: Option<SixGhzOperationInfo>,
}

/// HE Capabilities element (802.11ax).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct HeCapabilities {
    /// Supported channel width set bitmask: bit 0 = 40 MHz,
    /// bit 1 = 80 MHz, bits 2-3 = 160 MHz.
    pub channel_width_set: Option<u8>,
    /// Maximum A-MPDU length exponent extension over the HT/VHT exponent.
    pub max_a_mpdu_length_exponent_ext: Option<u8>,
    /// RX MCS support map, two bits per spatial stream.
    pub rx_mcs_map: Option<u16>,
    /// TX MCS support map, two bits per spatial stream.
    pub tx_mcs_map: Option<u16>,
}

/// TPC Report element: transmit power and link margin, verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct TpcReport {
    /// Transmit power in dBm.
    pub tx_power_dbm: Option<f64>,
    /// Link margin in dB.
    pub link_margin_db: Option<f64>,
}

/// BSS Load element: station count and channel utilization.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct BssLoad {
    /// Number of associated stations.
    pub sta_count: Option<u16>,
    /// Channel utilization on a 0-255 scale.
    pub ch_utilization: Option<u8>,
    /// Available admission capacity in raw 32 µs ticks.
    pub available_admission_capacity: Option<u32>,
}

/// Vendor-specific element, already parsed by the ingest layer.
///
/// Only elements matching the WPS OUI/sub-type pair
/// ([`VendorSpecific::matches_wps`]) contribute SSID or device-name
/// information to the decoded record.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct VendorSpecific {
    /// Organizationally unique identifier, `"xx:xx:xx"` form.
    pub oui: Option<String>,
    /// Vendor-specific sub-type.
    pub oui_type: Option<u8>,
    /// SSID carried in the vendor payload, if any.
    pub ssid: Option<String>,
    /// AP device name carried in the vendor payload, if any.
    pub device_name: Option<String>,
}

/// The WPS vendor OUI (Microsoft, 00:50:f2).
pub const WPS_OUI: &str = "00:50:f2";

/// The WPS vendor sub-type.
pub const WPS_OUI_TYPE: u8 = 4;

impl VendorSpecific {
    /// Whether this element carries the fixed WPS OUI + sub-type pair.
    pub fn matches_wps(&self) -> bool {
        self.oui
            .as_deref()
            .is_some_and(|oui| oui.eq_ignore_ascii_case(WPS_OUI))
            && self.oui_type == Some(WPS_OUI_TYPE)
    }
}

// ---------------------------------------------------------------------------
// Element -- tagged union
// ---------------------------------------------------------------------------

/// One beacon information element, identified by its `type` label.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "type")
)]
pub enum Element {
    /// HT Operation.
    #[cfg_attr(feature = "serde", serde(rename = "HT Operation"))]
    HtOperation(HtOperation),
    /// HT Capabilities.
    #[cfg_attr(feature = "serde", serde(rename = "HT Capabilities"))]
    HtCapabilities(HtCapabilities),
    /// VHT Operation.
    #[cfg_attr(feature = "serde", serde(rename = "VHT Operation"))]
    VhtOperation(VhtOperation),
    /// VHT Capabilities.
    #[cfg_attr(feature = "serde", serde(rename = "VHT Capabilities"))]
    VhtCapabilities(VhtCapabilities),
    /// HE Operation.
    #[cfg_attr(feature = "serde", serde(rename = "HE Operation"))]
    HeOperation(HeOperation),
    /// HE Capabilities.
    #[cfg_attr(feature = "serde", serde(rename = "HE Capabilities"))]
    HeCapabilities(HeCapabilities),
    /// TPC Report.
    #[cfg_attr(feature = "serde", serde(rename = "TPC Report"))]
    TpcReport(TpcReport),
    /// BSS Load.
    #[cfg_attr(feature = "serde", serde(rename = "BSS Load"))]
    BssLoad(BssLoad),
    /// Vendor Specific.
    #[cfg_attr(feature = "serde", serde(rename = "Vendor Specific"))]
    VendorSpecific(VendorSpecific),
    /// Any element type this model does not recognize. Kept so that scans
    /// containing newer element types still ingest cleanly.
    #[cfg_attr(feature = "serde", serde(other))]
    Unrecognized,
}

/// Discriminant of [`Element`], used as the [`ElementSet`] index key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// HT Operation.
    HtOperation,
    /// HT Capabilities.
    HtCapabilities,
    /// VHT Operation.
    VhtOperation,
    /// VHT Capabilities.
    VhtCapabilities,
    /// HE Operation.
    HeOperation,
    /// HE Capabilities.
    HeCapabilities,
    /// TPC Report.
    TpcReport,
    /// BSS Load.
    BssLoad,
    /// Vendor Specific.
    VendorSpecific,
    /// Unrecognized element type.
    Unrecognized,
}

impl Element {
    /// The element's kind discriminant.
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::HtOperation(_) => ElementKind::HtOperation,
            Self::HtCapabilities(_) => ElementKind::HtCapabilities,
            Self::VhtOperation(_) => ElementKind::VhtOperation,
            Self::VhtCapabilities(_) => ElementKind::VhtCapabilities,
            Self::HeOperation(_) => ElementKind::HeOperation,
            Self::HeCapabilities(_) => ElementKind::HeCapabilities,
            Self::TpcReport(_) => ElementKind::TpcReport,
            Self::BssLoad(_) => ElementKind::BssLoad,
            Self::VendorSpecific(_) => ElementKind::VendorSpecific,
            Self::Unrecognized => ElementKind::Unrecognized,
        }
    }
}

// ---------------------------------------------------------------------------
// ElementSet -- first-match-per-kind index
// ---------------------------------------------------------------------------

/// A per-kind index over one beacon's element list.
///
/// Built once at the start of a decode. Order of the underlying list does
/// not matter to the decode algorithm; when a kind occurs more than once,
/// the first occurrence wins and later duplicates are ignored.
#[derive(Debug)]
pub struct ElementSet<'a> {
    by_kind: HashMap<ElementKind, &'a Element>,
}

macro_rules! typed_accessor {
    ($name:ident, $kind:ident, $payload:ty) => {
        /// First element of this kind, if any.
        pub fn $name(&self) -> Option<&'a $payload> {
            match self.get(ElementKind::$kind)? {
                Element::$kind(e) => Some(e),
                _ => None,
            }
        }
    };
}

impl<'a> ElementSet<'a> {
    /// Index a beacon's elements, keeping the first occurrence per kind.
    pub fn new(elements: &'a [Element]) -> Self {
        let mut by_kind = HashMap::with_capacity(elements.len());
        for element in elements {
            by_kind.entry(element.kind()).or_insert(element);
        }
        Self { by_kind }
    }

    /// First element of the given kind, if any.
    pub fn get(&self, kind: ElementKind) -> Option<&'a Element> {
        self.by_kind.get(&kind).copied()
    }

    typed_accessor!(ht_operation, HtOperation, HtOperation);
    typed_accessor!(ht_capabilities, HtCapabilities, HtCapabilities);
    typed_accessor!(vht_operation, VhtOperation, VhtOperation);
    typed_accessor!(vht_capabilities, VhtCapabilities, VhtCapabilities);
    typed_accessor!(he_operation, HeOperation, HeOperation);
    typed_accessor!(he_capabilities, HeCapabilities, HeCapabilities);
    typed_accessor!(tpc_report, TpcReport, TpcReport);
    typed_accessor!(bss_load, BssLoad, BssLoad);
    typed_accessor!(vendor_specific, VendorSpecific, VendorSpecific);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_occurrence_per_kind_wins() {
        let elements = vec![
            Element::TpcReport(TpcReport {
                tx_power_dbm: Some(17.0),
                link_margin_db: None,
            }),
            Element::TpcReport(TpcReport {
                tx_power_dbm: Some(23.0),
                link_margin_db: None,
            }),
        ];
        let set = ElementSet::new(&elements);
        assert_eq!(set.tpc_report().unwrap().tx_power_dbm, Some(17.0));
    }

    #[test]
    fn absent_kinds_return_none() {
        let set = ElementSet::new(&[]);
        assert!(set.ht_operation().is_none());
        assert!(set.vendor_specific().is_none());
    }

    #[test]
    fn wps_matching_requires_both_oui_and_subtype() {
        let mut vendor = VendorSpecific {
            oui: Some("00:50:F2".to_owned()),
            oui_type: Some(WPS_OUI_TYPE),
            ..Default::default()
        };
        assert!(vendor.matches_wps());
        vendor.oui_type = Some(1);
        assert!(!vendor.matches_wps());
        vendor.oui_type = Some(WPS_OUI_TYPE);
        vendor.oui = Some("00:11:22".to_owned());
        assert!(!vendor.matches_wps());
        vendor.oui = None;
        assert!(!vendor.matches_wps());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn elements_deserialize_from_type_tagged_json() {
        let json = r#"[
            {"type": "VHT Operation", "channel_width": 1,
             "channel_center_freq_0": 42},
            {"type": "BSS Load", "sta_count": 12, "ch_utilization": 90},
            {"type": "FILS Indication"}
        ]"#;
        let elements: Vec<Element> = serde_json::from_str(json).unwrap();
        assert_eq!(elements.len(), 3);
        let set = ElementSet::new(&elements);
        assert_eq!(set.vht_operation().unwrap().channel_width, Some(1));
        assert_eq!(set.bss_load().unwrap().sta_count, Some(12));
        assert_eq!(elements[2], Element::Unrecognized);
    }
}
