//! Band classification and channel-table lookups.
//!
//! [`Band::from_freq`] partitions the integer MHz line into the three
//! operating bands plus "unknown" (`None`); the two lookup functions
//! resolve a channel-table entry either by channel number within a band,
//! or by a (frequency, width) pair with the band inferred from the
//! frequency. Both return the first matching row in fixed table order.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::channel::{ChannelEntry, CHANNELS_2_4GHZ, CHANNELS_5GHZ, CHANNELS_6GHZ};

/// The frequency band an access point operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Band {
    /// 2.4 GHz (channels 1-14).
    Band2_4GHz,
    /// 5 GHz (channels 7-196).
    Band5GHz,
    /// 6 GHz (Wi-Fi 6E / 7).
    Band6GHz,
}

impl Band {
    /// Classify a frequency in MHz into a band.
    ///
    /// The ranges are half-open: `[2401, 2495)`, `[5150, 5925)` and
    /// `[5926, 7125)`. Anything else (including the one-MHz gap at 5925)
    /// is `None`. Total over all of `u32`.
    pub fn from_freq(freq_mhz: u32) -> Option<Self> {
        match freq_mhz {
            2401..=2494 => Some(Self::Band2_4GHz),
            5150..=5924 => Some(Self::Band5GHz),
            5926..=7124 => Some(Self::Band6GHz),
            _ => None,
        }
    }

    /// The band's static channel allocation table, in ascending channel order.
    pub fn channels(self) -> &'static [ChannelEntry] {
        match self {
            Self::Band2_4GHz => CHANNELS_2_4GHZ,
            Self::Band5GHz => CHANNELS_5GHZ,
            Self::Band6GHz => CHANNELS_6GHZ,
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Band2_4GHz => write!(f, "2.4 GHz"),
            Self::Band5GHz => write!(f, "5 GHz"),
            Self::Band6GHz => write!(f, "6 GHz"),
        }
    }
}

/// Look up a channel entry by channel number within a band.
///
/// Returns the first entry in the band's table whose channel number
/// matches, or `None` if the number is not allocated in that band.
pub fn lookup_by_channel(band: Band, channel: u16) -> Option<&'static ChannelEntry> {
    band.channels().iter().find(|e| e.channel == channel)
}

/// Look up a channel entry by a (frequency, width) pair.
///
/// The band is inferred from the frequency. Returns the first entry whose
/// `[start, end)` span contains the frequency and whose nominal width
/// equals the requested width; `None` when the frequency classifies to no
/// band or no row matches.
pub fn lookup_by_freq_width(freq_mhz: u32, width_mhz: u32) -> Option<&'static ChannelEntry> {
    let band = Band::from_freq(freq_mhz)?;
    band.channels()
        .iter()
        .find(|e| e.contains(freq_mhz) && e.width_mhz == width_mhz)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries_are_half_open() {
        assert_eq!(Band::from_freq(2400), None);
        assert_eq!(Band::from_freq(2401), Some(Band::Band2_4GHz));
        assert_eq!(Band::from_freq(2494), Some(Band::Band2_4GHz));
        assert_eq!(Band::from_freq(2495), None);
        assert_eq!(Band::from_freq(5149), None);
        assert_eq!(Band::from_freq(5150), Some(Band::Band5GHz));
        assert_eq!(Band::from_freq(5924), Some(Band::Band5GHz));
        assert_eq!(Band::from_freq(5925), None);
        assert_eq!(Band::from_freq(5926), Some(Band::Band6GHz));
        assert_eq!(Band::from_freq(7124), Some(Band::Band6GHz));
        assert_eq!(Band::from_freq(7125), None);
    }

    #[test]
    fn bands_partition_the_tested_range() {
        // No frequency classifies into more than one band: the match arms
        // are disjoint by construction, so it is enough to check that every
        // MHz in the covering range maps to at most one band.
        let mut classified = 0usize;
        for freq in 2000..7500 {
            if Band::from_freq(freq).is_some() {
                classified += 1;
            }
        }
        // 2.4 GHz: 94 values, 5 GHz: 775 values, 6 GHz: 1199 values.
        assert_eq!(classified, 94 + 775 + 1199);
    }

    #[test]
    fn lookup_by_channel_round_trips_every_entry() {
        for band in [Band::Band2_4GHz, Band::Band5GHz, Band::Band6GHz] {
            for entry in band.channels() {
                let found = lookup_by_channel(band, entry.channel)
                    .unwrap_or_else(|| panic!("channel {} missing in {band}", entry.channel));
                // First match per channel number: the tables have unique
                // channel numbers per band, so this is the entry itself.
                assert_eq!(found, entry);
            }
        }
    }

    #[test]
    fn lookup_by_freq_width_round_trips_every_entry() {
        for band in [Band::Band2_4GHz, Band::Band5GHz, Band::Band6GHz] {
            for entry in band.channels() {
                // Entry 174 in the 5 GHz table has start > center; its
                // center cannot land inside its own span, so the first
                // containing row of the same width wins instead.
                let Some(found) = lookup_by_freq_width(entry.center_mhz, entry.width_mhz) else {
                    assert!(!entry.contains(entry.center_mhz));
                    continue;
                };
                assert_eq!(found.width_mhz, entry.width_mhz);
                assert!(found.contains(entry.center_mhz));
            }
        }
    }

    #[test]
    fn lookup_by_channel_misses_unallocated_numbers() {
        assert!(lookup_by_channel(Band::Band2_4GHz, 15).is_none());
        assert!(lookup_by_channel(Band::Band5GHz, 33).is_none());
        assert!(lookup_by_channel(Band::Band6GHz, 4).is_none());
    }

    #[test]
    fn lookup_by_freq_width_requires_a_known_band() {
        assert!(lookup_by_freq_width(5925, 20).is_none());
        assert!(lookup_by_freq_width(1000, 20).is_none());
    }

    #[test]
    fn forty_mhz_lookup_finds_bonded_channels_only() {
        // 5180 MHz sits inside the 40 MHz bonded channel 34 span.
        let entry = lookup_by_freq_width(5180, 40).expect("bonded channel");
        assert_eq!(entry.channel, 34);
        // The 2.4 GHz table has no 40 MHz rows at all.
        assert!(lookup_by_freq_width(2412, 40).is_none());
    }
}
