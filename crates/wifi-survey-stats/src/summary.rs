//! Five-number summaries over sample sets.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::power::{dbm_to_mw, mw_to_dbm};

/// Summary statistics over a non-empty sample set.
///
/// Constructed via [`Summary::linear`] for ordinary scalars (bitrates,
/// utilization, station counts, tx power) or [`Summary::log_power`] for
/// dBm quantities, where only the mean needs the linear-domain detour.
/// "No samples" is represented by the absence of a `Summary`, never by a
/// zeroed one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Summary {
    /// Number of samples aggregated.
    pub count: usize,
    /// Arithmetic mean (linear or power-domain depending on constructor).
    pub mean: f64,
    /// 50th percentile.
    pub median: f64,
    /// Smallest sample.
    pub min: f64,
    /// Largest sample.
    pub max: f64,
    /// 25th percentile.
    pub p25: f64,
    /// 75th percentile.
    pub p75: f64,
}

impl Summary {
    /// Summarize plain linear-domain samples.
    pub fn linear(samples: &[f64]) -> Option<Self> {
        Self::build(samples, |sorted| {
            sorted.iter().sum::<f64>() / sorted.len() as f64
        })
    }

    /// Summarize dBm samples with a power-domain-correct mean.
    ///
    /// The mean converts each sample to milliwatts, averages, and converts
    /// back. The order statistics are computed directly on the dBm values.
    pub fn log_power(samples_dbm: &[f64]) -> Option<Self> {
        Self::build(samples_dbm, |sorted| {
            let mean_mw = sorted.iter().copied().map(dbm_to_mw).sum::<f64>() / sorted.len() as f64;
            mw_to_dbm(mean_mw)
        })
    }

    fn build(samples: &[f64], mean_of: impl FnOnce(&[f64]) -> f64) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            count: sorted.len(),
            mean: mean_of(&sorted),
            median: percentile(&sorted, 0.5),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            p25: percentile(&sorted, 0.25),
            p75: percentile(&sorted, 0.75),
        })
    }
}

/// Linearly interpolated percentile over an ascending-sorted slice.
fn percentile(sorted: &[f64], fraction: f64) -> f64 {
    let position = fraction * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}
