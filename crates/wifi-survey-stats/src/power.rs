//! dBm / milliwatt conversions.
//!
//! RSSI is a logarithmic quantity: averaging dBm values directly computes
//! a geometric mean of powers, which understates strong neighbors. Any
//! mean over RSSI therefore goes through the linear milliwatt domain and
//! back. Order statistics (min/max/median/percentiles) are monotone and
//! need no conversion.

/// Convert a power level in dBm to milliwatts.
pub fn dbm_to_mw(dbm: f64) -> f64 {
    10f64.powf(dbm / 10.0)
}

/// Convert a power in milliwatts to dBm.
pub fn mw_to_dbm(mw: f64) -> f64 {
    10.0 * mw.log10()
}

/// Arithmetic mean of dBm samples taken in the linear power domain.
///
/// Returns `None` for an empty slice.
pub fn power_mean_dbm(samples_dbm: &[f64]) -> Option<f64> {
    if samples_dbm.is_empty() {
        return None;
    }
    let mean_mw =
        samples_dbm.iter().copied().map(dbm_to_mw).sum::<f64>() / samples_dbm.len() as f64;
    Some(mw_to_dbm(mean_mw))
}
