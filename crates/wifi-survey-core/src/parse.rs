//! Fixed-pattern numeric extraction from driver-formatted strings.
//!
//! Station drivers report link quantities as strings such as `"-67 dBm"`
//! or `"866.7 MBit/s VHT-MCS 9"`. These helpers pull the leading numeric
//! value out and check the unit token, returning `None` for anything that
//! does not match. A failed parse is always "sample unavailable", never
//! zero.

/// Parse a leading number followed by the expected unit token.
///
/// Accepts extra trailing tokens after the unit (rate strings append
/// MCS/NSS details). Returns `None` when the value does not parse or the
/// unit differs.
pub fn parse_quantity(s: &str, unit: &str) -> Option<f64> {
    let trimmed = s.trim();
    let (value, rest) = trimmed.split_once(char::is_whitespace)?;
    if !rest.trim_start().starts_with(unit) {
        return None;
    }
    value.parse().ok()
}

/// Parse a signal strength string of the form `"N dBm"`.
pub fn parse_dbm(s: &str) -> Option<f64> {
    parse_quantity(s, "dBm")
}

/// Parse a bitrate string of the form `"N MBit/s"`.
pub fn parse_mbit_per_sec(s: &str) -> Option<f64> {
    parse_quantity(s, "MBit/s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integer_and_fractional_values() {
        assert_eq!(parse_dbm("-67 dBm"), Some(-67.0));
        assert_eq!(parse_dbm("  -54.5 dBm "), Some(-54.5));
        assert_eq!(parse_mbit_per_sec("866.7 MBit/s VHT-MCS 9 80MHz"), Some(866.7));
    }

    #[test]
    fn rejects_wrong_unit_or_garbage() {
        assert_eq!(parse_dbm("-67 dB"), None);
        assert_eq!(parse_dbm("strong"), None);
        assert_eq!(parse_dbm(""), None);
        assert_eq!(parse_mbit_per_sec("866.7 dBm"), None);
        assert_eq!(parse_mbit_per_sec("fast MBit/s"), None);
    }

    #[test]
    fn requires_a_separator_before_the_unit() {
        // A bare number has no unit token to check.
        assert_eq!(parse_dbm("-67"), None);
    }
}
