//! Error types for the wifi-survey core crate.
//!
//! Following the project error policy, "unavailable" is never an error:
//! optional attributes are modeled as `Option<T>` throughout. The variants
//! here cover genuinely malformed input at the value-object boundary.

use thiserror::Error;

/// A specialized `Result` type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors produced by core value objects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoreError {
    /// The BSSID MAC address bytes are invalid (must be exactly 6 bytes).
    #[error("invalid MAC address: expected 6 bytes, got {len}")]
    InvalidMac {
        /// The number of bytes that were provided.
        len: usize,
    },

    /// Failed to parse a MAC address string (expected `aa:bb:cc:dd:ee:ff`).
    #[error("failed to parse MAC address from '{input}': expected aa:bb:cc:dd:ee:ff")]
    MacParseFailed {
        /// The input string that could not be parsed.
        input: String,
    },
}
