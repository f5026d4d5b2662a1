//! # wifi-survey-beacon
//!
//! 802.11 beacon information-element model and channel decoder.
//!
//! The crate turns raw beacon observations (a beacon header plus a list
//! of already-parsed information elements) into [`ResolvedChannel`]
//! records with a concrete channel, bandwidth, amendment, and capability
//! set:
//!
//! - [`element`]: the typed element union and the first-match-per-kind
//!   [`ElementSet`] index.
//! - [`beacon`]: the [`RawBeacon`] input record.
//! - [`decode`](mod@decode): the resolution algorithm.
//!
//! Decoding is a pure, stateless transform. The only failure mode is an
//! unresolvable bandwidth, which drops that single beacon.
//!
//! # Feature flags
//!
//! - `serde`: deserialize beacons and elements from the `type`-tagged
//!   ingest JSON.
//!
//! [`ResolvedChannel`]: wifi_survey_core::ResolvedChannel

#![forbid(unsafe_code)]

pub mod beacon;
pub mod decode;
pub mod element;

pub use beacon::RawBeacon;
pub use decode::{decode, decode_all};
pub use element::{Element, ElementKind, ElementSet};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
