//! # wifi-survey-core
//!
//! Channel tables, band classification, and shared record types for the
//! wifi-survey telemetry toolkit.
//!
//! This crate is the foundation of the pipeline:
//!
//! - **Channel tables**: compiled-in per-band allocation tables
//!   ([`channel`]) and the band classifier / table lookups ([`band`]).
//! - **Record types**: [`ResolvedChannel`], [`BssidId`], [`Amendment`],
//!   and [`ConnectionState`], the values the decoder produces and the
//!   aggregators consume ([`types`]).
//! - **Driver-string parsing**: fixed-pattern extraction of `"N dBm"` /
//!   `"N MBit/s"` quantities ([`parse`]).
//!
//! # Feature flags
//!
//! - `serde`: serialization/deserialization derives on the record types.

#![forbid(unsafe_code)]

pub mod band;
pub mod channel;
pub mod error;
pub mod parse;
pub mod types;

pub use band::{lookup_by_channel, lookup_by_freq_width, Band};
pub use channel::{ChannelEntry, CHANNELS_2_4GHZ, CHANNELS_5GHZ, CHANNELS_6GHZ};
pub use error::{CoreError, CoreResult};
pub use types::{Amendment, BssidId, ConnectionState, Deployment, ResolvedChannel};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
