//! # wifi-survey-stats
//!
//! Statistics over resolved scan snapshots: connected-link summaries and
//! spectral-overlap aggregates between the connected AP and its
//! neighbors.
//!
//! - [`power`]: dBm / milliwatt conversions and the power-domain mean.
//! - [`summary`]: five-number [`Summary`] statistics with linear and
//!   log-power constructors.
//! - [`link`]: parsing and summarizing raw link-quality samples.
//! - [`snapshot`]: the [`ScanSnapshot`] model and speedtest sub-phase
//!   replication.
//! - [`overlap`]: the two overlap predicates and per-snapshot
//!   aggregation.
//!
//! Everything here is a pure reduction over immutable inputs; all
//! "unavailable" outcomes are `Option::None`, kept distinct from
//! legitimate zeros.
//!
//! # Feature flags
//!
//! - `serde`: serialization derives on the statistic and snapshot types.

#![forbid(unsafe_code)]

pub mod link;
pub mod overlap;
pub mod power;
pub mod snapshot;
pub mod summary;

pub use link::{extract, LinkSample, LinkStatistics};
pub use overlap::{aggregate, analyze, FreqRange, OverlapAggregate, OverlapMode, SnapshotAggregates};
pub use power::{dbm_to_mw, mw_to_dbm, power_mean_dbm};
pub use snapshot::{replicate_speedtest, ScanSnapshot, SPEEDTEST_LABEL, SPEEDTEST_PHASES};
pub use summary::Summary;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
