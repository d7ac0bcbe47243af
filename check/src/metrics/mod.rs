//! Counter samples and the rates derived from them.
//!
//! - [`counter`] - the fixed set of tracked PowerDNS counters
//! - [`snapshot`] - a validated sample of every counter with its capture time
//! - [`rate`] - per-second rates between two snapshots

pub mod counter;
pub mod rate;
pub mod snapshot;

pub use counter::{Counter, UnknownCounter};
pub use rate::{compute, RateResult, Rates};
pub use snapshot::Snapshot;
