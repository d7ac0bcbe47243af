//! # check-pdns
//!
//! A Nagios/Icinga plugin that watches a PowerDNS server through
//! `pdns_control show "*"`. Each run samples the server's cumulative
//! counters, compares them with the sample stored by the previous run and
//! reports per-second rates:
//! - error rates (corrupt, servfail and timedout packets), checked against
//!   warning/critical thresholds
//! - packet cache, query cache and recursion rates, reported as statistics
//!
//! ## Architecture
//!
//! - **Metrics**: the tracked counters, snapshots and rate computation
//! - **Store**: persistence of the single previous snapshot
//! - **Source**: the statistics command and its output parser
//! - **Status**: threshold evaluation and the plugin output line
//! - **Probe**: one check run wiring the above together
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use check_pdns::{Config, Probe, Thresholds};
//! use check_pdns::source::CommandSource;
//! use check_pdns::store::FileSampleStore;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(None)?;
//!     let probe = Probe::new(
//!         CommandSource::new(config.source),
//!         FileSampleStore::new(config.store.path),
//!     );
//!
//!     let report = probe.run(&Thresholds::new(Some(5.0), Some(10.0))).await;
//!     println!("{report}");
//!     std::process::exit(report.exit_code().into());
//! }
//! ```

/// Configuration: defaults, TOML file and environment overrides
pub mod config;

/// Typed errors for sampling, storage and configuration
pub mod error;

/// Tracked counters, snapshots and per-second rates
pub mod metrics;

/// A single check run
pub mod probe;

/// Counter sources: the statistics command and its parser
pub mod source;

/// Thresholds, severities and the plugin output line
pub mod status;

/// Storage of the previous snapshot
pub mod store;

/// Command-line interface for the plugin
pub mod cli;

pub use config::Config;
pub use error::{ConfigError, ProbeError, Result};
pub use probe::Probe;
pub use status::{Report, Severity, Thresholds};
