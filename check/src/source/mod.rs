//! Where counter values come from.
//!
//! [`CommandSource`] runs `pdns_control show "*"` (or a configured
//! replacement) and hands its output to [`parse_counters`], the only place
//! that deals with the raw text format.

pub mod command;
pub mod parser;

pub use command::CommandSource;
pub use parser::parse_counters;

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::metrics::Counter;

/// Supplier of current counter values.
#[async_trait]
pub trait CounterSource: Send + Sync {
    /// Fetch the current value of every tracked counter.
    ///
    /// Fails if any tracked counter cannot be obtained.
    async fn fetch(&self) -> Result<BTreeMap<Counter, u64>>;
}
