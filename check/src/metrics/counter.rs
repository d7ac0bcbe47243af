//! The fixed set of PowerDNS counters tracked by the probe.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A cumulative PowerDNS counter as reported by `pdns_control show "*"`.
///
/// Variants are declared in report order: the three error counters first,
/// followed by the cache and recursion counters. [`Counter::ALL`] preserves
/// that order and every iteration over counters in this crate follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Counter {
    CorruptPackets,
    ServfailPackets,
    TimedoutPackets,
    PacketcacheHit,
    PacketcacheMiss,
    QueryCacheHit,
    QueryCacheMiss,
    RecursingAnswers,
    RecursingQuestions,
}

impl Counter {
    /// Every tracked counter, in report order.
    pub const ALL: [Counter; 9] = [
        Counter::CorruptPackets,
        Counter::ServfailPackets,
        Counter::TimedoutPackets,
        Counter::PacketcacheHit,
        Counter::PacketcacheMiss,
        Counter::QueryCacheHit,
        Counter::QueryCacheMiss,
        Counter::RecursingAnswers,
        Counter::RecursingQuestions,
    ];

    /// Counters whose rate is compared against the warning/critical thresholds.
    pub const ERRORS: [Counter; 3] = [
        Counter::CorruptPackets,
        Counter::ServfailPackets,
        Counter::TimedoutPackets,
    ];

    /// Name used by pdns_control and in performance data.
    pub fn as_str(&self) -> &'static str {
        match self {
            Counter::CorruptPackets => "corrupt-packets",
            Counter::ServfailPackets => "servfail-packets",
            Counter::TimedoutPackets => "timedout-packets",
            Counter::PacketcacheHit => "packetcache-hit",
            Counter::PacketcacheMiss => "packetcache-miss",
            Counter::QueryCacheHit => "query-cache-hit",
            Counter::QueryCacheMiss => "query-cache-miss",
            Counter::RecursingAnswers => "recursing-answers",
            Counter::RecursingQuestions => "recursing-questions",
        }
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a name is not one of the tracked counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCounter(pub String);

impl FromStr for Counter {
    type Err = UnknownCounter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Counter::ALL
            .into_iter()
            .find(|counter| counter.as_str() == s)
            .ok_or_else(|| UnknownCounter(s.to_string()))
    }
}
