//! Point-in-time sample of the tracked PowerDNS counters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use super::counter::Counter;
use crate::error::{ProbeError, Result};

/// A point-in-time sample of every tracked counter.
///
/// A snapshot always carries a value for each counter in [`Counter::ALL`];
/// both [`Snapshot::new`] and deserialization reject incomplete mappings, so
/// a state file written by an older build with fewer counters is refused
/// rather than silently producing partial rates.
///
/// # Example
///
/// ```rust
/// use check_pdns::metrics::{Counter, Snapshot};
/// use std::collections::BTreeMap;
/// use std::time::SystemTime;
///
/// let counters: BTreeMap<Counter, u64> = Counter::ALL.into_iter().map(|c| (c, 0)).collect();
/// let snapshot = Snapshot::new(counters, SystemTime::now()).unwrap();
/// assert_eq!(snapshot.get(Counter::ServfailPackets), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshot")]
pub struct Snapshot {
    /// Local time at which the counters were fetched
    captured_at: SystemTime,
    /// Counter values keyed by counter
    counters: BTreeMap<Counter, u64>,
}

#[derive(Deserialize)]
struct RawSnapshot {
    captured_at: SystemTime,
    counters: BTreeMap<Counter, u64>,
}

impl TryFrom<RawSnapshot> for Snapshot {
    type Error = ProbeError;

    fn try_from(raw: RawSnapshot) -> Result<Self> {
        Snapshot::new(raw.counters, raw.captured_at)
    }
}

impl Snapshot {
    /// Build a snapshot, failing if any tracked counter is absent.
    pub fn new(counters: BTreeMap<Counter, u64>, captured_at: SystemTime) -> Result<Self> {
        if let Some(counter) = Counter::ALL
            .into_iter()
            .find(|counter| !counters.contains_key(counter))
        {
            return Err(ProbeError::InvalidSnapshot { counter });
        }

        Ok(Self {
            captured_at,
            counters,
        })
    }

    pub fn get(&self, counter: Counter) -> u64 {
        // Presence of every counter is checked in `new`.
        self.counters[&counter]
    }

    /// Capture time as whole seconds since the UNIX epoch, truncated.
    pub fn timestamp_secs(&self) -> i64 {
        match self.captured_at.duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_secs() as i64,
            Err(before) => -(before.duration().as_secs() as i64),
        }
    }

    /// Iterate counters in report order.
    pub fn iter(&self) -> impl Iterator<Item = (Counter, u64)> + '_ {
        Counter::ALL.into_iter().map(|counter| (counter, self.get(counter)))
    }
}
