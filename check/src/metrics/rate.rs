//! Per-second rates derived from two consecutive snapshots.

use std::collections::BTreeMap;
use tracing::debug;

use super::counter::Counter;
use super::snapshot::Snapshot;

/// Per-second rate of every tracked counter over one sample interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Rates {
    /// Whole seconds between the two samples
    pub interval_secs: u64,
    rates: BTreeMap<Counter, f64>,
}

impl Rates {
    pub fn get(&self, counter: Counter) -> f64 {
        self.rates[&counter]
    }

    /// Highest rate among the error counters.
    pub fn error_max(&self) -> f64 {
        Counter::ERRORS
            .into_iter()
            .map(|counter| self.get(counter))
            .fold(0.0, f64::max)
    }

    /// Iterate rates in report order.
    pub fn iter(&self) -> impl Iterator<Item = (Counter, f64)> + '_ {
        Counter::ALL.into_iter().map(|counter| (counter, self.get(counter)))
    }
}

/// Outcome of comparing the previous sample with the current one.
#[derive(Debug, Clone, PartialEq)]
pub enum RateResult {
    /// Rates for every counter
    Rates(Rates),
    /// Both samples fall within the same second, or the clock went backwards
    TooFast,
    /// A counter decreased, the server was most likely restarted
    CounterReset {
        counter: Counter,
        previous: u64,
        current: u64,
    },
    /// There was no usable previous sample
    NoPriorSample,
}

impl RateResult {
    pub fn rates(&self) -> Option<&Rates> {
        match self {
            RateResult::Rates(rates) => Some(rates),
            _ => None,
        }
    }
}

/// Compute per-second rates between two snapshots.
///
/// The interval is taken between the truncated whole-second timestamps of the
/// two samples. An interval of zero or less yields [`RateResult::TooFast`].
/// If any counter went down the whole result is [`RateResult::CounterReset`];
/// a partial mapping is never returned.
pub fn compute(previous: &Snapshot, current: &Snapshot) -> RateResult {
    let interval = current.timestamp_secs() - previous.timestamp_secs();
    if interval <= 0 {
        debug!(interval, "Sample interval is degenerate");
        return RateResult::TooFast;
    }

    for counter in Counter::ALL {
        let (before, after) = (previous.get(counter), current.get(counter));
        if after < before {
            debug!(%counter, before, after, "Counter decreased between samples");
            return RateResult::CounterReset {
                counter,
                previous: before,
                current: after,
            };
        }
    }

    let secs = interval as f64;
    let rates = Counter::ALL
        .into_iter()
        .map(|counter| {
            let delta = current.get(counter) - previous.get(counter);
            (counter, delta as f64 / secs)
        })
        .collect();

    RateResult::Rates(Rates {
        interval_secs: interval as u64,
        rates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    const BASE: u64 = 1_700_000_000;

    fn snapshot_at(secs: u64, values: [u64; 9]) -> Snapshot {
        let counters = Counter::ALL.into_iter().zip(values).collect();
        Snapshot::new(counters, UNIX_EPOCH + Duration::from_secs(secs)).unwrap()
    }

    #[test]
    fn test_rates_per_second() {
        let previous = snapshot_at(BASE, [0, 10, 0, 100, 50, 0, 0, 20, 20]);
        let current = snapshot_at(BASE + 10, [5, 130, 0, 1100, 50, 30, 40, 80, 100]);

        let result = compute(&previous, &current);
        let rates = result.rates().expect("rates");
        assert_eq!(rates.interval_secs, 10);
        assert_eq!(rates.get(Counter::CorruptPackets), 0.5);
        assert_eq!(rates.get(Counter::ServfailPackets), 12.0);
        assert_eq!(rates.get(Counter::PacketcacheHit), 100.0);
        assert_eq!(rates.get(Counter::PacketcacheMiss), 0.0);
        assert_eq!(rates.get(Counter::RecursingQuestions), 8.0);
        assert_eq!(rates.error_max(), 12.0);
    }

    #[test]
    fn test_same_second_is_too_fast() {
        let previous = snapshot_at(BASE, [0; 9]);
        let counters = Counter::ALL.into_iter().map(|c| (c, 1)).collect();
        let current =
            Snapshot::new(counters, UNIX_EPOCH + Duration::from_millis(BASE * 1000 + 900)).unwrap();

        assert_eq!(compute(&previous, &current), RateResult::TooFast);
    }

    #[test]
    fn test_clock_going_backwards_is_too_fast() {
        let previous = snapshot_at(BASE + 60, [0; 9]);
        let current = snapshot_at(BASE, [1; 9]);
        assert_eq!(compute(&previous, &current), RateResult::TooFast);
    }

    #[test]
    fn test_decreasing_counter_is_reset() {
        let previous = snapshot_at(BASE, [0, 0, 0, 500, 0, 0, 0, 0, 0]);
        let current = snapshot_at(BASE + 60, [3, 3, 3, 10, 3, 3, 3, 3, 3]);

        assert_eq!(
            compute(&previous, &current),
            RateResult::CounterReset {
                counter: Counter::PacketcacheHit,
                previous: 500,
                current: 10,
            }
        );
    }

    #[test]
    fn test_error_max_of_idle_server_is_zero() {
        let previous = snapshot_at(BASE, [7; 9]);
        let current = snapshot_at(BASE + 1, [7; 9]);
        let result = compute(&previous, &current);
        assert_eq!(result.rates().map(Rates::error_max), Some(0.0));
    }

    #[test]
    fn test_sub_second_capture_times_truncate_before_subtracting() {
        // 0.9s and 1.1s after BASE truncate to BASE and BASE + 1
        let previous = Snapshot::new(
            Counter::ALL.into_iter().map(|c| (c, 0)).collect(),
            UNIX_EPOCH + Duration::from_millis(BASE * 1000 + 900),
        )
        .unwrap();
        let current = Snapshot::new(
            Counter::ALL.into_iter().map(|c| (c, 3)).collect(),
            SystemTime::UNIX_EPOCH + Duration::from_millis((BASE + 1) * 1000 + 100),
        )
        .unwrap();

        let result = compute(&previous, &current);
        assert_eq!(result.rates().map(|r| r.interval_secs), Some(1));
    }

    proptest! {
        #[test]
        fn prop_non_decreasing_counters_give_exact_rates(
            start in proptest::array::uniform9(0u64..1_000_000_000),
            deltas in proptest::array::uniform9(0u64..1_000_000),
            interval in 1u64..86_400,
        ) {
            let mut end = start;
            for (value, delta) in end.iter_mut().zip(deltas) {
                *value += delta;
            }
            let previous = snapshot_at(BASE, start);
            let current = snapshot_at(BASE + interval, end);

            let result = compute(&previous, &current);
            let rates = result.rates().expect("non-decreasing counters yield rates");
            for (i, counter) in Counter::ALL.into_iter().enumerate() {
                let expected = deltas[i] as f64 / interval as f64;
                prop_assert_eq!(rates.get(counter), expected);
                prop_assert!(rates.get(counter) >= 0.0);
            }
        }

        #[test]
        fn prop_any_decrease_is_reset(
            values in proptest::array::uniform9(1u64..1_000_000),
            index in 0usize..9,
        ) {
            let mut lowered = values;
            lowered[index] -= 1;
            let previous = snapshot_at(BASE, values);
            let current = snapshot_at(BASE + 30, lowered);

            let is_reset = matches!(
                compute(&previous, &current),
                RateResult::CounterReset { counter, .. } if counter == Counter::ALL[index]
            );
            prop_assert!(is_reset);
        }
    }
}
