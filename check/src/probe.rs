//! One invocation of the check: sample, persist, compare, evaluate.

use std::time::SystemTime;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::metrics::{compute, RateResult, Snapshot};
use crate::source::CounterSource;
use crate::status::{evaluate, Report, Thresholds};
use crate::store::SampleStore;

type Clock = Box<dyn Fn() -> SystemTime + Send + Sync>;

/// Drives a single check run against a counter source and a sample store.
///
/// # Example
///
/// ```rust,no_run
/// use check_pdns::config::Config;
/// use check_pdns::probe::Probe;
/// use check_pdns::source::CommandSource;
/// use check_pdns::status::Thresholds;
/// use check_pdns::store::FileSampleStore;
///
/// # async fn example() {
/// let config = Config::default();
/// let probe = Probe::new(
///     CommandSource::new(config.source.clone()),
///     FileSampleStore::new(config.store.path.clone()),
/// );
/// let report = probe.run(&Thresholds::new(Some(5.0), Some(10.0))).await;
/// println!("{report}");
/// # }
/// ```
pub struct Probe<S, T> {
    source: S,
    store: T,
    clock: Clock,
}

impl<S, T> Probe<S, T>
where
    S: CounterSource,
    T: SampleStore,
{
    pub fn new(source: S, store: T) -> Self {
        Self {
            source,
            store,
            clock: Box::new(SystemTime::now),
        }
    }

    /// Replace the wall clock used to timestamp samples.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> SystemTime + Send + Sync + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    pub fn store(&self) -> &T {
        &self.store
    }

    /// Run the check and build the report. Never fails: every problem ends up
    /// as an UNKNOWN report.
    pub async fn run(&self, thresholds: &Thresholds) -> Report {
        let current = match self.sample().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(error = %e, "Failed to sample PowerDNS counters");
                return Report::unknown(e.to_string());
            }
        };

        let result = self.advance(current);
        let report = evaluate(&result, thresholds);
        info!(severity = %report.severity, "Check finished");
        report
    }

    /// Fetch the counters and timestamp them with the local clock.
    pub async fn sample(&self) -> Result<Snapshot> {
        let counters = self.source.fetch().await?;
        let captured_at = (self.clock)();
        Snapshot::new(counters, captured_at)
    }

    /// Store `current` as the new baseline and compare it with the old one.
    ///
    /// A failed save is logged and otherwise ignored: the current run can
    /// still be reported, the next one will compare against the older sample.
    pub fn advance(&self, current: Snapshot) -> RateResult {
        let previous = self.store.load();

        if let Err(e) = self.store.save(&current) {
            error!(error = %e, "Failed to store current sample");
        }

        match previous {
            Some(previous) => {
                let result = compute(&previous, &current);
                debug!(?result, "Computed rates");
                result
            }
            None => {
                info!("No previous sample, bootstrapping");
                RateResult::NoPriorSample
            }
        }
    }
}
