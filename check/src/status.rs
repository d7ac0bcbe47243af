//! Threshold evaluation and the plugin output line.
//!
//! A [`Report`] renders as the single line monitoring frameworks expect:
//!
//! ```text
//! WARNING: Error rates: 6.000/s servfail-packets, ... | corrupt-packets=0.000 servfail-packets=6.000 ...
//! ```
//!
//! The severity doubles as the process exit code.

use std::fmt;
use tracing::debug;

use crate::metrics::{Counter, RateResult, Rates};

pub const FIRST_RUN_MESSAGE: &str = "Collecting data for first time run";
pub const TOO_FAST_MESSAGE: &str = "Check can not be executed twice a second";

/// Error rates, in the order they appear in the summary.
const SUMMARY_ERRORS: [Counter; 3] = [
    Counter::ServfailPackets,
    Counter::CorruptPackets,
    Counter::TimedoutPackets,
];

/// Traffic and cache rates, in the order they appear in the summary.
const SUMMARY_STATISTICS: [Counter; 6] = [
    Counter::RecursingQuestions,
    Counter::RecursingAnswers,
    Counter::PacketcacheHit,
    Counter::PacketcacheMiss,
    Counter::QueryCacheHit,
    Counter::QueryCacheMiss,
];

/// Plugin result, ordered by increasing exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Ok = 0,
    Warning = 1,
    Critical = 2,
    Unknown = 3,
}

impl Severity {
    pub fn exit_code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
            Severity::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error-rate thresholds in events per second.
///
/// They only take effect when both are set; a lone warning or critical value
/// is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Thresholds {
    pub warning: Option<f64>,
    pub critical: Option<f64>,
}

impl Thresholds {
    pub fn new(warning: Option<f64>, critical: Option<f64>) -> Self {
        Self { warning, critical }
    }

    /// `(warning, critical)` when both are set.
    pub fn active(&self) -> Option<(f64, f64)> {
        self.warning.zip(self.critical)
    }

    pub fn classify(&self, error_rate: f64) -> Severity {
        match self.active() {
            Some((_, critical)) if error_rate >= critical => Severity::Critical,
            Some((warning, _)) if error_rate >= warning => Severity::Warning,
            _ => Severity::Ok,
        }
    }
}

/// Outcome of one probe run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub severity: Severity,
    pub summary: String,
    pub perfdata: Option<String>,
}

impl Report {
    /// UNKNOWN report without performance data.
    ///
    /// Line breaks and runs of whitespace in `message` are folded into single
    /// spaces so the report stays on one line.
    pub fn unknown(message: impl AsRef<str>) -> Self {
        Self {
            severity: Severity::Unknown,
            summary: message.as_ref().split_whitespace().collect::<Vec<_>>().join(" "),
            perfdata: None,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.severity.exit_code()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.summary)?;
        if let Some(perfdata) = &self.perfdata {
            write!(f, " | {perfdata}")?;
        }
        Ok(())
    }
}

/// Turn a rate result into a report.
pub fn evaluate(result: &RateResult, thresholds: &Thresholds) -> Report {
    match result {
        RateResult::NoPriorSample => Report::unknown(FIRST_RUN_MESSAGE),
        RateResult::TooFast => Report::unknown(TOO_FAST_MESSAGE),
        RateResult::CounterReset { counter, .. } => Report::unknown(format!(
            "Counter reset detected on {counter}, collecting data again"
        )),
        RateResult::Rates(rates) => {
            let error_max = rates.error_max();
            let severity = thresholds.classify(error_max);
            debug!(error_max, ?thresholds, %severity, "Evaluated error rates");

            Report {
                severity,
                summary: summary(rates),
                perfdata: Some(perfdata(rates)),
            }
        }
    }
}

fn summary(rates: &Rates) -> String {
    let describe = |counters: &[Counter]| {
        counters
            .iter()
            .map(|&counter| format!("{:.3}/s {}", rates.get(counter), counter))
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "Error rates: {}, Statistics: {}",
        describe(&SUMMARY_ERRORS[..]),
        describe(&SUMMARY_STATISTICS[..])
    )
}

fn perfdata(rates: &Rates) -> String {
    rates
        .iter()
        .map(|(counter, rate)| format!("{counter}={rate:.3}"))
        .collect::<Vec<_>>()
        .join(" ")
}
