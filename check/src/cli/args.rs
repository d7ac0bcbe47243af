use clap::Parser;
use std::path::PathBuf;

use crate::status::Thresholds;

#[derive(Parser, Debug)]
#[command(
    name = "check_pdns",
    version,
    about = "Nagios plugin to check PowerDNS statistics",
    long_about = "Samples PowerDNS counters through pdns_control, compares them with the \
                 previous sample and reports per-second error, cache and recursion rates. \
                 Warning and critical thresholds apply to the highest of the corrupt, \
                 servfail and timedout packet rates and are only evaluated when both are given."
)]
pub struct Args {
    /// Warning threshold for errors per second
    #[arg(short, long, value_name = "RATE", value_parser = parse_rate)]
    pub warning: Option<f64>,

    /// Critical threshold for errors per second
    #[arg(short, long, value_name = "RATE", value_parser = parse_rate)]
    pub critical: Option<f64>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// State file holding the previous sample (overrides config and CHECK_PDNS_STATE_FILE)
    #[arg(long, value_name = "FILE")]
    pub state_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Args {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.warning, self.critical)
    }
}

fn parse_rate(raw: &str) -> Result<f64, String> {
    let rate: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if !rate.is_finite() || rate < 0.0 {
        return Err(format!("'{raw}' must be a non-negative rate"));
    }
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["check_pdns"]).unwrap();
        assert_eq!(args.thresholds(), Thresholds::default());
        assert_eq!(args.log_level, "warn");
        assert_eq!(args.verbose, 0);
        assert!(args.config.is_none());
        assert!(args.state_file.is_none());
    }

    #[test]
    fn test_short_and_long_thresholds() {
        let short = Args::try_parse_from(["check_pdns", "-w", "5", "-c", "10"]).unwrap();
        let long = Args::try_parse_from(["check_pdns", "--warning=5", "--critical", "10.0"]).unwrap();
        assert_eq!(short.thresholds(), Thresholds::new(Some(5.0), Some(10.0)));
        assert_eq!(long.thresholds(), short.thresholds());
    }

    #[test]
    fn test_paths_and_verbosity() {
        let args = Args::try_parse_from([
            "check_pdns",
            "--config",
            "/etc/check_pdns.toml",
            "--state-file",
            "/var/tmp/check_pdns.json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/etc/check_pdns.toml")));
        assert_eq!(args.state_file, Some(PathBuf::from("/var/tmp/check_pdns.json")));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_rejects_invalid_rates() {
        assert!(Args::try_parse_from(["check_pdns", "-w", "-1"]).is_err());
        assert!(Args::try_parse_from(["check_pdns", "-c", "lots"]).is_err());
        assert!(Args::try_parse_from(["check_pdns", "-c", "inf"]).is_err());
        assert!(Args::try_parse_from(["check_pdns", "--bogus"]).is_err());
    }

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate("0"), Ok(0.0));
        assert_eq!(parse_rate(" 2.5 "), Ok(2.5));
        assert!(parse_rate("NaN").is_err());
        assert!(parse_rate("-0.1").is_err());
    }
}
