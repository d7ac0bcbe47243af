use anyhow::{Context, Result};
use tracing::{debug, error, warn};

use crate::cli::Args;
use crate::config::Config;
use crate::probe::Probe;
use crate::source::CommandSource;
use crate::status::Report;
use crate::store::FileSampleStore;

pub async fn execute(args: Args) -> Report {
    let thresholds = args.thresholds();
    if thresholds.active().is_none() && (args.warning.is_some() || args.critical.is_some()) {
        warn!("Both --warning and --critical are required, thresholds ignored");
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            let message = format!("{e:#}");
            error!(error = %message, "Configuration rejected");
            return Report::unknown(message);
        }
    };
    debug!(?config, "Configuration loaded");

    let probe = Probe::new(
        CommandSource::new(config.source),
        FileSampleStore::new(config.store.path),
    );
    probe.run(&thresholds).await
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;

    if let Some(path) = &args.state_file {
        config.store.path = path.clone();
        config.validate().context("Invalid --state-file")?;
    }

    Ok(config)
}

pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_level = match args.verbose {
        0 => args.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;

    // Check if JSON formatting is requested via environment or deployment
    let use_json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or_else(|_| {
            std::env::var("ENVIRONMENT")
                .or_else(|_| std::env::var("ENV"))
                .map(|v| matches!(v.to_lowercase().as_str(), "production" | "prod"))
                .unwrap_or(false)
        });

    // stdout carries the plugin output line, logs go to stderr
    if use_json_format {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .flatten_event(false),
            )
            .try_init()
            .context("Failed to install JSON log subscriber")?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(false)
                    .compact(),
            )
            .try_init()
            .context("Failed to install log subscriber")?;
    }

    debug!(json = use_json_format, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_state_file_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("check_pdns.toml");
        std::fs::write(&config_path, "[store]\npath = \"/var/lib/check_pdns\"\n").unwrap();
        let state_path = dir.path().join("state.json");

        let args = Args::try_parse_from([
            "check_pdns".into(),
            "--config".into(),
            config_path.into_os_string(),
            "--state-file".into(),
            state_path.clone().into_os_string(),
        ])
        .unwrap();

        let config = load_config(&args).unwrap();
        assert_eq!(config.store.path, state_path);
    }

    #[test]
    fn test_missing_config_file_is_reported() {
        let args = Args::try_parse_from(["check_pdns", "--config", "/nonexistent/check_pdns.toml"])
            .unwrap();
        let err = load_config(&args).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/check_pdns.toml"));
    }

    #[tokio::test]
    async fn test_execute_with_bad_config_is_unknown() {
        let args = Args::try_parse_from([
            "check_pdns",
            "--state-file",
            "/",
            "-w",
            "1",
            "-c",
            "2",
        ])
        .unwrap();
        let report = execute(args).await;
        assert_eq!(report.exit_code(), 3);
        assert!(report.summary.contains("store.path"));
    }
}
