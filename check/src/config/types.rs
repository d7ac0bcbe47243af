use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{ConfigError, Result};

/// Environment variable overriding [`StoreConfig::path`]
pub const ENV_STATE_FILE: &str = "CHECK_PDNS_STATE_FILE";
/// Environment variable overriding the statistics command line
pub const ENV_COMMAND: &str = "CHECK_PDNS_COMMAND";
/// Environment variable overriding [`SourceConfig::timeout_secs`]
pub const ENV_TIMEOUT_SECS: &str = "CHECK_PDNS_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub source: SourceConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// State file holding the previous sample (default: /tmp/check_pdns)
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Program printing the PowerDNS statistics
    pub command: String,
    /// Arguments passed to `command`
    pub args: Vec<String>,
    /// Extra environment for `command`
    pub env: BTreeMap<String, String>,
    /// Seconds to wait for `command` before giving up
    pub timeout_secs: u64,
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Command line for logs and error messages
    pub fn command_line(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/tmp/check_pdns"),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            command: "/usr/bin/sudo".to_string(),
            args: vec![
                "/usr/bin/pdns_control".to_string(),
                "show".to_string(),
                "*".to_string(),
            ],
            env: BTreeMap::from([("LANG".to_string(), "en_EN.utf8".to_string())]),
            timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::InvalidFormat {
                message: format!("failed to read {}: {}", path.display(), e),
            },
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::InvalidFormat {
            message: format!("failed to parse {}: {}", path.display(), e),
        })?;
        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Defaults or the given file, then environment overrides, validated.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `CHECK_PDNS_*` overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_STATE_FILE) {
            self.store.path = PathBuf::from(path);
        }

        if let Some(command_line) = lookup(ENV_COMMAND) {
            let mut parts = command_line.split_whitespace().map(str::to_string);
            let command = parts.next().ok_or_else(|| ConfigError::EnvironmentVariable {
                variable: ENV_COMMAND.to_string(),
                message: "command line is empty".to_string(),
            })?;
            self.source.command = command;
            self.source.args = parts.collect();
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.source.timeout_secs =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::EnvironmentVariable {
                        variable: ENV_TIMEOUT_SECS.to_string(),
                        message: format!("expected whole seconds, got {raw:?}"),
                    })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_match_pdns_control_invocation() {
        let config = Config::default();
        assert_eq!(config.store.path, PathBuf::from("/tmp/check_pdns"));
        assert_eq!(
            config.source.command_line(),
            "/usr/bin/sudo /usr/bin/pdns_control show *"
        );
        assert_eq!(config.source.env.get("LANG").map(String::as_str), Some("en_EN.utf8"));
        assert_eq!(config.source.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [store]
            path = "/var/lib/check_pdns/state.json"

            [source]
            timeout_secs = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.store.path, PathBuf::from("/var/lib/check_pdns/state.json"));
        assert_eq!(config.source.timeout_secs, 3);
        assert_eq!(config.source.command, "/usr/bin/sudo");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("check_pdns.toml");
        std::fs::write(
            &path,
            "[source]\ncommand = \"/usr/bin/pdns_control\"\nargs = [\"show\", \"*\"]\n",
        )
        .unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.source.command_line(), "/usr/bin/pdns_control show *");
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = Config::load_from_file("/nonexistent/check_pdns.toml").unwrap_err();
        assert!(matches!(
            err,
            ProbeError::Config(ConfigError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(lookup(&[
                (ENV_STATE_FILE, "/run/check_pdns.state"),
                (ENV_COMMAND, "/usr/bin/rec_control get-all"),
                (ENV_TIMEOUT_SECS, "5"),
            ]))
            .unwrap();

        assert_eq!(config.store.path, PathBuf::from("/run/check_pdns.state"));
        assert_eq!(config.source.command, "/usr/bin/rec_control");
        assert_eq!(config.source.args, vec!["get-all".to_string()]);
        assert_eq!(config.source.timeout_secs, 5);
    }

    #[test]
    fn test_env_override_rejects_bad_timeout() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(lookup(&[(ENV_TIMEOUT_SECS, "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_TIMEOUT_SECS));
    }

    #[test]
    fn test_env_override_rejects_blank_command() {
        let mut config = Config::default();
        let err = config.apply_overrides(lookup(&[(ENV_COMMAND, "   ")])).unwrap_err();
        assert!(matches!(
            err,
            ProbeError::Config(ConfigError::EnvironmentVariable { .. })
        ));
    }
}
