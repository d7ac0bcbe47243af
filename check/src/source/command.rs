use async_trait::async_trait;
use std::collections::BTreeMap;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::{parse_counters, CounterSource};
use crate::config::SourceConfig;
use crate::error::{ProbeError, Result};
use crate::metrics::Counter;

/// Runs the statistics command and parses what it prints.
///
/// The command is executed directly, without a shell, with stdin closed.
/// It is killed if it does not finish within the configured timeout.
#[derive(Debug, Clone)]
pub struct CommandSource {
    config: SourceConfig,
}

impl CommandSource {
    pub fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    async fn run(&self) -> Result<String> {
        let command_line = self.config.command_line();
        debug!(command = %command_line, "Running statistics command");

        let mut command = Command::new(&self.config.command);
        command
            .args(&self.config.args)
            .envs(&self.config.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = timeout(self.config.timeout(), command.output())
            .await
            .map_err(|_| ProbeError::SourceTimeout {
                timeout: self.config.timeout(),
            })?
            .map_err(|e| ProbeError::SourceUnavailable {
                message: format!("failed to run {command_line}: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(command = %command_line, status = %output.status, stderr = %stderr.trim(), "Statistics command failed");
            return Err(ProbeError::SourceUnavailable {
                message: format!("{command_line} exited with {}", output.status),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| ProbeError::SourceUnavailable {
            message: format!("{command_line} printed non UTF-8 output"),
        })
    }
}

#[async_trait]
impl CounterSource for CommandSource {
    async fn fetch(&self) -> Result<BTreeMap<Counter, u64>> {
        let output = self.run().await?;
        parse_counters(&output)
    }
}
