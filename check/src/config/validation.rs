use crate::config::types::Config;
use crate::error::{ConfigError, Result};

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.store.path.as_os_str().is_empty() || self.store.path.file_name().is_none() {
            return Err(ConfigError::MissingField {
                field: "store.path".to_string(),
            }
            .into());
        }

        if self.source.command.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "source.command".to_string(),
            }
            .into());
        }

        if self.source.timeout_secs == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "source.timeout_secs".to_string(),
                duration: self.source.timeout(),
            }
            .into());
        }

        Ok(())
    }
}
