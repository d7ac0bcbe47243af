pub mod types;
pub mod validation;

pub use types::{Config, SourceConfig, StoreConfig, ENV_COMMAND, ENV_STATE_FILE, ENV_TIMEOUT_SECS};
