use std::sync::Mutex;

use super::SampleStore;
use crate::error::Result;
use crate::metrics::Snapshot;

/// In-process store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemorySampleStore {
    slot: Mutex<Option<Snapshot>>,
}

impl MemorySampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a snapshot already stored.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            slot: Mutex::new(Some(snapshot)),
        }
    }
}

impl SampleStore for MemorySampleStore {
    fn load(&self) -> Option<Snapshot> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        *self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(snapshot.clone());
        Ok(())
    }
}
