//! Persistence of the single most recent counter snapshot.
//!
//! The probe keeps exactly one snapshot between invocations. [`SampleStore`]
//! abstracts where it lives: [`FileSampleStore`] for real runs and
//! [`MemorySampleStore`] for tests.

pub mod file;
pub mod memory;

pub use file::FileSampleStore;
pub use memory::MemorySampleStore;

use crate::error::Result;
use crate::metrics::Snapshot;

/// Storage for the previous sample.
pub trait SampleStore {
    /// Read the stored snapshot.
    ///
    /// Returns `None` when nothing was stored yet and also when the stored
    /// data cannot be read or decoded; callers treat both as a first run.
    fn load(&self) -> Option<Snapshot>;

    /// Replace the stored snapshot.
    ///
    /// Readers observe either the old or the new snapshot, never a mix.
    fn save(&self, snapshot: &Snapshot) -> Result<()>;
}
