use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::SampleStore;
use crate::error::{ProbeError, Result};
use crate::metrics::Snapshot;

/// Snapshot stored as JSON in a single file.
///
/// Writes go to a sibling `<name>.tmp` file which is synced and then renamed
/// over the target, so an interrupted save leaves the previous snapshot (or a
/// stray temp file that is never read) behind.
#[derive(Debug, Clone)]
pub struct FileSampleStore {
    path: PathBuf,
}

impl FileSampleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_atomically(&self, data: &[u8]) -> std::io::Result<()> {
        let temp = self.temp_path();
        let result = File::create(&temp)
            .and_then(|mut file| {
                file.write_all(data)?;
                file.sync_all()
            })
            .and_then(|_| fs::rename(&temp, &self.path));

        if result.is_err() {
            let _ = fs::remove_file(&temp);
        }
        result
    }
}

impl SampleStore for FileSampleStore {
    fn load(&self) -> Option<Snapshot> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No previous sample stored");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Cannot read state file, treating as first run");
                return None;
            }
        };

        match serde_json::from_slice::<Snapshot>(&content) {
            Ok(snapshot) => {
                debug!(path = %self.path.display(), "Loaded previous sample");
                Some(snapshot)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "State file is corrupt, treating as first run");
                None
            }
        }
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let data = serde_json::to_vec(snapshot)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ProbeError::store(parent, e))?;
        }

        self.write_atomically(&data)
            .map_err(|e| ProbeError::store(&self.path, e))?;

        debug!(path = %self.path.display(), bytes = data.len(), "Stored current sample");
        Ok(())
    }
}
