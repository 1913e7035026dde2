//! Single-slot JSON snapshot cache for offline viewing.

use chrono::Utc;
use meteomar_core::StorageError;
use std::path::{Path, PathBuf};

use crate::types::Snapshot;

/// Snapshots are valid for 30 minutes; exactly 30 minutes old is stale.
pub const SNAPSHOT_TTL_MS: i64 = 30 * 60 * 1000;

const CACHE_FILE_NAME: &str = "snapshot.json";

/// Whether `snapshot` is still inside its validity window at `now_epoch_ms`.
pub fn is_fresh(snapshot: &Snapshot, now_epoch_ms: i64) -> bool {
    now_epoch_ms - snapshot.captured_at_epoch_ms < SNAPSHOT_TTL_MS
}

/// Holds the last successful live result. One slot for all locations.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    cache_path: PathBuf,
}

impl SnapshotCache {
    pub fn new(config_dir: &Path) -> Self {
        Self {
            cache_path: config_dir.join(CACHE_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.cache_path
    }

    /// Replace whatever is stored with `snapshot`.
    ///
    /// Writes to a sibling temp file first so a crash never leaves a
    /// half-written snapshot behind.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let contents = serde_json::to_vec_pretty(snapshot)?;

        if let Some(parent) = self.cache_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }

        let tmp_path = self.cache_path.with_extension("json.tmp");
        std::fs::write(&tmp_path, contents).map_err(|e| self.write_error(e))?;
        std::fs::rename(&tmp_path, &self.cache_path).map_err(|e| self.write_error(e))?;

        tracing::debug!(
            location_id = %snapshot.location_id,
            "Saved snapshot to {}",
            self.cache_path.display()
        );
        Ok(())
    }

    /// The stored snapshot if it is still fresh.
    pub fn load(&self) -> Option<Snapshot> {
        self.load_at(Utc::now().timestamp_millis())
    }

    /// The stored snapshot if it is fresh at `now_epoch_ms`.
    ///
    /// Missing, stale and corrupt state all read as `None`; corruption is
    /// only logged.
    pub fn load_at(&self, now_epoch_ms: i64) -> Option<Snapshot> {
        let snapshot = match self.read() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Ignoring unreadable snapshot cache: {}", e);
                return None;
            }
        };

        if is_fresh(&snapshot, now_epoch_ms) {
            Some(snapshot)
        } else {
            tracing::debug!(
                age_ms = now_epoch_ms - snapshot.captured_at_epoch_ms,
                "Snapshot is stale"
            );
            None
        }
    }

    fn read(&self) -> Result<Option<Snapshot>, StorageError> {
        let contents = match std::fs::read(&self.cache_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::ReadFailed {
                    path: self.cache_path.display().to_string(),
                    message: e.to_string(),
                })
            }
        };

        serde_json::from_slice(&contents)
            .map(Some)
            .map_err(|e| StorageError::Corruption(e.to_string()))
    }

    fn write_error(&self, e: std::io::Error) -> StorageError {
        StorageError::WriteFailed {
            path: self.cache_path.display().to_string(),
            message: e.to_string(),
        }
    }
}
