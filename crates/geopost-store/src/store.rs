//! JSON file backed message store.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use geopost_models::Message;
use tempfile::NamedTempFile;

use crate::error::StoreError;

/// File used when no path is configured, relative to the working directory.
pub const DEFAULT_STORE_FILE: &str = "messages.json";

/// Ordered, append-only message persistence over one JSON file.
///
/// The store assumes a single writer. [`append`](Self::append) is a
/// load-push-save sequence and is not atomic with respect to other
/// processes writing the same file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageStore {
    path: PathBuf,
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_FILE)
    }
}

impl MessageStore {
    /// A store backed by `path`. Nothing is touched until the first call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory that holds the backing file and its temporary siblings.
    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Every stored message, oldest first.
    ///
    /// A missing file is an empty store. A file that is present but does not
    /// parse as a message array is [`StoreError::Corrupted`].
    pub fn load(&self) -> Result<Vec<Message>, StoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no message file yet");
                return Ok(Vec::new());
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "failed to read messages");
                return Err(StoreError::io("read", &self.path, e));
            }
        };

        let messages: Vec<Message> = serde_json::from_slice(&raw).map_err(|source| {
            tracing::error!(path = %self.path.display(), error = %source, "message file is corrupted");
            StoreError::Corrupted {
                path: self.path.clone(),
                source,
            }
        })?;

        tracing::debug!(path = %self.path.display(), count = messages.len(), "loaded messages");
        Ok(messages)
    }

    /// Replace the file with exactly `records`.
    ///
    /// Records with a NaN or infinite coordinate are refused with
    /// [`StoreError::NonFiniteCoordinate`] before anything is written.
    ///
    /// The content is written to a temporary file in the same directory,
    /// synced, then renamed over the destination. On any failure the
    /// temporary file is removed and the previous content stays in place.
    pub fn save(&self, records: &[Message]) -> Result<(), StoreError> {
        if let Some((index, m)) = records
            .iter()
            .enumerate()
            .find(|(_, m)| !m.lat.is_finite() || !m.lon.is_finite())
        {
            tracing::error!(path = %self.path.display(), index, lat = m.lat, lon = m.lon, "refusing to save non-finite coordinate");
            return Err(StoreError::NonFiniteCoordinate {
                index,
                lat: m.lat,
                lon: m.lon,
            });
        }

        let mut payload = serde_json::to_vec_pretty(records)?;
        payload.push(b'\n');

        let dir = self.dir();
        fs::create_dir_all(dir).map_err(|e| StoreError::io("create directory", dir, e))?;

        // Dropping `tmp` on an early return deletes it.
        let mut tmp = NamedTempFile::new_in(dir)
            .map_err(|e| StoreError::io("create temporary file in", dir, e))?;
        if let Ok(meta) = fs::metadata(&self.path) {
            // Keep the permissions of the file being replaced.
            if let Err(e) = tmp.as_file().set_permissions(meta.permissions()) {
                tracing::warn!(path = %self.path.display(), error = %e, "could not copy permissions of replaced file");
            }
        }
        tmp.write_all(&payload)
            .map_err(|e| StoreError::io("write", tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io("sync", tmp.path(), e))?;
        tmp.persist(&self.path).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e.error, "failed to replace message file");
            StoreError::io("replace", &self.path, e.error)
        })?;

        tracing::debug!(path = %self.path.display(), count = records.len(), "saved messages");
        Ok(())
    }

    /// Load, push `record`, save. Returns the full sequence including the
    /// new record at the end.
    ///
    /// A corrupted file is reported and left untouched rather than being
    /// overwritten with a one-element array.
    pub fn append(&self, record: Message) -> Result<Vec<Message>, StoreError> {
        let mut records = self.load()?;
        records.push(record);
        self.save(&records)?;
        tracing::info!(path = %self.path.display(), count = records.len(), "message appended");
        Ok(records)
    }
}
