//! Snapshot file
//!
//! Reads and atomically replaces the on-disk snapshot.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::hash::Hash;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::{KcvError, Result};
use crate::store::KeySpace;

use super::decode;

/// Location of a snapshot on disk
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    /// Snapshot path
    path: PathBuf,
    /// fsync the temporary file before renaming it into place
    sync: bool,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>, sync: bool) -> Self {
        Self {
            path: path.into(),
            sync,
        }
    }

    /// Read and decode the snapshot
    ///
    /// Returns:
    /// - `Ok(Some(keyspace))` — snapshot decoded
    /// - `Ok(None)` — no snapshot file exists yet
    /// - `Err(_)` — the file exists but could not be read or decoded
    pub fn load<K, C, V>(&self) -> Result<Option<KeySpace<K, C, V>>>
    where
        K: DeserializeOwned + Eq + Hash,
        C: DeserializeOwned + Ord,
        V: DeserializeOwned,
    {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let keyspace = decode(&bytes)?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "snapshot read");
        Ok(Some(keyspace))
    }

    /// Replace the snapshot with already-encoded bytes
    ///
    /// Writes to `<path>.tmp` and renames over `<path>`, so a failed save
    /// leaves the previous snapshot intact.
    pub fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.tmp_path();
        if let Err(e) = self.write_tmp(&tmp_path, bytes) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "snapshot written");
        Ok(())
    }

    /// Snapshot path
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn write_tmp(&self, tmp_path: &Path, bytes: &[u8]) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(tmp_path)?;

        let mut writer = BufWriter::new(file);
        writer.write_all(bytes)?;
        writer.flush()?;

        let file: File = writer
            .into_inner()
            .map_err(|e| KcvError::Io(e.into_error()))?;
        if self.sync {
            file.sync_all()?;
        }

        Ok(())
    }

    /// "data/store.kcv" → "data/store.kcv.tmp"
    fn tmp_path(&self) -> PathBuf {
        let mut name: OsString = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}
