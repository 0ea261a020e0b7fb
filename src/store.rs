//! Store Module
//!
//! The key → column index map and its snapshot lifecycle.
//!
//! ## Responsibilities
//! - Create a key's ColumnIndex lazily on its first write
//! - Route reads, writes and slices to the key's ColumnIndex
//! - Load the snapshot on open, save it on close (or drop) if anything changed

use std::borrow::Borrow;
use std::collections::hash_map::{self, HashMap};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{Config, LoadPolicy};
use crate::error::Result;
use crate::index::ColumnIndex;
use crate::protocol::{Command, Reply};
use crate::snapshot::{self, SnapshotFile};

/// Every key with its column index
pub type KeySpace<K, C, V> = HashMap<K, ColumnIndex<C, V>>;

/// Snapshot target of a persistent store
///
/// `encode` is captured by `Store::open`, where the serde bounds are known,
/// so saving on drop works without putting those bounds on `Store` itself.
struct Persistence<K, C, V> {
    file: SnapshotFile,
    encode: fn(&KeySpace<K, C, V>) -> Result<Vec<u8>>,
}

impl<K, C, V> fmt::Debug for Persistence<K, C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persistence").field("file", &self.file).finish()
    }
}

impl<K, C, V> Persistence<K, C, V> {
    fn save(&self, keyspace: &KeySpace<K, C, V>) -> Result<()> {
        let bytes = (self.encode)(keyspace)?;
        self.file.write_bytes(&bytes)?;

        tracing::info!(
            path = %self.file.path().display(),
            keys = keyspace.len(),
            bytes = bytes.len(),
            "snapshot saved"
        );
        Ok(())
    }
}

/// An ordered key/column/value store
///
/// ## Ownership
/// Mutations take `&mut self`; the store has exactly one owner at a time.
/// Wrap it in a [`SharedStore`](crate::SharedStore) to share it across
/// threads behind a single lock.
///
/// ## Persistence
/// A store opened with a snapshot path saves the whole key space when it is
/// closed after a write. `close` (or `scoped`) returns the save error; a
/// store that is simply dropped still saves, but can only log a failure.
/// A store that was only read leaves the snapshot file untouched, so reading
/// through a tolerantly opened, unreadable snapshot never replaces it.
#[derive(Debug)]
pub struct Store<K, C, V>
where
    K: Eq + Hash,
    C: Ord,
{
    /// All keys and their columns
    keyspace: KeySpace<K, C, V>,

    /// Store configuration
    config: Config,

    /// `None` for in-memory stores and after `close`
    persistence: Option<Persistence<K, C, V>>,

    /// Set by any write that changed the key space
    modified: bool,
}

impl<K, C, V> Store<K, C, V>
where
    K: Eq + Hash,
    C: Ord,
{
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self {
            keyspace: HashMap::new(),
            config: Config::default(),
            persistence: None,
            modified: false,
        }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Set the value at a key/column, creating the key if needed
    pub fn set(&mut self, key: K, column: C, value: V) {
        self.keyspace
            .entry(key)
            .or_default()
            .insert_or_update(column, value);
        self.modified = true;
    }

    /// Remove a column from a key. Missing keys and columns are a no-op.
    ///
    /// The key stays present even if this removes its last column.
    pub fn delete<KQ, CQ>(&mut self, key: &KQ, column: &CQ) -> Option<V>
    where
        K: Borrow<KQ>,
        KQ: Hash + Eq + ?Sized,
        C: Borrow<CQ>,
        CQ: Ord + ?Sized,
    {
        let removed = self.keyspace.get_mut(key)?.delete(column);
        self.modified |= removed.is_some();
        removed
    }

    /// Remove a key and all of its columns. Missing keys are a no-op.
    pub fn delete_key<KQ>(&mut self, key: &KQ) -> Option<ColumnIndex<C, V>>
    where
        K: Borrow<KQ>,
        KQ: Hash + Eq + ?Sized,
    {
        let removed = self.keyspace.remove(key);
        self.modified |= removed.is_some();
        removed
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Get the value at a key/column
    pub fn get<KQ, CQ>(&self, key: &KQ, column: &CQ) -> Option<&V>
    where
        K: Borrow<KQ>,
        KQ: Hash + Eq + ?Sized,
        C: Borrow<CQ>,
        CQ: Ord + ?Sized,
    {
        self.keyspace.get(key)?.get(column)
    }

    /// All (column, value) pairs of a key in ascending column order.
    /// Empty for a missing key.
    pub fn get_key<KQ>(&self, key: &KQ) -> Vec<(C, V)>
    where
        K: Borrow<KQ>,
        KQ: Hash + Eq + ?Sized,
        C: Clone,
        V: Clone,
    {
        self.keyspace
            .get(key)
            .map(|index| {
                index
                    .items()
                    .map(|(column, value)| (column.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every key, including keys whose columns were all deleted
    pub fn get_keys(&self) -> HashSet<K>
    where
        K: Clone,
    {
        self.keyspace.keys().cloned().collect()
    }

    /// Borrowing iterator over every key (arbitrary order)
    pub fn keys(&self) -> hash_map::Keys<'_, K, ColumnIndex<C, V>> {
        self.keyspace.keys()
    }

    /// Columns of a key from `start` through `stop`, both inclusive
    ///
    /// Uses the configured slice policy. Under the default
    /// [`SlicePolicy::ExactStop`](crate::SlicePolicy::ExactStop) a `stop`
    /// that matches no column leaves the slice open to the end.
    pub fn get_slice<KQ, CQ>(&self, key: &KQ, start: Option<&CQ>, stop: Option<&CQ>) -> Vec<(C, V)>
    where
        K: Borrow<KQ>,
        KQ: Hash + Eq + ?Sized,
        C: Borrow<CQ> + Clone,
        CQ: Ord + ?Sized,
        V: Clone,
    {
        let Some(index) = self.keyspace.get(key) else {
            return Vec::new();
        };

        index
            .range_with(start, stop, self.config.slice_policy)
            .map(|(column, value)| (column.clone(), value.clone()))
            .collect()
    }

    /// The column index of a key
    pub fn column_index<KQ>(&self, key: &KQ) -> Option<&ColumnIndex<C, V>>
    where
        K: Borrow<KQ>,
        KQ: Hash + Eq + ?Sized,
    {
        self.keyspace.get(key)
    }

    pub fn contains_key<KQ>(&self, key: &KQ) -> bool
    where
        K: Borrow<KQ>,
        KQ: Hash + Eq + ?Sized,
    {
        self.keyspace.contains_key(key)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.keyspace.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyspace.is_empty()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Write the snapshot now without closing the store, changed or not.
    /// A no-op for in-memory stores.
    pub fn save(&self) -> Result<()> {
        match &self.persistence {
            Some(persistence) => persistence.save(&self.keyspace),
            None => {
                tracing::debug!("in-memory store, nothing to save");
                Ok(())
            }
        }
    }

    /// Close the store, saving the snapshot if one is configured and the
    /// store was written to
    pub fn close(mut self) -> Result<()> {
        match self.persistence.take() {
            Some(persistence) if self.modified => persistence.save(&self.keyspace),
            Some(persistence) => {
                tracing::debug!(
                    path = %persistence.file.path().display(),
                    "store unchanged, snapshot left as is"
                );
                Ok(())
            }
            None => Ok(()),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Snapshot path, if the store is persistent and still open
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.persistence.as_ref().map(|p| p.file.path())
    }
}

impl<K, C, V> Store<K, C, V>
where
    K: Eq + Hash + Serialize + DeserializeOwned,
    C: Ord + Serialize + DeserializeOwned,
    V: Serialize + DeserializeOwned,
{
    /// Open a store with the given config
    ///
    /// With a snapshot path:
    /// 1. Missing snapshot → start empty
    /// 2. Readable snapshot → load it
    /// 3. Unreadable or corrupt snapshot → apply the load policy
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let Some(path) = config.snapshot_path.clone() else {
            return Ok(Self {
                keyspace: HashMap::new(),
                config,
                persistence: None,
                modified: false,
            });
        };

        let file = SnapshotFile::new(path, config.sync_on_save);

        let keyspace = match file.load::<K, C, V>() {
            Ok(Some(keyspace)) => {
                tracing::info!(
                    path = %file.path().display(),
                    keys = keyspace.len(),
                    "snapshot loaded"
                );
                keyspace
            }
            Ok(None) => {
                tracing::debug!(path = %file.path().display(), "no snapshot, starting empty");
                HashMap::new()
            }
            Err(e) => match config.load_policy {
                LoadPolicy::Tolerant => {
                    tracing::warn!(
                        path = %file.path().display(),
                        error = %e,
                        "snapshot unreadable, starting empty"
                    );
                    HashMap::new()
                }
                LoadPolicy::Strict => return Err(e),
            },
        };

        Ok(Self {
            keyspace,
            config,
            persistence: Some(Persistence {
                file,
                encode: snapshot::encode::<K, C, V>,
            }),
            modified: false,
        })
    }

    /// Open with a snapshot path (convenience method)
    ///
    /// Uses default config with the specified snapshot path
    pub fn open_path(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(Config::builder().snapshot_path(path).build())
    }

    /// Open a store, run `f` on it and close it
    ///
    /// The store is closed even when `f` fails; `f`'s error takes precedence
    /// over a save error in that case. As with `close`, the snapshot is only
    /// rewritten when `f` changed the store.
    pub fn scoped<R, F>(config: Config, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self) -> Result<R>,
    {
        let mut store = Self::open(config)?;
        let outcome = f(&mut store);
        let closed = store.close();

        match (outcome, closed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) | (Err(e), Ok(())) => Err(e),
            (Err(e), Err(save_err)) => {
                tracing::error!(error = %save_err, "snapshot save failed while closing");
                Err(e)
            }
        }
    }
}

impl<K, C, V> Store<K, C, V>
where
    K: Eq + Hash + Clone,
    C: Ord + Clone,
    V: Clone,
{
    /// Execute a command
    ///
    /// Only `Checkpoint` can fail; every other command always succeeds.
    pub fn execute(&mut self, command: Command<K, C, V>) -> Result<Reply<K, C, V>> {
        tracing::trace!(command = ?command.command_type(), "executing command");

        let reply = match command {
            Command::ListKeys => Reply::Keys(self.keys().cloned().collect()),
            Command::ReadKey { key } => Reply::Columns(self.get_key(&key)),
            Command::ReadValue { key, column } => Reply::Value(self.get(&key, &column).cloned()),
            Command::ReadRange { key, start, stop } => {
                Reply::Columns(self.get_slice(&key, start.as_ref(), stop.as_ref()))
            }
            Command::WriteValue { key, column, value } => {
                self.set(key, column, value);
                Reply::Done
            }
            Command::DeleteValue { key, column } => {
                self.delete(&key, &column);
                Reply::Done
            }
            Command::DeleteKey { key } => {
                self.delete_key(&key);
                Reply::Done
            }
            Command::Checkpoint => {
                self.save()?;
                Reply::Done
            }
        };

        Ok(reply)
    }
}

impl<K, C, V> Default for Store<K, C, V>
where
    K: Eq + Hash,
    C: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C, V> Drop for Store<K, C, V>
where
    K: Eq + Hash,
    C: Ord,
{
    fn drop(&mut self) {
        let Some(persistence) = self.persistence.take() else {
            return;
        };
        if !self.modified {
            return;
        }

        if let Err(e) = persistence.save(&self.keyspace) {
            tracing::error!(
                path = %persistence.file.path().display(),
                error = %e,
                "failed to save snapshot on drop"
            );
        }
    }
}

/// One line per key: `key -> [(column, value), ...]`
impl<K, C, V> fmt::Display for Store<K, C, V>
where
    K: Eq + Hash + fmt::Display,
    C: Ord + fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, index)) in self.keyspace.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{} -> [", key)?;
            for (j, (column, value)) in index.items().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "({}, {})", column, value)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
