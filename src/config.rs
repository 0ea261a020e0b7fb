//! Configuration for kcvstore
//!
//! Centralized configuration with sensible defaults. The default config is a
//! purely in-memory store: nothing is loaded and nothing is saved.

use std::path::PathBuf;

use crate::error::{KcvError, Result};
use crate::index::SlicePolicy;

/// Main configuration for a Store instance
#[derive(Debug, Clone, Default)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Persistence Configuration
    // -------------------------------------------------------------------------
    /// Snapshot file loaded on open and written on close.
    /// `None` keeps the store in memory only.
    pub snapshot_path: Option<PathBuf>,

    /// What to do when an existing snapshot cannot be read or decoded
    pub load_policy: LoadPolicy,

    /// fsync the snapshot before it replaces the previous one
    pub sync_on_save: bool,

    // -------------------------------------------------------------------------
    // Query Configuration
    // -------------------------------------------------------------------------
    /// How `get_slice` treats its `stop` column
    pub slice_policy: SlicePolicy,
}

/// Snapshot load policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Log the failure and start with an empty store
    #[default]
    Tolerant,

    /// Fail `Store::open` with the load error
    Strict,
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject configurations that can never be saved
    pub fn validate(&self) -> Result<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        if path.as_os_str().is_empty() {
            return Err(KcvError::Config("snapshot path is empty".to_string()));
        }
        if path.is_dir() {
            return Err(KcvError::Config(format!(
                "snapshot path {} is a directory",
                path.display()
            )));
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the snapshot file path (enables persistence)
    pub fn snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.snapshot_path = Some(path.into());
        self
    }

    /// Set the snapshot load policy
    pub fn load_policy(mut self, policy: LoadPolicy) -> Self {
        self.config.load_policy = policy;
        self
    }

    /// Enable or disable fsync on save
    pub fn sync_on_save(mut self, sync: bool) -> Self {
        self.config.sync_on_save = sync;
        self
    }

    /// Set the slice policy used by `get_slice`
    pub fn slice_policy(mut self, policy: SlicePolicy) -> Self {
        self.config.slice_policy = policy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
