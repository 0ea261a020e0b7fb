//! Error types for kcvstore
//!
//! Only resource failures are errors. Missing keys and columns are reported
//! as `None` or empty sequences by the store and never reach this type.

use thiserror::Error;

/// Result type alias using KcvError
pub type Result<T> = std::result::Result<T, KcvError>;

/// Unified error type for kcvstore operations
#[derive(Debug, Error)]
pub enum KcvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Snapshot Errors
    // -------------------------------------------------------------------------
    #[error("Snapshot corruption detected: {0}")]
    SnapshotCorrupt(String),

    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u16),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Concurrency Errors
    // -------------------------------------------------------------------------
    #[error("Store is still shared by {0} other handle(s)")]
    StillShared(usize),
}
