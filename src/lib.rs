//! # kcvstore
//!
//! An embedded key/column/value store with:
//! - Per-key ordered columns (lexicographic for strings)
//! - Inclusive column slices
//! - Whole-store snapshots loaded on open and saved on close after a write
//! - A single-lock shared handle for multi-threaded hosts
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │            Caller / kcv CLI / external front end             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  Command → Reply
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 SharedStore (optional Mutex)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                Store  (HashMap<Key, ColumnIndex>)            │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │ open / close
//!            ▼                                  ▼
//!   ┌─────────────────┐                 ┌─────────────────┐
//!   │   ColumnIndex   │                 │    Snapshot     │
//!   │   (BTreeMap)    │                 │ (bincode + CRC) │
//!   └─────────────────┘                 └─────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use kcvstore::Store;
//!
//! let mut store: Store<String, String, String> = Store::new();
//! for column in ["aa", "ab", "ac", "ad", "ae"] {
//!     store.set("a".to_string(), column.to_string(), "x".to_string());
//! }
//!
//! let slice = store.get_slice("a", Some("ab"), Some("ad"));
//! let columns: Vec<&str> = slice.iter().map(|(c, _)| c.as_str()).collect();
//! assert_eq!(columns, ["ab", "ac", "ad"]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod index;
pub mod snapshot;
pub mod protocol;
pub mod store;
pub mod shared;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KcvError, Result};
pub use config::{Config, LoadPolicy};
pub use index::{ColumnIndex, SlicePolicy};
pub use protocol::{Command, Reply, Status};
pub use store::Store;
pub use shared::SharedStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kcvstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
