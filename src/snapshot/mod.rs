//! Snapshot Module
//!
//! Whole-store persistence: the entire key → column index map is written as
//! one file and read back in one piece. There is no incremental format.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (18 bytes)                                       │
//! │   Magic: "KCVS" (4) | Version: u16 (2)                  │
//! │   PayloadCRC: u32 (4) | PayloadLen: u64 (8)             │
//! ├─────────────────────────────────────────────────────────┤
//! │ Payload (PayloadLen bytes)                              │
//! │   bincode(HashMap<Key, ColumnIndex<Column, Value>>)     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//! All integers are little-endian.

mod codec;
mod file;

pub use codec::{decode, encode};
pub use file::SnapshotFile;

// =============================================================================
// Shared Constants (used by codec and file)
// =============================================================================

/// Magic bytes identifying a kcvstore snapshot
pub(crate) const MAGIC: &[u8; 4] = b"KCVS";

/// Current snapshot format version
pub(crate) const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + CRC (4) + PayloadLen (8) = 18 bytes
pub const HEADER_SIZE: usize = 18;
