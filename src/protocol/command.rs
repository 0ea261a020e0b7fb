//! Command definitions
//!
//! One variant per public store operation.

/// Command types, used to label commands in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    ListKeys,
    ReadKey,
    ReadValue,
    ReadRange,
    WriteValue,
    DeleteValue,
    DeleteKey,
    Checkpoint,
}

/// A store operation with owned arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<K, C, V> {
    /// List every key
    ListKeys,

    /// Read all columns of a key
    ReadKey { key: K },

    /// Read a single column
    ReadValue { key: K, column: C },

    /// Read a column slice
    ReadRange {
        key: K,
        start: Option<C>,
        stop: Option<C>,
    },

    /// Insert or overwrite a column
    WriteValue { key: K, column: C, value: V },

    /// Remove a column
    DeleteValue { key: K, column: C },

    /// Remove a key and all its columns
    DeleteKey { key: K },

    /// Save the snapshot without closing the store
    Checkpoint,
}

impl<K, C, V> Command<K, C, V> {
    /// Build a key read: a slice if either bound is given, otherwise the
    /// full key
    pub fn lookup(key: K, start: Option<C>, stop: Option<C>) -> Self {
        if start.is_some() || stop.is_some() {
            Command::ReadRange { key, start, stop }
        } else {
            Command::ReadKey { key }
        }
    }

    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::ListKeys => CommandType::ListKeys,
            Command::ReadKey { .. } => CommandType::ReadKey,
            Command::ReadValue { .. } => CommandType::ReadValue,
            Command::ReadRange { .. } => CommandType::ReadRange,
            Command::WriteValue { .. } => CommandType::WriteValue,
            Command::DeleteValue { .. } => CommandType::DeleteValue,
            Command::DeleteKey { .. } => CommandType::DeleteKey,
            Command::Checkpoint => CommandType::Checkpoint,
        }
    }
}
