//! Reply definitions
//!
//! Results of executed commands.

/// Reply status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    NotFound,
}

/// The result of a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<K, C, V> {
    /// Keys for `ListKeys` (unordered)
    Keys(Vec<K>),

    /// Ascending (column, value) pairs for `ReadKey` / `ReadRange`
    Columns(Vec<(C, V)>),

    /// Value for `ReadValue`, `None` when absent
    Value(Option<V>),

    /// Acknowledgement for writes, deletes and checkpoints
    Done,
}

impl<K, C, V> Reply<K, C, V> {
    /// `NotFound` for an absent value or an empty column list
    pub fn status(&self) -> Status {
        match self {
            Reply::Value(None) => Status::NotFound,
            Reply::Columns(columns) if columns.is_empty() => Status::NotFound,
            _ => Status::Ok,
        }
    }
}
