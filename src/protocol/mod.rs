//! Protocol Module
//!
//! Typed form of the store's public operation surface, executed by
//! `Store::execute`. Front ends (the `kcv` binary, or an external request
//! router) translate their input into a `Command` and render the `Reply`.
//! No wire format lives here.
//!
//! ### Commands
//! - `ListKeys`    → `Keys`
//! - `ReadKey`     → `Columns`
//! - `ReadValue`   → `Value`
//! - `ReadRange`   → `Columns`
//! - `WriteValue`, `DeleteValue`, `DeleteKey`, `Checkpoint` → `Done`
//!
//! A `Value(None)` or an empty `Columns` reply has status `NotFound`.
//! Errors travel as `KcvError` in the `Result` around the reply.

mod command;
mod reply;

pub use command::{Command, CommandType};
pub use reply::{Reply, Status};
