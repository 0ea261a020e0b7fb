//! kcv CLI
//!
//! Runs a single operation against a snapshot file: opens the store, executes
//! the command, prints the reply and closes the store (saving the snapshot).

use clap::{Parser, Subcommand};
use kcvstore::{Command, Config, LoadPolicy, Reply, SlicePolicy, Status, Store};
use tracing_subscriber::{fmt, EnvFilter};

type StringStore = Store<String, String, String>;

/// kcv CLI
#[derive(Parser, Debug)]
#[command(name = "kcv")]
#[command(about = "CLI for the kcvstore key/column/value store")]
#[command(version)]
struct Args {
    /// Snapshot file
    #[arg(short, long, default_value = "./kcv.snapshot")]
    snapshot: String,

    /// Fail instead of starting empty when the snapshot is unreadable
    #[arg(long)]
    strict: bool,

    /// Skip fsync when saving the snapshot
    #[arg(long)]
    no_sync: bool,

    /// Treat the slice stop column as an upper bound instead of an exact match
    #[arg(long)]
    upper_bound: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all keys
    Keys,

    /// Get a column value, or every column of a key
    Get {
        /// The key to read
        key: String,

        /// The column to read (all columns if omitted)
        column: Option<String>,
    },

    /// Get the columns of a key between two columns, inclusive
    Slice {
        /// The key to read
        key: String,

        /// First column (from the beginning if omitted)
        #[arg(long)]
        start: Option<String>,

        /// Last column (to the end if omitted)
        #[arg(long)]
        stop: Option<String>,
    },

    /// Set a column value
    Set {
        /// The key to write
        key: String,

        /// The column to write
        column: String,

        /// The value to store
        value: String,
    },

    /// Delete a column
    Del {
        /// The key holding the column
        key: String,

        /// The column to delete
        column: String,
    },

    /// Delete a key and all of its columns
    DelKey {
        /// The key to delete
        key: String,
    },

    /// Print the whole store
    Dump,
}

impl Commands {
    /// `None` for commands that are not store operations
    fn into_command(self) -> Option<Command<String, String, String>> {
        let command = match self {
            Commands::Keys => Command::ListKeys,
            Commands::Get { key, column: None } => Command::ReadKey { key },
            Commands::Get {
                key,
                column: Some(column),
            } => Command::ReadValue { key, column },
            Commands::Slice { key, start, stop } => Command::lookup(key, start, stop),
            Commands::Set { key, column, value } => Command::WriteValue { key, column, value },
            Commands::Del { key, column } => Command::DeleteValue { key, column },
            Commands::DelKey { key } => Command::DeleteKey { key },
            Commands::Dump => return None,
        };
        Some(command)
    }
}

fn main() {
    // Initialize tracing/logging (stderr, so stdout carries only replies)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,kcvstore=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("kcv v{}", kcvstore::VERSION);

    // Build config from args
    let config = Config::builder()
        .snapshot_path(&args.snapshot)
        .load_policy(if args.strict {
            LoadPolicy::Strict
        } else {
            LoadPolicy::Tolerant
        })
        .sync_on_save(!args.no_sync)
        .slice_policy(if args.upper_bound {
            SlicePolicy::UpperBound
        } else {
            SlicePolicy::ExactStop
        })
        .build();

    let outcome = StringStore::scoped(config, |store| match args.command.into_command() {
        Some(command) => store.execute(command).map(|reply| print_reply(&reply)),
        None => {
            println!("{}", store);
            Ok(Status::Ok)
        }
    });

    match outcome {
        Ok(Status::Ok) => {}
        Ok(Status::NotFound) => std::process::exit(2),
        Err(e) => {
            tracing::error!("kcv failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print a reply to stdout and return its status
fn print_reply(reply: &Reply<String, String, String>) -> Status {
    match reply {
        Reply::Keys(keys) => {
            let mut keys: Vec<&String> = keys.iter().collect();
            keys.sort();
            for key in keys {
                println!("{}", key);
            }
        }
        Reply::Columns(columns) => {
            for (column, value) in columns {
                println!("{}\t{}", column, value);
            }
        }
        Reply::Value(Some(value)) => println!("{}", value),
        Reply::Value(None) => println!("(nil)"),
        Reply::Done => println!("OK"),
    }
    reply.status()
}
