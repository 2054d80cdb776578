use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use todolist_core::{RecordId, StoreBackend};

#[derive(Parser)]
#[command(name = "todolist", about = "Personal todo list backed by a local file", version)]
pub struct Cli {
    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct StorageArgs {
    /// Directory holding the todo store (default: ./.todolist)
    #[arg(long, global = true, env = "TODOLIST_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Persistence backend: json or sqlite
    #[arg(long, global = true, env = "TODOLIST_BACKEND", default_value = "json")]
    pub backend: StoreBackend,

    /// Store file name inside the data directory
    #[arg(long, global = true)]
    pub file: Option<String>,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, global = true, env = "TODOLIST_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files (default: <data-dir>/logs)
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new todo
    Add {
        title: String,

        #[arg(long, default_value = "")]
        body: String,
    },

    /// List todos (unarchived by default)
    List {
        /// Show only archived todos
        #[arg(long, conflicts_with = "all")]
        archived: bool,

        /// Show every todo
        #[arg(long)]
        all: bool,
    },

    /// Print one todo in full
    Show { id: RecordId },

    /// Change title and/or body; clearing both deletes the todo
    Edit {
        id: RecordId,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        body: Option<String>,
    },

    /// Mark a todo as done
    Done {
        id: RecordId,

        /// Mark as not done instead
        #[arg(long)]
        undo: bool,
    },

    /// Move a todo between the main list and the archive
    Archive { id: RecordId },

    /// Delete a todo
    Delete { id: RecordId },

    /// Print a plain-text digest for sharing
    Digest {
        #[arg(long)]
        include_archived: bool,
    },
}
