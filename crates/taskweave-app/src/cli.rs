//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "taskweave", about = "Multi-agent task extraction pipeline")]
pub struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Ingest a document and queue extracted action items for confirmation.
    Ingest {
        /// Path to a plain-text document.
        path: PathBuf,
    },
    /// Ingest raw text (e.g. pasted transcript or notes).
    Text {
        text: String,
        /// Source label recorded with extracted items.
        #[arg(long, default_value = "manual")]
        source: String,
    },
    /// List items awaiting confirmation.
    Pending,
    /// Approve a pending item by id.
    Approve {
        id: String,
        /// Replacement JSON data for the item.
        #[arg(long)]
        edited: Option<String>,
    },
    /// Reject a pending item by id.
    Reject {
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Show the authoritative task list.
    Tasks,
    /// Run conflict detection over the current task list.
    Conflicts,
    /// Show agent statuses.
    Status,
    /// Semantic search over indexed documents.
    Search {
        query: String,
        #[arg(long, default_value_t = 5)]
        k: usize,
    },
}
