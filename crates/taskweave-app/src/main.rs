//! taskweave binary - composition root.
//!
//! Builds the workspace from configuration, runs one CLI command against it,
//! and shuts the pipeline down. Ingestion commands wait briefly for the
//! asynchronous pipeline to drain before printing what landed.

mod cli;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use taskweave_app::Workspace;
use taskweave_core::{Result, TaskweaveConfig};

use cli::{Cli, Command};

/// How long ingestion commands wait for the pipeline to settle.
const SETTLE: std::time::Duration = std::time::Duration::from_millis(750);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => TaskweaveConfig::load(path)?,
        None => TaskweaveConfig::default(),
    };
    let workspace = Workspace::open(config)?;
    workspace.start()?;

    match cli.command {
        Command::Ingest { path } => {
            let outcome = workspace.process_file(&path);
            println!("routed: {:?}", outcome);
            tokio::time::sleep(SETTLE).await;
            print_pending(&workspace);
        }
        Command::Text { text, source } => {
            workspace.ingest_text(&text, &source);
            tokio::time::sleep(SETTLE).await;
            print_pending(&workspace);
        }
        Command::Pending => print_pending(&workspace),
        Command::Approve { id, edited } => {
            let edited_data = match edited {
                Some(raw) => Some(serde_json::from_str(&raw)?),
                None => None,
            };
            let item = workspace.approve_confirmation(&id, edited_data)?;
            println!("approved {}", item.id);
            tokio::time::sleep(SETTLE).await;
            print_tasks(&workspace);
        }
        Command::Reject { id, reason } => {
            let item = workspace.reject_confirmation(&id, reason.as_deref())?;
            println!("rejected {}", item.id);
        }
        Command::Tasks => print_tasks(&workspace),
        Command::Conflicts => {
            let conflicts = workspace.detect_conflicts(None);
            if conflicts.is_empty() {
                println!("no conflicts");
            }
            for conflict in conflicts {
                println!(
                    "[{}] {} {:?} - {}",
                    conflict.severity, conflict.kind, conflict.affected_task_indices,
                    conflict.description
                );
            }
        }
        Command::Status => {
            for (agent_id, status) in workspace.agent_statuses() {
                println!("{:<20} {}", agent_id, status);
            }
        }
        Command::Search { query, k } => {
            for hit in workspace.search(&query, k) {
                println!("{:.3}  {}", hit.score, hit.text);
            }
        }
    }

    workspace.stop();
    Ok(())
}

fn print_pending(workspace: &Workspace) {
    let pending = workspace.pending_confirmations(None);
    if pending.is_empty() {
        println!("nothing pending");
        return;
    }
    for item in pending {
        println!(
            "{}  [{:.2}]  {}",
            item.id,
            item.confidence,
            item.data.get("task").and_then(|t| t.as_str()).unwrap_or("?")
        );
    }
}

fn print_tasks(workspace: &Workspace) {
    let tasks = workspace.tasks();
    if tasks.is_empty() {
        println!("no tasks");
        return;
    }
    for task in tasks {
        let assignee = if task.has_assignee() {
            task.assignee.as_str()
        } else {
            "unassigned"
        };
        let deadline = if task.has_deadline() {
            task.deadline.as_str()
        } else {
            "-"
        };
        println!("[{}] {} ({}, due {})", task.priority, task.text, assignee, deadline);
    }
}
