//! Operator CLI (spec §4.9): a short-lived process for ad-hoc inspection and
//! maintenance of the memory store, reusing the same handler functions the
//! hook router calls so query/stats/gc/export/backup behave identically
//! whether invoked by the host integration or by hand.

use crate::config::Config;
use crate::router::handlers;
use crate::router::HookEvent;
use crate::store::Store;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mira")]
#[command(author = "Conary Labs")]
#[command(version)]
#[command(about = "Operator CLI for the project memory engine", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Project path to scope the command to (defaults to the current directory)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Full-text search across sessions, decisions, and learnings
    Query {
        /// Search text (joined with spaces if given as multiple words)
        text: Vec<String>,
    },
    /// Show session and/or project statistics
    Stats {
        /// Show stats for a specific session id
        #[arg(long)]
        session: Option<String>,
        /// Show project-wide stats
        #[arg(long)]
        project: bool,
    },
    /// Apply decay and remove learnings below the relevance threshold
    Gc,
    /// Export recent sessions, active decisions, and top learnings as JSON
    Export,
    /// Copy the database file into the backups directory
    Backup,
}

/// Runs the requested subcommand, printing its output and returning the
/// process exit code.
pub async fn run(args: CliArgs) -> i32 {
    let mut config = Config::load();
    config.validate();

    let db_path = crate::config::default_db_path();
    let store = match Store::open(&db_path).await {
        Ok(store) => store,
        Err(err) => {
            eprintln!("failed to open memory store: {err}");
            return 1;
        }
    };

    let project_path = args
        .project
        .or_else(|| std::env::current_dir().ok())
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let event = HookEvent { cwd: Some(project_path), ..Default::default() };

    let response = match &args.command {
        Command::Query { text } => {
            let joined = text.join(" ");
            handlers::query(&store, std::slice::from_ref(&joined)).await
        }
        Command::Stats { session, project } => {
            let mut stats_args = Vec::new();
            if let Some(session) = session {
                stats_args.push("--session".to_string());
                stats_args.push(session.clone());
            }
            if *project {
                stats_args.push("--project".to_string());
            }
            handlers::stats(&store, &event, &stats_args).await
        }
        Command::Gc => handlers::gc(&store, &config).await,
        Command::Export => handlers::export(&store, &event).await,
        Command::Backup => handlers::backup(&store, &db_path).await,
    };

    store.close().await;

    let text = response
        .hook_specific_output
        .and_then(|out| out.system_message.or(out.additional_context))
        .unwrap_or_else(|| "(no output)".to_string());
    let is_error = text.starts_with("Error");
    println!("{text}");

    if is_error { 1 } else { 0 }
}
