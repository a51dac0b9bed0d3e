use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Single-user task dashboard with a local JSON store.
/// Data lives under ~/.taskdeck or a directory passed via --data-dir.
#[derive(Parser)]
#[command(name = "td", version, about = "Task dashboard and CLI")]
pub struct Cli {
    /// Directory holding tasks.json and settings.json.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Defaults to the dashboard when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}
