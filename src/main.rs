//! # taskdeck
//!
//! A single-user task dashboard for the terminal: tasks rendered as cards in
//! a grid or as table rows, with layout and sort preferences that persist
//! between sessions, and a plain CLI over the same local JSON store.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the dashboard
//! td
//!
//! # Add a task via CLI
//! td add "Write launch notes" --desc "Draft and circulate" --priority high --due friday
//!
//! # List tasks sorted by priority, highest first
//! td list --order priority --desc
//!
//! # Switch the dashboard to the table layout permanently
//! td settings set --style list
//! ```
//!
//! Data is stored locally in `~/.taskdeck/` as two JSON files: `tasks.json`
//! (the task list) and `settings.json` (display preferences).

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod error;
pub mod fields;
pub mod settings;
pub mod sort;
pub mod store;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use settings::{SettingsStore, SETTINGS_FILE};
use store::{TaskStore, TASKS_FILE};

fn main() {
    let cli = Cli::parse();

    // Determine the data directory
    let data_dir = cli.data_dir.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".taskdeck")
    });
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        eprintln!("Failed to create data directory {}: {}", data_dir.display(), e);
        std::process::exit(1);
    }

    let command = cli.command.unwrap_or(Commands::Ui);

    // Commands that don't touch the stores directly
    match command {
        Commands::Ui => {
            cmd_ui(&data_dir);
            return;
        }
        Commands::Completions { shell } => {
            cmd_completions(shell);
            return;
        }
        _ => {}
    }

    let mut store = TaskStore::load(&data_dir.join(TASKS_FILE));
    let mut settings_store = SettingsStore::load(&data_dir.join(SETTINGS_FILE));

    match command {
        Commands::Ui | Commands::Completions { .. } => unreachable!("handled above"),

        Commands::Add {
            title, desc, priority, status, category, assignee, due, reminder, start, end,
        } => cmd_add(
            &mut store, title, desc, priority, status, category, assignee, due, reminder,
            start, end,
        ),

        Commands::List { all, status, category, order, asc, desc, limit } => cmd_list(
            &store,
            settings_store.settings(),
            all,
            status,
            category,
            order,
            asc,
            desc,
            limit,
        ),

        Commands::View { id } => cmd_view(&store, id),

        Commands::Update {
            id, title, desc, priority, status, category, assignee, due, reminder, start,
            end, clear_due, clear_reminder, clear_times, clear_category, clear_assignee,
        } => cmd_update(
            &mut store, id, title, desc, priority, status, category, assignee, due,
            reminder, start, end, clear_due, clear_reminder, clear_times, clear_category,
            clear_assignee,
        ),

        Commands::Complete { id } => cmd_complete(&mut store, id),

        Commands::Reopen { id } => cmd_reopen(&mut store, id),

        Commands::Archive { id } => cmd_archive(&mut store, id),

        Commands::Delete { id } => cmd_delete(&mut store, id),

        Commands::Settings { action } => cmd_settings(&mut settings_store, action),
    }
}
