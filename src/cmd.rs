//! Command implementations for the CLI interface.
//!
//! This module contains the command handlers for the various subcommands,
//! from store CRUD operations to the settings surface and the dashboard
//! entry point.

use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use std::path::Path;

use chrono::Local;

use crate::fields::{LayoutStyle, Priority, SortField, Status};
use crate::settings::{Settings, SettingsPatch, SettingsStore};
use crate::sort::sort_tasks;
use crate::store::*;
use crate::task::{Schedule, TaskDraft, TaskPatch};
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive dashboard.
    Ui,

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Longer description.
        #[arg(long)]
        desc: String,
        /// Priority: low | medium | high.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Status: pending | in-progress | completed | archived.
        #[arg(long, value_enum, default_value_t = Status::Pending)]
        status: Status,
        /// Category label.
        #[arg(long)]
        category: Option<String>,
        /// Assignee name.
        #[arg(long)]
        assignee: Option<String>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", or "in Nd".
        #[arg(long)]
        due: Option<String>,
        /// Reminder: "YYYY-MM-DD HH:MM".
        #[arg(long)]
        reminder: Option<String>,
        /// Scheduled start time: "HH:MM".
        #[arg(long)]
        start: Option<String>,
        /// Scheduled end time: "HH:MM".
        #[arg(long)]
        end: Option<String>,
    },

    /// List tasks with optional filters.
    List {
        /// Include archived tasks.
        #[arg(long)]
        all: bool,
        /// Filter by status.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Filter by category.
        #[arg(long)]
        category: Option<String>,
        /// Sort order for this run (defaults to the stored settings).
        #[arg(long, value_enum)]
        order: Option<SortField>,
        /// Force ascending order.
        #[arg(long, conflicts_with = "desc")]
        asc: bool,
        /// Force descending order.
        #[arg(long)]
        desc: bool,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// View a single task by ID or title.
    View {
        /// Task ID or title to view.
        id: String,
    },

    /// Update fields on a task.
    Update {
        /// Task ID or title to update.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long, value_enum)]
        status: Option<Status>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", or "in Nd".
        #[arg(long)]
        due: Option<String>,
        /// Reminder: "YYYY-MM-DD HH:MM".
        #[arg(long)]
        reminder: Option<String>,
        /// Scheduled start time: "HH:MM".
        #[arg(long)]
        start: Option<String>,
        /// Scheduled end time: "HH:MM".
        #[arg(long)]
        end: Option<String>,
        /// Clear due date.
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
        /// Clear reminder.
        #[arg(long, conflicts_with = "reminder")]
        clear_reminder: bool,
        /// Clear start and end times.
        #[arg(long)]
        clear_times: bool,
        /// Clear category.
        #[arg(long, conflicts_with = "category")]
        clear_category: bool,
        /// Clear assignee.
        #[arg(long, conflicts_with = "assignee")]
        clear_assignee: bool,
    },

    /// Mark a task completed.
    Complete {
        /// Task ID or title.
        id: String,
    },

    /// Reopen a task (status pending).
    Reopen {
        /// Task ID or title.
        id: String,
    },

    /// Archive a task.
    Archive {
        /// Task ID or title.
        id: String,
    },

    /// Delete a task by ID or title.
    Delete {
        /// Task ID or title.
        id: String,
    },

    /// Show or change display settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the current settings.
    Show,
    /// Change one or more settings.
    Set {
        /// Layout style: grid | list.
        #[arg(long, value_enum)]
        style: Option<LayoutStyle>,
        /// Sort order: az | date | priority | none.
        #[arg(long, value_enum)]
        order: Option<SortField>,
        /// Sort ascending.
        #[arg(long, conflicts_with = "desc")]
        asc: bool,
        /// Sort descending.
        #[arg(long)]
        desc: bool,
    },
}

/// Launch the terminal dashboard.
pub fn cmd_ui(data_dir: &Path) {
    if let Err(e) = run_tui(data_dir) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Add a new task to the store.
#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    store: &mut TaskStore,
    title: String,
    desc: String,
    priority: Priority,
    status: Status,
    category: Option<String>,
    assignee: Option<String>,
    due: Option<String>,
    reminder: Option<String>,
    start: Option<String>,
    end: Option<String>,
) {
    if title.trim().is_empty() {
        eprintln!("Title must not be empty.");
        std::process::exit(1);
    }
    if desc.trim().is_empty() {
        eprintln!("Description must not be empty.");
        std::process::exit(1);
    }

    let schedule = Schedule {
        due: due.as_deref().map(|s| require_due(s)),
        reminder: reminder.as_deref().map(|s| require_reminder(s)),
        start_time: start.as_deref().map(|s| require_time(s)),
        end_time: end.as_deref().map(|s| require_time(s)),
    };

    let id = store.create(TaskDraft {
        title,
        description: desc,
        status,
        priority,
        schedule,
        category: non_blank(category),
        assignee: non_blank(assignee),
    });
    println!("Added task {}", id);
}

/// List tasks with optional filtering, sorted per the stored settings
/// unless overridden by flags.
#[allow(clippy::too_many_arguments)]
pub fn cmd_list(
    store: &TaskStore,
    settings: &Settings,
    all: bool,
    status: Option<Status>,
    category: Option<String>,
    order: Option<SortField>,
    asc: bool,
    desc: bool,
    limit: Option<usize>,
) {
    let effective = Settings {
        layout_style: settings.layout_style,
        layout_order: order.unwrap_or(settings.layout_order),
        layout_asc: if asc {
            true
        } else if desc {
            false
        } else {
            settings.layout_asc
        },
    };

    let filtered: Vec<_> = store
        .tasks()
        .iter()
        .filter(|t| {
            if !all && status.is_none() && t.status == Status::Archived {
                return false;
            }
            if let Some(s) = status {
                if t.status != s {
                    return false;
                }
            }
            if let Some(ref c) = category {
                if t.category.as_deref() != Some(c.as_str()) {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect();

    let mut sorted = sort_tasks(&filtered, &effective);
    if let Some(n) = limit {
        sorted.truncate(n);
    }

    let rows: Vec<_> = sorted.iter().collect();
    print_table(&rows);
}

/// View detailed information about a specific task.
pub fn cmd_view(store: &TaskStore, id: String) {
    let task_id = resolve_or_exit(store, &id);
    let Some(task) = store.get(task_id) else {
        eprintln!("Task {} not found.", task_id);
        std::process::exit(1);
    };
    let today = Local::now().date_naive();
    println!("ID:           {}", task.id);
    println!("Title:        {}", task.title);
    println!("Status:       {}", format_status(task.status));
    println!("Priority:     {}", format_priority(task.priority));
    println!("Category:     {}", task.category.as_deref().unwrap_or("-"));
    println!("Assignee:     {}", task.assignee.as_deref().unwrap_or("-"));
    println!(
        "Due:          {}",
        match task.schedule.due {
            Some(d) => format!("{d} ({})", format_due_relative(Some(d), today)),
            None => "-".into(),
        }
    );
    if let Some(r) = task.schedule.reminder {
        println!("Reminder:     {}", r.format("%Y-%m-%d %H:%M"));
    }
    if let (Some(s), Some(e)) = (task.schedule.start_time, task.schedule.end_time) {
        println!("Scheduled:    {} - {}", s.format("%H:%M"), e.format("%H:%M"));
    }
    println!("Created UTC:  {}", format_ts_utc(task.created_at_utc));
    println!("Updated UTC:  {}", format_ts_utc(task.updated_at_utc));
    if let Some(c) = task.completed_at_utc {
        println!("Completed:    {}", format_ts_utc(c));
    }
    println!("Description:\n{}\n", task.description);
}

/// Update an existing task's fields.
#[allow(clippy::too_many_arguments)]
pub fn cmd_update(
    store: &mut TaskStore,
    id: String,
    title: Option<String>,
    desc: Option<String>,
    priority: Option<Priority>,
    status: Option<Status>,
    category: Option<String>,
    assignee: Option<String>,
    due: Option<String>,
    reminder: Option<String>,
    start: Option<String>,
    end: Option<String>,
    clear_due: bool,
    clear_reminder: bool,
    clear_times: bool,
    clear_category: bool,
    clear_assignee: bool,
) {
    let task_id = resolve_or_exit(store, &id);

    if let Some(ref t) = title {
        if t.trim().is_empty() {
            eprintln!("Title must not be empty.");
            std::process::exit(1);
        }
    }
    if let Some(ref d) = desc {
        if d.trim().is_empty() {
            eprintln!("Description must not be empty.");
            std::process::exit(1);
        }
    }

    let mut patch = TaskPatch {
        title,
        description: desc,
        priority,
        status,
        ..TaskPatch::default()
    };
    if clear_category {
        patch.category = Some(None);
    } else if let Some(c) = non_blank(category) {
        patch.category = Some(Some(c));
    }
    if clear_assignee {
        patch.assignee = Some(None);
    } else if let Some(a) = non_blank(assignee) {
        patch.assignee = Some(Some(a));
    }
    if clear_due {
        patch.due = Some(None);
    } else if let Some(d) = due {
        patch.due = Some(Some(require_due(&d)));
    }
    if clear_reminder {
        patch.reminder = Some(None);
    } else if let Some(r) = reminder {
        patch.reminder = Some(Some(require_reminder(&r)));
    }
    if clear_times {
        patch.start_time = Some(None);
        patch.end_time = Some(None);
    } else {
        if let Some(s) = start {
            patch.start_time = Some(Some(require_time(&s)));
        }
        if let Some(e) = end {
            patch.end_time = Some(Some(require_time(&e)));
        }
    }

    if patch.is_empty() {
        println!("Nothing to update.");
        return;
    }
    if store.update(task_id, patch) {
        println!("Updated task {}", task_id);
    } else {
        println!("Task {} not found.", task_id);
    }
}

/// Mark a task completed.
pub fn cmd_complete(store: &mut TaskStore, id: String) {
    let task_id = resolve_or_exit(store, &id);
    store.set_status(task_id, Status::Completed);
    println!("Completed task {}", task_id);
}

/// Reopen a task.
pub fn cmd_reopen(store: &mut TaskStore, id: String) {
    let task_id = resolve_or_exit(store, &id);
    store.set_status(task_id, Status::Pending);
    println!("Reopened task {}", task_id);
}

/// Archive a task.
pub fn cmd_archive(store: &mut TaskStore, id: String) {
    let task_id = resolve_or_exit(store, &id);
    store.set_status(task_id, Status::Archived);
    println!("Archived task {}", task_id);
}

/// Delete a task.
pub fn cmd_delete(store: &mut TaskStore, id: String) {
    let task_id = resolve_or_exit(store, &id);
    if store.delete(task_id) {
        println!("Deleted task {}", task_id);
    } else {
        println!("Task {} not found.", task_id);
    }
}

/// Show or change display settings.
pub fn cmd_settings(settings_store: &mut SettingsStore, action: SettingsAction) {
    match action {
        SettingsAction::Show => print_settings(settings_store.settings()),
        SettingsAction::Set {
            style,
            order,
            asc,
            desc,
        } => {
            let layout_asc = if asc {
                Some(true)
            } else if desc {
                Some(false)
            } else {
                None
            };
            settings_store.update(SettingsPatch {
                layout_style: style,
                layout_order: order,
                layout_asc,
            });
            print_settings(settings_store.settings());
        }
    }
}

fn print_settings(settings: &Settings) {
    println!(
        "Layout:    {}",
        match settings.layout_style {
            LayoutStyle::Grid => "grid",
            LayoutStyle::List => "list",
        }
    );
    println!("Order:     {}", format_sort_field(settings.layout_order));
    println!(
        "Direction: {}",
        if settings.layout_asc {
            "ascending"
        } else {
            "descending"
        }
    );
}

/// Generate shell completion scripts for the given shell.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = crate::cli::Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}

fn resolve_or_exit(store: &TaskStore, identifier: &str) -> u64 {
    match store.resolve(identifier) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Error resolving task: {}", e);
            std::process::exit(1);
        }
    }
}

fn require_due(s: &str) -> chrono::NaiveDate {
    parse_due_input(s).unwrap_or_else(|| {
        eprintln!("Unrecognised due date. Use YYYY-MM-DD, 'today', 'tomorrow', or 'in Nd'.");
        std::process::exit(1);
    })
}

fn require_reminder(s: &str) -> chrono::NaiveDateTime {
    parse_reminder_input(s).unwrap_or_else(|| {
        eprintln!("Unrecognised reminder. Use 'YYYY-MM-DD HH:MM'.");
        std::process::exit(1);
    })
}

fn require_time(s: &str) -> chrono::NaiveTime {
    parse_time_input(s).unwrap_or_else(|| {
        eprintln!("Unrecognised time. Use 'HH:MM'.");
        std::process::exit(1);
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
