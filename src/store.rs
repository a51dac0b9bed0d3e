//! Task persistence and utility functions.
//!
//! This module provides the `TaskStore` that owns the in-memory task list
//! and mirrors it to a JSON file, along with date parsing, formatting and
//! table printing helpers used by the CLI and the TUI.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::StoreError;
use crate::fields::{Priority, SortField, Status};
use crate::task::{Task, TaskDraft, TaskPatch};

/// File name of the task list inside the data directory.
pub const TASKS_FILE: &str = "tasks.json";

/// Owns the authoritative in-memory task list and mirrors it to disk.
///
/// Every mutating operation re-serializes the full list. Persist failures
/// are logged and swallowed: the in-memory state keeps serving the current
/// session, so the user sees their change until the process exits.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Load the store from a JSON file. A missing file, unreadable file or
    /// schema-invalid content all yield an empty store rather than an error.
    pub fn load(path: &Path) -> Self {
        let tasks = if path.exists() {
            let mut buf = String::new();
            match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
                Ok(_) => match serde_json::from_str(&buf) {
                    Ok(tasks) => tasks,
                    Err(e) => {
                        eprintln!("Invalid task data in {}, starting empty: {e}", path.display());
                        Vec::new()
                    }
                },
                Err(e) => {
                    eprintln!("Error reading {}, starting empty: {e}", path.display());
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };
        TaskStore {
            path: path.to_path_buf(),
            tasks,
        }
    }

    /// Current task list.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Get a task by id.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Generate the next available task id.
    pub fn next_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    /// Commit a draft: assign id and timestamps, append, persist.
    /// Returns the new task's id.
    pub fn create(&mut self, draft: TaskDraft) -> u64 {
        let now = now_utc();
        let id = self.next_id();
        let completed_at_utc = (draft.status == Status::Completed).then_some(now);
        self.tasks.push(Task {
            id,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            priority: draft.priority,
            schedule: draft.schedule,
            category: draft.category,
            assignee: draft.assignee,
            created_at_utc: now,
            updated_at_utc: now,
            completed_at_utc,
        });
        self.persist();
        id
    }

    /// Merge a partial patch into the matching task and refresh its update
    /// timestamp. Silent no-op returning `false` when the id is unknown.
    pub fn update(&mut self, id: u64, patch: TaskPatch) -> bool {
        let Some(t) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if let Some(title) = patch.title {
            t.title = title;
        }
        if let Some(description) = patch.description {
            t.description = description;
        }
        if let Some(priority) = patch.priority {
            t.priority = priority;
        }
        if let Some(status) = patch.status {
            if status == Status::Completed && t.status != Status::Completed {
                t.completed_at_utc = Some(now_utc());
            } else if matches!(status, Status::Pending | Status::InProgress) {
                t.completed_at_utc = None;
            }
            t.status = status;
        }
        if let Some(category) = patch.category {
            t.category = category;
        }
        if let Some(assignee) = patch.assignee {
            t.assignee = assignee;
        }
        if let Some(due) = patch.due {
            t.schedule.due = due;
        }
        if let Some(reminder) = patch.reminder {
            t.schedule.reminder = reminder;
        }
        if let Some(start_time) = patch.start_time {
            t.schedule.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            t.schedule.end_time = end_time;
        }
        // Keeps updated_at non-decreasing even across clock adjustments.
        t.updated_at_utc = now_utc().max(t.updated_at_utc);
        self.persist();
        true
    }

    /// Shorthand for a status-only transition.
    pub fn set_status(&mut self, id: u64, status: Status) -> bool {
        self.update(
            id,
            TaskPatch {
                status: Some(status),
                ..TaskPatch::default()
            },
        )
    }

    /// Remove the matching task and persist the remainder.
    pub fn delete(&mut self, id: u64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return false;
        }
        self.persist();
        true
    }

    /// Write the full list to disk using an atomic temp + rename.
    pub fn save(&self) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(&self.tasks)?;
        let mut f = File::create(&tmp).map_err(|e| StoreError::io(&tmp, e))?;
        f.write_all(data.as_bytes())
            .map_err(|e| StoreError::io(&tmp, e))?;
        f.flush().map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            eprintln!("Failed to save tasks: {e}");
        }
    }

    /// Resolve a task identifier (id or title) to a task id. Title matches
    /// are case-insensitive and must be unique.
    pub fn resolve(&self, identifier: &str) -> Result<u64, String> {
        if let Ok(id) = identifier.parse::<u64>() {
            return if self.get(id).is_some() {
                Ok(id)
            } else {
                Err(format!("Task with ID {} not found", id))
            };
        }

        let matches: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.title.eq_ignore_ascii_case(identifier))
            .collect();

        match matches.len() {
            0 => Err(format!("No task found with title '{}'", identifier)),
            1 => Ok(matches[0].id),
            _ => {
                let mut msg = format!("Multiple tasks found with title '{}':\n", identifier);
                for t in matches {
                    msg.push_str(&format!("  ID {}: {}\n", t.id, t.title));
                }
                msg.push_str("Please use the specific ID instead.");
                Err(msg)
            }
        }
    }
}

/// Current unix time in seconds.
pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

/// Parse human-readable due date input.
///
/// Supports "today", "tomorrow", "yesterday", "end of week", bare or
/// "next"/"this"-prefixed weekday names, "in Nd"/"in Nw", and YYYY-MM-DD.
pub fn parse_due_input(s: &str) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();
    let today = Local::now().date_naive();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        "end of week" | "eow" => {
            let (_, end) = start_end_of_this_week(today);
            return Some(end);
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(n) = rest.strip_suffix('d').and_then(|n| n.trim().parse::<i64>().ok()) {
            return Some(today + Duration::days(n));
        }
        if let Some(n) = rest.strip_suffix('w').and_then(|n| n.trim().parse::<i64>().ok()) {
            return Some(today + Duration::weeks(n));
        }
    }

    let weekdays = [
        ("monday", "mon"),
        ("tuesday", "tue"),
        ("wednesday", "wed"),
        ("thursday", "thu"),
        ("friday", "fri"),
        ("saturday", "sat"),
        ("sunday", "sun"),
    ];
    for (target, (long, short)) in weekdays.iter().enumerate() {
        let next = s.strip_prefix("next ");
        let name = next
            .or_else(|| s.strip_prefix("this "))
            .unwrap_or(s.as_str());
        if name != *long && name != *short {
            continue;
        }
        let current = today.weekday().num_days_from_monday() as i64;
        let mut days_ahead = (target as i64 + 7 - current) % 7;
        if next.is_some() {
            days_ahead = if days_ahead == 0 { 7 } else { days_ahead + 7 };
        }
        return Some(today + Duration::days(days_ahead));
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Parse a reminder timestamp: "YYYY-MM-DD HH:MM".
pub fn parse_reminder_input(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M").ok()
}

/// Parse a time of day: "HH:MM".
pub fn parse_time_input(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").ok()
}

/// Calculate the start and end dates of the current ISO week (Monday start).
pub fn start_end_of_this_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = today.weekday().num_days_from_monday() as i64;
    let start = today - Duration::days(weekday);
    (start, start + Duration::days(6))
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let days = (d - today).num_days();
            match days {
                0 => "today".into(),
                1 => "tomorrow".into(),
                n if n > 1 => format!("in {n}d"),
                n => format!("{}d late", -n),
            }
        }
    }
}

/// Format a unix-second timestamp as RFC 3339 for display.
pub fn format_ts_utc(ts: i64) -> String {
    Utc.timestamp_opt(ts, 0)
        .single()
        .map(|d| d.to_rfc3339())
        .unwrap_or_else(|| "-".into())
}

/// Format a task status for display.
pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::Pending => "Pending",
        Status::InProgress => "In Progress",
        Status::Completed => "Completed",
        Status::Archived => "Archived",
    }
}

/// Format a priority for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::Low => "Low",
        Priority::Medium => "Medium",
        Priority::High => "High",
    }
}

/// Format a sort field for display.
pub fn format_sort_field(f: SortField) -> &'static str {
    match f {
        SortField::Az => "A-Z",
        SortField::Date => "Date",
        SortField::Priority => "Priority",
        SortField::Unsorted => "None",
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task]) {
    println!(
        "{:<5} {:<12} {:<7} {:<10} {:<14} {}",
        "ID", "Status", "Pri", "Due", "Category", "Title"
    );
    let today = Local::now().date_naive();
    for t in tasks {
        let due = format_due_relative(t.schedule.due, today);
        let category = t.category.as_deref().unwrap_or("-");
        println!(
            "{:<5} {:<12} {:<7} {:<10} {:<14} {}",
            t.id,
            format_status(t.status),
            format_priority(t.priority),
            due,
            truncate(category, 14),
            t.title,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Schedule;

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            description: "something to do".to_string(),
            status: Status::Pending,
            priority: Priority::Medium,
            schedule: Schedule::default(),
            category: None,
            assignee: None,
        }
    }

    fn store_in(dir: &Path) -> TaskStore {
        TaskStore::load(&dir.join(TASKS_FILE))
    }

    #[test]
    fn create_then_list_contains_task() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        let id = store.create(draft("write report"));
        assert!(store.tasks().iter().any(|t| t.id == id));
        assert_eq!(store.get(id).unwrap().title, "write report");
    }

    #[test]
    fn delete_then_list_does_not_contain_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        let id = store.create(draft("ephemeral"));
        assert!(store.delete(id));
        assert!(!store.tasks().iter().any(|t| t.id == id));
        assert!(!store.delete(id));
    }

    #[test]
    fn update_merges_fields_and_bumps_updated_at() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        let id = store.create(draft("mutable"));
        let before = store.get(id).unwrap().updated_at_utc;

        let ok = store.update(
            id,
            TaskPatch {
                status: Some(Status::Completed),
                category: Some(Some("work".to_string())),
                ..TaskPatch::default()
            },
        );
        assert!(ok);
        let t = store.get(id).unwrap();
        assert_eq!(t.status, Status::Completed);
        assert_eq!(t.category.as_deref(), Some("work"));
        assert!(t.completed_at_utc.is_some());
        assert!(t.updated_at_utc >= before);
        // Untouched fields survive the merge.
        assert_eq!(t.title, "mutable");
        assert_eq!(t.description, "something to do");
    }

    #[test]
    fn update_unknown_id_is_a_silent_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        assert!(!store.update(42, TaskPatch::default()));
    }

    #[test]
    fn reopen_clears_completed_at() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        let id = store.create(draft("toggle"));
        store.set_status(id, Status::Completed);
        assert!(store.get(id).unwrap().completed_at_utc.is_some());
        store.set_status(id, Status::Pending);
        assert!(store.get(id).unwrap().completed_at_utc.is_none());
    }

    #[test]
    fn tasks_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let mut store = store_in(dir.path());
            store.create(draft("durable"))
        };
        let store = store_in(dir.path());
        assert_eq!(store.get(id).unwrap().title, "durable");
        assert!(store.get(id).unwrap().updated_at_utc >= store.get(id).unwrap().created_at_utc);
    }

    #[test]
    fn invalid_stored_data_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TASKS_FILE);
        fs::write(&path, "{not json").unwrap();
        assert!(TaskStore::load(&path).tasks().is_empty());

        fs::write(&path, r#"[{"id": "wrong-shape"}]"#).unwrap();
        assert!(TaskStore::load(&path).tasks().is_empty());
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(dir.path()).tasks().is_empty());
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        let a = store.create(draft("first"));
        let b = store.create(draft("second"));
        store.delete(a);
        let c = store.create(draft("third"));
        assert!(b > a);
        assert!(c > b);
    }

    #[test]
    fn resolve_by_id_and_title() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        let id = store.create(draft("Ship It"));
        assert_eq!(store.resolve(&id.to_string()), Ok(id));
        assert_eq!(store.resolve("ship it"), Ok(id));
        assert!(store.resolve("missing").is_err());
        store.create(draft("Ship It"));
        assert!(store.resolve("ship it").is_err());
    }

    #[test]
    fn due_input_parses_natural_language() {
        let today = Local::now().date_naive();
        assert_eq!(parse_due_input("today"), Some(today));
        assert_eq!(parse_due_input("Tomorrow"), Some(today + Duration::days(1)));
        assert_eq!(parse_due_input("in 3d"), Some(today + Duration::days(3)));
        assert_eq!(parse_due_input("in 2w"), Some(today + Duration::weeks(2)));
        assert_eq!(
            parse_due_input("2026-09-01"),
            NaiveDate::from_ymd_opt(2026, 9, 1)
        );
        assert_eq!(parse_due_input("not a date"), None);

        let friday = parse_due_input("friday").unwrap();
        assert_eq!(friday.weekday(), chrono::Weekday::Fri);
        assert!(friday >= today);
        let next_friday = parse_due_input("next friday").unwrap();
        assert!(next_friday > friday);
    }

    #[test]
    fn week_bounds_are_monday_to_sunday() {
        let wed = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let (start, end) = start_end_of_this_week(wed);
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 8, 3).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 8, 9).unwrap());
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer string", 8), "a longe…");
    }
}
