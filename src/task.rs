//! Task data structure and related functionality.
//!
//! This module defines the core `Task` struct representing a single unit of
//! work, its optional scheduling metadata, and the draft/patch types the
//! store accepts for creation and partial update.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::fields::{Priority, Status};

/// A unit of work shown on the dashboard as a card or table row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    #[serde(default)]
    pub schedule: Schedule,
    pub category: Option<String>,
    pub assignee: Option<String>,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
    #[serde(default)]
    pub completed_at_utc: Option<i64>,
}

/// Optional scheduling metadata, stored as a nested object so the schedule
/// can be absent wholesale in older data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    pub due: Option<NaiveDate>,
    pub reminder: Option<NaiveDateTime>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

impl Schedule {
    pub fn is_empty(&self) -> bool {
        self.due.is_none()
            && self.reminder.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
    }
}

/// Everything needed to create a task. The store assigns the id and
/// timestamps when the draft is committed.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub schedule: Schedule,
    pub category: Option<String>,
    pub assignee: Option<String>,
}

/// Partial update merged into an existing task. `None` leaves a field
/// untouched; for clearable fields the inner `Option` distinguishes
/// "set to value" from "clear".
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub category: Option<Option<String>>,
    pub assignee: Option<Option<String>>,
    pub due: Option<Option<NaiveDate>>,
    pub reminder: Option<Option<NaiveDateTime>>,
    pub start_time: Option<Option<NaiveTime>>,
    pub end_time: Option<Option<NaiveTime>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.category.is_none()
            && self.assignee.is_none()
            && self.due.is_none()
            && self.reminder.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
    }
}
