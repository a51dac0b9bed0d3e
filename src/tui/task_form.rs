//! Task form handling for the terminal user interface.
//!
//! The form dialog has two tabs: Simple (title, description) and Advanced
//! (priority, status, category, assignee, schedule). Submission validates
//! the required fields and parses the schedule text; errors surface inline
//! and block the submit.

use crate::fields::{Priority, Status};
use crate::store::{parse_due_input, parse_reminder_input, parse_time_input};
use crate::task::{Schedule, Task, TaskDraft, TaskPatch};
use crate::tui::enums::FormTab;
use crate::tui::input::InputField;

/// Global order constants for form fields.
pub const TITLE_FIELD: usize = 0;
pub const DESCRIPTION_FIELD: usize = 1;
pub const PRIORITY_FIELD: usize = 2;
pub const STATUS_FIELD: usize = 3;
pub const CATEGORY_FIELD: usize = 4;
pub const ASSIGNEE_FIELD: usize = 5;
pub const DUE_FIELD: usize = 6;
pub const REMINDER_FIELD: usize = 7;
pub const START_FIELD: usize = 8;
pub const END_FIELD: usize = 9;

/// Task form state for creating and editing tasks.
pub struct TaskForm {
    pub tab: FormTab,
    pub title: InputField,
    pub description: InputField,
    pub category: InputField,
    pub assignee: InputField,
    pub due: InputField,
    pub reminder: InputField,
    pub start_time: InputField,
    pub end_time: InputField,
    pub priority: usize,
    pub status: usize,
    pub current_field: usize,
    pub priorities: Vec<Priority>,
    pub statuses: Vec<Status>,
    pub error: Option<String>,
}

impl TaskForm {
    /// Create an empty form with default selections.
    pub fn new() -> Self {
        let mut form = Self {
            tab: FormTab::Simple,
            title: InputField::new(),
            description: InputField::new(),
            category: InputField::new(),
            assignee: InputField::new(),
            due: InputField::new(),
            reminder: InputField::new(),
            start_time: InputField::new(),
            end_time: InputField::new(),
            priority: 1, // Medium
            status: 0,   // Pending
            current_field: TITLE_FIELD,
            priorities: vec![Priority::Low, Priority::Medium, Priority::High],
            statuses: vec![
                Status::Pending,
                Status::InProgress,
                Status::Completed,
                Status::Archived,
            ],
            error: None,
        };
        form.update_active_field();
        form
    }

    /// Create a form populated from an existing task.
    pub fn from_task(task: &Task) -> Self {
        let mut form = Self::new();
        form.title = InputField::with_value(&task.title);
        form.description = InputField::with_value(&task.description);
        form.category =
            InputField::with_value(task.category.as_deref().unwrap_or_default());
        form.assignee =
            InputField::with_value(task.assignee.as_deref().unwrap_or_default());
        form.due = InputField::with_value(
            &task
                .schedule
                .due
                .map(|d| d.to_string())
                .unwrap_or_default(),
        );
        form.reminder = InputField::with_value(
            &task
                .schedule
                .reminder
                .map(|r| r.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        );
        form.start_time = InputField::with_value(
            &task
                .schedule
                .start_time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
        );
        form.end_time = InputField::with_value(
            &task
                .schedule
                .end_time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
        );
        form.priority = form
            .priorities
            .iter()
            .position(|&p| p == task.priority)
            .unwrap_or(1);
        form.status = form
            .statuses
            .iter()
            .position(|&s| s == task.status)
            .unwrap_or(0);
        form.update_active_field();
        form
    }

    pub fn selected_priority(&self) -> Priority {
        self.priorities[self.priority]
    }

    pub fn selected_status(&self) -> Status {
        self.statuses[self.status]
    }

    fn tab_fields(&self) -> (usize, usize) {
        match self.tab {
            FormTab::Simple => (TITLE_FIELD, DESCRIPTION_FIELD),
            FormTab::Advanced => (PRIORITY_FIELD, END_FIELD),
        }
    }

    /// Switch between the Simple and Advanced tabs.
    pub fn toggle_tab(&mut self) {
        self.tab = match self.tab {
            FormTab::Simple => FormTab::Advanced,
            FormTab::Advanced => FormTab::Simple,
        };
        self.current_field = self.tab_fields().0;
        self.update_active_field();
    }

    /// Move to the next field within the current tab.
    pub fn next_field(&mut self) {
        let (first, last) = self.tab_fields();
        self.current_field = if self.current_field >= last {
            first
        } else {
            self.current_field + 1
        };
        self.update_active_field();
    }

    /// Move to the previous field within the current tab.
    pub fn prev_field(&mut self) {
        let (first, last) = self.tab_fields();
        self.current_field = if self.current_field <= first {
            last
        } else {
            self.current_field - 1
        };
        self.update_active_field();
    }

    fn fields_mut(&mut self) -> Vec<(usize, &mut InputField)> {
        vec![
            (TITLE_FIELD, &mut self.title),
            (DESCRIPTION_FIELD, &mut self.description),
            (CATEGORY_FIELD, &mut self.category),
            (ASSIGNEE_FIELD, &mut self.assignee),
            (DUE_FIELD, &mut self.due),
            (REMINDER_FIELD, &mut self.reminder),
            (START_FIELD, &mut self.start_time),
            (END_FIELD, &mut self.end_time),
        ]
    }

    /// Update which field is currently active for editing.
    pub fn update_active_field(&mut self) {
        let current = self.current_field;
        for (order, field) in self.fields_mut() {
            field.active = order == current;
        }
    }

    fn active_input(&mut self) -> Option<&mut InputField> {
        let current = self.current_field;
        self.fields_mut()
            .into_iter()
            .find(|(order, _)| *order == current)
            .map(|(_, field)| field)
    }

    /// Handle character input for the currently active field.
    pub fn handle_char(&mut self, c: char) {
        self.error = None;
        if let Some(field) = self.active_input() {
            field.handle_char(c);
        }
    }

    /// Handle backspace input for the currently active field.
    pub fn handle_backspace(&mut self) {
        self.error = None;
        if let Some(field) = self.active_input() {
            field.handle_backspace();
        }
    }

    /// Handle delete input for the currently active field.
    pub fn handle_delete(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_delete();
        }
    }

    /// Handle left/right arrows: cursor movement in text fields, value
    /// cycling in the priority/status selectors.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            PRIORITY_FIELD => {
                self.priority = cycle(self.priority, self.priorities.len(), right);
            }
            STATUS_FIELD => {
                self.status = cycle(self.status, self.statuses.len(), right);
            }
            _ => {
                if let Some(field) = self.active_input() {
                    if right {
                        field.move_cursor_right();
                    } else {
                        field.move_cursor_left();
                    }
                }
            }
        }
    }

    fn parse_schedule(&self) -> Result<Schedule, String> {
        let due = parse_due_input(&self.due.value);
        if !self.due.value.trim().is_empty() && due.is_none() {
            return Err("Unrecognised due date".to_string());
        }
        let reminder = parse_reminder_input(&self.reminder.value);
        if !self.reminder.value.trim().is_empty() && reminder.is_none() {
            return Err("Reminder must be YYYY-MM-DD HH:MM".to_string());
        }
        let start_time = parse_time_input(&self.start_time.value);
        if !self.start_time.value.trim().is_empty() && start_time.is_none() {
            return Err("Start time must be HH:MM".to_string());
        }
        let end_time = parse_time_input(&self.end_time.value);
        if !self.end_time.value.trim().is_empty() && end_time.is_none() {
            return Err("End time must be HH:MM".to_string());
        }

        Ok(Schedule {
            due,
            reminder,
            start_time,
            end_time,
        })
    }

    fn validate(&self) -> Result<(), String> {
        if self.title.value.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        if self.description.value.trim().is_empty() {
            return Err("Description is required".to_string());
        }
        Ok(())
    }

    /// Build a creation draft from the form, or an inline error.
    pub fn to_draft(&self) -> Result<TaskDraft, String> {
        self.validate()?;
        let schedule = self.parse_schedule()?;
        Ok(TaskDraft {
            title: self.title.value.trim().to_string(),
            description: self.description.value.trim().to_string(),
            status: self.selected_status(),
            priority: self.selected_priority(),
            schedule,
            category: non_blank(&self.category.value),
            assignee: non_blank(&self.assignee.value),
        })
    }

    /// Build a full-merge patch from the form, or an inline error. Every
    /// field is set explicitly so an edit writes the form's state wholesale.
    pub fn to_patch(&self) -> Result<TaskPatch, String> {
        self.validate()?;
        let schedule = self.parse_schedule()?;
        Ok(TaskPatch {
            title: Some(self.title.value.trim().to_string()),
            description: Some(self.description.value.trim().to_string()),
            status: Some(self.selected_status()),
            priority: Some(self.selected_priority()),
            category: Some(non_blank(&self.category.value)),
            assignee: Some(non_blank(&self.assignee.value)),
            due: Some(schedule.due),
            reminder: Some(schedule.reminder),
            start_time: Some(schedule.start_time),
            end_time: Some(schedule.end_time),
        })
    }
}

fn cycle(current: usize, len: usize, forward: bool) -> usize {
    if forward {
        (current + 1) % len
    } else if current == 0 {
        len - 1
    } else {
        current - 1
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_required_fields_block_submission() {
        let form = TaskForm::new();
        assert_eq!(form.to_draft().unwrap_err(), "Title is required");

        let mut form = TaskForm::new();
        form.title = InputField::with_value("only a title");
        assert_eq!(form.to_draft().unwrap_err(), "Description is required");
    }

    #[test]
    fn draft_carries_schedule_and_selectors() {
        let mut form = TaskForm::new();
        form.title = InputField::with_value("plan offsite");
        form.description = InputField::with_value("book venue");
        form.due = InputField::with_value("2026-09-01");
        form.start_time = InputField::with_value("09:30");
        form.priority = 2; // High
        let draft = form.to_draft().unwrap();
        assert_eq!(draft.priority, Priority::High);
        assert_eq!(
            draft.schedule.due,
            chrono::NaiveDate::from_ymd_opt(2026, 9, 1)
        );
        assert_eq!(
            draft.schedule.start_time,
            chrono::NaiveTime::from_hms_opt(9, 30, 0)
        );
        assert!(draft.schedule.reminder.is_none());
    }

    #[test]
    fn malformed_schedule_text_is_an_inline_error() {
        let mut form = TaskForm::new();
        form.title = InputField::with_value("t");
        form.description = InputField::with_value("d");
        form.due = InputField::with_value("whenever");
        assert_eq!(form.to_draft().unwrap_err(), "Unrecognised due date");
    }

    #[test]
    fn field_navigation_stays_within_the_tab() {
        let mut form = TaskForm::new();
        assert_eq!(form.current_field, TITLE_FIELD);
        form.next_field();
        assert_eq!(form.current_field, DESCRIPTION_FIELD);
        form.next_field();
        assert_eq!(form.current_field, TITLE_FIELD);

        form.toggle_tab();
        assert_eq!(form.current_field, PRIORITY_FIELD);
        form.prev_field();
        assert_eq!(form.current_field, END_FIELD);
    }

    #[test]
    fn edit_patch_round_trips_task_fields() {
        use crate::fields::Status;
        use crate::task::Schedule;
        let task = Task {
            id: 7,
            title: "review budget".into(),
            description: "Q3 numbers".into(),
            status: Status::InProgress,
            priority: Priority::High,
            schedule: Schedule {
                due: chrono::NaiveDate::from_ymd_opt(2026, 8, 20),
                ..Schedule::default()
            },
            category: Some("finance".into()),
            assignee: None,
            created_at_utc: 0,
            updated_at_utc: 0,
            completed_at_utc: None,
        };
        let patch = TaskForm::from_task(&task).to_patch().unwrap();
        assert_eq!(patch.title.as_deref(), Some("review budget"));
        assert_eq!(patch.status, Some(Status::InProgress));
        assert_eq!(patch.priority, Some(Priority::High));
        assert_eq!(patch.category, Some(Some("finance".into())));
        assert_eq!(patch.assignee, Some(None));
        assert_eq!(patch.due, Some(chrono::NaiveDate::from_ymd_opt(2026, 8, 20)));
    }
}
