//! Enumerations for TUI state management.

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq)]
pub enum AppState {
    Dashboard,
    TaskDetail,
    AddTask,
    EditTask,
    Help,
    ConfirmDelete,
}

/// Input mode for text entry fields.
#[derive(Clone, Copy, PartialEq)]
pub enum InputMode {
    None,
    Text,
}

/// Tab of the task form dialog. Simple carries the two required fields;
/// Advanced carries everything optional.
#[derive(Clone, Copy, PartialEq)]
pub enum FormTab {
    Simple,
    Advanced,
}
