//! Enumerations and field types for tasks and display settings.
//!
//! This module defines the closed set of structured values used across the
//! application: task status and priority, plus the layout and sort settings
//! consulted at render time.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[serde(alias = "Pending")]
    Pending,
    #[serde(alias = "InProgress")]
    InProgress,
    #[serde(alias = "Completed")]
    Completed,
    #[serde(alias = "Archived")]
    Archived,
}

/// Ordinal task priority. Earlier stored data used the strings "1".."3",
/// so those are accepted as aliases on read.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    #[serde(alias = "1")]
    Low,
    #[serde(alias = "2")]
    Medium,
    #[serde(alias = "3")]
    High,
}

impl Priority {
    /// Numeric rank used for sorting (1 = lowest).
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

/// Dashboard layout style: cards in a grid, or table rows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutStyle {
    Grid,
    List,
}

/// Field the dashboard sorts by. Unrecognised values in stored settings are
/// coerced to `Unsorted` at the settings-store boundary, which sorting
/// treats as a no-op.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SortField {
    /// Lexicographic on title.
    #[serde(alias = "Az")]
    Az,
    /// Numeric on creation time.
    Date,
    /// Numeric on priority rank.
    Priority,
    /// Preserve insertion order.
    #[serde(rename = "none")]
    #[value(name = "none")]
    Unsorted,
}
