//! Color constants for the terminal user interface.

use ratatui::style::Color;

// Card priority markers mirror the dashboard's bookmark colors.

/// Used for low priority.
pub const LOW_GREEN: Color = Color::Rgb(34, 139, 34);
/// Used for medium priority.
pub const MEDIUM_GOLD: Color = Color::Rgb(255, 215, 0);
/// Used for high priority.
pub const HIGH_RED: Color = Color::Rgb(200, 30, 30);
/// Used for archived tasks.
pub const ARCHIVE_GRAY: Color = Color::Rgb(110, 110, 110);
