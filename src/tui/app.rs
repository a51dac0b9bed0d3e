//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which manages the dashboard state,
//! handles user input, renders the card grid or table layout, and
//! coordinates the form dialog, detail view and confirmation dialog.

use std::io;
use std::path::Path;
use std::time::Duration;

use chrono::{Local, TimeZone, Utc};
use crossterm::event::{self, Event, KeyCode};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame, Terminal,
};

use crate::fields::{LayoutStyle, Priority, SortField, Status};
use crate::settings::{SettingsPatch, SettingsStore, SETTINGS_FILE};
use crate::sort::sort_tasks;
use crate::store::{
    format_due_relative, format_priority, format_sort_field, format_status, truncate,
    TaskStore, TASKS_FILE,
};
use crate::task::Task;
use crate::tui::{
    colors::{ARCHIVE_GRAY, HIGH_RED, LOW_GREEN, MEDIUM_GOLD},
    enums::{AppState, FormTab, InputMode},
    input::InputField,
    task_form::{TaskForm, PRIORITY_FIELD, STATUS_FIELD},
    utils::centered_rect,
};

const CARD_MIN_WIDTH: usize = 34;
const CARD_HEIGHT: u16 = 7;

/// Main application state for the terminal dashboard.
///
/// Owns the task and settings stores, the sorted/filtered view of the task
/// list, and all per-screen interaction state.
pub struct App {
    state: AppState,
    store: TaskStore,
    settings: SettingsStore,
    visible: Vec<Task>,
    selected: usize,
    table_state: TableState,
    selected_task: Option<u64>,
    task_form: TaskForm,
    input_mode: InputMode,
    status_message: String,
    show_archived: bool,
    filter_text: String,
    confirm_delete: Option<u64>,
    grid_columns: usize,
    grid_scroll_row: usize,
    should_quit: bool,
}

impl App {
    /// Create a new App instance, loading both stores from the data directory.
    pub fn new(data_dir: &Path) -> io::Result<Self> {
        let store = TaskStore::load(&data_dir.join(TASKS_FILE));
        let settings = SettingsStore::load(&data_dir.join(SETTINGS_FILE));
        let mut app = App {
            state: AppState::Dashboard,
            store,
            settings,
            visible: Vec::new(),
            selected: 0,
            table_state: TableState::default(),
            selected_task: None,
            task_form: TaskForm::new(),
            input_mode: InputMode::None,
            status_message: String::new(),
            show_archived: false,
            filter_text: String::new(),
            confirm_delete: None,
            grid_columns: 1,
            grid_scroll_row: 0,
            should_quit: false,
        };
        app.refresh_visible();
        Ok(app)
    }

    /// Rebuild the sorted, filtered view of the task list and keep the
    /// selection in bounds.
    fn refresh_visible(&mut self) {
        let old_id = self.visible.get(self.selected).map(|t| t.id);

        let filter_lower = self.filter_text.to_lowercase();
        let filtered: Vec<Task> = self
            .store
            .tasks()
            .iter()
            .filter(|t| {
                if !self.show_archived && t.status == Status::Archived {
                    return false;
                }
                if !filter_lower.is_empty()
                    && !t.title.to_lowercase().contains(&filter_lower)
                    && !t.description.to_lowercase().contains(&filter_lower)
                    && !t
                        .category
                        .as_ref()
                        .is_some_and(|c| c.to_lowercase().contains(&filter_lower))
                {
                    return false;
                }
                true
            })
            .cloned()
            .collect();

        self.visible = sort_tasks(&filtered, self.settings.settings());

        self.selected = old_id
            .and_then(|id| self.visible.iter().position(|t| t.id == id))
            .unwrap_or(0);
        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
        self.table_state.select(if self.visible.is_empty() {
            None
        } else {
            Some(self.selected)
        });
    }

    fn current_task_id(&self) -> Option<u64> {
        self.visible.get(self.selected).map(|t| t.id)
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn move_selection(&mut self, delta: isize) {
        if self.visible.is_empty() {
            return;
        }
        let last = self.visible.len() as isize - 1;
        let next = (self.selected as isize + delta).clamp(0, last);
        self.selected = next as usize;
        self.table_state.select(Some(self.selected));
    }

    fn toggle_layout(&mut self) {
        let next = match self.settings.settings().layout_style {
            LayoutStyle::Grid => LayoutStyle::List,
            LayoutStyle::List => LayoutStyle::Grid,
        };
        self.settings.update(SettingsPatch {
            layout_style: Some(next),
            ..SettingsPatch::default()
        });
        self.set_status_message(format!(
            "Layout: {}",
            if next == LayoutStyle::Grid { "cards" } else { "table" }
        ));
    }

    fn cycle_order(&mut self) {
        let next = match self.settings.settings().layout_order {
            SortField::Az => SortField::Date,
            SortField::Date => SortField::Priority,
            SortField::Priority => SortField::Unsorted,
            SortField::Unsorted => SortField::Az,
        };
        self.settings.update(SettingsPatch {
            layout_order: Some(next),
            ..SettingsPatch::default()
        });
        self.refresh_visible();
        self.set_status_message(format!("Sort: {}", format_sort_field(next)));
    }

    fn toggle_direction(&mut self) {
        let next = !self.settings.settings().layout_asc;
        self.settings.update(SettingsPatch {
            layout_asc: Some(next),
            ..SettingsPatch::default()
        });
        self.refresh_visible();
        self.set_status_message(format!(
            "Direction: {}",
            if next { "ascending" } else { "descending" }
        ));
    }

    fn toggle_complete(&mut self, id: u64) {
        let next = match self.store.get(id).map(|t| t.status) {
            Some(Status::Completed) => Status::Pending,
            Some(_) => Status::Completed,
            None => return,
        };
        self.store.set_status(id, next);
        self.set_status_message(format!(
            "Task {} {}",
            id,
            if next == Status::Completed { "completed" } else { "reopened" }
        ));
        self.refresh_visible();
    }

    fn open_add_form(&mut self) {
        self.task_form = TaskForm::new();
        self.state = AppState::AddTask;
        self.input_mode = InputMode::Text;
    }

    fn open_edit_form(&mut self, id: u64) {
        if let Some(task) = self.store.get(id) {
            self.selected_task = Some(id);
            self.task_form = TaskForm::from_task(task);
            self.state = AppState::EditTask;
            self.input_mode = InputMode::Text;
        }
    }

    fn submit_form(&mut self, is_edit: bool) {
        if is_edit {
            let Some(id) = self.selected_task else {
                self.state = AppState::Dashboard;
                return;
            };
            match self.task_form.to_patch() {
                Ok(patch) => {
                    self.store.update(id, patch);
                    self.set_status_message(format!("Updated task {}", id));
                }
                Err(e) => {
                    self.task_form.error = Some(e);
                    return;
                }
            }
        } else {
            match self.task_form.to_draft() {
                Ok(draft) => {
                    let id = self.store.create(draft);
                    self.set_status_message(format!("Added task {}", id));
                }
                Err(e) => {
                    self.task_form.error = Some(e);
                    return;
                }
            }
        }
        self.state = AppState::Dashboard;
        self.input_mode = InputMode::None;
        self.refresh_visible();
    }

    /// Handle keyboard input based on current state.
    fn handle_input(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                match self.state {
                    AppState::Dashboard => self.handle_dashboard_input(key.code),
                    AppState::TaskDetail => self.handle_detail_input(key.code),
                    AppState::AddTask => self.handle_form_input(key.code, false),
                    AppState::EditTask => self.handle_form_input(key.code, true),
                    AppState::Help => self.handle_help_input(key.code),
                    AppState::ConfirmDelete => self.handle_confirm_input(key.code),
                }
            }
        }
        Ok(())
    }

    fn handle_filter_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.filter_text.clear();
                self.input_mode = InputMode::None;
                self.refresh_visible();
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::None;
            }
            KeyCode::Backspace => {
                self.filter_text.pop();
                self.refresh_visible();
            }
            KeyCode::Char(c) => {
                self.filter_text.push(c);
                self.refresh_visible();
            }
            _ => {}
        }
    }

    fn handle_dashboard_input(&mut self, key: KeyCode) {
        if self.input_mode == InputMode::Text {
            self.handle_filter_input(key);
            return;
        }
        self.status_message.clear();
        let grid = self.settings.settings().layout_style == LayoutStyle::Grid;
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('h') => self.state = AppState::Help,
            KeyCode::Char('/') => self.input_mode = InputMode::Text,
            KeyCode::Char('v') => {
                self.toggle_layout();
                self.grid_scroll_row = 0;
            }
            KeyCode::Char('o') => self.cycle_order(),
            KeyCode::Char('r') => self.toggle_direction(),
            KeyCode::Char('x') => {
                self.show_archived = !self.show_archived;
                self.refresh_visible();
                self.set_status_message(if self.show_archived {
                    "Showing archived tasks".to_string()
                } else {
                    "Hiding archived tasks".to_string()
                });
            }
            KeyCode::Char('n') => self.open_add_form(),
            KeyCode::Char('e') => {
                if let Some(id) = self.current_task_id() {
                    self.open_edit_form(id);
                }
            }
            KeyCode::Char('c') => {
                if let Some(id) = self.current_task_id() {
                    self.toggle_complete(id);
                }
            }
            KeyCode::Char('a') => {
                if let Some(id) = self.current_task_id() {
                    self.store.set_status(id, Status::Archived);
                    self.set_status_message(format!("Archived task {}", id));
                    self.refresh_visible();
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.current_task_id() {
                    self.confirm_delete = Some(id);
                    self.state = AppState::ConfirmDelete;
                }
            }
            KeyCode::Enter => {
                if let Some(id) = self.current_task_id() {
                    self.selected_task = Some(id);
                    self.state = AppState::TaskDetail;
                }
            }
            KeyCode::Up => self.move_selection(if grid {
                -(self.grid_columns as isize)
            } else {
                -1
            }),
            KeyCode::Down => self.move_selection(if grid {
                self.grid_columns as isize
            } else {
                1
            }),
            KeyCode::Left => {
                if grid {
                    self.move_selection(-1);
                }
            }
            KeyCode::Right => {
                if grid {
                    self.move_selection(1);
                }
            }
            KeyCode::Esc => {
                if !self.filter_text.is_empty() {
                    self.filter_text.clear();
                    self.refresh_visible();
                }
            }
            _ => {}
        }
    }

    fn handle_detail_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.state = AppState::Dashboard;
            }
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_task {
                    self.open_edit_form(id);
                }
            }
            KeyCode::Char('c') => {
                if let Some(id) = self.selected_task {
                    self.toggle_complete(id);
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_task {
                    self.confirm_delete = Some(id);
                    self.state = AppState::ConfirmDelete;
                }
            }
            _ => {}
        }
    }

    fn handle_form_input(&mut self, key: KeyCode, is_edit: bool) {
        match key {
            KeyCode::Esc => {
                self.state = if is_edit && self.selected_task.is_some() {
                    AppState::TaskDetail
                } else {
                    AppState::Dashboard
                };
                self.input_mode = InputMode::None;
            }
            KeyCode::Enter => self.submit_form(is_edit),
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::F(2) => self.task_form.toggle_tab(),
            KeyCode::Left => self.task_form.handle_left_right(false),
            KeyCode::Right => self.task_form.handle_left_right(true),
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => self.task_form.handle_delete(),
            KeyCode::Char(c) => self.task_form.handle_char(c),
            _ => {}
        }
    }

    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(id) = self.confirm_delete.take() {
                    if self.store.delete(id) {
                        self.set_status_message(format!("Deleted task {}", id));
                    }
                    self.selected_task = None;
                    self.refresh_visible();
                }
                self.state = AppState::Dashboard;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_delete = None;
                self.state = AppState::Dashboard;
            }
            _ => {}
        }
    }

    fn handle_help_input(&mut self, key: KeyCode) {
        if matches!(key, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            self.state = AppState::Dashboard;
        }
    }

    fn priority_color(priority: Priority) -> Color {
        match priority {
            Priority::Low => LOW_GREEN,
            Priority::Medium => MEDIUM_GOLD,
            Priority::High => HIGH_RED,
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let settings = self.settings.settings();
        let context = format!(
            "Layout: {}  Sort: {} ({})  {}",
            match settings.layout_style {
                LayoutStyle::Grid => "cards",
                LayoutStyle::List => "table",
            },
            format_sort_field(settings.layout_order),
            if settings.layout_asc { "asc" } else { "desc" },
            if self.filter_text.is_empty() {
                String::new()
            } else {
                format!("Filter: {}", self.filter_text)
            },
        );
        let header_text = vec![Line::from(vec![
            Span::styled("TASKDECK", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                context,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ])];
        let header = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_dashboard(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        self.render_header(f, chunks[0]);

        match self.settings.settings().layout_style {
            LayoutStyle::Grid => self.render_card_grid(f, chunks[1]),
            LayoutStyle::List => self.render_task_table(f, chunks[1]),
        }
    }

    fn dashboard_title(&self) -> String {
        format!(
            "Tasks ({}/{}) - Press 'h' for help",
            self.visible.len(),
            self.store.tasks().len()
        )
    }

    fn render_task_table(&mut self, f: &mut Frame, area: Rect) {
        let today = Local::now().date_naive();

        let header_cells = ["ID", "Status", "Pri", "Due", "Category", "Updated", "Title"]
            .iter()
            .map(|h| {
                ratatui::widgets::Cell::from(*h)
                    .style(Style::default().add_modifier(Modifier::BOLD))
            });
        let header = Row::new(header_cells)
            .style(Style::default().bg(Color::Blue).fg(Color::White))
            .height(1);

        let rows: Vec<Row> = self
            .visible
            .iter()
            .map(|task| {
                let style = match task.status {
                    Status::Archived => Style::default().fg(ARCHIVE_GRAY),
                    Status::Completed => Style::default().fg(Color::DarkGray),
                    Status::InProgress => Style::default()
                        .fg(Self::priority_color(task.priority))
                        .add_modifier(Modifier::BOLD),
                    Status::Pending => Style::default().fg(Color::White),
                };
                Row::new(vec![
                    ratatui::widgets::Cell::from(task.id.to_string()),
                    ratatui::widgets::Cell::from(format_status(task.status)),
                    ratatui::widgets::Cell::from(format_priority(task.priority)),
                    ratatui::widgets::Cell::from(format_due_relative(
                        task.schedule.due,
                        today,
                    )),
                    ratatui::widgets::Cell::from(
                        task.category.clone().unwrap_or_else(|| "-".into()),
                    ),
                    ratatui::widgets::Cell::from(format_date_utc(task.updated_at_utc)),
                    ratatui::widgets::Cell::from(task.title.clone()),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(4),  // ID
            Constraint::Length(12), // Status
            Constraint::Length(7),  // Pri
            Constraint::Length(10), // Due
            Constraint::Length(13), // Category
            Constraint::Length(11), // Updated
            Constraint::Min(24),    // Title
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(self.dashboard_title()),
            )
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_card_grid(&mut self, f: &mut Frame, area: Rect) {
        let outer = Block::default()
            .borders(Borders::ALL)
            .title(self.dashboard_title());
        let inner = outer.inner(area);
        f.render_widget(outer, area);

        if self.visible.is_empty() {
            let empty = Paragraph::new("No tasks. Press 'n' to create one.")
                .alignment(Alignment::Center);
            f.render_widget(empty, inner);
            return;
        }

        let columns = ((inner.width as usize) / CARD_MIN_WIDTH).clamp(1, 4);
        self.grid_columns = columns;
        let rows_fit = ((inner.height / CARD_HEIGHT) as usize).max(1);
        let total_rows = self.visible.len().div_ceil(columns);

        // Keep the selected card scrolled into view.
        let sel_row = self.selected / columns;
        if sel_row < self.grid_scroll_row {
            self.grid_scroll_row = sel_row;
        } else if sel_row >= self.grid_scroll_row + rows_fit {
            self.grid_scroll_row = sel_row + 1 - rows_fit;
        }

        let today = Local::now().date_naive();
        let last_row = (self.grid_scroll_row + rows_fit).min(total_rows);
        for (screen_row, row) in (self.grid_scroll_row..last_row).enumerate() {
            let row_area = Rect {
                x: inner.x,
                y: inner.y + screen_row as u16 * CARD_HEIGHT,
                width: inner.width,
                height: CARD_HEIGHT,
            };
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
                .split(row_area);
            for col in 0..columns {
                let index = row * columns + col;
                let Some(task) = self.visible.get(index) else {
                    break;
                };
                self.render_card(f, cells[col], task, index == self.selected, today);
            }
        }
    }

    fn render_card(
        &self,
        f: &mut Frame,
        area: Rect,
        task: &Task,
        selected: bool,
        today: chrono::NaiveDate,
    ) {
        let border_style = if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else if task.status == Status::Archived {
            Style::default().fg(ARCHIVE_GRAY)
        } else {
            Style::default()
        };

        let title_line = Line::from(vec![
            Span::styled("▍", Style::default().fg(Self::priority_color(task.priority))),
            Span::styled(
                truncate(&task.title, area.width.saturating_sub(4) as usize),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]);

        let mut footer = format!(
            "{} · {}",
            format_status(task.status),
            format_due_relative(task.schedule.due, today)
        );
        if let Some(category) = &task.category {
            footer.push_str(" · ");
            footer.push_str(category);
        }

        let body_style = if task.status == Status::Completed {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        let text = vec![
            Line::from(truncate(&task.description, (area.width as usize) * 2)),
            Line::from(""),
            Line::from(Span::styled(footer, Style::default().fg(Color::Cyan))),
        ];

        let card = Paragraph::new(text)
            .style(body_style)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(title_line),
            );
        f.render_widget(card, area);
    }

    fn render_task_detail(&mut self, f: &mut Frame, area: Rect) {
        let Some(task) = self.selected_task.and_then(|id| self.store.get(id)) else {
            return;
        };
        let today = Local::now().date_naive();

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let mut text = vec![
            Line::from(vec![Span::styled("ID: ", bold), Span::raw(task.id.to_string())]),
            Line::from(vec![Span::styled("Title: ", bold), Span::raw(&task.title)]),
            Line::from(vec![
                Span::styled("Status: ", bold),
                Span::raw(format_status(task.status)),
            ]),
            Line::from(vec![
                Span::styled("Priority: ", bold),
                Span::styled(
                    format_priority(task.priority),
                    Style::default().fg(Self::priority_color(task.priority)),
                ),
            ]),
            Line::from(vec![
                Span::styled("Category: ", bold),
                Span::raw(task.category.as_deref().unwrap_or("-")),
            ]),
            Line::from(vec![
                Span::styled("Assignee: ", bold),
                Span::raw(task.assignee.as_deref().unwrap_or("-")),
            ]),
            Line::from(vec![
                Span::styled("Due: ", bold),
                Span::raw(match task.schedule.due {
                    Some(d) => format!("{} ({})", d, format_due_relative(Some(d), today)),
                    None => "-".to_string(),
                }),
            ]),
        ];

        if let Some(r) = task.schedule.reminder {
            text.push(Line::from(vec![
                Span::styled("Reminder: ", bold),
                Span::raw(r.format("%Y-%m-%d %H:%M").to_string()),
            ]));
        }
        if let (Some(s), Some(e)) = (task.schedule.start_time, task.schedule.end_time) {
            text.push(Line::from(vec![
                Span::styled("Scheduled: ", bold),
                Span::raw(format!("{} - {}", s.format("%H:%M"), e.format("%H:%M"))),
            ]));
        }

        text.push(Line::from(vec![
            Span::styled("Created: ", bold),
            Span::raw(format_date_utc(task.created_at_utc)),
        ]));
        text.push(Line::from(vec![
            Span::styled("Updated: ", bold),
            Span::raw(format_date_utc(task.updated_at_utc)),
        ]));
        if let Some(c) = task.completed_at_utc {
            text.push(Line::from(vec![
                Span::styled("Completed: ", bold),
                Span::raw(format_date_utc(c)),
            ]));
        }

        text.push(Line::from(""));
        text.push(Line::from(Span::styled("Description:", bold)));
        text.push(Line::from(task.description.as_str()));

        let paragraph = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Task Details - [e]dit, [d]elete, [c]omplete, [Esc] back"),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_form(&mut self, f: &mut Frame, area: Rect, is_edit: bool) {
        let area = centered_rect(72, 88, area);
        f.render_widget(Clear, area);

        let title = if is_edit { "Edit Task" } else { "New Task" };
        let outer = Block::default().borders(Borders::ALL).title(title);
        let inner = outer.inner(area);
        f.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // tabs
                Constraint::Min(0),    // fields
                Constraint::Length(1), // error
                Constraint::Length(1), // hint
            ])
            .split(inner);

        let tabs = Tabs::new(vec!["Simple", "Advanced"])
            .select(match self.task_form.tab {
                FormTab::Simple => 0,
                FormTab::Advanced => 1,
            })
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
        f.render_widget(tabs, chunks[0]);

        match self.task_form.tab {
            FormTab::Simple => self.render_simple_tab(f, chunks[1]),
            FormTab::Advanced => self.render_advanced_tab(f, chunks[1]),
        }

        if let Some(error) = &self.task_form.error {
            let error_line = Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
            f.render_widget(error_line, chunks[2]);
        }

        let hint = Paragraph::new(
            "Tab/↑↓ fields · ←→ cursor/select · F2 advanced · Enter save · Esc cancel",
        )
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(hint, chunks[3]);
    }

    fn render_simple_tab(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(5),    // Description
            ])
            .split(area);

        self.render_text_field(f, chunks[0], "Title", &self.task_form.title);
        self.render_text_field(f, chunks[1], "Description", &self.task_form.description);
    }

    fn render_advanced_tab(&self, f: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let field_rows = [
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ];
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints(field_rows)
            .split(columns[0]);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints(field_rows)
            .split(columns[1]);

        self.render_selector(
            f,
            left[0],
            "Priority",
            format_priority(self.task_form.selected_priority()),
            self.task_form.current_field == PRIORITY_FIELD,
        );
        self.render_selector(
            f,
            left[1],
            "Status",
            format_status(self.task_form.selected_status()),
            self.task_form.current_field == STATUS_FIELD,
        );
        self.render_text_field(f, left[2], "Category", &self.task_form.category);
        self.render_text_field(f, left[3], "Assignee", &self.task_form.assignee);

        self.render_text_field(f, right[0], "Due (YYYY-MM-DD or natural)", &self.task_form.due);
        self.render_text_field(f, right[1], "Reminder (YYYY-MM-DD HH:MM)", &self.task_form.reminder);
        self.render_text_field(f, right[2], "Start (HH:MM)", &self.task_form.start_time);
        self.render_text_field(f, right[3], "End (HH:MM)", &self.task_form.end_time);
    }

    fn render_text_field(&self, f: &mut Frame, area: Rect, label: &str, field: &InputField) {
        let border_style = if field.active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let input = Paragraph::new(field.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(label),
        );
        f.render_widget(input, area);
        if field.active {
            f.set_cursor_position((area.x + field.cursor as u16 + 1, area.y + 1));
        }
    }

    fn render_selector(&self, f: &mut Frame, area: Rect, label: &str, value: &str, active: bool) {
        let border_style = if active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let text = if active {
            format!("◄ {} ►", value)
        } else {
            value.to_string()
        };
        let selector = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(label),
        );
        f.render_widget(selector, area);
    }

    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let area = centered_rect(60, 30, area);
        f.render_widget(Clear, area);

        let title = self
            .confirm_delete
            .and_then(|id| self.store.get(id))
            .map(|t| t.title.clone())
            .unwrap_or_default();

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Delete this task?",
                Style::default().add_modifier(Modifier::BOLD).fg(Color::Red),
            )),
            Line::from(""),
            Line::from(title),
            Line::from(""),
            Line::from("Press Y to confirm, N or Esc to cancel"),
        ];
        let confirm = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Delete Task")
                    .border_style(Style::default().fg(Color::Red)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(confirm, area);
    }

    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let help_text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Dashboard",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from("  ↑↓←→      navigate"),
            Line::from("  Enter     task details"),
            Line::from("  n         new task"),
            Line::from("  e         edit task"),
            Line::from("  c         complete / reopen"),
            Line::from("  a         archive"),
            Line::from("  d         delete (with confirmation)"),
            Line::from(""),
            Line::from(Span::styled(
                "View",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from("  v         toggle cards / table"),
            Line::from("  o         cycle sort order (A-Z, date, priority, none)"),
            Line::from("  r         reverse sort direction"),
            Line::from("  x         show / hide archived"),
            Line::from("  /         filter by text"),
            Line::from(""),
            Line::from("  q         quit"),
            Line::from(""),
            Line::from("Press any key to return"),
        ];
        let help = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .alignment(Alignment::Left);
        f.render_widget(help, area);
    }

    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if self.state == AppState::Dashboard && self.input_mode == InputMode::Text
        {
            format!("Filter: {}▏ (Enter to apply, Esc to clear)", self.filter_text)
        } else if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::Dashboard => {
                    "n new · e edit · d delete · c complete · v layout · o sort · h help · q quit"
                        .to_string()
                }
                AppState::TaskDetail => "e edit · d delete · c complete · Esc back".to_string(),
                AppState::AddTask | AppState::EditTask => {
                    "Enter save · Esc cancel · F2 switch tab".to_string()
                }
                AppState::Help => "Press any key to return".to_string(),
                AppState::ConfirmDelete => "Press Y to confirm, N or Esc to cancel".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(Color::Blue).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function that dispatches to state-specific renderers.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        match self.state {
            AppState::Dashboard => self.render_dashboard(f, chunks[0]),
            AppState::TaskDetail => self.render_task_detail(f, chunks[0]),
            AppState::AddTask => {
                self.render_dashboard(f, chunks[0]);
                self.render_form(f, chunks[0], false);
            }
            AppState::EditTask => {
                self.render_dashboard(f, chunks[0]);
                self.render_form(f, chunks[0], true);
            }
            AppState::Help => self.render_help(f, chunks[0]),
            AppState::ConfirmDelete => {
                self.render_dashboard(f, chunks[0]);
                self.render_confirm(f, chunks[0]);
            }
        }

        self.render_status_bar(f, chunks[1]);
    }

    /// Main event loop for the dashboard.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            self.handle_input()?;

            if self.should_quit {
                break;
            }
        }
        Ok(())
    }
}

/// Format a unix-second timestamp as a UTC calendar date.
fn format_date_utc(ts: i64) -> String {
    Utc.timestamp_opt(ts, 0)
        .single()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".into())
}
