use std::io;
use std::path::Path;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Modifier;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Terminal,
};

use crate::db::{load_snapshot, mysql::MySqlClient};
use crate::diff::{compute_schema_diff, SchemaDiff, TableDiff};
use crate::errors::DbError;
use crate::models::connections::{ConnectionConfig, ProfileStore};
use crate::report::{
    html::build_html, markdown::build_markdown, sorted_names, summary_line, write_report,
};
use crate::review::ReviewState;

const MARKDOWN_EXPORT: &str = "schema_diff.md";
const HTML_EXPORT: &str = "schema_diff.html";
const REVIEW_EXPORT: &str = "reviewed.json";

pub struct SchemaDiffUI {
    profile_store: ProfileStore,
    connection_input: ConnectionInput,
    current_screen: ScreenState,
    diff: Option<SchemaDiff>,
    review: ReviewState,
    entries: Vec<DiffEntry>,
    selected_entry: usize,
    popup_message: String,
    popup_return: ScreenState,
}

enum InputField {
    Host,
    Port,
    Username,
    Password,
    OldDatabase,
    NewDatabase,
}

struct ConnectionInput {
    host: String,
    port: String,
    username: String,
    password: String,
    old_database: String,
    new_database: String,
    current_field: InputField,
}

impl ConnectionInput {
    fn new() -> Self {
        Self {
            host: "localhost".to_string(),
            port: "3306".to_string(),
            username: String::new(),
            password: String::new(),
            old_database: String::new(),
            new_database: String::new(),
            current_field: InputField::Host,
        }
    }

    fn from_config(config: &ConnectionConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port.to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            old_database: config.old_database.clone(),
            new_database: config.new_database.clone(),
            current_field: InputField::Host,
        }
    }

    fn to_config(&self) -> Result<ConnectionConfig, DbError> {
        let port = self
            .port
            .parse::<u16>()
            .map_err(|_| DbError::Config(format!("invalid port: {}", self.port)))?;
        if self.old_database.is_empty() || self.new_database.is_empty() {
            return Err(DbError::Config(
                "both databases must be specified".to_string(),
            ));
        }

        Ok(ConnectionConfig {
            host: self.host.clone(),
            port,
            username: self.username.clone(),
            password: self.password.clone(),
            old_database: self.old_database.clone(),
            new_database: self.new_database.clone(),
        })
    }

    fn current_value_mut(&mut self) -> &mut String {
        match self.current_field {
            InputField::Host => &mut self.host,
            InputField::Port => &mut self.port,
            InputField::Username => &mut self.username,
            InputField::Password => &mut self.password,
            InputField::OldDatabase => &mut self.old_database,
            InputField::NewDatabase => &mut self.new_database,
        }
    }

    fn next_field(&mut self) {
        self.current_field = match self.current_field {
            InputField::Host => InputField::Port,
            InputField::Port => InputField::Username,
            InputField::Username => InputField::Password,
            InputField::Password => InputField::OldDatabase,
            InputField::OldDatabase => InputField::NewDatabase,
            InputField::NewDatabase => InputField::Host,
        };
    }

    fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            InputField::Host => InputField::NewDatabase,
            InputField::Port => InputField::Host,
            InputField::Username => InputField::Port,
            InputField::Password => InputField::Username,
            InputField::OldDatabase => InputField::Password,
            InputField::NewDatabase => InputField::OldDatabase,
        };
    }
}

#[derive(Clone, Copy, PartialEq)]
enum ScreenState {
    ConnectionInput,
    DiffView,
    MessagePopup,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ChangeKind {
    Added,
    Removed,
    Changed,
}

struct DiffEntry {
    table: String,
    kind: ChangeKind,
    detail: Vec<String>,
}

impl SchemaDiffUI {
    pub fn new(profile_store: ProfileStore) -> Self {
        let connection_input = match profile_store.load() {
            Ok(Some(config)) => ConnectionInput::from_config(&config),
            Ok(None) => ConnectionInput::new(),
            Err(e) => {
                log::warn!("failed to load saved connection profile: {}", e);
                ConnectionInput::new()
            }
        };

        Self {
            profile_store,
            connection_input,
            current_screen: ScreenState::ConnectionInput,
            diff: None,
            review: ReviewState::new(),
            entries: Vec::new(),
            selected_entry: 0,
            popup_message: String::new(),
            popup_return: ScreenState::ConnectionInput,
        }
    }

    pub async fn run(&mut self) -> Result<(), io::Error> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.ui_loop(&mut terminal).await;

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    async fn ui_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        loop {
            match self.current_screen {
                ScreenState::ConnectionInput => self.render_connection_screen(terminal)?,
                ScreenState::DiffView => self.render_diff_screen(terminal)?,
                ScreenState::MessagePopup => self.render_message_popup(terminal)?,
            }

            if let Event::Key(key) = event::read()? {
                match self.current_screen {
                    ScreenState::ConnectionInput => {
                        if key.code == KeyCode::Esc {
                            return Ok(());
                        }
                        self.handle_connection_input(key.code).await;
                    }
                    ScreenState::DiffView => {
                        if self.handle_diff_view_input(key.code) {
                            return Ok(());
                        }
                    }
                    ScreenState::MessagePopup => {
                        self.current_screen = self.popup_return;
                    }
                }
            }
        }
    }

    async fn handle_connection_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => {
                if matches!(self.connection_input.current_field, InputField::Port)
                    && !c.is_ascii_digit()
                {
                    return;
                }
                self.connection_input.current_value_mut().push(c);
            }
            KeyCode::Backspace => {
                self.connection_input.current_value_mut().pop();
            }
            KeyCode::Down | KeyCode::Tab => self.connection_input.next_field(),
            KeyCode::Up => self.connection_input.previous_field(),
            KeyCode::Enter => {
                if matches!(self.connection_input.current_field, InputField::NewDatabase) {
                    match self.run_compare().await {
                        Ok(()) => self.current_screen = ScreenState::DiffView,
                        Err(e) => {
                            log::error!("schema comparison failed: {}", e);
                            self.show_popup(format!("{}", e), ScreenState::ConnectionInput);
                        }
                    }
                } else {
                    self.connection_input.next_field();
                }
            }
            _ => {}
        }
    }

    async fn run_compare(&mut self) -> Result<(), DbError> {
        let config = self.connection_input.to_config()?;

        let client = MySqlClient::connect(&config.database_url(&config.old_database)).await?;
        let old = load_snapshot(&client, &config.old_database).await?;
        let new = load_snapshot(&client, &config.new_database).await?;

        let diff = compute_schema_diff(&old, &new);
        self.review.seed(&diff);
        self.entries = build_entries(&diff);
        self.selected_entry = 0;
        self.diff = Some(diff);

        Ok(())
    }

    fn handle_diff_view_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => self.current_screen = ScreenState::ConnectionInput,
            KeyCode::Up => {
                if self.selected_entry > 0 {
                    self.selected_entry -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_entry + 1 < self.entries.len() {
                    self.selected_entry += 1;
                }
            }
            KeyCode::Char(' ') => {
                if let Some(entry) = self.entries.get(self.selected_entry) {
                    self.review.toggle(&entry.table);
                }
            }
            KeyCode::Char('a') => self.review.check_all(),
            KeyCode::Char('u') => self.review.uncheck_all(),
            KeyCode::Char('m') => self.run_export(ExportKind::Markdown),
            KeyCode::Char('h') => self.run_export(ExportKind::Html),
            KeyCode::Char('j') => self.run_export(ExportKind::Review),
            KeyCode::Char('s') => {
                let result = self
                    .connection_input
                    .to_config()
                    .and_then(|config| self.profile_store.save(&config));
                match result {
                    Ok(()) => {
                        self.show_popup("Connection details saved".to_string(), ScreenState::DiffView)
                    }
                    Err(e) => self.show_popup(format!("{}", e), ScreenState::DiffView),
                }
            }
            KeyCode::Char('c') => match self.profile_store.clear() {
                Ok(()) => self.show_popup(
                    "Saved connection details cleared".to_string(),
                    ScreenState::DiffView,
                ),
                Err(e) => self.show_popup(format!("{}", e), ScreenState::DiffView),
            },
            _ => {}
        }
        false
    }

    fn run_export(&mut self, kind: ExportKind) {
        match self.export(kind) {
            Ok(path) => self.show_popup(format!("Report written to {}", path), ScreenState::DiffView),
            Err(e) => {
                log::error!("export failed: {}", e);
                self.show_popup(format!("{}", e), ScreenState::DiffView);
            }
        }
    }

    fn export(&self, kind: ExportKind) -> Result<&'static str, DbError> {
        let diff = self
            .diff
            .as_ref()
            .ok_or_else(|| DbError::Config("no diff has been computed yet".to_string()))?;

        match kind {
            ExportKind::Markdown => {
                write_report(Path::new(MARKDOWN_EXPORT), &build_markdown(diff))?;
                Ok(MARKDOWN_EXPORT)
            }
            ExportKind::Html => {
                write_report(Path::new(HTML_EXPORT), &build_html(diff, &self.review))?;
                Ok(HTML_EXPORT)
            }
            ExportKind::Review => {
                write_report(Path::new(REVIEW_EXPORT), &self.review.to_json()?)?;
                Ok(REVIEW_EXPORT)
            }
        }
    }

    fn show_popup(&mut self, message: String, return_screen: ScreenState) {
        self.popup_message = message;
        self.popup_return = return_screen;
        self.current_screen = ScreenState::MessagePopup;
    }

    fn render_connection_screen(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        let input = &self.connection_input;
        let mut content = [
            format!("Host: {}", input.host),
            format!("Port: {}", input.port),
            format!("Username: {}", input.username),
            format!("Password: {}", "*".repeat(input.password.len())),
            format!("Old Database: {}", input.old_database),
            format!("New Database: {}", input.new_database),
        ];
        content[self.current_input_index()].push_str(" <");

        terminal.draw(|f| {
            let size = f.area();

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints(
                    [
                        Constraint::Percentage(25),
                        Constraint::Percentage(50),
                        Constraint::Percentage(25),
                    ]
                    .as_ref(),
                )
                .split(size);

            let horizontal_layout = centered_rect(50, chunks[1]);

            let block = Block::default()
                .title("MySQL Schema Diff - Connection")
                .borders(Borders::ALL)
                .title_alignment(Alignment::Center);

            let mut lines = content.to_vec();
            lines.push(String::new());
            lines.push("Enter: next field / compare on last | Esc: quit".to_string());

            let input_paragraph = Paragraph::new(lines.join("\n"))
                .block(block)
                .style(Style::default().fg(Color::White))
                .alignment(Alignment::Left);

            f.render_widget(input_paragraph, horizontal_layout);
        })?;

        Ok(())
    }

    fn current_input_index(&self) -> usize {
        match self.connection_input.current_field {
            InputField::Host => 0,
            InputField::Port => 1,
            InputField::Username => 2,
            InputField::Password => 3,
            InputField::OldDatabase => 4,
            InputField::NewDatabase => 5,
        }
    }

    fn render_diff_screen(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        let summary = match self.diff.as_ref().and_then(summary_line) {
            Some(line) => format!(
                "{} | Reviewed {}/{}",
                line,
                self.review.reviewed_count(),
                self.review.len()
            ),
            None => "No schema changes detected.".to_string(),
        };

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let checkbox = if self.review.is_reviewed(&entry.table) {
                    "[x]"
                } else {
                    "[ ]"
                };
                let sigil = match entry.kind {
                    ChangeKind::Added => '+',
                    ChangeKind::Removed => '-',
                    ChangeKind::Changed => '~',
                };
                let label = format!("{} {} {}", checkbox, sigil, entry.table);

                let style = if i == self.selected_entry {
                    Style::default()
                        .bg(Color::Yellow)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(kind_color(entry.kind))
                };
                ListItem::new(label).style(style)
            })
            .collect();

        let detail_items: Vec<ListItem> = self
            .entries
            .get(self.selected_entry)
            .map(|entry| {
                entry
                    .detail
                    .iter()
                    .map(|line| {
                        let color = if line.starts_with('+') {
                            Color::Green
                        } else if line.starts_with('-') {
                            Color::Red
                        } else {
                            kind_color(entry.kind)
                        };
                        ListItem::new(line.clone()).style(Style::default().fg(color))
                    })
                    .collect()
            })
            .unwrap_or_default();

        terminal.draw(|f| {
            let size = f.area();

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints(
                    [
                        Constraint::Length(3),
                        Constraint::Min(5),
                        Constraint::Length(3),
                    ]
                    .as_ref(),
                )
                .split(size);

            let summary_widget = Paragraph::new(summary.clone())
                .block(Block::default().title("Summary").borders(Borders::ALL))
                .style(Style::default().fg(Color::White));
            f.render_widget(summary_widget, chunks[0]);

            let main = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
                .split(chunks[1]);

            let list_widget = List::new(items.clone())
                .block(Block::default().title("Changes").borders(Borders::ALL));
            f.render_widget(list_widget, main[0]);

            let detail_widget = List::new(detail_items.clone())
                .block(Block::default().title("Detail").borders(Borders::ALL));
            f.render_widget(detail_widget, main[1]);

            let help = Paragraph::new(
                "Up/Down: select | Space: toggle reviewed | a/u: check/uncheck all | \
                 m/h/j: export md/html/review | s/c: save/clear profile | q: quit",
            )
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::Gray));
            f.render_widget(help, chunks[2]);
        })?;

        Ok(())
    }

    fn render_message_popup(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        let message = self.popup_message.clone();

        terminal.draw(|f| {
            let size = f.area();

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints(
                    [
                        Constraint::Percentage(40),
                        Constraint::Percentage(20),
                        Constraint::Percentage(40),
                    ]
                    .as_ref(),
                )
                .split(size);

            let horizontal_layout = centered_rect(60, chunks[1]);

            let popup = Paragraph::new(format!("{}\n\nPress any key to continue", message))
                .block(Block::default().borders(Borders::ALL))
                .style(Style::default().fg(Color::White))
                .alignment(Alignment::Center);

            f.render_widget(popup, horizontal_layout);
        })?;

        Ok(())
    }
}

enum ExportKind {
    Markdown,
    Html,
    Review,
}

fn kind_color(kind: ChangeKind) -> Color {
    match kind {
        ChangeKind::Added => Color::Green,
        ChangeKind::Removed => Color::Red,
        ChangeKind::Changed => Color::Yellow,
    }
}

fn changed_detail(table_diff: &TableDiff) -> Vec<String> {
    let mut detail = Vec::new();

    let mut added: Vec<_> = table_diff.added_columns.values().collect();
    added.sort_by_key(|info| info.name.as_str());
    for info in added {
        detail.push(format!("+ {}", info.summary()));
    }

    let mut removed: Vec<_> = table_diff.removed_columns.values().collect();
    removed.sort_by_key(|info| info.name.as_str());
    for info in removed {
        detail.push(format!("- {}", info.summary()));
    }

    detail
}

/// Flatten a diff into the display order used by the review list: added
/// tables, removed tables, then changed tables, each sorted by name.
fn build_entries(diff: &SchemaDiff) -> Vec<DiffEntry> {
    let mut entries = Vec::new();

    for table in sorted_names(&diff.added_tables) {
        entries.push(DiffEntry {
            table: table.clone(),
            kind: ChangeKind::Added,
            detail: vec!["New table added to the schema".to_string()],
        });
    }

    for table in sorted_names(&diff.removed_tables) {
        entries.push(DiffEntry {
            table: table.clone(),
            kind: ChangeKind::Removed,
            detail: vec!["Table removed from the schema".to_string()],
        });
    }

    let mut changed: Vec<_> = diff.changed_tables.iter().collect();
    changed.sort_by_key(|(name, _)| name.as_str());
    for (table, table_diff) in changed {
        entries.push(DiffEntry {
            table: table.clone(),
            kind: ChangeKind::Changed,
            detail: changed_detail(table_diff),
        });
    }

    entries
}

fn centered_rect(percent_x: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    popup_layout[1]
}
