//! Application state for the TUI.
//!
//! [`App`] holds widget state only: which page is open, what the user typed
//! and what the last action produced. Key handling never touches the
//! database; it returns an [`Action`] for the dashboard to perform.

use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::events::Event;
use crate::chart::ChartData;
use crate::controllers::Chart;
use crate::db::{QueryResult, TableColumn};
use crate::error::DashError;
use crate::safety::{classify_sql, ClassificationResult};
use crate::sql::{DeleteStatement, Table};

/// Pages listed in the navigation sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Query,
    Insert,
    Delete,
    Visualize,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Home,
        Page::Query,
        Page::Insert,
        Page::Delete,
        Page::Visualize,
    ];

    /// Sidebar label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Query => "Query Page",
            Self::Insert => "Insert Records",
            Self::Delete => "Delete Records",
            Self::Visualize => "Visualizations",
        }
    }

    /// Form fields in tab order.
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Self::Home => &[],
            Self::Query => &[Field::Sql, Field::Button],
            Self::Insert => &[Field::Table, Field::Values, Field::Button],
            Self::Delete => &[Field::Table, Field::Condition, Field::Button],
            Self::Visualize => &[Field::Chart, Field::Button],
        }
    }

    /// Label of the page's submit button.
    pub fn button(&self) -> &'static str {
        match self {
            Self::Home => "",
            Self::Query => "Execute Query",
            Self::Insert => "Insert Record",
            Self::Delete => "Delete Record",
            Self::Visualize => "Generate Visualization",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|p| p == self).unwrap_or(0)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Page {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "home" => Ok(Self::Home),
            "query" => Ok(Self::Query),
            "insert" => Ok(Self::Insert),
            "delete" => Ok(Self::Delete),
            "visualize" | "visualizations" | "charts" => Ok(Self::Visualize),
            _ => Err(DashError::input(format!(
                "Unknown page: {s}. Expected: home, query, insert, delete, or visualize"
            ))),
        }
    }
}

/// Which panel currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Sidebar,
    Form,
}

/// A widget on a page form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Multi-line SQL editor.
    Sql,
    /// Table select box.
    Table,
    /// Comma-separated values input.
    Values,
    /// Delete condition input.
    Condition,
    /// Chart type select box.
    Chart,
    /// The page's submit button.
    Button,
}

/// Input state for text editing.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    pub text: String,
    /// Cursor position (character index).
    pub cursor: usize,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    fn byte_index(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Inserts a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index();
        self.text.insert(at, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        s.chars().for_each(|c| self.insert(c));
    }

    /// Deletes the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index();
            self.text.remove(at);
        }
    }

    /// Deletes the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index();
            self.text.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Clears the input and returns the previous text.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Line and column of the cursor.
    pub fn cursor_position(&self) -> (usize, usize) {
        let before = &self.text[..self.byte_index()];
        let line = before.matches('\n').count();
        let column = before
            .rsplit('\n')
            .next()
            .map(|l| l.chars().count())
            .unwrap_or(0);
        (line, column)
    }
}

/// Severity of the status line message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// The status line message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// A statement waiting for y/n.
#[derive(Debug, Clone)]
pub enum Pending {
    /// Free-form SQL from the query page.
    Query {
        sql: String,
        classification: ClassificationResult,
    },
    /// A prepared delete from the delete page.
    Delete(DeleteStatement),
}

impl Pending {
    /// SQL shown in the dialog.
    pub fn sql(&self) -> &str {
        match self {
            Self::Query { sql, .. } => sql,
            Self::Delete(delete) => &delete.preview,
        }
    }

    pub fn classification(&self) -> ClassificationResult {
        match self {
            Self::Query { classification, .. } => classification.clone(),
            Self::Delete(delete) => classify_sql(&delete.preview),
        }
    }
}

/// Work the dashboard must do in response to input.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ExecuteQuery(String),
    ConfirmQuery(String),
    LoadColumns(Table),
    InsertRecord { table: Table, values: String },
    PrepareDelete { table: Table, condition: String },
    ConfirmDelete(DeleteStatement),
    GenerateChart(Chart),
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub page: Page,
    pub focus: Focus,
    /// Index into the current page's fields.
    pub field: usize,
    pub sql: InputState,
    pub values: InputState,
    pub condition: InputState,
    pub insert_table: Table,
    pub delete_table: Table,
    pub chart: Chart,
    /// Insertable columns of the table they were loaded for.
    pub insert_columns: Option<(Table, Vec<TableColumn>)>,
    /// Rows from the last query page read.
    pub result: Option<QueryResult>,
    pub result_scroll: usize,
    pub chart_data: Option<ChartData>,
    pub notice: Option<Notice>,
    pub pending: Option<Pending>,
    pub is_processing: bool,
    pub connection_info: Option<String>,
}

impl App {
    pub fn new(connection_info: Option<String>) -> Self {
        Self {
            running: true,
            page: Page::Home,
            focus: Focus::Sidebar,
            field: 0,
            sql: InputState::new(),
            values: InputState::new(),
            condition: InputState::new(),
            insert_table: Table::default(),
            delete_table: Table::default(),
            chart: Chart::default(),
            insert_columns: None,
            result: None,
            result_scroll: 0,
            chart_data: None,
            notice: None,
            pending: None,
            is_processing: false,
            connection_info,
        }
    }

    /// The field that has focus, if the form is focused.
    pub fn current_field(&self) -> Option<Field> {
        match self.focus {
            Focus::Sidebar => None,
            Focus::Form => self.page.fields().get(self.field).copied(),
        }
    }

    /// Opens `page`, returning the action needed to fill it.
    pub fn open_page(&mut self, page: Page) -> Option<Action> {
        if page != self.page {
            self.page = page;
            self.field = 0;
            self.notice = None;
        }
        self.columns_action()
    }

    fn columns_action(&self) -> Option<Action> {
        let loaded = matches!(&self.insert_columns, Some((table, _)) if *table == self.insert_table);
        (self.page == Page::Insert && !loaded).then_some(Action::LoadColumns(self.insert_table))
    }

    /// Columns of the insert table, once loaded.
    pub fn insert_columns(&self) -> Option<&[TableColumn]> {
        match &self.insert_columns {
            Some((table, columns)) if *table == self.insert_table => Some(columns),
            _ => None,
        }
    }

    /// Handles an event, returning work for the dashboard if any.
    pub fn handle_event(&mut self, event: Event) -> Option<Action> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(_, _) | Event::Tick => None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.running = false;
            return None;
        }

        if self.pending.is_some() {
            return self.handle_confirmation_key(key);
        }

        match key.code {
            KeyCode::Tab => {
                self.focus_next();
                None
            }
            KeyCode::BackTab => {
                self.focus_previous();
                None
            }
            KeyCode::PageUp => {
                self.result_scroll = self.result_scroll.saturating_sub(10);
                None
            }
            KeyCode::PageDown => {
                let last = self
                    .result
                    .as_ref()
                    .map_or(0, |result| result.rows.len().saturating_sub(1));
                self.result_scroll = self.result_scroll.saturating_add(10).min(last);
                None
            }
            _ => match self.focus {
                Focus::Sidebar => self.handle_sidebar_key(key),
                Focus::Form => self.handle_form_key(key),
            },
        }
    }

    fn handle_confirmation_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.pending.take().map(|pending| match pending {
                    Pending::Query { sql, .. } => Action::ConfirmQuery(sql),
                    Pending::Delete(delete) => Action::ConfirmDelete(delete),
                })
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.pending = None;
                self.notify_info("Cancelled.");
                None
            }
            _ => None,
        }
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent) -> Option<Action> {
        let index = self.page.index();
        match key.code {
            KeyCode::Up if index > 0 => self.open_page(Page::ALL[index - 1]),
            KeyCode::Down if index + 1 < Page::ALL.len() => self.open_page(Page::ALL[index + 1]),
            KeyCode::Enter | KeyCode::Right => {
                if !self.page.fields().is_empty() {
                    self.focus = Focus::Form;
                    self.field = 0;
                }
                None
            }
            _ => None,
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.code == KeyCode::Esc {
            self.focus = Focus::Sidebar;
            return None;
        }

        match self.current_field()? {
            Field::Sql => {
                if key.code == KeyCode::Enter {
                    self.sql.insert('\n');
                } else {
                    edit(&mut self.sql, key);
                }
                None
            }
            Field::Values | Field::Condition => {
                if key.code == KeyCode::Enter {
                    return self.submit();
                }
                let input = if self.page == Page::Insert {
                    &mut self.values
                } else {
                    &mut self.condition
                };
                edit(input, key);
                None
            }
            Field::Table => match key.code {
                KeyCode::Up => self.select_table(-1),
                KeyCode::Down => self.select_table(1),
                KeyCode::Enter => {
                    self.focus_next();
                    None
                }
                _ => None,
            },
            Field::Chart => {
                match key.code {
                    KeyCode::Up => self.chart = step(&Chart::ALL, self.chart, -1),
                    KeyCode::Down => self.chart = step(&Chart::ALL, self.chart, 1),
                    KeyCode::Enter => self.focus_next(),
                    _ => {}
                }
                None
            }
            Field::Button if key.code == KeyCode::Enter => self.submit(),
            Field::Button => None,
        }
    }

    fn select_table(&mut self, delta: isize) -> Option<Action> {
        match self.page {
            Page::Insert => {
                let table = step(&Table::ALL, self.insert_table, delta);
                if table != self.insert_table {
                    self.insert_table = table;
                    self.values.take();
                }
                self.columns_action()
            }
            Page::Delete => {
                self.delete_table = step(&Table::ALL, self.delete_table, delta);
                None
            }
            _ => None,
        }
    }

    /// Submits the current page's form.
    pub fn submit(&mut self) -> Option<Action> {
        match self.page {
            Page::Home => None,
            Page::Query => Some(Action::ExecuteQuery(self.sql.text.clone())),
            Page::Insert => Some(Action::InsertRecord {
                table: self.insert_table,
                values: self.values.text.clone(),
            }),
            Page::Delete => Some(Action::PrepareDelete {
                table: self.delete_table,
                condition: self.condition.text.clone(),
            }),
            Page::Visualize => Some(Action::GenerateChart(self.chart)),
        }
    }

    fn focus_next(&mut self) {
        let count = self.page.fields().len();
        match self.focus {
            Focus::Sidebar if count > 0 => {
                self.focus = Focus::Form;
                self.field = 0;
            }
            Focus::Form if self.field + 1 < count => self.field += 1,
            _ => self.focus = Focus::Sidebar,
        }
    }

    fn focus_previous(&mut self) {
        let count = self.page.fields().len();
        match self.focus {
            Focus::Sidebar if count > 0 => {
                self.focus = Focus::Form;
                self.field = count - 1;
            }
            Focus::Form if self.field > 0 => self.field -= 1,
            _ => self.focus = Focus::Sidebar,
        }
    }

    /// Types text into the focused text field. Other fields ignore it.
    pub fn type_text(&mut self, text: &str) {
        match self.current_field() {
            Some(Field::Sql) => self.sql.insert_str(text),
            Some(Field::Values) => self.values.insert_str(text),
            Some(Field::Condition) => self.condition.insert_str(text),
            _ => {}
        }
    }

    /// Text of the focused text field.
    pub fn current_input(&self) -> Option<&InputState> {
        match self.current_field()? {
            Field::Sql => Some(&self.sql),
            Field::Values => Some(&self.values),
            Field::Condition => Some(&self.condition),
            _ => None,
        }
    }

    pub fn show_rows(&mut self, result: QueryResult) {
        self.result = Some(result);
        self.result_scroll = 0;
    }

    pub fn show_chart(&mut self, chart: ChartData) {
        self.chart_data = Some(chart);
    }

    pub fn set_insert_columns(&mut self, table: Table, columns: Vec<TableColumn>) {
        self.insert_columns = Some((table, columns));
    }

    pub fn set_pending(&mut self, pending: Pending) {
        self.pending = Some(pending);
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn notify_success(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice {
            kind: NoticeKind::Success,
            message: message.into(),
        });
    }

    pub fn notify_info(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice {
            kind: NoticeKind::Info,
            message: message.into(),
        });
    }

    pub fn notify_error(&mut self, error: &DashError) {
        self.notice = Some(Notice {
            kind: NoticeKind::Error,
            message: error.to_string(),
        });
    }
}

/// Applies an editing key to a text input.
fn edit(input: &mut InputState, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        _ => {}
    }
}

/// Moves `current` by `delta` within `options`, stopping at either end.
fn step<T: Copy + PartialEq>(options: &[T], current: T, delta: isize) -> T {
    let index = options.iter().position(|o| *o == current).unwrap_or(0);
    let last = options.len().saturating_sub(1);
    let next = index.saturating_add_signed(delta).min(last);
    options.get(next).copied().unwrap_or(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ColumnInfo, Value};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn press(app: &mut App, codes: &[KeyCode]) -> Vec<Action> {
        codes
            .iter()
            .filter_map(|code| app.handle_event(key(*code)))
            .collect()
    }

    #[test]
    fn test_input_insert_and_backspace() {
        let mut input = InputState::new();
        input.insert_str("héllo");
        assert_eq!(input.cursor, 5);
        input.move_left();
        input.backspace();
        assert_eq!(input.text, "hélo");
        assert_eq!(input.cursor, 3);
    }

    #[test]
    fn test_input_delete_and_movement() {
        let mut input = InputState::new();
        input.insert_str("hello");
        input.move_home();
        input.delete();
        assert_eq!(input.text, "ello");
        input.move_right();
        assert_eq!(input.cursor, 1);
        input.move_end();
        assert_eq!(input.cursor, 4);
        input.move_right();
        assert_eq!(input.cursor, 4);
    }

    #[test]
    fn test_input_take() {
        let mut input = InputState::new();
        input.insert_str("abc");
        assert_eq!(input.take(), "abc");
        assert!(input.is_empty());
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn test_cursor_position_multiline() {
        let mut input = InputState::new();
        input.insert_str("SELECT *\nFROM pat");
        assert_eq!(input.cursor_position(), (1, 8));
        input.move_home();
        assert_eq!(input.cursor_position(), (0, 0));
    }

    #[test]
    fn test_page_from_str() {
        assert_eq!("Insert".parse::<Page>().unwrap(), Page::Insert);
        assert_eq!("visualizations".parse::<Page>().unwrap(), Page::Visualize);
        assert!("reports".parse::<Page>().is_err());
    }

    #[test]
    fn test_sidebar_navigation() {
        let mut app = App::new(None);
        assert!(press(&mut app, &[KeyCode::Up]).is_empty());
        assert_eq!(app.page, Page::Home);

        press(&mut app, &[KeyCode::Down]);
        assert_eq!(app.page, Page::Query);

        let actions = press(&mut app, &[KeyCode::Down]);
        assert_eq!(app.page, Page::Insert);
        assert_eq!(actions, vec![Action::LoadColumns(Table::Patient)]);

        press(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Down]);
        assert_eq!(app.page, Page::Visualize);
    }

    #[test]
    fn test_tab_cycles_fields() {
        let mut app = App::new(None);
        app.open_page(Page::Delete);

        press(&mut app, &[KeyCode::Tab]);
        assert_eq!(app.current_field(), Some(Field::Table));
        press(&mut app, &[KeyCode::Tab, KeyCode::Tab]);
        assert_eq!(app.current_field(), Some(Field::Button));
        press(&mut app, &[KeyCode::Tab]);
        assert_eq!(app.focus, Focus::Sidebar);
        press(&mut app, &[KeyCode::BackTab]);
        assert_eq!(app.current_field(), Some(Field::Button));
    }

    #[test]
    fn test_home_has_no_form() {
        let mut app = App::new(None);
        press(&mut app, &[KeyCode::Tab]);
        assert_eq!(app.focus, Focus::Sidebar);
    }

    #[test]
    fn test_query_editor_keeps_newlines() {
        let mut app = App::new(None);
        app.open_page(Page::Query);
        press(&mut app, &[KeyCode::Tab]);
        app.type_text("SELECT 1");
        let actions = press(&mut app, &[KeyCode::Enter]);
        assert!(actions.is_empty());
        assert_eq!(app.sql.text, "SELECT 1\n");

        let actions = press(&mut app, &[KeyCode::Tab, KeyCode::Enter]);
        assert_eq!(actions, vec![Action::ExecuteQuery("SELECT 1\n".into())]);
    }

    #[test]
    fn test_condition_enter_submits() {
        let mut app = App::new(None);
        app.open_page(Page::Delete);
        press(&mut app, &[KeyCode::Tab, KeyCode::Down, KeyCode::Tab]);
        app.type_text("doctor_id = 4");

        let actions = press(&mut app, &[KeyCode::Enter]);
        assert_eq!(
            actions,
            vec![Action::PrepareDelete {
                table: Table::Doctor,
                condition: "doctor_id = 4".into(),
            }]
        );
    }

    #[test]
    fn test_insert_table_change_reloads_columns() {
        let mut app = App::new(None);
        app.open_page(Page::Insert);
        app.set_insert_columns(Table::Patient, vec![TableColumn::required("name", "varchar")]);
        press(&mut app, &[KeyCode::Tab]);
        assert!(press(&mut app, &[KeyCode::Up]).is_empty());

        let actions = press(&mut app, &[KeyCode::Down]);
        assert_eq!(app.insert_table, Table::Doctor);
        assert_eq!(actions, vec![Action::LoadColumns(Table::Doctor)]);
        assert!(app.insert_columns().is_none());
    }

    #[test]
    fn test_chart_select_stops_at_ends() {
        let mut app = App::new(None);
        app.open_page(Page::Visualize);
        press(&mut app, &[KeyCode::Tab]);
        press(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Down, KeyCode::Down]);
        assert_eq!(app.chart, Chart::TreatmentResults);

        let actions = press(&mut app, &[KeyCode::Enter, KeyCode::Enter]);
        assert_eq!(actions, vec![Action::GenerateChart(Chart::TreatmentResults)]);
    }

    #[test]
    fn test_confirmation_keys() {
        let mut app = App::new(None);
        let classification = classify_sql("DROP TABLE visits");
        app.set_pending(Pending::Query {
            sql: "DROP TABLE visits".into(),
            classification,
        });

        // Other keys are swallowed while the dialog is open
        assert!(press(&mut app, &[KeyCode::Down]).is_empty());
        assert_eq!(app.page, Page::Home);

        let actions = press(&mut app, &[KeyCode::Char('y')]);
        assert_eq!(actions, vec![Action::ConfirmQuery("DROP TABLE visits".into())]);
        assert!(!app.has_pending());

        app.set_pending(Pending::Query {
            sql: "DELETE FROM visits".into(),
            classification: classify_sql("DELETE FROM visits"),
        });
        assert!(press(&mut app, &[KeyCode::Esc]).is_empty());
        assert!(!app.has_pending());
        assert_eq!(app.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Info));
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = App::new(None);
        app.handle_event(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(!app.running);
    }

    #[test]
    fn test_opening_page_clears_notice() {
        let mut app = App::new(None);
        app.notify_success("done");
        app.open_page(Page::Query);
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_page_down_stops_at_last_row() {
        let mut app = App::new(None);
        press(&mut app, &[KeyCode::PageDown]);
        assert_eq!(app.result_scroll, 0);

        let rows = (0..25).map(|i| vec![Value::Int(i)]).collect();
        app.show_rows(QueryResult::with_data(
            vec![ColumnInfo::new("patient_id", "int4")],
            rows,
        ));
        press(&mut app, &[KeyCode::PageDown, KeyCode::PageDown]);
        assert_eq!(app.result_scroll, 20);
        press(&mut app, &[KeyCode::PageDown, KeyCode::PageDown]);
        assert_eq!(app.result_scroll, 24);
        press(&mut app, &[KeyCode::PageUp]);
        assert_eq!(app.result_scroll, 14);
    }
}
