//! Headless mode for scripted testing and automation.
//!
//! Runs the dashboard against an in-memory terminal, executing scripted
//! events and capturing the screen for verification.

mod events;
mod output;

pub use events::{Assertion, Event, EventParser};
pub use output::{HeadlessOutput, OutputFormat, ScreenRenderer};

use crate::app::Dashboard;
use crate::cli::Cli;
use crate::config::Config;
use crate::error::{DashError, Result};
use crate::tui::app::{Action, App, Page};
use crate::tui::ui;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Configuration for headless mode execution.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Screen width in columns.
    pub width: u16,
    /// Screen height in rows.
    pub height: u16,
    pub output_format: OutputFormat,
    /// Whether to stop on first assertion failure.
    pub fail_fast: bool,
    /// Path to write output (None = stdout).
    pub output_file: Option<std::path::PathBuf>,
    /// Page shown before the first event.
    pub start_page: Page,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 30,
            output_format: OutputFormat::Text,
            fail_fast: false,
            output_file: None,
            start_page: Page::Home,
        }
    }
}

impl HeadlessConfig {
    /// Creates a HeadlessConfig from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let (width, height) = cli.parse_screen_size()?;

        Ok(Self {
            width,
            height,
            output_format: cli.parse_output_format()?,
            fail_fast: cli.fail_fast,
            output_file: cli.output_file.clone(),
            start_page: cli.page,
        })
    }
}

/// Result of headless execution.
#[derive(Debug)]
pub struct HeadlessResult {
    /// Final screen content as text.
    pub screen: String,
    pub screen_lines: Vec<String>,
    pub events_executed: usize,
    pub duration: Duration,
    pub assertions_passed: usize,
    pub assertions_failed: usize,
    /// Application state after the last event.
    pub state: HeadlessState,
    /// Frame captures (for frames output mode).
    pub frames: Vec<Frame>,
}

/// Snapshot of application state for JSON output and state assertions.
#[derive(Debug, Clone, Serialize)]
pub struct HeadlessState {
    pub page: String,
    pub focus: String,
    /// Focused form field, if the form has focus.
    pub field: Option<String>,
    /// Text of the focused input, if it is a text field.
    pub input_text: Option<String>,
    pub notice: Option<String>,
    pub notice_kind: Option<String>,
    /// SQL awaiting confirmation.
    pub pending_sql: Option<String>,
    pub is_processing: bool,
    pub running: bool,
    /// Rows in the result table on the query page.
    pub row_count: Option<usize>,
    /// Bars or slices in the current chart.
    pub chart_points: Option<usize>,
}

impl HeadlessState {
    pub fn from_app(app: &App) -> Self {
        Self {
            page: app.page.label().to_string(),
            focus: format!("{:?}", app.focus),
            field: app.current_field().map(|f| format!("{f:?}")),
            input_text: app.current_input().map(|input| input.text.clone()),
            notice: app.notice.as_ref().map(|n| n.message.clone()),
            notice_kind: app.notice.as_ref().map(|n| format!("{:?}", n.kind)),
            pending_sql: app.pending.as_ref().map(|p| p.sql().to_string()),
            is_processing: app.is_processing,
            running: app.running,
            row_count: app.result.as_ref().map(|r| r.row_count),
            chart_points: app.chart_data.as_ref().map(|c| c.data.len()),
        }
    }

    /// Looks up a field by name for `assert:state:` events.
    ///
    /// Unset optional fields read as `none`.
    pub fn get(&self, field: &str) -> Option<String> {
        let optional = |value: &Option<String>| {
            Some(value.clone().unwrap_or_else(|| "none".to_string()))
        };
        let count = |value: Option<usize>| Some(value.map_or("none".to_string(), |n| n.to_string()));

        match field {
            "page" => Some(self.page.clone()),
            "focus" => Some(self.focus.clone()),
            "field" => optional(&self.field),
            "input_text" => optional(&self.input_text),
            "notice" => optional(&self.notice),
            "notice_kind" => optional(&self.notice_kind),
            "pending_sql" | "pending" => optional(&self.pending_sql),
            "is_processing" => Some(self.is_processing.to_string()),
            "running" => Some(self.running.to_string()),
            "row_count" => count(self.row_count),
            "chart_points" => count(self.chart_points),
            _ => None,
        }
    }
}

/// A captured frame (screen state after an event).
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame number (0 = initial state).
    pub number: usize,
    /// Event that produced this frame (None for initial).
    pub event: Option<String>,
    pub screen: String,
}

/// Runs the dashboard in headless mode.
pub struct HeadlessRunner {
    config: HeadlessConfig,
    terminal: Terminal<TestBackend>,
    app: App,
    dashboard: Option<Dashboard>,
    events: Vec<Event>,
    frames: Vec<Frame>,
    start_time: Instant,
    assertions_passed: usize,
    assertions_failed: usize,
}

impl HeadlessRunner {
    /// Creates a runner with no database attached.
    pub fn new(config: HeadlessConfig) -> Result<Self> {
        let backend = TestBackend::new(config.width, config.height);
        let terminal = Terminal::new(backend)
            .map_err(|e| DashError::internal(format!("Failed to create test terminal: {e}")))?;

        Ok(Self {
            config,
            terminal,
            app: App::new(None),
            dashboard: None,
            events: Vec::new(),
            frames: Vec::new(),
            start_time: Instant::now(),
            assertions_passed: 0,
            assertions_failed: 0,
        })
    }

    /// Attaches the dashboard that performs submitted actions.
    pub fn with_dashboard(mut self, dashboard: Dashboard) -> Self {
        self.app.connection_info = dashboard.connection_info().map(str::to_string);
        self.dashboard = Some(dashboard);
        self
    }

    /// Loads events from a string (comma-separated or newline-separated).
    pub fn load_events(&mut self, input: &str) -> Result<()> {
        self.events = EventParser::new().parse_all(input)?;
        Ok(())
    }

    /// Loads events from a script file, or stdin for `-`.
    pub fn load_script(&mut self, path: &str) -> Result<()> {
        let content = if path == "-" {
            use std::io::Read;
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| DashError::internal(format!("Failed to read stdin: {e}")))?;
            buffer
        } else {
            std::fs::read_to_string(path)
                .map_err(|e| DashError::internal(format!("Failed to read script file: {e}")))?
        };

        self.load_events(&content)
    }

    /// Runs the loaded events and returns the result.
    pub async fn run(mut self) -> Result<HeadlessResult> {
        self.start_time = Instant::now();

        let action = self.app.open_page(self.config.start_page);
        self.perform(action).await;
        self.capture_frame(None)?;

        let events = std::mem::take(&mut self.events);
        let mut events_executed = 0;

        for event in events {
            let event_str = event.to_string();

            match &event {
                Event::Key(key_event) => {
                    let action = self.app.handle_event(crate::tui::Event::Key(*key_event));
                    self.perform(action).await;
                }
                Event::Type(text) => self.app.type_text(text),
                Event::Page(page) => {
                    let action = self.app.open_page(*page);
                    self.perform(action).await;
                }
                Event::Wait(duration) => tokio::time::sleep(*duration).await,
                Event::Resize(w, h) => {
                    self.terminal
                        .resize(Rect::new(0, 0, *w, *h))
                        .map_err(|e| DashError::internal(format!("Resize failed: {e}")))?;
                    self.app.handle_event(crate::tui::Event::Resize(*w, *h));
                }
                // Every event is captured as a frame in frames mode.
                Event::Snapshot(_) => {}
                Event::Assert(assertion) => {
                    self.draw()?;
                    let screen = self.render_screen();
                    if assertion.check(&screen, &self.app) {
                        self.assertions_passed += 1;
                    } else {
                        warn!("Assertion failed: {}", event_str);
                        self.assertions_failed += 1;
                        if self.config.fail_fast {
                            break;
                        }
                    }
                }
            }

            events_executed += 1;
            self.draw()?;

            if self.config.output_format == OutputFormat::Frames {
                self.capture_frame(Some(event_str))?;
            }

            if !self.app.running {
                break;
            }
        }

        self.draw()?;
        let screen = self.render_screen();
        let screen_lines = screen.lines().map(String::from).collect();

        if let Some(dashboard) = &self.dashboard {
            if let Err(e) = dashboard.close().await {
                warn!("Error closing database connection: {}", e);
            }
        }

        Ok(HeadlessResult {
            screen,
            screen_lines,
            events_executed,
            duration: self.start_time.elapsed(),
            assertions_passed: self.assertions_passed,
            assertions_failed: self.assertions_failed,
            state: HeadlessState::from_app(&self.app),
            frames: self.frames,
        })
    }

    async fn perform(&mut self, action: Option<Action>) {
        let Some(action) = action else {
            return;
        };
        match &self.dashboard {
            Some(dashboard) => dashboard.perform(&mut self.app, action).await,
            None => self
                .app
                .notify_error(&DashError::connection("Not connected to a database")),
        }
    }

    fn draw(&mut self) -> Result<()> {
        self.terminal
            .draw(|frame| ui::render(frame, &self.app))
            .map_err(|e| DashError::internal(format!("Failed to render: {e}")))?;
        Ok(())
    }

    fn render_screen(&self) -> String {
        ScreenRenderer::render(self.terminal.backend().buffer())
    }

    fn capture_frame(&mut self, event: Option<String>) -> Result<()> {
        self.draw()?;
        let screen = self.render_screen();
        let number = self.frames.len();
        self.frames.push(Frame {
            number,
            event,
            screen,
        });
        Ok(())
    }
}

/// Picks the database for a headless run.
///
/// `--mock-db` wins. Otherwise a configured database is connected; with
/// nothing configured the run goes ahead unconnected.
async fn headless_dashboard(cli: &Cli) -> Result<Option<Dashboard>> {
    if cli.mock_db {
        return Ok(Some(Dashboard::mock()));
    }

    let config = Config::load_from_file(&cli.config_path())?;
    match cli.resolve_connection(&config) {
        Ok(connection) => Ok(Some(Dashboard::connect(&connection, &config.pool).await?)),
        Err(e) => {
            warn!("Running headless without a database: {}", e);
            Ok(None)
        }
    }
}

/// Runs headless mode from CLI arguments and returns the exit code.
pub async fn run_headless(cli: &Cli) -> Result<i32> {
    cli.validate_headless()?;

    let config = HeadlessConfig::from_cli(cli)?;
    let mut runner = HeadlessRunner::new(config.clone())?;

    if let Some(events) = &cli.events {
        runner.load_events(events)?;
    } else if let Some(script_path) = &cli.script {
        runner.load_script(script_path)?;
    }

    if let Some(dashboard) = headless_dashboard(cli).await? {
        runner = runner.with_dashboard(dashboard);
    }

    let result = runner.run().await?;
    info!(
        "Headless run finished: {} events, {} assertions failed",
        result.events_executed, result.assertions_failed
    );

    let output_str = HeadlessOutput::new(config.output_format).format(&result);
    if let Some(path) = &config.output_file {
        std::fs::write(path, &output_str)
            .map_err(|e| DashError::internal(format!("Failed to write output file: {e}")))?;
    } else {
        print!("{}", output_str);
    }

    Ok(if result.assertions_failed > 0 { 1 } else { 0 })
}
