//! Terminal User Interface for the dashboard.
//!
//! Provides the main TUI application loop using ratatui and crossterm.

pub mod app;
mod events;
pub mod headless;
mod ui;
pub mod widgets;

pub use app::{Action, App, Page};
pub use events::{Event, EventHandler};

use crate::app::Dashboard;
use crate::error::{DashError, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use tracing::{debug, info, warn};

/// The main TUI application runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_handler: EventHandler,
}

impl Tui {
    /// Creates a new TUI instance, initializing the terminal.
    pub fn new() -> Result<Self> {
        let terminal = Self::setup_terminal()?;
        Ok(Self {
            terminal,
            event_handler: EventHandler::new(),
        })
    }

    /// Sets up the terminal for TUI rendering.
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| DashError::internal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .map_err(|e| DashError::internal(format!("Failed to enter alternate screen: {e}")))?;

        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend)
            .map_err(|e| DashError::internal(format!("Failed to create terminal: {e}")))
    }

    /// Restores the terminal to its original state.
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| DashError::internal(format!("Failed to disable raw mode: {e}")))?;

        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .map_err(|e| DashError::internal(format!("Failed to leave alternate screen: {e}")))?;

        self.terminal
            .show_cursor()
            .map_err(|e| DashError::internal(format!("Failed to show cursor: {e}")))?;

        Ok(())
    }

    /// Runs the event loop until the user quits, then closes the pool.
    pub async fn run(&mut self, dashboard: &Dashboard, start_page: Page) -> Result<()> {
        // Restore the terminal if anything panics while it is in raw mode.
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        let mut app = App::new(dashboard.connection_info().map(str::to_string));
        let result = self.run_event_loop(&mut app, dashboard, start_page).await;

        if let Err(e) = dashboard.close().await {
            warn!("Error closing database connection: {}", e);
        }

        let _ = panic::take_hook();
        result
    }

    async fn run_event_loop(
        &mut self,
        app: &mut App,
        dashboard: &Dashboard,
        start_page: Page,
    ) -> Result<()> {
        let mut pending_action = app.open_page(start_page);

        loop {
            if let Some(action) = pending_action.take() {
                app.is_processing = true;
                self.draw(app)?;
                dashboard.perform(app, action).await;
                app.is_processing = false;
            }

            self.draw(app)?;
            if !app.running {
                break;
            }

            // Polling blocks, so keep it off the async workers.
            let handler = self.event_handler;
            let event = tokio::task::spawn_blocking(move || handler.next())
                .await
                .map_err(|e| DashError::internal(format!("Event task failed: {e}")))??;

            if let Some(event) = event {
                pending_action = app.handle_event(event);
            }
        }

        info!("Leaving dashboard");
        Ok(())
    }

    fn draw(&mut self, app: &App) -> Result<()> {
        self.terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| DashError::internal(format!("Failed to draw: {e}")))?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Runs the interactive dashboard on the given page.
pub async fn run(dashboard: &Dashboard, start_page: Page) -> Result<()> {
    debug!("Starting TUI on {}", start_page);
    let mut tui = Tui::new()?;
    tui.run(dashboard, start_page).await
}
