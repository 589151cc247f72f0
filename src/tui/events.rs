//! Event handling for the TUI.
//!
//! Polls crossterm for key and resize events, producing a tick when idle.

use crate::error::{DashError, Result};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use std::time::Duration;

/// Application events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// Nothing happened within the tick rate.
    Tick,
}

impl From<CrosstermEvent> for Event {
    fn from(event: CrosstermEvent) -> Self {
        match event {
            CrosstermEvent::Key(key) => Self::Key(key),
            CrosstermEvent::Resize(width, height) => Self::Resize(width, height),
            _ => Self::Tick,
        }
    }
}

/// Handles terminal events.
#[derive(Debug, Clone, Copy)]
pub struct EventHandler {
    /// Timeout for polling events.
    tick_rate: Duration,
}

impl EventHandler {
    /// Creates a new event handler with default tick rate.
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(100),
        }
    }

    /// Creates a new event handler with a custom tick rate.
    pub fn with_tick_rate(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Polls for the next event.
    ///
    /// Returns `None` if no event is available within the tick rate.
    pub fn next(&self) -> Result<Option<Event>> {
        if event::poll(self.tick_rate)
            .map_err(|e| DashError::internal(format!("Failed to poll events: {e}")))?
        {
            let event = event::read()
                .map_err(|e| DashError::internal(format!("Failed to read event: {e}")))?;
            Ok(Some(Event::from(event)))
        } else {
            Ok(Some(Event::Tick))
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_handler_creation() {
        let handler = EventHandler::new();
        assert_eq!(handler.tick_rate, Duration::from_millis(100));
    }

    #[test]
    fn test_event_handler_custom_tick_rate() {
        let handler = EventHandler::with_tick_rate(Duration::from_millis(50));
        assert_eq!(handler.tick_rate, Duration::from_millis(50));
    }

    #[test]
    fn test_from_crossterm_event() {
        use crossterm::event::{KeyCode, KeyModifiers};

        let key = KeyEvent::new(KeyCode::Char('y'), KeyModifiers::NONE);
        assert_eq!(Event::from(CrosstermEvent::Key(key)), Event::Key(key));
        assert_eq!(
            Event::from(CrosstermEvent::Resize(100, 40)),
            Event::Resize(100, 40)
        );
        assert_eq!(Event::from(CrosstermEvent::FocusGained), Event::Tick);
    }
}
