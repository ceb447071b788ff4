//! Event handling for the interactive UI

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use std::time::Duration;

use crate::error::Result;

/// Event handler for keyboard input
pub struct EventHandler {
    /// Timeout for polling events
    timeout: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_millis(100),
        }
    }

    /// Next key press, if one arrived within the poll timeout.
    ///
    /// Release and repeat events are dropped so each key acts once.
    pub fn next(&self) -> Result<Option<KeyEvent>> {
        if event::poll(self.timeout)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    return Ok(Some(key_event));
                }
            }
        }
        Ok(None)
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
