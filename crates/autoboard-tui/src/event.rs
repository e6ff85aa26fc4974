use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEventKind};

/// Event handler for terminal events
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Wait up to `timeout` for the next event
    ///
    /// Returns `Tick` when nothing arrived in time, so the caller can pump
    /// the auto-scroll clock.
    pub fn next(&self, timeout: Duration) -> Result<Option<AppEvent>> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    // (crossterm 0.27+ sends release events on some systems)
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                        Ok(Some(AppEvent::PointerMoved(mouse.column, mouse.row)))
                    }
                    _ => Ok(None),
                },
                Event::FocusGained => Ok(Some(AppEvent::FocusGained)),
                Event::FocusLost => Ok(Some(AppEvent::FocusLost)),
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Pointer moved to (column, row)
    PointerMoved(u16, u16),
    /// Terminal window gained focus
    FocusGained,
    /// Terminal window lost focus
    FocusLost,
    /// Terminal was resized
    Resize(u16, u16),
    /// No input within the poll timeout
    Tick,
}
