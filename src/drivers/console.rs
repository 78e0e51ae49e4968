use std::io;
use std::time::Duration;

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
};

use super::InputDriver;

/// Reads crossterm events from the controlling terminal.
#[derive(Debug, Default)]
pub struct ConsoleDriver {
    mouse_capture: bool,
}

impl ConsoleDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mouse_capture(&self) -> bool {
        self.mouse_capture
    }
}

/// Fold Shift+Tab into BackTab and drop key releases, so hosts see one
/// event per key press on every platform. `None` means "skip this event".
pub fn normalize(event: Event) -> Option<Event> {
    match event {
        Event::Key(mut key) => {
            if key.kind != KeyEventKind::Press {
                return None;
            }
            if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) {
                key.code = KeyCode::BackTab;
            }
            if key.code == KeyCode::BackTab {
                key.modifiers.remove(KeyModifiers::SHIFT);
            }
            Some(Event::Key(key))
        }
        other => Some(other),
    }
}

impl InputDriver for ConsoleDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        loop {
            if let Some(event) = normalize(crossterm::event::read()?) {
                return Ok(event);
            }
        }
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        if enabled {
            crossterm::execute!(io::stdout(), EnableMouseCapture)?;
        } else {
            crossterm::execute!(io::stdout(), DisableMouseCapture)?;
        }
        self.mouse_capture = enabled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    #[test]
    fn shift_tab_becomes_backtab() {
        let key = KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT);
        let Some(Event::Key(out)) = normalize(Event::Key(key)) else {
            panic!("expected key event");
        };
        assert_eq!(out.code, KeyCode::BackTab);
        assert!(!out.modifiers.contains(KeyModifiers::SHIFT));
    }

    #[test]
    fn backtab_loses_its_shift_modifier() {
        let key = KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        let Some(Event::Key(out)) = normalize(Event::Key(key)) else {
            panic!("expected key event");
        };
        assert_eq!(out.modifiers, KeyModifiers::NONE);
    }

    #[test]
    fn key_release_is_dropped() {
        let mut key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert!(normalize(Event::Key(key)).is_none());
    }

    #[test]
    fn non_key_events_pass_through() {
        assert!(normalize(Event::Resize(10, 20)).is_some());
    }
}
