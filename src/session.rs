//! Terminal setup and teardown for the binary.
//!
//! The terminal is put back whichever way the session ends: normal return,
//! an error from `?`, or a panic (the hook restores before the message is
//! printed, the guard covers unwinding).

use std::io;
use std::sync::OnceLock;

use crossterm::cursor::Show;
use crossterm::event::DisableMouseCapture;
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};

static RESTORE_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

/// Runs `teardown` exactly once, on [`TeardownGuard::finish`] or on drop.
pub struct TeardownGuard<F: FnOnce()> {
    teardown: Option<F>,
}

impl<F: FnOnce()> TeardownGuard<F> {
    pub fn new(teardown: F) -> Self {
        Self {
            teardown: Some(teardown),
        }
    }

    pub fn finish(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl<F: FnOnce()> Drop for TeardownGuard<F> {
    fn drop(&mut self) {
        self.run();
    }
}

/// Leave raw mode and the alternate screen. Safe to call more than once.
pub fn restore_terminal() -> io::Result<()> {
    let raw = terminal::disable_raw_mode();
    execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen, Show)?;
    raw
}

/// Enter the alternate screen and raw mode. The returned guard restores the
/// terminal when dropped, including when entering failed half way.
pub fn enter() -> io::Result<TeardownGuard<impl FnOnce()>> {
    install_restore_hook();
    let guard = TeardownGuard::new(|| {
        if let Err(err) = restore_terminal() {
            tracing::warn!(error = %err, "terminal restore failed");
        }
    });
    execute!(io::stdout(), EnterAlternateScreen)?;
    terminal::enable_raw_mode()?;
    Ok(guard)
}

/// Restore the terminal before the previous hook prints the panic, so the
/// message lands on the normal screen.
fn install_restore_hook() {
    if RESTORE_HOOK_INSTALLED.set(()).is_err() {
        return;
    }
    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        prev(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    #[test]
    fn teardown_runs_once_on_drop() {
        let runs = Cell::new(0);
        {
            let _guard = TeardownGuard::new(|| runs.set(runs.get() + 1));
        }
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn finish_runs_teardown_and_drop_does_not_repeat_it() {
        let runs = Cell::new(0);
        let guard = TeardownGuard::new(|| runs.set(runs.get() + 1));
        guard.finish();
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn teardown_runs_while_unwinding() {
        let runs = Cell::new(0);
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _guard = TeardownGuard::new(|| runs.set(runs.get() + 1));
            panic!("render failed");
        }));
        assert!(result.is_err());
        assert_eq!(runs.get(), 1);
    }
}
