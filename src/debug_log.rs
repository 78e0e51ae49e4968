//! In-memory log sink shown by the debug log window.

use std::any::Any;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

pub const DEFAULT_MAX_LINES: usize = 2000;

static GLOBAL_LOG: OnceLock<DebugLogHandle> = OnceLock::new();
static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

/// Install `handle` as the process-wide sink. Only the first call wins.
pub fn set_global_debug_log(handle: DebugLogHandle) -> bool {
    GLOBAL_LOG.set(handle).is_ok()
}

pub fn global_debug_log() -> Option<DebugLogHandle> {
    GLOBAL_LOG.get().cloned()
}

/// Copy panics into the global log before the previous hook runs, so the
/// report survives the alternate screen being torn down. Returns `false` when
/// a hook was already installed.
pub fn install_panic_hook() -> bool {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return false;
    }
    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Some(handle) = GLOBAL_LOG.get() {
            let location = info
                .location()
                .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()));
            for line in panic_report(location.as_deref(), info.payload()) {
                handle.push(line);
            }
            let backtrace = std::backtrace::Backtrace::force_capture();
            for line in backtrace.to_string().lines() {
                handle.push(line);
            }
            handle.push("============");
        }
        prev(info);
    }));
    true
}

/// Header lines written for a panic at `location` carrying `payload`.
pub fn panic_report(location: Option<&str>, payload: &(dyn Any + Send)) -> Vec<String> {
    let mut lines = vec!["=== PANIC ===".to_string()];
    if let Some(location) = location {
        lines.push(location.to_string());
    }
    let message = if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "<non-string panic>".to_string()
    };
    lines.push(format!("message: {message}"));
    lines
}

#[derive(Debug)]
struct DebugLogBuffer {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl DebugLogBuffer {
    fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            max_lines: max_lines.max(1),
        }
    }

    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }
}

/// Shared ring buffer of log lines. Clones share the same buffer.
#[derive(Clone, Debug)]
pub struct DebugLogHandle {
    inner: Arc<Mutex<DebugLogBuffer>>,
}

impl Default for DebugLogHandle {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}

impl DebugLogHandle {
    pub fn new(max_lines: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(DebugLogBuffer::new(max_lines))),
        }
    }

    pub fn push(&self, line: impl Into<String>) {
        if let Ok(mut buffer) = self.inner.lock() {
            buffer.push_line(line.into());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|b| b.lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The last `count` lines, oldest first.
    pub fn tail(&self, count: usize) -> Vec<String> {
        let Ok(buffer) = self.inner.lock() else {
            return Vec::new();
        };
        let skip = buffer.lines.len().saturating_sub(count);
        buffer.lines.iter().skip(skip).cloned().collect()
    }

    pub fn writer(&self) -> DebugLogWriter {
        DebugLogWriter::new(self.clone())
    }
}

/// `io::Write` adapter that splits incoming bytes into lines.
#[derive(Debug)]
pub struct DebugLogWriter {
    handle: DebugLogHandle,
    pending: Vec<u8>,
}

impl DebugLogWriter {
    pub fn new(handle: DebugLogHandle) -> Self {
        Self {
            handle,
            pending: Vec::new(),
        }
    }

    fn push_text(&self, bytes: &[u8]) {
        let text = String::from_utf8_lossy(bytes);
        for line in text.split('\n').filter(|line| !line.is_empty()) {
            self.handle.push(line.trim_end_matches('\r'));
        }
    }
}

impl Write for DebugLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        if let Some(pos) = self.pending.iter().rposition(|b| *b == b'\n') {
            let complete: Vec<u8> = self.pending.drain(..=pos).collect();
            self.push_text(&complete);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.push_text(&rest);
        }
        Ok(())
    }
}

impl Drop for DebugLogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_buffer_keeps_newest_lines() {
        let log = DebugLogHandle::new(2);
        log.push("a");
        log.push("b");
        log.push("c");
        assert_eq!(log.tail(10), vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn writer_splits_lines_and_flushes_remainder() {
        let log = DebugLogHandle::new(10);
        let mut writer = log.writer();
        writer.write_all(b"first\nsec").unwrap();
        assert_eq!(log.tail(10), vec!["first".to_string()]);
        writer.write_all(b"ond\r\nthird").unwrap();
        drop(writer);
        assert_eq!(
            log.tail(10),
            vec!["first".to_string(), "second".to_string(), "third".to_string()]
        );
    }

    #[test]
    fn tail_limits_count() {
        let log = DebugLogHandle::default();
        for i in 0..5 {
            log.push(format!("line {i}"));
        }
        assert_eq!(log.tail(2), vec!["line 3".to_string(), "line 4".to_string()]);
        assert_eq!(log.len(), 5);
    }

    #[test]
    fn panic_report_names_location_and_message() {
        let payload: Box<dyn Any + Send> = Box::new(String::from("render failed"));
        assert_eq!(
            panic_report(Some("src/desktop/mod.rs:10:5"), payload.as_ref()),
            vec![
                "=== PANIC ===".to_string(),
                "src/desktop/mod.rs:10:5".to_string(),
                "message: render failed".to_string(),
            ]
        );
    }

    #[test]
    fn panic_report_handles_static_and_opaque_payloads() {
        let literal: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_report(None, literal.as_ref())[1], "message: boom");
        let opaque: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(
            panic_report(None, opaque.as_ref())[1],
            "message: <non-string panic>"
        );
    }

    #[test]
    fn panic_hook_installs_once() {
        install_panic_hook();
        assert!(!install_panic_hook());
        assert!(PANIC_HOOK_INSTALLED.get().is_some());
    }
}
