//! Tracing setup for the desktop.
//!
//! Events from this crate are kept at the requested level; everything else
//! (crossterm, ratatui, arboard) only gets through at `WARN` and above, so the
//! debug log window shows the window manager's own activity.

use std::io::{self, Write};

use tracing::Level;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::prelude::*;

use crate::debug_log::{DebugLogHandle, DebugLogWriter};

/// Target prefix shared by every event this crate emits.
pub const CRATE_TARGET: &str = "realm_wm";

/// Where formatted events go.
#[derive(Clone, Debug)]
pub enum LogSink {
    /// The ring buffer read by the debug log window.
    DebugLog(DebugLogHandle),
    Stderr,
}

pub enum SinkWriter {
    DebugLog(DebugLogWriter),
    Stderr(io::Stderr),
}

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            SinkWriter::DebugLog(w) => w.write(buf),
            SinkWriter::Stderr(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            SinkWriter::DebugLog(w) => w.flush(),
            SinkWriter::Stderr(s) => s.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        match self {
            LogSink::DebugLog(handle) => SinkWriter::DebugLog(handle.writer()),
            LogSink::Stderr => SinkWriter::Stderr(io::stderr()),
        }
    }
}

/// `level` for this crate, `WARN` for dependencies.
pub fn filter(level: Level) -> Targets {
    Targets::new()
        .with_target(CRATE_TARGET, level)
        .with_default(Level::WARN)
}

pub fn subscriber(sink: LogSink, level: Level) -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(sink)
            .with_ansi(false)
            .with_thread_names(false)
            .with_filter(filter(level)),
    )
}

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init(sink: LogSink, level: Level) -> bool {
    subscriber(sink, level).try_init().is_ok()
}
