use std::io;

use clap::Parser;
use crossterm::event::Event;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::Level;

use realm_wm::cli::Cli;
use realm_wm::content::{self, Content};
use realm_wm::debug_log::{self, DebugLogHandle, set_global_debug_log};
use realm_wm::desktop::Desktop;
use realm_wm::drivers::{ConsoleDriver, InputDriver};
use realm_wm::event_loop::{ControlFlow, EventLoop};
use realm_wm::realm::Realm;
use realm_wm::session;
use realm_wm::tracing_sub::{self, LogSink};

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    cli.validate().map_err(io::Error::other)?;

    let sink = if cli.log_stderr {
        LogSink::Stderr
    } else {
        let handle = DebugLogHandle::default();
        set_global_debug_log(handle.clone());
        debug_log::install_panic_hook();
        LogSink::DebugLog(handle)
    };
    tracing_sub::init(sink, Level::DEBUG);

    let realm: Realm<Content> = Realm::new();
    for _ in 0..cli.generic {
        content::open_generic_window(&realm);
    }
    tracing::info!(generic = cli.generic, "starting realm-wm");
    let mut desktop = Desktop::new(realm);

    let session = session::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    let mut driver = ConsoleDriver::new();
    if !cli.no_mouse {
        driver.set_mouse_capture(true)?;
    }

    let mut event_loop = EventLoop::new(driver, cli.tick());
    let result = event_loop.run(|_driver, event| match event {
        None => {
            terminal.draw(|frame| desktop.render(frame))?;
            Ok(ControlFlow::Continue)
        }
        Some(Event::Resize(_, _)) => {
            terminal.autoresize()?;
            Ok(ControlFlow::Continue)
        }
        Some(event) => Ok(desktop.handle_event(&event)),
    });

    session.finish();
    result
}
