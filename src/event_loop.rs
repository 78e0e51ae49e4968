use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// The single place that polls input.
///
/// The handler is called with `None` once per tick (draw there) and with
/// `Some(event)` for each pending event. Bursts are drained before the next
/// tick so drags do not lag behind the pointer.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if handler(&mut self.driver, None)? == ControlFlow::Quit {
                return Ok(());
            }
            if !self.driver.poll(self.poll_interval)? {
                continue;
            }
            loop {
                let event = self.driver.read()?;
                if handler(&mut self.driver, Some(event))? == ControlFlow::Quit {
                    return Ok(());
                }
                if !self.driver.poll(Duration::ZERO)? {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::ScriptedDriver;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn ticks_then_drains_pending_events() {
        let driver = ScriptedDriver::new([key('a'), key('b'), key('q')]);
        let mut lp = EventLoop::new(driver, Duration::ZERO);
        let mut seen = Vec::new();
        lp.run(|_, event| {
            match event {
                None => seen.push('.'),
                Some(Event::Key(k)) => {
                    if let KeyCode::Char(c) = k.code {
                        seen.push(c);
                        if c == 'q' {
                            return Ok(ControlFlow::Quit);
                        }
                    }
                }
                Some(_) => {}
            }
            Ok(ControlFlow::Continue)
        })
        .unwrap();
        assert_eq!(seen, vec!['.', 'a', 'b', 'q']);
        assert_eq!(lp.into_driver().remaining(), 0);
    }

    #[test]
    fn quit_on_tick_stops_before_reading() {
        let driver = ScriptedDriver::new([key('a')]);
        let mut lp = EventLoop::new(driver, Duration::ZERO);
        lp.run(|_, _| Ok(ControlFlow::Quit)).unwrap();
        assert_eq!(lp.driver().remaining(), 1);
    }
}
