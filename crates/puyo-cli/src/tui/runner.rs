use std::{
    fmt,
    time::{Duration, Instant},
};

use crate::tui::{App, event::TuiEvent, event_loop::EventLoop};

const DEFAULT_FRAME_RATE: f64 = 60.0;

/// TUI application runtime.
///
/// Runs the event loop for an [`App`] and owns the app's one-shot timers.
#[derive(Debug)]
pub struct Tui<T> {
    events: EventLoop<T>,
}

impl<T> Default for Tui<T>
where
    T: Copy + Eq + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tui<T>
where
    T: Copy + Eq + fmt::Debug,
{
    pub fn new() -> Self {
        Self {
            events: EventLoop::new(Duration::from_secs_f64(1.0 / DEFAULT_FRAME_RATE)),
        }
    }

    /// Sets the maximum frame rate (Hz, frames per second).
    pub fn set_frame_rate(&mut self, rate: f64) {
        self.events
            .set_frame_interval(Duration::from_secs_f64(1.0 / rate));
    }

    /// Fires `timer` after `delay`, replacing any pending deadline for it.
    pub fn schedule(&mut self, timer: T, delay: Duration) {
        self.events.timers.schedule(timer, Instant::now() + delay);
    }

    pub fn cancel(&mut self, timer: T) {
        self.events.timers.cancel(timer);
    }

    #[must_use]
    pub fn is_scheduled(&self, timer: T) -> bool {
        self.events.timers.is_scheduled(timer)
    }

    /// Runs the application.
    ///
    /// 1. Calls `app.init()` for initialization
    /// 2. Runs the event loop until `app.should_exit()` returns true
    ///    - `Event::Timer`: calls `app.handle_timer()`
    ///    - `Event::Render`: calls `app.draw()`
    ///    - `Event::Crossterm`: calls `app.handle_event()`
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App<Timer = T>,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Timer(timer) => {
                        app.handle_timer(&mut self, timer);
                    }
                    TuiEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Crossterm(event) => {
                        app.handle_event(&mut self, event);
                    }
                }
            }
            Ok(())
        })
    }
}
