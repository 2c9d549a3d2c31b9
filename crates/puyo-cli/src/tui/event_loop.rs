use std::{
    fmt, io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// Pending one-shot timers and their deadlines.
///
/// Each timer is scheduled at most once; scheduling it again moves its
/// deadline.
#[derive(Debug)]
pub(super) struct Timers<T> {
    deadlines: Vec<(T, Instant)>,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self { deadlines: vec![] }
    }
}

impl<T> Timers<T>
where
    T: Copy + Eq + fmt::Debug,
{
    pub(super) fn schedule(&mut self, timer: T, at: Instant) {
        self.cancel(timer);
        self.deadlines.push((timer, at));
    }

    pub(super) fn cancel(&mut self, timer: T) {
        self.deadlines.retain(|(t, _)| *t != timer);
    }

    pub(super) fn is_scheduled(&self, timer: T) -> bool {
        self.deadlines.iter().any(|(t, _)| *t == timer)
    }

    pub(super) fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.iter().map(|(_, at)| *at).min()
    }

    /// Removes and returns the earliest timer due at `now`.
    pub(super) fn pop_due(&mut self, now: Instant) -> Option<T> {
        let (index, _) = self
            .deadlines
            .iter()
            .enumerate()
            .filter(|(_, (_, at))| *at <= now)
            .min_by_key(|(_, (_, at))| *at)?;
        Some(self.deadlines.swap_remove(index).0)
    }
}

/// Event loop state management.
///
/// Returns the next event via `next()`: a due timer first, then a render
/// when the screen is dirty, otherwise the next crossterm event. Renders are
/// throttled to the frame interval.
#[derive(Debug)]
pub(super) struct EventLoop<T> {
    pub(super) timers: Timers<T>,
    frame_interval: Duration,
    last_render: Instant,
    dirty: bool,
}

impl<T> EventLoop<T>
where
    T: Copy + Eq + fmt::Debug,
{
    pub(super) fn new(frame_interval: Duration) -> Self {
        let now = Instant::now();
        let past_time = now.checked_sub(Duration::from_secs(86400)).unwrap_or(now);
        Self {
            timers: Timers::default(),
            frame_interval,
            last_render: past_time,
            dirty: true, // Initial render is required on startup
        }
    }

    pub(super) fn set_frame_interval(&mut self, interval: Duration) {
        self.frame_interval = interval;
    }

    /// Returns the next event.
    ///
    /// Blocks until a timer is due, a render is needed or a crossterm event
    /// occurs. With no timer pending and a clean screen, waits for crossterm
    /// events only.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent<T>> {
        loop {
            let now = Instant::now();
            if let Some(timer) = self.timers.pop_due(now) {
                self.dirty = true;
                return Ok(TuiEvent::Timer(timer));
            }

            if self.dirty && now.duration_since(self.last_render) >= self.frame_interval {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(TuiEvent::Crossterm(event::read()?));
        }
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_render_at = self
            .dirty
            .then(|| self.last_render + self.frame_interval);
        let next_timeout_at = [self.timers.next_deadline(), next_render_at]
            .into_iter()
            .flatten()
            .min()?;
        Some(next_timeout_at.saturating_duration_since(now))
    }
}
