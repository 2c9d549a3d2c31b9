use std::fmt;

use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Tui;

/// Trait for TUI applications.
///
/// Applications executed by `Tui::run()` must implement this trait.
pub trait App {
    /// One-shot timers the application schedules through [`Tui::schedule`].
    type Timer: Copy + Eq + fmt::Debug;

    /// Initializes the application.
    ///
    /// Called at the start of `Tui::run()`. Use this to schedule the first timers.
    fn init(&mut self, tui: &mut Tui<Self::Timer>);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, mouse, resize, etc.).
    fn handle_event(&mut self, tui: &mut Tui<Self::Timer>, event: Event);

    /// Called when a scheduled timer fires. The timer is not rescheduled.
    fn handle_timer(&mut self, tui: &mut Tui<Self::Timer>, timer: Self::Timer);

    /// Draws the screen.
    fn draw(&self, frame: &mut Frame);
}
