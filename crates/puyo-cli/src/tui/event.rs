use crossterm::event::Event as CrosstermEvent;

/// Events processed by TUI applications.
#[derive(Debug, Clone)]
pub(super) enum TuiEvent<T> {
    /// A timer scheduled by the application is due.
    Timer(T),
    /// The screen is dirty and the frame interval has passed.
    Render,
    /// Terminal events such as key input, mouse, and resize.
    Crossterm(CrosstermEvent),
}
