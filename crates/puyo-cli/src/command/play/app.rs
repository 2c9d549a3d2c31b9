use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use puyo_engine::{GameSession, MoveDirection, Phase, RotationDirection};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};
use tracing::debug;

use crate::{
    tui::{App, Tui},
    ui::widgets::SessionDisplay,
};

const FPS: f64 = 60.0;

/// How long soft drop stays on after the last ↓ press or repeat.
///
/// Most terminals never report key releases, so soft drop ends when key
/// repeats stop arriving.
const SOFT_DROP_HOLD: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlayTimer {
    /// The falling pair moves down one row.
    Descent,
    /// The next settle step runs.
    Settle,
    SoftDropRelease,
}

#[derive(Debug)]
pub(crate) struct PlayApp {
    session: GameSession,
    is_exiting: bool,
}

impl PlayApp {
    pub(crate) fn new(session: GameSession) -> Self {
        Self {
            session,
            is_exiting: false,
        }
    }

    pub(crate) fn session(&self) -> &GameSession {
        &self.session
    }

    /// Brings the pending timers in line with the session phase.
    fn sync_timers(&self, tui: &mut Tui<PlayTimer>) {
        match self.session.phase() {
            Phase::Falling => {
                tui.cancel(PlayTimer::Settle);
                if !tui.is_scheduled(PlayTimer::Descent) {
                    tui.schedule(PlayTimer::Descent, self.session.drop_interval());
                }
            }
            Phase::Settling => {
                tui.cancel(PlayTimer::Descent);
                if !tui.is_scheduled(PlayTimer::Settle) {
                    tui.schedule(PlayTimer::Settle, Duration::ZERO);
                }
            }
            Phase::Paused | Phase::GameOver => {
                tui.cancel(PlayTimer::Descent);
                tui.cancel(PlayTimer::Settle);
            }
        }
    }

    fn set_soft_drop(&mut self, tui: &mut Tui<PlayTimer>, soft_drop: bool) {
        if self.session.is_soft_dropping() == soft_drop {
            return;
        }
        self.session.set_soft_drop(soft_drop);
        if self.session.phase().is_falling() {
            tui.schedule(PlayTimer::Descent, self.session.drop_interval());
        }
    }

    fn reset(&mut self, tui: &mut Tui<PlayTimer>) {
        self.session.reset();
        tui.cancel(PlayTimer::Descent);
        tui.cancel(PlayTimer::Settle);
        tui.cancel(PlayTimer::SoftDropRelease);
    }

    fn handle_key(&mut self, tui: &mut Tui<PlayTimer>, key: KeyEvent) {
        match key.kind {
            KeyEventKind::Press => {}
            KeyEventKind::Repeat => {
                // only movement auto-repeats
                if !matches!(key.code, KeyCode::Left | KeyCode::Right | KeyCode::Down) {
                    return;
                }
            }
            KeyEventKind::Release => {
                if key.code == KeyCode::Down {
                    tui.cancel(PlayTimer::SoftDropRelease);
                    self.set_soft_drop(tui, false);
                }
                return;
            }
        }

        let phase = self.session.phase();
        match key.code {
            KeyCode::Char('q') => self.is_exiting = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.is_exiting = true;
            }
            KeyCode::Char('r') => self.reset(tui),
            KeyCode::Enter | KeyCode::Char(' ') if phase.is_game_over() => self.reset(tui),
            KeyCode::Char('p') | KeyCode::Esc => self.session.toggle_pause(),
            KeyCode::Left => self.session.move_pair(MoveDirection::Left),
            KeyCode::Right => self.session.move_pair(MoveDirection::Right),
            KeyCode::Up => self.session.hard_drop(),
            KeyCode::Char('z') => self.session.rotate_pair(RotationDirection::Counterclockwise),
            KeyCode::Char('x') => self.session.rotate_pair(RotationDirection::Clockwise),
            KeyCode::Down if phase.is_falling() => {
                self.set_soft_drop(tui, true);
                tui.schedule(PlayTimer::SoftDropRelease, SOFT_DROP_HOLD);
            }
            _ => {}
        }
        self.sync_timers(tui);
    }

    fn help_text(&self) -> &'static str {
        match self.session.phase() {
            Phase::Falling | Phase::Settling => {
                "← → (Move) | ↓ (Soft Drop) | ↑ (Hard Drop) | Z X (Rotate) | P (Pause) | R (Reset) | Q (Quit)"
            }
            Phase::Paused => "P/Esc (Resume) | R (Reset) | Q (Quit)",
            Phase::GameOver => "Enter/Space (New Game) | Q (Quit)",
        }
    }
}

impl App for PlayApp {
    type Timer = PlayTimer;

    fn init(&mut self, tui: &mut Tui<PlayTimer>) {
        tui.set_frame_rate(FPS);
        self.sync_timers(tui);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, tui: &mut Tui<PlayTimer>, event: Event) {
        if let Some(key) = event.as_key_event() {
            self.handle_key(tui, key);
        }
    }

    fn handle_timer(&mut self, tui: &mut Tui<PlayTimer>, timer: PlayTimer) {
        match timer {
            PlayTimer::Descent => {
                self.session.move_pair(MoveDirection::Down);
                if self.session.phase().is_falling() {
                    tui.schedule(PlayTimer::Descent, self.session.drop_interval());
                }
            }
            PlayTimer::Settle => {
                if let Some(step) = self.session.advance_settling() {
                    debug!(chain = self.session.chain(), ?step, "settle step");
                    tui.schedule(PlayTimer::Settle, step.presentation_delay());
                }
            }
            PlayTimer::SoftDropRelease => self.set_soft_drop(tui, false),
        }
        self.sync_timers(tui);
    }

    fn draw(&self, frame: &mut Frame) {
        let session_display = SessionDisplay::new(&self.session, true);
        let help_text = Text::from(self.help_text())
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(16), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help_text, help_area);
    }
}
