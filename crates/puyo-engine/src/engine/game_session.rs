use std::time::Duration;

use rand::Rng as _;
use serde::Serialize;
use tracing::{info, trace, warn};

use super::{
    chain::{ChainResolver, ChainSummary, SettleStep},
    game_stats::GameStats,
    pair_buffer::{PairBuffer, PairSeed},
};
use crate::core::{
    board::Board,
    pair::{ColorPair, FallingPair, MoveDirection, RotationDirection},
};

/// Time between automatic descent steps.
pub const NORMAL_DROP_INTERVAL: Duration = Duration::from_millis(1000);
/// Time between descent steps while soft drop is held.
pub const SOFT_DROP_INTERVAL: Duration = Duration::from_millis(50);

/// Descent cadence used by [`GameSession::drop_interval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropIntervals {
    pub normal: Duration,
    pub soft_drop: Duration,
}

impl Default for DropIntervals {
    fn default() -> Self {
        Self {
            normal: NORMAL_DROP_INTERVAL,
            soft_drop: SOFT_DROP_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
pub enum Phase {
    /// A pair is under player control.
    Falling,
    /// A chain is being resolved; see [`GameSession::advance_settling`].
    Settling,
    Paused,
    GameOver,
}

/// Serializable view of a session at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub falling_pair: Option<FallingPair>,
    pub next_pair: ColorPair,
    pub score: usize,
    pub chain: usize,
    pub phase: Phase,
    pub stats: GameStats,
}

/// A single game from the first spawn until top-out.
///
/// The session is a plain value driven by method calls. It owns no timer:
/// the caller decides when the pair descends (see [`Self::drop_interval`])
/// and when the next settle step runs (see [`SettleStep::presentation_delay`]).
///
/// Commands that move the falling pair are ignored outside
/// [`Phase::Falling`].
///
/// # Example
///
/// ```
/// use puyo_engine::{GameSession, MoveDirection, PairSeed, Phase};
/// use rand::Rng as _;
///
/// let seed: PairSeed = rand::rng().random();
/// let mut session = GameSession::with_seed(seed);
/// assert_eq!(session.phase(), Phase::Falling);
///
/// session.move_pair(MoveDirection::Left);
/// session.hard_drop();
/// assert_eq!(session.phase(), Phase::Settling);
///
/// session.settle();
/// assert_eq!(session.phase(), Phase::Falling);
/// assert_eq!(session.stats().placed_pairs(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    falling_pair: Option<FallingPair>,
    pair_buffer: PairBuffer,
    stats: GameStats,
    chain: usize,
    phase: Phase,
    resolver: Option<ChainResolver>,
    soft_drop: bool,
    drop_intervals: DropIntervals,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Starts a game on an empty board with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PairSeed) -> Self {
        Self::with_setup(Board::EMPTY, PairBuffer::with_seed(seed))
    }

    /// Starts a game from a prepared board and pair sequence.
    ///
    /// The first pair is spawned right away, unless the board is already
    /// topped out, in which case the session starts in [`Phase::GameOver`].
    #[must_use]
    pub fn with_setup(board: Board, pair_buffer: PairBuffer) -> Self {
        let mut this = Self {
            board,
            falling_pair: None,
            pair_buffer,
            stats: GameStats::new(),
            chain: 0,
            phase: Phase::Falling,
            resolver: None,
            soft_drop: false,
            drop_intervals: DropIntervals::default(),
        };
        this.spawn_next();
        this
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_pair(&self) -> Option<FallingPair> {
        self.falling_pair
    }

    /// Where the falling pair would land on a hard drop.
    #[must_use]
    pub fn ghost_pair(&self) -> Option<FallingPair> {
        self.falling_pair.map(|pair| pair.dropped(&self.board))
    }

    /// Colors of the pair that spawns next.
    #[must_use]
    pub fn next_pair(&self) -> ColorPair {
        self.pair_buffer.peek_next()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    /// Rounds cleared so far in the current settle; 0 while a pair is falling.
    #[must_use]
    pub fn chain(&self) -> usize {
        self.chain
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn is_soft_dropping(&self) -> bool {
        self.soft_drop
    }

    pub fn set_soft_drop(&mut self, soft_drop: bool) {
        self.soft_drop = soft_drop;
    }

    pub fn set_drop_intervals(&mut self, drop_intervals: DropIntervals) {
        self.drop_intervals = drop_intervals;
    }

    /// Time until the next automatic descent step.
    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        if self.soft_drop {
            self.drop_intervals.soft_drop
        } else {
            self.drop_intervals.normal
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            falling_pair: self.falling_pair,
            next_pair: self.next_pair(),
            score: self.score(),
            chain: self.chain,
            phase: self.phase,
            stats: self.stats.clone(),
        }
    }

    fn falling(&self) -> Option<FallingPair> {
        if self.phase.is_falling() {
            self.falling_pair
        } else {
            None
        }
    }

    /// Moves the falling pair one cell.
    ///
    /// A blocked downward move lands the pair and starts settling.
    pub fn move_pair(&mut self, direction: MoveDirection) {
        let Some(pair) = self.falling() else {
            return;
        };
        let outcome = pair.moved(&self.board, direction);
        if outcome.landed {
            self.land(outcome.pair);
        } else {
            self.falling_pair = Some(outcome.pair);
        }
    }

    pub fn rotate_pair(&mut self, direction: RotationDirection) {
        let Some(pair) = self.falling() else {
            return;
        };
        self.falling_pair = Some(pair.rotated(&self.board, direction));
    }

    /// Drops the falling pair as far as it goes and lands it.
    pub fn hard_drop(&mut self) {
        let Some(pair) = self.falling() else {
            return;
        };
        self.land(pair.dropped(&self.board));
    }

    /// Switches between [`Phase::Falling`] and [`Phase::Paused`].
    ///
    /// Does nothing while settling or after game over.
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Falling => Phase::Paused,
            Phase::Paused => Phase::Falling,
            phase @ (Phase::Settling | Phase::GameOver) => phase,
        };
    }

    /// Replaces the session with a fresh game using a new random seed.
    pub fn reset(&mut self) {
        self.reset_with_seed(rand::rng().random());
    }

    /// Replaces the session with `GameSession::with_seed(seed)`, keeping the
    /// configured drop intervals.
    pub fn reset_with_seed(&mut self, seed: PairSeed) {
        info!(score = self.score(), %seed, "game reset");
        let drop_intervals = self.drop_intervals;
        *self = Self::with_seed(seed);
        self.drop_intervals = drop_intervals;
    }

    fn land(&mut self, pair: FallingPair) {
        let dropped = self.board.place(&pair);
        if dropped > 0 {
            warn!(dropped, pair = ?pair, "pair cells above the board were discarded");
        }
        self.board.apply_gravity();
        self.falling_pair = None;
        self.stats.complete_pair_drop();
        self.resolver = Some(ChainResolver::new());
        self.phase = Phase::Settling;
    }

    /// Runs one step of the chain in progress.
    ///
    /// Once the chain is exhausted this either spawns the next pair or ends
    /// the game, and returns `None`. Also returns `None` outside
    /// [`Phase::Settling`].
    pub fn advance_settling(&mut self) -> Option<SettleStep> {
        if !self.phase.is_settling() {
            return None;
        }
        let resolver = self.resolver.get_or_insert_with(ChainResolver::new);
        if let Some(step) = resolver.step(&mut self.board) {
            if let SettleStep::Cleared(round) = &step {
                self.stats.record_round(round);
                self.chain = round.chain;
            }
            return Some(step);
        }

        self.stats.complete_chain(resolver.summary());
        self.resolver = None;
        self.spawn_next();
        None
    }

    /// Runs the chain in progress to completion.
    pub fn settle(&mut self) -> ChainSummary {
        let mut summary = ChainSummary::default();
        while let Some(step) = self.advance_settling() {
            if let SettleStep::Cleared(round) = step {
                summary.rounds += 1;
                summary.score += round.score;
                summary.cells_cleared += round.cleared.cells_cleared;
            }
        }
        summary
    }

    fn spawn_next(&mut self) {
        if self.board.is_topped_out() {
            info!(
                score = self.stats.score(),
                placed_pairs = self.stats.placed_pairs(),
                max_chain = self.stats.max_chain(),
                "game over"
            );
            self.falling_pair = None;
            self.phase = Phase::GameOver;
            return;
        }

        let pair = FallingPair::spawn(self.pair_buffer.pop_next());
        trace!(pair = ?pair, "pair spawned");
        self.falling_pair = Some(pair);
        self.chain = 0;
        self.phase = Phase::Falling;
    }
}
