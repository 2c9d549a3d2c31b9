use std::{mem, time::Duration};

use serde::Serialize;
use tracing::debug;

use crate::core::{
    BOARD_HEIGHT, BOARD_WIDTH, MIN_CONNECT,
    board::{Board, ClearSummary},
    connectivity::{ConnectedGroup, find_groups},
    scoring::calculate_score,
};

/// Upper bound on clearing rounds for a single chain.
///
/// Every round removes at least [`MIN_CONNECT`] cells from a finite board.
pub const MAX_CHAIN_ROUNDS: usize = BOARD_WIDTH * BOARD_HEIGHT / MIN_CONNECT;

/// One clearing round of a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainRound {
    /// Chain index of this round, starting at 1.
    pub chain: usize,
    pub cleared: ClearSummary,
    /// Points awarded for this round.
    pub score: usize,
}

/// One observable transition of the board while a chain resolves.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SettleStep {
    /// Groups about to be cleared were found and marked on the board.
    Marked {
        chain: usize,
        groups: Vec<ConnectedGroup>,
    },
    /// The marked groups were removed and scored.
    Cleared(ChainRound),
    /// Gravity was applied to the board.
    Compacted,
}

impl SettleStep {
    /// How long a front-end should show the board after this step.
    ///
    /// The engine never waits by itself; pacing is up to the caller.
    #[must_use]
    pub const fn presentation_delay(&self) -> Duration {
        match self {
            SettleStep::Marked { .. } => Duration::from_millis(300),
            SettleStep::Cleared(_) => Duration::from_millis(100),
            SettleStep::Compacted => Duration::from_millis(200),
        }
    }
}

/// Totals for a fully resolved chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChainSummary {
    /// Number of clearing rounds (0 when nothing was cleared).
    pub rounds: usize,
    pub score: usize,
    pub cells_cleared: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Mark,
    Clear,
    Compact,
    Done,
}

/// Resolves a chain one step at a time.
///
/// Each call to [`ChainResolver::step`] performs a single transition on the
/// board (mark, clear or compact) and returns it, so the caller can display
/// every intermediate board at its own pace. The cycle repeats until no group
/// of [`MIN_CONNECT`] cells remains, after which `step` returns `None`.
///
/// The board passed in is expected to be settled already (gravity applied).
///
/// # Example
///
/// ```
/// use puyo_engine::{Board, ChainResolver, SettleStep};
///
/// let mut board: Board = "
///     G.....
///     RG....
///     RG....
///     RRG...
/// "
/// .parse()
/// .unwrap();
///
/// let mut resolver = ChainResolver::new();
/// let mut rounds = vec![];
/// while let Some(step) = resolver.step(&mut board) {
///     if let SettleStep::Cleared(round) = step {
///         rounds.push(round.chain);
///     }
/// }
///
/// assert_eq!(rounds, [1, 2]);
/// assert!(board.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ChainResolver {
    chain: usize,
    stage: Stage,
    pending: Vec<ConnectedGroup>,
    summary: ChainSummary,
}

impl Default for ChainResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainResolver {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            chain: 1,
            stage: Stage::Mark,
            pending: vec![],
            summary: ChainSummary {
                rounds: 0,
                score: 0,
                cells_cleared: 0,
            },
        }
    }

    /// Chain index of the round in progress (or the next one).
    #[must_use]
    pub const fn chain(&self) -> usize {
        self.chain
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self.stage, Stage::Done)
    }

    /// Totals of the rounds resolved so far.
    #[must_use]
    pub const fn summary(&self) -> ChainSummary {
        self.summary
    }

    /// Performs the next transition on `board`.
    ///
    /// Returns `None` once the board holds no clearable group.
    pub fn step(&mut self, board: &mut Board) -> Option<SettleStep> {
        match self.stage {
            Stage::Mark => {
                let groups = find_groups(board, MIN_CONNECT);
                if groups.is_empty() {
                    self.stage = Stage::Done;
                    return None;
                }
                board.mark_groups(&groups);
                self.pending.clone_from(&groups);
                self.stage = Stage::Clear;
                Some(SettleStep::Marked {
                    chain: self.chain,
                    groups,
                })
            }
            Stage::Clear => {
                let groups = mem::take(&mut self.pending);
                let cleared = board.clear_groups(&groups);
                let score = calculate_score(
                    cleared.cells_cleared,
                    self.chain,
                    cleared.distinct_colors(),
                    &cleared.group_sizes,
                );
                debug!(
                    chain = self.chain,
                    cells = cleared.cells_cleared,
                    colors = cleared.distinct_colors(),
                    groups = ?cleared.group_sizes,
                    score,
                    "chain round cleared"
                );

                self.summary.rounds += 1;
                self.summary.score += score;
                self.summary.cells_cleared += cleared.cells_cleared;
                let round = ChainRound {
                    chain: self.chain,
                    cleared,
                    score,
                };
                self.chain += 1;
                self.stage = Stage::Compact;
                Some(SettleStep::Cleared(round))
            }
            Stage::Compact => {
                board.apply_gravity();
                self.stage = Stage::Mark;
                Some(SettleStep::Compacted)
            }
            Stage::Done => None,
        }
    }
}

/// Runs a [`ChainResolver`] on `board` until nothing is left to clear.
pub fn resolve_chain(board: &mut Board) -> ChainSummary {
    let mut resolver = ChainResolver::new();
    while resolver.step(board).is_some() {}
    resolver.summary()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::core::{
        PuyoColor,
        board::{Position, strategy::arb_board},
        connectivity::has_any_group,
        scoring::BASE_SCORE,
    };

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_nothing_to_clear() {
        let mut b = board("RRG...");
        let mut resolver = ChainResolver::new();
        assert_eq!(resolver.step(&mut b), None);
        assert!(resolver.is_finished());
        assert_eq!(resolver.summary(), ChainSummary::default());
        // stays finished
        assert_eq!(resolver.step(&mut b), None);
        assert_eq!(b, board("RRG..."));
    }

    #[test]
    fn test_step_sequence_for_single_round() {
        let mut b = board(
            "
            RB....
            RB....
            RRB...
            ",
        );
        let mut resolver = ChainResolver::new();

        let step = resolver.step(&mut b).unwrap();
        let SettleStep::Marked { chain, groups } = &step else {
            panic!("expected a mark step, got {step:?}");
        };
        assert_eq!(*chain, 1);
        assert_eq!(groups.len(), 1);
        assert!(b.cell(Position::new(0, 10)).unwrap().is_marked());
        assert!(!b.cell(Position::new(1, 10)).unwrap().is_marked());

        let step = resolver.step(&mut b).unwrap();
        let SettleStep::Cleared(round) = &step else {
            panic!("expected a clear step, got {step:?}");
        };
        assert_eq!(round.chain, 1);
        assert_eq!(round.cleared.cells_cleared, 4);
        assert_eq!(round.cleared.colors, vec![PuyoColor::Red]);
        assert_eq!(round.score, 4 * BASE_SCORE);
        // cleared but not yet compacted: blues still float
        assert_eq!(b.cell_at(Position::new(1, 10)).unwrap(), Some(PuyoColor::Blue));

        assert!(resolver.step(&mut b).unwrap().is_compacted());
        assert_eq!(
            b,
            board(
                "
                .B....
                .BB...
                "
            )
        );

        assert_eq!(resolver.step(&mut b), None);
        assert_eq!(
            resolver.summary(),
            ChainSummary {
                rounds: 1,
                score: 40,
                cells_cleared: 4,
            }
        );
    }

    #[test]
    fn test_two_round_chain_scores() {
        // clearing the reds drops the greens into a group of four
        let mut b = board(
            "
            G.....
            RG....
            RG....
            RRG...
            ",
        );
        let summary = resolve_chain(&mut b);

        let first = 4 * BASE_SCORE;
        let second = 4 * BASE_SCORE * 8;
        assert_eq!(
            summary,
            ChainSummary {
                rounds: 2,
                score: first + second,
                cells_cleared: 8,
            }
        );
        assert!(b.is_empty());
    }

    #[test]
    fn test_simultaneous_colors_in_one_round() {
        let mut b = board(
            "
            RRBB..
            RRBB..
            ",
        );
        let mut resolver = ChainResolver::new();
        resolver.step(&mut b);
        let Some(SettleStep::Cleared(round)) = resolver.step(&mut b) else {
            panic!("expected a clear step");
        };
        assert_eq!(round.cleared.distinct_colors(), 2);
        assert_eq!(round.cleared.group_sizes, vec![4, 4]);
        assert_eq!(round.score, 8 * BASE_SCORE * 3);
    }

    #[test]
    fn test_presentation_delays() {
        assert_eq!(
            SettleStep::Compacted.presentation_delay(),
            Duration::from_millis(200)
        );
        let marked = SettleStep::Marked {
            chain: 1,
            groups: vec![],
        };
        assert_eq!(marked.presentation_delay(), Duration::from_millis(300));
    }

    proptest! {
        #[test]
        fn prop_settling_terminates_within_bound(mut board in arb_board()) {
            board.apply_gravity();
            let before = board.filled_count();
            let summary = resolve_chain(&mut board);

            prop_assert!(summary.rounds <= MAX_CHAIN_ROUNDS);
            prop_assert!(!has_any_group(&board, MIN_CONNECT));
            prop_assert_eq!(board.filled_count() + summary.cells_cleared, before);
            prop_assert!(summary.cells_cleared >= summary.rounds * MIN_CONNECT);
        }
    }
}
