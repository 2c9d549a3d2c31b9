use serde::Serialize;

use super::chain::{ChainRound, ChainSummary};

/// Number of buckets in [`GameStats::chain_histogram`].
pub const CHAIN_HISTOGRAM_LEN: usize = 8;

/// Running totals for a game session.
///
/// - **Score**: sum of all round scores
/// - **Placed pairs**: pairs that came to rest on the board
/// - **Cleared cells**: cells removed by chains
/// - **Chains**: settles that cleared at least one group, and the longest one
/// - **Chain histogram**: settles by number of rounds; index 0 counts
///   placements that cleared nothing and the last bucket collects every
///   longer chain
///
/// # Example
///
/// ```
/// use puyo_engine::{ChainSummary, GameStats};
///
/// let mut stats = GameStats::new();
/// stats.complete_pair_drop();
/// stats.complete_chain(ChainSummary { rounds: 2, score: 360, cells_cleared: 8 });
///
/// assert_eq!(stats.placed_pairs(), 1);
/// assert_eq!(stats.max_chain(), 2);
/// assert_eq!(stats.chain_histogram()[2], 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: usize,
    placed_pairs: usize,
    cleared_cells: usize,
    chains: usize,
    max_chain: usize,
    chain_histogram: [usize; CHAIN_HISTOGRAM_LEN],
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            placed_pairs: 0,
            cleared_cells: 0,
            chains: 0,
            max_chain: 0,
            chain_histogram: [0; CHAIN_HISTOGRAM_LEN],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn placed_pairs(&self) -> usize {
        self.placed_pairs
    }

    #[must_use]
    pub const fn cleared_cells(&self) -> usize {
        self.cleared_cells
    }

    /// Number of settles that cleared at least one group.
    #[must_use]
    pub const fn chains(&self) -> usize {
        self.chains
    }

    /// Longest chain so far, in rounds.
    #[must_use]
    pub const fn max_chain(&self) -> usize {
        self.max_chain
    }

    #[must_use]
    pub const fn chain_histogram(&self) -> &[usize; CHAIN_HISTOGRAM_LEN] {
        &self.chain_histogram
    }

    /// Counts a pair that came to rest.
    pub const fn complete_pair_drop(&mut self) {
        self.placed_pairs += 1;
    }

    /// Adds the score of a single round as soon as it is cleared.
    pub const fn record_round(&mut self, round: &ChainRound) {
        self.score += round.score;
        self.cleared_cells += round.cleared.cells_cleared;
    }

    /// Closes a settle once the resolver has nothing left to clear.
    ///
    /// Score and cells are already counted by [`Self::record_round`].
    pub fn complete_chain(&mut self, summary: ChainSummary) {
        if summary.rounds > 0 {
            self.chains += 1;
        }
        self.max_chain = self.max_chain.max(summary.rounds);
        let bucket = summary.rounds.min(CHAIN_HISTOGRAM_LEN - 1);
        self.chain_histogram[bucket] += 1;
    }
}
