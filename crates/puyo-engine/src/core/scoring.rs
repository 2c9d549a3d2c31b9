//! Points awarded for one clearing round of a chain.

/// Points per cleared cell before bonuses.
pub const BASE_SCORE: usize = 10;

/// Bonus by chain index (1 = first round of a chain).
///
/// Indices past the end use the last entry.
pub const CHAIN_BONUS: [usize; 20] = [
    0, 0, 8, 16, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448, 480, 512,
];

/// Bonus by number of distinct colors cleared in the same round.
pub const COLOR_BONUS: [usize; 6] = [0, 0, 3, 6, 12, 24];

/// Bonus by group size, summed over every group cleared in the round.
pub const CONNECTION_BONUS: [usize; 12] = [0, 0, 0, 0, 0, 2, 3, 4, 5, 6, 7, 10];

fn clamped_lookup(table: &[usize], index: usize) -> usize {
    table[index.min(table.len() - 1)]
}

/// Computes the points for one clearing round.
///
/// `cells_cleared × BASE_SCORE × max(chain + color + connection bonus, 1)`,
/// or 0 when nothing was cleared.
///
/// # Example
///
/// ```
/// use puyo_engine::calculate_score;
///
/// // a single group of four on the first round: the bonus floor of 1 applies
/// assert_eq!(calculate_score(4, 1, 1, &[4]), 40);
/// // two colors on the second round
/// assert_eq!(calculate_score(9, 2, 2, &[4, 5]), 9 * 10 * (8 + 3 + 2));
/// ```
#[must_use]
pub fn calculate_score(
    cells_cleared: usize,
    chain_index: usize,
    distinct_colors: usize,
    group_sizes: &[usize],
) -> usize {
    if cells_cleared == 0 {
        return 0;
    }

    let chain_bonus = clamped_lookup(&CHAIN_BONUS, chain_index);
    let color_bonus = clamped_lookup(&COLOR_BONUS, distinct_colors);
    let connection_bonus: usize = group_sizes
        .iter()
        .map(|&size| clamped_lookup(&CONNECTION_BONUS, size))
        .sum();
    let total_bonus = usize::max(chain_bonus + color_bonus + connection_bonus, 1);

    cells_cleared * BASE_SCORE * total_bonus
}
