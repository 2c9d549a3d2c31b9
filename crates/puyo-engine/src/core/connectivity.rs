use arrayvec::ArrayVec;
use serde::Serialize;

use super::{BOARD_HEIGHT, BOARD_WIDTH, board::Board, board::Position, color::PuyoColor};

/// A maximal set of same-colored, 4-directionally adjacent cells.
///
/// Groups are recomputed from the board whenever they are needed and never
/// stored across board mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectedGroup {
    color: PuyoColor,
    positions: Vec<Position>,
}

impl ConnectedGroup {
    #[must_use]
    pub fn color(&self) -> PuyoColor {
        self.color
    }

    /// Member positions in flood-fill order, starting from the top-left-most cell.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.positions.contains(&position)
    }

    pub(crate) fn indices(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.positions.iter().filter_map(|position| position.to_index())
    }
}

fn neighbors(x: usize, y: usize) -> ArrayVec<(usize, usize), 4> {
    let mut neighbors = ArrayVec::new();
    if x > 0 {
        neighbors.push((x - 1, y));
    }
    if x + 1 < BOARD_WIDTH {
        neighbors.push((x + 1, y));
    }
    if y > 0 {
        neighbors.push((x, y - 1));
    }
    if y + 1 < BOARD_HEIGHT {
        neighbors.push((x, y + 1));
    }
    neighbors
}

/// Finds every connected group of at least `min_size` cells.
///
/// Cells are visited in row-major order and each group is collected with an
/// iterative flood fill, so the result is deterministic and stack depth does
/// not depend on the board contents.
///
/// # Example
///
/// ```
/// use puyo_engine::{Board, MIN_CONNECT, PuyoColor, find_groups};
///
/// let board: Board = "
///     RR....
///     RRG...
/// "
/// .parse()
/// .unwrap();
///
/// let groups = find_groups(&board, MIN_CONNECT);
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].color(), PuyoColor::Red);
/// assert_eq!(groups[0].len(), 4);
/// ```
#[must_use]
pub fn find_groups(board: &Board, min_size: usize) -> Vec<ConnectedGroup> {
    let mut visited = [[false; BOARD_WIDTH]; BOARD_HEIGHT];
    let mut groups = vec![];
    let mut stack = vec![];

    for y in 0..BOARD_HEIGHT {
        for x in 0..BOARD_WIDTH {
            if visited[y][x] {
                continue;
            }
            let Some(color) = board.color_at_index(x, y) else {
                continue;
            };

            let mut positions = vec![];
            visited[y][x] = true;
            stack.push((x, y));
            while let Some((cx, cy)) = stack.pop() {
                positions.push(Position::from_index(cx, cy));
                for (nx, ny) in neighbors(cx, cy) {
                    if !visited[ny][nx] && board.color_at_index(nx, ny) == Some(color) {
                        visited[ny][nx] = true;
                        stack.push((nx, ny));
                    }
                }
            }

            if positions.len() >= min_size {
                groups.push(ConnectedGroup { color, positions });
            }
        }
    }

    groups
}

/// Returns whether [`find_groups`] would return at least one group.
#[must_use]
pub fn has_any_group(board: &Board, min_size: usize) -> bool {
    !find_groups(board, min_size).is_empty()
}
