use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{OutOfBoundsError, ParseBoardError};

use super::{
    BOARD_HEIGHT, BOARD_WIDTH, HIDDEN_ROWS, SPAWN_COLUMN, color::PuyoColor,
    connectivity::ConnectedGroup, pair::FallingPair,
};

/// Column/row coordinate on the board.
///
/// `(0, 0)` is the top-left cell of the hidden spawn row; `y` grows downward.
/// Rows above the board have a negative `y` and are always free, so a pair
/// can rotate or spawn partially above the grid.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Deserialize,
    Serialize,
    derive_more::Display,
)]
#[display("({x}, {y})")]
pub struct Position {
    x: i8,
    y: i8,
}

impl Position {
    #[must_use]
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub(crate) const fn from_index(x: usize, y: usize) -> Self {
        assert!(x < BOARD_WIDTH);
        assert!(y < BOARD_HEIGHT);
        Self {
            x: x as i8,
            y: y as i8,
        }
    }

    #[must_use]
    pub const fn x(self) -> i8 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i8 {
        self.y
    }

    #[must_use]
    pub const fn offset(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    #[must_use]
    pub const fn is_above_board(self) -> bool {
        self.y < 0
    }

    /// Returns the `(column, row)` indices if the position lies on the board.
    #[must_use]
    pub fn to_index(self) -> Option<(usize, usize)> {
        let x = usize::try_from(self.x).ok()?;
        let y = usize::try_from(self.y).ok()?;
        (x < BOARD_WIDTH && y < BOARD_HEIGHT).then_some((x, y))
    }
}

/// A single board cell.
///
/// The `marked` flag is set on cells about to be cleared so that a front-end
/// can highlight them between the mark and clear steps of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    color: Option<PuyoColor>,
    marked: bool,
}

impl Cell {
    pub const EMPTY: Self = Self {
        color: None,
        marked: false,
    };

    #[must_use]
    pub const fn filled(color: PuyoColor) -> Self {
        Self {
            color: Some(color),
            marked: false,
        }
    }

    #[must_use]
    pub const fn color(self) -> Option<PuyoColor> {
        self.color
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.color.is_none()
    }

    #[must_use]
    pub const fn is_marked(self) -> bool {
        self.marked
    }

    const fn as_char(self) -> char {
        match self.color {
            Some(color) => color.as_char(),
            None => '.',
        }
    }
}

/// Cells removed by one call to [`Board::clear_groups`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClearSummary {
    /// Total number of cells emptied.
    pub cells_cleared: usize,
    /// Distinct colors removed, in the order they were first seen.
    pub colors: Vec<PuyoColor>,
    /// Size of each removed group.
    pub group_sizes: Vec<usize>,
}

impl ClearSummary {
    #[must_use]
    pub fn distinct_colors(&self) -> usize {
        self.colors.len()
    }
}

/// The 6×13 playfield.
///
/// Rows are stored top to bottom; row 0 is the hidden spawn buffer. The board
/// is only mutated through its own operations (placing a pair, gravity,
/// marking and clearing groups).
///
/// The text form has one line per row using `R G B Y P` for colors and `.`
/// for empty cells. Parsing accepts fewer than 13 lines and aligns them to the
/// bottom of the board:
///
/// ```
/// use puyo_engine::{Board, Position, PuyoColor};
///
/// let board: Board = "
///     R.....
///     RRG...
/// "
/// .parse()
/// .unwrap();
///
/// assert_eq!(board.cell_at(Position::new(0, 12)).unwrap(), Some(PuyoColor::Red));
/// assert_eq!(board.cell_at(Position::new(2, 12)).unwrap(), Some(PuyoColor::Green));
/// assert_eq!(board.cell_at(Position::new(1, 11)).unwrap(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [[Cell; BOARD_WIDTH]; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [[Cell::EMPTY; BOARD_WIDTH]; BOARD_HEIGHT],
    };

    /// Returns the color at `position`, or `None` for an empty cell.
    pub fn cell_at(&self, position: Position) -> Result<Option<PuyoColor>, OutOfBoundsError> {
        self.cell(position).map(Cell::color)
    }

    pub fn cell(&self, position: Position) -> Result<Cell, OutOfBoundsError> {
        let (x, y) = position
            .to_index()
            .ok_or(OutOfBoundsError { position })?;
        Ok(self.rows[y][x])
    }

    pub(crate) fn color_at_index(&self, x: usize, y: usize) -> Option<PuyoColor> {
        self.rows[y][x].color
    }

    pub(crate) fn set_color(&mut self, x: usize, y: usize, color: Option<PuyoColor>) {
        self.rows[y][x] = Cell {
            color,
            marked: false,
        };
    }

    /// Returns whether a pair cell may occupy `position`.
    ///
    /// Columns outside the board and rows below it are never occupiable.
    /// Rows above the board always are. On the board, the cell must be empty
    /// or listed in `ignoring`.
    #[must_use]
    pub fn is_occupiable(&self, position: Position, ignoring: &[Position]) -> bool {
        let in_columns = usize::try_from(position.x()).is_ok_and(|x| x < BOARD_WIDTH);
        if !in_columns {
            return false;
        }
        if position.is_above_board() {
            return true;
        }
        match position.to_index() {
            Some((x, y)) => self.rows[y][x].is_empty() || ignoring.contains(&position),
            None => false,
        }
    }

    /// Writes the pair's colors into the board.
    ///
    /// Cells still above the board are not written. Returns how many cells
    /// were dropped that way.
    pub fn place(&mut self, pair: &FallingPair) -> usize {
        let mut dropped = 0;
        for cell in pair.cells() {
            match cell.position().to_index() {
                Some((x, y)) => self.rows[y][x] = Cell::filled(cell.color()),
                None => dropped += 1,
            }
        }
        dropped
    }

    /// Lets every cell fall as far as possible within its column.
    ///
    /// Relative order within a column is preserved; columns are independent.
    pub fn apply_gravity(&mut self) {
        for x in 0..BOARD_WIDTH {
            let mut write_y = BOARD_HEIGHT;
            for y in (0..BOARD_HEIGHT).rev() {
                if self.rows[y][x].is_empty() {
                    continue;
                }
                write_y -= 1;
                if write_y != y {
                    self.rows[write_y][x] = self.rows[y][x];
                    self.rows[y][x] = Cell::EMPTY;
                }
            }
        }
    }

    /// Clears every mark, then marks the cells of `groups`.
    pub fn mark_groups(&mut self, groups: &[ConnectedGroup]) {
        for cell in self.rows.iter_mut().flatten() {
            cell.marked = false;
        }
        for (x, y) in groups.iter().flat_map(ConnectedGroup::indices) {
            self.rows[y][x].marked = true;
        }
    }

    /// Empties every cell of `groups`.
    pub fn clear_groups(&mut self, groups: &[ConnectedGroup]) -> ClearSummary {
        let mut summary = ClearSummary::default();
        for group in groups {
            if !summary.colors.contains(&group.color()) {
                summary.colors.push(group.color());
            }
            summary.group_sizes.push(group.len());
            summary.cells_cleared += group.len();
            for (x, y) in group.indices() {
                self.rows[y][x] = Cell::EMPTY;
            }
        }
        summary
    }

    /// Returns whether the spawn column is filled in the hidden row or the
    /// first visible row.
    #[must_use]
    pub fn is_topped_out(&self) -> bool {
        self.rows[..=HIDDEN_ROWS]
            .iter()
            .any(|row| !row[SPAWN_COLUMN].is_empty())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(|cell| cell.is_empty())
    }

    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.rows.iter().flatten().filter(|cell| !cell.is_empty()).count()
    }

    /// Returns an iterator over all rows, top to bottom, including the hidden row.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_WIDTH]> {
        self.rows.iter()
    }

    /// Returns an iterator over the rows shown to the player.
    pub fn visible_rows(&self) -> impl Iterator<Item = &[Cell; BOARD_WIDTH]> {
        self.rows[HIDDEN_ROWS..].iter()
    }

    fn row_string(row: &[Cell; BOARD_WIDTH]) -> String {
        row.iter().map(|cell| cell.as_char()).collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows.iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            f.write_str(&Self::row_string(row))?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        if lines.len() > BOARD_HEIGHT {
            return Err(ParseBoardError::TooManyRows { count: lines.len() });
        }

        let mut board = Self::EMPTY;
        let top = BOARD_HEIGHT - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let row = top + i;
            let len = line.chars().count();
            if len != BOARD_WIDTH {
                return Err(ParseBoardError::RowWidth { row, len });
            }
            for (x, ch) in line.chars().enumerate() {
                let color = match ch {
                    '.' => None,
                    _ => Some(
                        PuyoColor::from_char(ch).ok_or(ParseBoardError::InvalidCell { row, ch })?,
                    ),
                };
                board.set_color(x, row, color);
            }
        }
        Ok(board)
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Format: one string per row, top to bottom (e.g. ["......", "RG...."])
        serializer.collect_seq(self.rows.iter().map(Self::row_string))
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<String>::deserialize(deserializer)?;
        rows.join("\n").parse().map_err(serde::de::Error::custom)
    }
}
