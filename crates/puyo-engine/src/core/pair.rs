use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{SPAWN_COLUMN, board::Board, board::Position, color::PuyoColor};

/// Horizontal or downward movement of a falling pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
    Down,
}

impl MoveDirection {
    const fn delta(self) -> (i8, i8) {
        match self {
            MoveDirection::Left => (-1, 0),
            MoveDirection::Right => (1, 0),
            MoveDirection::Down => (0, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    Counterclockwise,
}

/// Orientation of a pair: where the sub cell sits relative to the main cell.
///
/// - `0`: above
/// - `1`: right
/// - `2`: below
/// - `3`: left
///
/// Rotation operations wrap around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairRotation(u8);

impl PairRotation {
    pub const UP: Self = Self(0);
    pub const RIGHT: Self = Self(1);
    pub const DOWN: Self = Self(2);
    pub const LEFT: Self = Self(3);

    const SUB_OFFSETS: [(i8, i8); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 4 { Some(Self(index)) } else { None }
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn rotated(self, direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::Clockwise => Self((self.0 + 1) % 4),
            RotationDirection::Counterclockwise => Self((self.0 + 3) % 4),
        }
    }

    /// Offset of the sub cell from the main cell.
    #[must_use]
    pub const fn sub_offset(self) -> (i8, i8) {
        Self::SUB_OFFSETS[self.0 as usize]
    }
}

/// Colors of a pair, either falling or waiting in the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColorPair {
    pub main: PuyoColor,
    pub sub: PuyoColor,
}

impl ColorPair {
    #[must_use]
    pub const fn new(main: PuyoColor, sub: PuyoColor) -> Self {
        Self { main, sub }
    }
}

impl Distribution<ColorPair> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ColorPair {
        ColorPair::new(rng.random(), rng.random())
    }
}

/// One of the two cells of a falling pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairCell {
    position: Position,
    color: PuyoColor,
}

impl PairCell {
    #[must_use]
    pub const fn position(self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn color(self) -> PuyoColor {
        self.color
    }
}

/// Result of [`FallingPair::moved`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub pair: FallingPair,
    /// Set when a downward move was blocked: the pair has come to rest.
    pub landed: bool,
}

/// The two-cell piece under player control.
///
/// Only the main cell's position is stored; the sub cell is always derived
/// from the rotation state, so the two can never disagree. Pairs are
/// immutable: movement and rotation return new values.
///
/// # Example
///
/// ```
/// use puyo_engine::{Board, ColorPair, FallingPair, MoveDirection, PuyoColor, RotationDirection};
///
/// let board = Board::EMPTY;
/// let pair = FallingPair::spawn(ColorPair::new(PuyoColor::Red, PuyoColor::Green));
///
/// let outcome = pair.moved(&board, MoveDirection::Left);
/// assert!(!outcome.landed);
///
/// let rotated = outcome.pair.rotated(&board, RotationDirection::Clockwise);
/// assert_eq!(rotated.sub().position().x(), rotated.main().position().x() + 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallingPair {
    position: Position,
    rotation: PairRotation,
    colors: ColorPair,
}

/// Offsets tried in order when rotating: in place, right, left, up.
const KICKS: [(i8, i8); 4] = [(0, 0), (1, 0), (-1, 0), (0, -1)];

impl FallingPair {
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const SPAWN_POSITION: Position = Position::new(SPAWN_COLUMN as i8, 0);

    /// Creates a pair at the spawn position with the sub cell on top.
    #[must_use]
    pub const fn spawn(colors: ColorPair) -> Self {
        Self::new(Self::SPAWN_POSITION, PairRotation::UP, colors)
    }

    #[must_use]
    pub const fn new(position: Position, rotation: PairRotation, colors: ColorPair) -> Self {
        Self {
            position,
            rotation,
            colors,
        }
    }

    #[must_use]
    pub const fn main(&self) -> PairCell {
        PairCell {
            position: self.position,
            color: self.colors.main,
        }
    }

    #[must_use]
    pub const fn sub(&self) -> PairCell {
        let (dx, dy) = self.rotation.sub_offset();
        PairCell {
            position: self.position.offset(dx, dy),
            color: self.colors.sub,
        }
    }

    #[must_use]
    pub const fn cells(&self) -> [PairCell; 2] {
        [self.main(), self.sub()]
    }

    #[must_use]
    pub const fn rotation(&self) -> PairRotation {
        self.rotation
    }

    #[must_use]
    pub const fn colors(&self) -> ColorPair {
        self.colors
    }

    /// Returns whether both cells may occupy their positions on `board`.
    #[must_use]
    pub fn fits(&self, board: &Board) -> bool {
        self.cells()
            .iter()
            .all(|cell| board.is_occupiable(cell.position(), &[]))
    }

    const fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self::new(self.position.offset(dx, dy), self.rotation, self.colors)
    }

    /// Moves both cells one step.
    ///
    /// A blocked downward move reports `landed` and leaves the pair unchanged;
    /// a blocked sideways move just leaves it unchanged.
    #[must_use]
    pub fn moved(&self, board: &Board, direction: MoveDirection) -> MoveOutcome {
        let (dx, dy) = direction.delta();
        let moved = self.shifted(dx, dy);
        if moved.fits(board) {
            return MoveOutcome {
                pair: moved,
                landed: false,
            };
        }
        MoveOutcome {
            pair: *self,
            landed: direction == MoveDirection::Down,
        }
    }

    /// Rotates the sub cell around the main cell, kicking off walls and stacks.
    ///
    /// The rotated pair is tried in place, then shifted one column right, one
    /// column left and one row up. The first candidate where both cells fit
    /// wins; if none does, the pair is returned unchanged.
    #[must_use]
    pub fn rotated(&self, board: &Board, direction: RotationDirection) -> Self {
        let rotated = Self::new(self.position, self.rotation.rotated(direction), self.colors);
        KICKS
            .iter()
            .map(|&(dx, dy)| rotated.shifted(dx, dy))
            .find(|candidate| candidate.fits(board))
            .unwrap_or(*self)
    }

    /// Returns the resting position reached by moving down until landing.
    #[must_use]
    pub fn dropped(&self, board: &Board) -> Self {
        let mut pair = *self;
        loop {
            let outcome = pair.moved(board, MoveDirection::Down);
            if outcome.landed {
                return pair;
            }
            pair = outcome.pair;
        }
    }
}

impl Serialize for FallingPair {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "<main><sub>#rotation@x,y" with the main cell's coordinates (e.g., "RG#1@2,5")
        let s = format!(
            "{}{}#{}@{},{}",
            self.colors.main.as_char(),
            self.colors.sub.as_char(),
            self.rotation.index(),
            self.position.x(),
            self.position.y()
        );
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for FallingPair {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let (colors_str, rest) = s.split_once('#').ok_or_else(|| {
            serde::de::Error::custom(format!("missing '#' in format 'MS#rotation@x,y', got '{s}'"))
        })?;
        let mut chars = colors_str.chars();
        let (Some(main), Some(sub), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(serde::de::Error::custom(format!(
                "expected two color characters, got '{colors_str}'"
            )));
        };
        let parse_color = |c: char| -> Result<PuyoColor, D::Error> {
            PuyoColor::from_char(c)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid color: {c}")))
        };
        let colors = ColorPair::new(parse_color(main)?, parse_color(sub)?);

        let (rotation_str, position_str) = rest.split_once('@').ok_or_else(|| {
            serde::de::Error::custom(format!("missing '@' in format 'MS#rotation@x,y', got '{s}'"))
        })?;
        let rotation = rotation_str
            .parse::<u8>()
            .ok()
            .and_then(PairRotation::from_index)
            .ok_or_else(|| {
                serde::de::Error::custom(format!("rotation must be 0-3, got '{rotation_str}'"))
            })?;

        let (x_str, y_str) = position_str.split_once(',').ok_or_else(|| {
            serde::de::Error::custom(format!("missing ',' in format 'MS#rotation@x,y', got '{s}'"))
        })?;
        let x = x_str
            .parse::<i8>()
            .map_err(|e| serde::de::Error::custom(format!("invalid x position: {x_str} ({e})")))?;
        let y = y_str
            .parse::<i8>()
            .map_err(|e| serde::de::Error::custom(format!("invalid y position: {y_str} ({e})")))?;

        Ok(Self::new(Position::new(x, y), rotation, colors))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const RG: ColorPair = ColorPair::new(PuyoColor::Red, PuyoColor::Green);

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    fn pair_at(x: i8, y: i8, rotation: PairRotation) -> FallingPair {
        FallingPair::new(Position::new(x, y), rotation, RG)
    }

    #[test]
    fn test_spawn_layout() {
        let pair = FallingPair::spawn(RG);
        assert_eq!(pair.main().position(), Position::new(2, 0));
        assert_eq!(pair.sub().position(), Position::new(2, -1));
        assert_eq!(pair.main().color(), PuyoColor::Red);
        assert_eq!(pair.sub().color(), PuyoColor::Green);
        assert_eq!(pair.rotation(), PairRotation::UP);
    }

    #[test]
    fn test_sub_offsets_follow_rotation() {
        let expected = [(2, 4), (3, 5), (2, 6), (1, 5)];
        for (index, (x, y)) in (0..4).zip(expected) {
            let pair = pair_at(2, 5, PairRotation::from_index(index).unwrap());
            assert_eq!(pair.sub().position(), Position::new(x, y));
        }
    }

    #[test]
    fn test_move_sideways_blocked_by_wall() {
        let board = Board::EMPTY;
        let pair = pair_at(0, 5, PairRotation::UP);

        let outcome = pair.moved(&board, MoveDirection::Left);
        assert_eq!(outcome.pair, pair);
        assert!(!outcome.landed);

        let outcome = pair.moved(&board, MoveDirection::Right);
        assert_eq!(outcome.pair.main().position(), Position::new(1, 5));
        assert!(!outcome.landed);
    }

    #[test]
    fn test_move_down_lands_on_floor_and_stack() {
        let board = board("..R...");

        let pair = pair_at(0, 12, PairRotation::UP);
        let outcome = pair.moved(&board, MoveDirection::Down);
        assert_eq!(outcome.pair, pair);
        assert!(outcome.landed);

        let pair = pair_at(2, 11, PairRotation::UP);
        assert!(pair.moved(&board, MoveDirection::Down).landed);

        let pair = pair_at(2, 10, PairRotation::UP);
        let outcome = pair.moved(&board, MoveDirection::Down);
        assert!(!outcome.landed);
        assert_eq!(outcome.pair.main().position(), Position::new(2, 11));
    }

    #[test]
    fn test_horizontal_pair_lands_on_either_cell() {
        let board = board("...R..");
        // main at column 2, sub at column 3 over the stack
        let pair = pair_at(2, 11, PairRotation::RIGHT);
        assert!(pair.moved(&board, MoveDirection::Down).landed);
    }

    #[test]
    fn test_rotate_in_open_space() {
        let board = Board::EMPTY;
        let pair = pair_at(2, 5, PairRotation::UP);

        let cw = pair.rotated(&board, RotationDirection::Clockwise);
        assert_eq!(cw.rotation(), PairRotation::RIGHT);
        assert_eq!(cw.main().position(), Position::new(2, 5));
        assert_eq!(cw.sub().position(), Position::new(3, 5));

        let ccw = pair.rotated(&board, RotationDirection::Counterclockwise);
        assert_eq!(ccw.rotation(), PairRotation::LEFT);
        assert_eq!(ccw.sub().position(), Position::new(1, 5));
    }

    #[test]
    fn test_rotate_kicks_off_right_wall() {
        let board = Board::EMPTY;
        let pair = pair_at(5, 5, PairRotation::UP);

        let rotated = pair.rotated(&board, RotationDirection::Clockwise);
        assert_eq!(rotated.rotation(), PairRotation::RIGHT);
        assert_eq!(rotated.main().position(), Position::new(4, 5));
        assert_eq!(rotated.sub().position(), Position::new(5, 5));
    }

    #[test]
    fn test_rotate_kicks_off_left_wall() {
        let board = Board::EMPTY;
        let pair = pair_at(0, 5, PairRotation::UP);

        let rotated = pair.rotated(&board, RotationDirection::Counterclockwise);
        assert_eq!(rotated.rotation(), PairRotation::LEFT);
        assert_eq!(rotated.main().position(), Position::new(1, 5));
        assert_eq!(rotated.sub().position(), Position::new(0, 5));
    }

    #[test]
    fn test_rotate_kicks_up_off_floor() {
        let board = Board::EMPTY;
        // sub on the right, resting on the floor; rotating clockwise puts sub below main
        let pair = pair_at(2, 12, PairRotation::RIGHT);

        let rotated = pair.rotated(&board, RotationDirection::Clockwise);
        assert_eq!(rotated.rotation(), PairRotation::DOWN);
        assert_eq!(rotated.main().position(), Position::new(2, 11));
        assert_eq!(rotated.sub().position(), Position::new(2, 12));
    }

    #[test]
    fn test_rotate_rejected_when_boxed_in() {
        // a one-column well: main at (2, 12), sub at (2, 11), walls of puyos around
        let board = board(
            "
            .R.R..
            .R.R..
            ",
        );
        let pair = pair_at(2, 12, PairRotation::UP);

        // every candidate collides, including the upward kick with sub at (3, 11)
        let rotated = pair.rotated(&board, RotationDirection::Clockwise);
        assert_eq!(rotated, pair);
    }

    #[test]
    fn test_dropped() {
        let board = board(
            "
            ..G...
            ..G...
            ",
        );
        let dropped = FallingPair::spawn(RG).dropped(&board);
        assert_eq!(dropped.main().position(), Position::new(2, 10));
        assert_eq!(dropped.sub().position(), Position::new(2, 9));
    }

    #[test]
    fn test_pair_serialization() {
        let pair = pair_at(2, 5, PairRotation::RIGHT);
        let serialized = serde_json::to_string(&pair).unwrap();
        assert_eq!(serialized, "\"RG#1@2,5\"");
        let deserialized: FallingPair = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, pair);

        let spawned = FallingPair::spawn(RG);
        let serialized = serde_json::to_string(&spawned).unwrap();
        assert_eq!(serialized, "\"RG#0@2,0\"");
    }

    #[test]
    fn test_pair_deserialization_error_cases() {
        assert!(serde_json::from_str::<FallingPair>("\"RG1@2,5\"").is_err());
        assert!(serde_json::from_str::<FallingPair>("\"R#1@2,5\"").is_err());
        assert!(serde_json::from_str::<FallingPair>("\"RGB#1@2,5\"").is_err());
        assert!(serde_json::from_str::<FallingPair>("\"RX#1@2,5\"").is_err());
        assert!(serde_json::from_str::<FallingPair>("\"RG#4@2,5\"").is_err());
        assert!(serde_json::from_str::<FallingPair>("\"RG#1@2\"").is_err());
        assert!(serde_json::from_str::<FallingPair>("\"RG#1@a,5\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_rotation_round_trip_in_open_space(
            x in 1_i8..5,
            y in 1_i8..12,
            rotation in 0_u8..4,
        ) {
            let board = Board::EMPTY;
            let pair = pair_at(x, y, PairRotation::from_index(rotation).unwrap());

            let mut rotated = pair;
            for _ in 0..4 {
                rotated = rotated.rotated(&board, RotationDirection::Clockwise);
            }
            prop_assert_eq!(rotated, pair);

            for _ in 0..4 {
                rotated = rotated.rotated(&board, RotationDirection::Counterclockwise);
            }
            prop_assert_eq!(rotated, pair);

            let there = pair.rotated(&board, RotationDirection::Clockwise);
            let back = there.rotated(&board, RotationDirection::Counterclockwise);
            prop_assert_eq!(back, pair);
        }
    }
}
