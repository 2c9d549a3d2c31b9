pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("position {position} is outside the board")]
pub struct OutOfBoundsError {
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("too many rows: expected at most {}, got {count}", BOARD_HEIGHT)]
    TooManyRows { count: usize },
    #[display("row {row}: expected {} cells, got {len}", BOARD_WIDTH)]
    RowWidth { row: usize, len: usize },
    #[display("row {row}: invalid cell character {ch:?}")]
    InvalidCell { row: usize, ch: char },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid pair seed {input:?}: expected 32 hex digits")]
pub struct ParseSeedError {
    pub input: String,
}
