//! Board model and the pure rules operating on it.

pub use self::{board::*, color::*, connectivity::*, pair::*, scoring::*};

pub(crate) mod board;
pub(crate) mod color;
pub(crate) mod connectivity;
pub(crate) mod pair;
pub(crate) mod scoring;

/// Number of columns.
pub const BOARD_WIDTH: usize = 6;
/// Number of rows, including the hidden spawn buffer.
pub const BOARD_HEIGHT: usize = 13;
/// Rows at the top of the board that are never shown.
pub const HIDDEN_ROWS: usize = 1;
/// Rows shown to the player.
pub const VISIBLE_HEIGHT: usize = BOARD_HEIGHT - HIDDEN_ROWS;
/// Column where new pairs appear.
pub const SPAWN_COLUMN: usize = 2;
/// Minimum group size that gets cleared.
pub const MIN_CONNECT: usize = 4;
