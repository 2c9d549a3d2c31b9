//! Game flow built on top of the core rules.
//!
//! - [`GameSession`] - One game: falling pair, settling and game over
//! - [`ChainResolver`] - Step-wise chain resolution with scoring
//! - [`PairBuffer`] - Seeded (optionally scripted) pair generation
//! - [`GameStats`] - Score and chain statistics
//!
//! # Game Flow
//!
//! 1. A pair spawns at the top of the spawn column
//! 2. The player moves and rotates it while it descends
//! 3. The pair lands, is written into the board and gravity is applied
//! 4. Groups of four or more are cleared round after round until none is left
//! 5. The next pair spawns, or the game ends if the spawn column is blocked
//!
//! # Example
//!
//! ```
//! use puyo_engine::{GameSession, Phase, RotationDirection};
//!
//! let mut session = GameSession::new();
//!
//! while session.phase() != Phase::GameOver && session.stats().placed_pairs() < 500 {
//!     session.rotate_pair(RotationDirection::Clockwise);
//!     session.hard_drop();
//!     while let Some(step) = session.advance_settling() {
//!         // a front-end would wait `step.presentation_delay()` here
//!         let _ = step;
//!     }
//! }
//!
//! println!("final score: {}", session.score());
//! ```

pub use self::{chain::*, game_session::*, game_stats::*, pair_buffer::*};

mod chain;
mod game_session;
mod game_stats;
mod pair_buffer;
