use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::Context as _;
use puyo_engine::{GameSession, GameSnapshot, MoveDirection, PairSeed, RotationDirection};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;
use tracing::info;

use crate::logging;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Seed for both the pair sequence and the moves (32 hex digits); random
    /// when omitted
    #[clap(long)]
    pub(crate) seed: Option<PairSeed>,
    /// Stop after placing this many pairs
    #[clap(long, default_value_t = 100)]
    pub(crate) pairs: usize,
    /// Write the report to this file instead of stdout
    #[clap(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct SimulationReport {
    seed: PairSeed,
    pairs_requested: usize,
    game_over: bool,
    #[serde(flatten)]
    snapshot: GameSnapshot,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        seed,
        pairs,
        output,
    } = arg;

    logging::init_stderr();

    let seed = seed.unwrap_or_else(rand::random);
    info!(%seed, pairs, "simulation started");
    let report = simulate(seed, *pairs);
    info!(
        score = report.snapshot.score,
        placed_pairs = report.snapshot.stats.placed_pairs(),
        max_chain = report.snapshot.stats.max_chain(),
        game_over = report.game_over,
        "simulation finished"
    );

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_json(BufWriter::new(file), &report)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
        }
        None => write_json(io::stdout().lock(), &report)
            .context("Failed to write report to stdout")?,
    }
    Ok(())
}

fn write_json<W, T>(mut writer: W, value: &T) -> anyhow::Result<()>
where
    W: Write,
    T: Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Plays random moves until the game ends or `pairs` pairs are placed.
fn simulate(seed: PairSeed, pairs: usize) -> SimulationReport {
    let mut session = GameSession::with_seed(seed);
    let mut rng = Pcg32::from_seed(seed.to_bytes());

    while session.phase().is_falling() && session.stats().placed_pairs() < pairs {
        play_random_move(&mut session, &mut rng);
        session.settle();
    }

    SimulationReport {
        seed,
        pairs_requested: pairs,
        game_over: session.phase().is_game_over(),
        snapshot: session.snapshot(),
    }
}

fn play_random_move(session: &mut GameSession, rng: &mut Pcg32) {
    for _ in 0..rng.random_range(0..4) {
        session.rotate_pair(RotationDirection::Clockwise);
    }
    let shift: i32 = rng.random_range(-3..=3);
    let direction = if shift < 0 {
        MoveDirection::Left
    } else {
        MoveDirection::Right
    };
    for _ in 0..shift.unsigned_abs() {
        session.move_pair(direction);
    }
    session.hard_drop();
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: PairSeed = PairSeed::from_bytes([
        0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0xfe, 0xdc, 0xba, 0x98, 0x76, 0x54, 0x32,
        0x10,
    ]);

    #[test]
    fn test_simulation_is_reproducible() {
        assert_eq!(simulate(SEED, 50), simulate(SEED, 50));
    }

    #[test]
    fn test_simulation_stops_at_pair_count() {
        let report = simulate(SEED, 5);
        assert!(!report.game_over);
        assert_eq!(report.snapshot.stats.placed_pairs(), 5);
        assert!(report.snapshot.phase.is_falling());

        let report = simulate(SEED, 0);
        assert_eq!(report.snapshot.stats.placed_pairs(), 0);
        assert!(report.snapshot.board.is_empty());
    }

    #[test]
    fn test_simulation_ends_at_game_over() {
        let report = simulate(SEED, usize::MAX);
        assert!(report.game_over);
        assert!(report.snapshot.falling_pair.is_none());
        assert!(report.snapshot.stats.placed_pairs() < usize::MAX);
    }

    #[test]
    fn test_report_json() {
        let report = simulate(SEED, 3);
        let mut buf = Vec::new();
        write_json(&mut buf, &report).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["seed"], "0123456789abcdeffedcba9876543210");
        assert_eq!(value["pairs_requested"], 3);
        assert_eq!(value["game_over"], false);
        assert!(value["board"].is_array());
    }
}
