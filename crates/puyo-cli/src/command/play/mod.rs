use std::{path::PathBuf, time::Duration};

use puyo_engine::{
    DropIntervals, GameSession, NORMAL_DROP_INTERVAL, PairSeed, SOFT_DROP_INTERVAL,
};
use tracing::info;

use crate::{logging, tui::Tui};

use self::app::PlayApp;

mod app;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the pair sequence (32 hex digits); random when omitted
    #[clap(long)]
    pub(crate) seed: Option<PairSeed>,
    /// Milliseconds between automatic descent steps
    #[clap(long, default_value_t = duration_ms(NORMAL_DROP_INTERVAL))]
    pub(crate) normal_interval_ms: u64,
    /// Milliseconds between descent steps while soft drop is held
    #[clap(long, default_value_t = duration_ms(SOFT_DROP_INTERVAL))]
    pub(crate) soft_drop_interval_ms: u64,
    /// Write log output to this file
    #[clap(long)]
    pub(crate) log_file: Option<PathBuf>,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            seed: None,
            normal_interval_ms: duration_ms(NORMAL_DROP_INTERVAL),
            soft_drop_interval_ms: duration_ms(SOFT_DROP_INTERVAL),
            log_file: None,
        }
    }
}

#[expect(clippy::cast_possible_truncation)]
const fn duration_ms(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        seed,
        normal_interval_ms,
        soft_drop_interval_ms,
        log_file,
    } = arg;

    logging::init_file(log_file.as_deref())?;

    let mut session = seed.map_or_else(GameSession::new, GameSession::with_seed);
    session.set_drop_intervals(DropIntervals {
        normal: Duration::from_millis(*normal_interval_ms),
        soft_drop: Duration::from_millis(*soft_drop_interval_ms),
    });

    let mut app = PlayApp::new(session);
    Tui::new().run(&mut app)?;

    let stats = app.session().stats();
    info!(
        score = stats.score(),
        placed_pairs = stats.placed_pairs(),
        max_chain = stats.max_chain(),
        "session finished"
    );
    Ok(())
}
