//! Command-line plumbing shared by the binaries.
use crate::engine::{PuzzleParams, State};
use crate::error::Result;
use crate::solver::{SearchConfig, DEFAULT_DEPTH_LIMIT};
use crate::utils::read_puzzle_file;
use clap::Args;
use env_logger::TimestampPrecision;
use log::LevelFilter;
use std::path::Path;
use std::time::Duration;

/// Search limits accepted on the command line.
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Tube capacity (defaults to the longest tube in the puzzle file)
    #[clap(short, long)]
    pub capacity: Option<usize>,

    /// Maximum number of moves along one DFS branch
    #[clap(long, default_value_t = DEFAULT_DEPTH_LIMIT)]
    pub depth_limit: usize,

    /// Give up after exploring this many states
    #[clap(long)]
    pub max_states: Option<usize>,

    /// Give up after this many milliseconds
    #[clap(long)]
    pub time_limit_ms: Option<u64>,
}

impl SearchArgs {
    pub fn to_config(&self) -> SearchConfig {
        let mut config = SearchConfig::default().with_depth_limit(self.depth_limit);
        if let Some(max_states) = self.max_states {
            config = config.with_max_states(max_states);
        }
        if let Some(ms) = self.time_limit_ms {
            config = config.with_time_limit(Duration::from_millis(ms));
        }
        config
    }

    /// Reads a puzzle file and builds its validated initial state.
    pub fn load_puzzle(&self, path: &Path) -> Result<(State, PuzzleParams)> {
        let tubes = read_puzzle_file(path)?;
        let params = PuzzleParams::infer(&tubes, self.capacity)?;
        let state = State::new(tubes, &params)?;
        Ok((state, params))
    }
}

/// Initialises `env_logger` from a `-v` count: warn, info, debug, then trace.
pub fn init_logging(verbosity: u8) {
    env_logger::Builder::new()
        .filter_level(match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();
}
