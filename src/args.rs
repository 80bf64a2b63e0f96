use std::path::PathBuf;

use clap::Parser;

use crate::mode::Mode;

#[derive(Debug, Parser)]
#[command(name = "schulte-trainer", version, about = "Schulte table speed training")]
pub struct Args {
    /// Database file (defaults to the platform data directory)
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Initial mode: 30, 60, 90, 120 or unlimited
    #[arg(long, default_value = "30")]
    pub mode: Mode,

    /// Seed for reproducible grids
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print statistics and exit
    #[arg(long)]
    pub stats: bool,

    /// Print the N most recent records and exit
    #[arg(long, value_name = "N")]
    pub history: Option<usize>,

    /// Print --stats / --history output as JSON
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Whether the run only prints stored data instead of opening the UI.
    pub fn is_report(&self) -> bool {
        self.stats || self.history.is_some()
    }
}
