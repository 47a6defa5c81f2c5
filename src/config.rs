use std::path::PathBuf;

use clap::Parser;

pub const GRID_W: usize = 15;
pub const GRID_H: usize = 15;
pub const DEFAULT_WORLD: &str = "0_0";

#[derive(Debug, Parser)]
#[command(name = "mazewalk", about = "Walk a seeded perfect maze in the terminal")]
pub struct Cli {
    /// Generate this seed straight away instead of showing the menu
    #[arg(short, long, env = "MAZEWALK_SEED")]
    pub seed: Option<u64>,

    /// Key the generated world is stored under
    #[arg(short, long, default_value = DEFAULT_WORLD)]
    pub world: String,

    /// Write logs to this file (the terminal belongs to the game)
    #[arg(long, env = "MAZEWALK_LOG")]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Default filter when `RUST_LOG` is not set.
    pub fn log_directive(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
