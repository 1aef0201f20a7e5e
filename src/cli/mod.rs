pub mod build;

use clap::Parser;

/// purchaser - Purchase-menu icon compositor
#[derive(Parser, Debug)]
#[command(name = "purchaser")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub build: build::BuildArgs,

    /// Print per-unit detail
    #[arg(long, short)]
    pub verbose: bool,
}
