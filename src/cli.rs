use std::path::PathBuf;

use clap::ArgAction;

#[derive(clap::Parser, Debug)]
#[command(about = "Runs a stream script and prints the outcome of every command")]
pub struct Args {
    /// Path to the script, or `-` to read it from stdin.
    pub script: String,

    /// Seed the stream with the contents of this file.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Only report failures.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase logging verbosity (`-v` for debug, `-vv` for trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn parse() -> Self {
        clap::Parser::parse()
    }
}
