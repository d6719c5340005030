#[derive(clap::Parser, Debug)]
#[command()]
pub struct Args {
    /// Paths of scripts to run. Defaults to all scripts.
    pub tests: Option<Vec<String>>,

    /// Stop on the first failure.
    #[arg(short = 'x', long)]
    pub first_failure: bool,

    /// Print the steps and errors of every script regardless of the test result.
    #[arg(short = 'd', long)]
    pub all_diagnostics: bool,

    /// Do not announce each script as it starts.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn parse() -> Self {
        clap::Parser::parse()
    }
}
