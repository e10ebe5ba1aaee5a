use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "pik")]
#[command(about = "Load object definitions and run scene scripts")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    Check(CheckArgs),
    Run(RunArgs),
}

#[derive(Debug, Args)]
pub(crate) struct CheckArgs {
    /// A definition file, or a directory searched for `*.cnv` files.
    #[arg(long = "path")]
    pub(crate) path: String,
}

#[derive(Debug, Args)]
pub(crate) struct RunArgs {
    #[arg(long = "global")]
    pub(crate) global: String,
    #[arg(long = "scene")]
    pub(crate) scene: Option<String>,
    /// Script text run as a top-level callback; repeatable.
    #[arg(long = "call")]
    pub(crate) calls: Vec<String>,
    #[arg(long = "ticks", default_value_t = 0)]
    pub(crate) ticks: u32,
    #[arg(long = "tick-ms", default_value_t = 16.0)]
    pub(crate) tick_ms: f64,
    #[arg(long = "max-call-depth")]
    pub(crate) max_call_depth: Option<usize>,
}
