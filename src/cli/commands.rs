use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::io::config_io::CONFIG_FILE;

#[derive(Parser)]
#[command(
    name = "fb",
    about = concat!("fixbook v", env!("CARGO_PKG_VERSION"), " - remember how you fixed it"),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output reports as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Issue data file (overrides the config)
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<PathBuf>,

    /// Config file path
    #[arg(short = 'c', long = "config", global = true, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read commands from stdin, one per line (default)
    Shell,
    /// Run the given command lines in order, stopping at the first failure
    Exec(ExecArgs),
}

#[derive(Args)]
pub struct ExecArgs {
    /// Command lines, e.g. "add NPE in loop t/java"
    #[arg(required = true)]
    pub lines: Vec<String>,
}
