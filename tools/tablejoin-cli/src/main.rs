//! tablejoin Command Line Interface
//!
//! Joins two key-value text tables on their key under a fixed memory bound.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::{join, preview};
use crate::config::{MalformedMode, StrategyName};

/// tablejoin Command Line Interface
///
/// Inner join of two `key,value` files, holding at most a window of each in memory.
#[derive(Parser, Debug)]
#[command(name = "tablejoin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// More log output (repeat for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Join the left table with the right table into the output file
    Join(JoinArgs),

    /// Print one window of a key-value file
    Preview {
        /// File to read
        file: PathBuf,

        /// Lines to skip before the window
        #[arg(short, long, default_value = "0")]
        start: usize,

        /// Maximum lines in the window
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,

        /// Field separator
        #[arg(long, default_value = ",")]
        separator: char,
    },
}

/// Arguments of the `join` command. Unset flags fall back to the config file.
#[derive(clap::Args, Debug, Default)]
pub struct JoinArgs {
    /// Path to a TOML config file
    #[arg(short, long, env = "TABLEJOIN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Left table (A) [default: ./data/input_A.csv]
    #[arg(long)]
    pub left: Option<PathBuf>,

    /// Right table (B) [default: ./data/input_B.csv]
    #[arg(long)]
    pub right: Option<PathBuf>,

    /// Result file, truncated on every run [default: ./data/result.csv]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Lines held per side [default: 5]
    #[arg(short, long)]
    pub window: Option<usize>,

    /// Join strategy [default: bounded]
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyName>,

    /// Field separator [default: ,]
    #[arg(long)]
    pub separator: Option<char>,

    /// Malformed line handling [default: abort]
    #[arg(long, value_enum)]
    pub on_malformed: Option<MalformedMode>,

    /// Fail once more than this many malformed lines were skipped (implies skip)
    #[arg(long)]
    pub max_malformed: Option<usize>,

    /// Fsync the result after every batch
    #[arg(long)]
    pub fsync: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        // Display root cause directly for clear error messages
        let chain: Vec<_> = e.chain().collect();
        if let Some(root_cause) = chain.last() {
            eprintln!("Error: {root_cause}");
        }
        // Show context chain if there are additional layers
        if chain.len() > 1 {
            eprintln!("\nContext:");
            for cause in chain.iter().take(chain.len() - 1) {
                eprintln!("  - {cause}");
            }
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Join(args) => join::run(&args),
        Commands::Preview { file, start, count, separator } => {
            preview::run(&file, start, count, separator)
        }
    }
}

/// Logs go to stderr so that stdout stays clean for command output.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "tablejoin={level},tablejoin_core={level},tablejoin_cli={level}"
        ))
    });

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
