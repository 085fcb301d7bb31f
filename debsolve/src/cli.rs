// debsolve/src/cli.rs
//! Defines the command-line argument structure using clap.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod rules;
pub mod solve;

use crate::cli::rules::Rules;
pub use crate::cli::solve::SolveArgs;

/// Without a subcommand the dependencies of the package are solved.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "debsolve", bin_name = "debsolve")]
#[command(args_conflicts_with_subcommands = true)]
pub struct CliArgs {
    /// Show the progress of the resolution
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log debugging information
    #[arg(long, global = true)]
    pub debug: bool,

    /// Directory of the project to package (defaults to the current directory)
    #[arg(short = 'b', long = "base-directory", global = true, value_name = "DIR")]
    pub base_directory: Option<PathBuf>,

    #[command(flatten)]
    pub solve: SolveArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the rules learned by earlier runs
    Rules(Rules),
}
