// debsolve/src/main.rs
use std::process;

use clap::Parser;
use colored::Colorize;
use debsolve_common::config::Config;
use debsolve_common::error::Result;
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{CliArgs, Command};

fn main() {
    let cli_args = CliArgs::parse();

    let level_filter = match (cli_args.debug, cli_args.verbose) {
        (true, true) => LevelFilter::TRACE,
        (true, false) => LevelFilter::DEBUG,
        (false, true) => LevelFilter::INFO,
        (false, false) => LevelFilter::WARN,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("DEBSOLVE_LOG")
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .without_time()
        .try_init();

    match run(&cli_args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            process::exit(1);
        }
    }
}

/// `Ok(false)` when the command finished but left problems to report.
fn run(cli_args: &CliArgs) -> Result<bool> {
    let mut config = Config::load()?;
    if let Some(base_dir) = &cli_args.base_directory {
        config = config.with_base_dir(base_dir);
    }
    debug!("Working in {}", config.base_dir().display());

    match &cli_args.command {
        Some(Command::Rules(command)) => command.run(&config).map(|()| true),
        None => cli_args.solve.run(config, cli_args.verbose),
    }
}
