mod cache;
mod cli;
mod commands;
mod desired;
mod display;
mod progress;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let result = match cli.command {
        Command::Diff(args) => commands::diff::run(&ctx, &cli.connection, args),
        Command::Apply(args) => commands::apply::run(&ctx, &cli.connection, args),
        Command::Schema(args) => commands::schema::run(&ctx, &cli.connection, args),
        Command::Validate { manifest } => commands::validate::run(&ctx, &manifest),
        Command::Config => commands::config::run(&ctx, &cli.connection),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "fauna-sync", &mut io::stdout());
            Ok(())
        }
    };

    if let Err(e) = &result {
        if ctx.verbose > 0 {
            log::debug!("{e:?}");
        }
        ui::error(&format!("{e:#}"));
        std::process::exit(1);
    }
    result
}
