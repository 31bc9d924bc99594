//! envbak CLI - Command-line utility for backing up `.env` files into dated
//! ZIP archives.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);
    let show_progress = !cli.quiet && !cli.json;

    let result = match &cli.command {
        cli::Commands::Backup(args) => commands::backup::execute(args, &*formatter, show_progress),
        cli::Commands::Mirror(args) => commands::mirror::execute(args, &*formatter, show_progress),
        cli::Commands::Archive(args) => {
            commands::archive::execute(args, &*formatter, show_progress)
        }
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    };

    if let Err(err) = &result {
        formatter.format_error(cli.command.name(), err);
    }
    result
}
