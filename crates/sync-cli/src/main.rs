//! folder-sync CLI
//!
//! The command-line interface for the unattended git-folder synchronizer.

mod cli;
mod commands;
mod error;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run { root }) => commands::run_sync(root.as_deref()),
        Some(Commands::Status { root }) => commands::run_status(root.as_deref()),
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "foldsync",
                &mut std::io::stdout(),
            );
            Ok(())
        }
        None => {
            // No command provided - show help hint
            println!("{} folder-sync CLI", "foldsync".green().bold());
            println!();
            println!("Run {} for available commands.", "foldsync --help".cyan());
            Ok(())
        }
    }
}
