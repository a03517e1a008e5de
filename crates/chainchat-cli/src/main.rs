//! ChainChat CLI
//!
//! Command-line host for the strategy engine

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "chainchat")]
#[command(about = "ChainChat - Strategy command execution engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse a command literal into its typed action
    Parse(commands::parse::ParseArgs),
    /// Replay a script of invocations against a fresh engine
    Replay(commands::replay::ReplayArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse(args) => commands::parse::execute(args),
        Commands::Replay(args) => commands::replay::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
