//! ttt-learner CLI - a tic-tac-toe agent that learns from its games
//!
//! - Train against scripted opponents
//! - Play against it in the terminal
//! - Ask it for a move on any board
//! - Inspect or erase what it has learned

use anyhow::Result;
use clap::{Parser, Subcommand};
use ttt_learner::cli::{self, GlobalArgs, commands};

#[derive(Parser)]
#[command(name = "ttt-learner")]
#[command(version, about = "Self-learning tic-tac-toe agent", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the agent against a scripted opponent
    Train(commands::train::TrainArgs),

    /// Play against the agent
    Play(commands::play::PlayArgs),

    /// Print the agent's move for a board
    Suggest(commands::suggest::SuggestArgs),

    /// Show what the agent has learned
    Status(commands::status::StatusArgs),

    /// Erase the learned value table
    Reset(commands::reset::ResetArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.global.verbose);

    match cli.command {
        Commands::Train(args) => commands::train::execute(&cli.global, args),
        Commands::Play(args) => commands::play::execute(&cli.global, args),
        Commands::Suggest(args) => commands::suggest::execute(&cli.global, args),
        Commands::Status(args) => commands::status::execute(&cli.global, args),
        Commands::Reset(args) => commands::reset::execute(&cli.global, args),
    }
}
