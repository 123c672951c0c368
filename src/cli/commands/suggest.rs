//! Suggest command - print the agent's move for a given board

use anyhow::{Context, Result, bail};
use clap::Parser;

use crate::{
    cli::{GlobalArgs, output::render_board},
    tictactoe::Board,
};

#[derive(Parser, Debug)]
#[command(about = "Print the agent's move for a board")]
pub struct SuggestArgs {
    /// Board as nine cells, row by row: `X`, `O` and `.` for empty
    /// (e.g. `X...O....`)
    pub board: String,

    /// Keep the configured exploration instead of playing greedily
    #[arg(long)]
    pub explore: bool,
}

pub fn execute(global: &GlobalArgs, args: SuggestArgs) -> Result<()> {
    let board: Board = args
        .board
        .parse()
        .with_context(|| format!("parsing board '{}'", args.board))?;

    let mut config = global.app_config()?;
    if !args.explore {
        config.agent = config.agent.with_exploration(0.0, 1.0, 0.0);
    }
    let mut service = global.open_service(config)?;

    println!("{}\n", render_board(&board));
    if let Some(outcome) = board.outcome() {
        bail!("game is already over ({outcome})");
    }

    let action = service.move_for(&board)?;
    // A suggestion is not part of a game; drop the recorded move.
    service.reset_episode();

    match action {
        Some(action) => {
            println!("Suggested move: {} (index {action})", action + 1);
            Ok(())
        }
        None => bail!("no available move"),
    }
}
