//! Play command - human versus agent in the terminal

use std::io::{self, BufRead, Write};

use anyhow::{Result, bail};
use clap::Parser;

use crate::{
    app::AgentService,
    cli::{GlobalArgs, output::render_board},
    ports::ValueTableRepository,
    tictactoe::{Board, GameOutcome, Player},
};

#[derive(Parser, Debug)]
#[command(about = "Play against the agent; it learns after every game")]
pub struct PlayArgs {}

/// Games finished in one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub games: usize,
    pub human_wins: usize,
    pub agent_wins: usize,
    pub draws: usize,
}

pub fn execute(global: &GlobalArgs, _args: PlayArgs) -> Result<()> {
    let mut service = global.open_service(global.app_config()?)?;
    let stdin = io::stdin();
    let stats = run_session(&mut service, stdin.lock(), io::stdout())?;
    println!(
        "Played {} games: you won {}, the agent won {}, {} draws",
        stats.games, stats.human_wins, stats.agent_wins, stats.draws
    );
    Ok(())
}

/// Play games read from `input` until the human quits or input ends.
///
/// X always moves first. The table is saved after each finished game.
pub fn run_session<P, I, O>(
    service: &mut AgentService<P>,
    mut input: I,
    mut output: O,
) -> Result<SessionStats>
where
    P: ValueTableRepository,
    I: BufRead,
    O: Write,
{
    let agent = service.agent().player();
    let human = agent.opponent();
    let mut stats = SessionStats::default();

    writeln!(output, "You are {human}, the agent is {agent}. Enter 1-9 to move, q to quit.")?;

    loop {
        let mut board = Board::new();
        let mut to_move = Player::X;

        let outcome = loop {
            if let Some(outcome) = board.outcome() {
                break outcome;
            }

            if to_move == human {
                writeln!(output, "\n{}", render_board(&board))?;
                match read_human_move(&board, &mut input, &mut output)? {
                    Some(position) => board.place(position, human)?,
                    None => {
                        service.reset_episode();
                        return Ok(stats);
                    }
                }
            } else {
                let Some(position) = service.move_for(&board)? else {
                    bail!("agent returned no move on a live board");
                };
                writeln!(output, "Agent plays {}", position + 1)?;
                board.place(position, agent)?;
            }
            to_move = to_move.opponent();
        };

        writeln!(output, "\n{}", render_board(&board))?;
        stats.games += 1;
        match outcome {
            GameOutcome::Win(winner) if winner == human => {
                stats.human_wins += 1;
                writeln!(output, "You win!")?;
            }
            GameOutcome::Win(_) => {
                stats.agent_wins += 1;
                writeln!(output, "The agent wins.")?;
            }
            GameOutcome::Draw => {
                stats.draws += 1;
                writeln!(output, "Draw.")?;
            }
        }

        let report = service.record_outcome(&board, outcome);
        writeln!(
            output,
            "Agent learned from {} moves (exploration rate {:.3})",
            report.updates, report.exploration_rate
        )?;

        write!(output, "Play again? [y/N] ")?;
        output.flush()?;
        match read_line(&mut input)? {
            Some(answer) if answer.eq_ignore_ascii_case("y") => {}
            _ => return Ok(stats),
        }
    }
}

/// Prompt until a legal move is entered. `None` means quit.
fn read_human_move<I: BufRead, O: Write>(
    board: &Board,
    input: &mut I,
    output: &mut O,
) -> Result<Option<usize>> {
    loop {
        write!(output, "Your move: ")?;
        output.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        if line.eq_ignore_ascii_case("q") {
            return Ok(None);
        }

        match line.parse::<usize>() {
            Ok(n @ 1..=9) if board.is_empty(n - 1) => return Ok(Some(n - 1)),
            Ok(n @ 1..=9) => writeln!(output, "Cell {n} is taken.")?,
            _ => writeln!(output, "Enter a number from 1 to 9.")?,
        }
    }
}

fn read_line<I: BufRead>(input: &mut I) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
