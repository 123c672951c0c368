//! Winning line analysis for Tic-Tac-Toe

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{Cell, Player};
use crate::{Error, Result};

/// Winning line indices on the 3x3 board
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Outcome of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

impl GameOutcome {
    /// Swap the winner perspective (X <-> O)
    pub fn swap_players(self) -> Self {
        match self {
            GameOutcome::Win(player) => GameOutcome::Win(player.opponent()),
            GameOutcome::Draw => GameOutcome::Draw,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            GameOutcome::Win(Player::X) => "X",
            GameOutcome::Win(Player::O) => "O",
            GameOutcome::Draw => "Draw",
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for GameOutcome {
    type Err = Error;

    /// Parse the winner token reported by a game front end.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(GameOutcome::Win(Player::X)),
            "o" => Ok(GameOutcome::Win(Player::O)),
            "draw" => Ok(GameOutcome::Draw),
            _ => Err(Error::UnrecognizedOutcome {
                token: s.to_string(),
            }),
        }
    }
}

/// Check the 8 lines, then fall back to draw on a full board.
///
/// Returns `None` while the game is still in progress.
pub fn winner_or_draw(cells: &[Cell; 9]) -> Option<GameOutcome> {
    for [a, b, c] in WINNING_LINES {
        if cells[a] != Cell::Empty && cells[a] == cells[b] && cells[a] == cells[c] {
            return cells[a].to_player().map(GameOutcome::Win);
        }
    }

    if cells.iter().all(|&cell| cell != Cell::Empty) {
        Some(GameOutcome::Draw)
    } else {
        None
    }
}

/// First empty cell (in increasing index order) where `player` would win at once
pub fn first_winning_move(cells: &[Cell; 9], player: Player) -> Option<usize> {
    (0..cells.len()).find(|&pos| {
        if cells[pos] != Cell::Empty {
            return false;
        }
        let mut simulated = *cells;
        simulated[pos] = player.to_cell();
        winner_or_draw(&simulated) == Some(GameOutcome::Win(player))
    })
}
