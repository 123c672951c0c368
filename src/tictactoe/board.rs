//! Board representation and payload validation

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{
    canonical::{CanonicalContext, CanonicalState},
    lines::{GameOutcome, winner_or_draw},
};
use crate::{Error, Result};

/// A cell on the Tic-Tac-Toe board
///
/// The declaration order defines the total order used for canonicalization:
/// `Empty < X < O`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' | '_' | '-' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }

    /// Token used in the durable value-table key (empty cell is the empty token)
    pub fn token(self) -> &'static str {
        match self {
            Cell::Empty => "",
            Cell::X => "X",
            Cell::O => "O",
        }
    }

    pub fn from_token(token: &str) -> Option<Cell> {
        match token.trim() {
            "" => Some(Cell::Empty),
            "X" | "x" => Some(Cell::X),
            "O" | "o" => Some(Cell::O),
            _ => None,
        }
    }

    pub fn to_player(self) -> Option<Player> {
        match self {
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
            Cell::Empty => None,
        }
    }
}

/// A player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().to_char())
    }
}

impl FromStr for Player {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "X" | "x" => Ok(Player::X),
            "O" | "o" => Ok(Player::O),
            other => Err(Error::InvalidConfiguration {
                message: format!("invalid player '{other}' (expected 'X' or 'O')"),
            }),
        }
    }
}

/// A 3x3 board in row-major order
///
/// Boards are transient values built per request or per episode; they carry
/// no notion of whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    pub cells: [Cell; 9],
}

impl Board {
    pub const SIZE: usize = 9;

    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Cell; 9]) -> Self {
        Board { cells }
    }

    /// Build a board from a caller payload of optional cell tokens.
    ///
    /// `None` and `""` are empty cells, `"X"`/`"O"` (any case) are marks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBoardLength`] unless exactly 9 tokens are given
    /// and [`Error::InvalidCellToken`] for any other token.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[Option<S>]) -> Result<Self> {
        if tokens.len() != Self::SIZE {
            return Err(Error::InvalidBoardLength {
                expected: Self::SIZE,
                got: tokens.len(),
                context: "board payload".to_string(),
            });
        }

        let mut cells = [Cell::Empty; 9];
        for (position, token) in tokens.iter().enumerate() {
            if let Some(token) = token {
                let token = token.as_ref();
                cells[position] =
                    Cell::from_token(token).ok_or_else(|| Error::InvalidCellToken {
                        token: token.to_string(),
                        position,
                    })?;
            }
        }

        Ok(Board { cells })
    }

    /// Payload form of the board, the inverse of [`Board::from_tokens`]
    pub fn to_tokens(&self) -> Vec<Option<&'static str>> {
        self.cells
            .iter()
            .map(|cell| match cell {
                Cell::Empty => None,
                other => Some(other.token()),
            })
            .collect()
    }

    /// Get cell at position (0-8)
    pub fn get(&self, pos: usize) -> Cell {
        self.cells[pos]
    }

    /// Check if a position is empty
    pub fn is_empty(&self, pos: usize) -> bool {
        self.cells[pos] == Cell::Empty
    }

    /// Indices of the empty cells in increasing order
    pub fn available_actions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Place a mark for `player`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMove`] if the position is off the board or taken.
    pub fn place(&mut self, pos: usize, player: Player) -> Result<()> {
        if pos >= Self::SIZE || !self.is_empty(pos) {
            return Err(Error::InvalidMove { position: pos });
        }
        self.cells[pos] = player.to_cell();
        Ok(())
    }

    /// Return a copy of the board with `player`'s mark at `pos`
    pub fn with_mark(&self, pos: usize, player: Player) -> Result<Board> {
        let mut next = *self;
        next.place(pos, player)?;
        Ok(next)
    }

    /// Winner, draw, or `None` while the game continues
    pub fn outcome(&self) -> Option<GameOutcome> {
        winner_or_draw(&self.cells)
    }

    /// Check if the game is over (win or draw)
    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Canonical representative of this board under the 8 symmetries
    pub fn canonical(&self) -> CanonicalState {
        super::canonical::canonicalize(self)
    }

    /// Canonical representative together with the transform that produced it
    pub fn canonical_context(&self) -> CanonicalContext {
        super::canonical::canonical_context(self)
    }
}

impl FromStr for Board {
    type Err = Error;

    /// Parse a compact board such as `"XO.\n.X.\n..O"`.
    ///
    /// Whitespace other than a bare space is ignored; a space counts as an
    /// empty cell only when the string is exactly 9 characters long.
    fn from_str(s: &str) -> Result<Self> {
        let chars: Vec<char> = if s.chars().count() == Self::SIZE {
            s.chars().collect()
        } else {
            s.chars().filter(|c| !c.is_whitespace()).collect()
        };

        if chars.len() != Self::SIZE {
            return Err(Error::InvalidBoardLength {
                expected: Self::SIZE,
                got: chars.len(),
                context: s.to_string(),
            });
        }

        let mut cells = [Cell::Empty; 9];
        for (position, &c) in chars.iter().enumerate() {
            cells[position] = Cell::from_char(c).ok_or_else(|| Error::InvalidCellToken {
                token: c.to_string(),
                position,
            })?;
        }

        Ok(Board { cells })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if (i + 1).is_multiple_of(3) && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
