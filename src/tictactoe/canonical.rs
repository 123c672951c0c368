//! Canonical board representatives under D4 symmetry
//!
//! Every board has up to 8 symmetric images. The canonical representative is
//! the lexicographically smallest image, comparing cell by cell with
//! `Empty < X < O`. Boards that are symmetric images of one another therefore
//! share one canonical state, which is what the value table is keyed by.

use std::fmt;

use super::{
    board::{Board, Cell},
    symmetry::D4Transform,
};
use crate::{Error, Result};

/// Separator between cell tokens in the string key
const KEY_SEPARATOR: &str = ",";

/// The canonical representative of a board's symmetry class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalState([Cell; 9]);

impl CanonicalState {
    /// Canonical state of the empty opening position
    pub fn empty() -> Self {
        CanonicalState([Cell::Empty; 9])
    }

    pub fn cells(&self) -> &[Cell; 9] {
        &self.0
    }

    pub fn board(&self) -> Board {
        Board::from_cells(self.0)
    }

    /// Empty cells in the canonical frame
    pub fn available_actions(&self) -> Vec<usize> {
        self.board().available_actions()
    }

    /// String key: the 9 cell tokens joined by commas, empty cells as empty tokens
    pub fn key(&self) -> String {
        let tokens: Vec<&str> = self.0.iter().map(|cell| cell.token()).collect();
        tokens.join(KEY_SEPARATOR)
    }

    /// Parse a key and accept it only if it is already canonical.
    ///
    /// Returns `Ok(None)` for a well-formed key whose board is not its own
    /// canonical representative.
    pub fn from_key(key: &str) -> Result<Option<Self>> {
        let board = parse_key(key)?;
        let canonical = canonicalize(&board);
        if canonical.0 == board.cells {
            Ok(Some(canonical))
        } else {
            Ok(None)
        }
    }
}

impl fmt::Display for CanonicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Parse a comma-joined key back into a board without checking canonicality.
pub fn parse_key(key: &str) -> Result<Board> {
    let tokens: Vec<&str> = key.split(KEY_SEPARATOR).collect();
    if tokens.len() != Board::SIZE {
        return Err(Error::InvalidBoardLength {
            expected: Board::SIZE,
            got: tokens.len(),
            context: key.to_string(),
        });
    }

    let mut cells = [Cell::Empty; 9];
    for (position, token) in tokens.into_iter().enumerate() {
        cells[position] = Cell::from_token(token).ok_or_else(|| Error::InvalidCellToken {
            token: token.to_string(),
            position,
        })?;
    }
    Ok(Board::from_cells(cells))
}

/// Cached result of canonicalization
///
/// Keeps the transform that maps the original board onto its canonical
/// state, so moves can be mapped between the two frames.
#[derive(Debug, Clone, Copy)]
pub struct CanonicalContext {
    pub state: CanonicalState,
    pub transform: D4Transform,
}

impl CanonicalContext {
    /// Map a move from original coordinates to canonical coordinates
    pub fn map_move_to_canonical(&self, original_move: usize) -> usize {
        self.transform.transform_position(original_move)
    }

    /// Map a move from canonical coordinates back to original coordinates
    pub fn map_canonical_to_original(&self, canonical_move: usize) -> usize {
        self.transform.inverse().transform_position(canonical_move)
    }
}

/// Find the minimal image of `board` and the transform producing it.
///
/// On ties the first transform in [`D4Transform::all`] order wins, so the
/// identity is used whenever the board is already canonical.
pub fn canonical_context(board: &Board) -> CanonicalContext {
    let transforms = D4Transform::all();
    let mut best = CanonicalContext {
        state: CanonicalState(board.cells),
        transform: transforms[0],
    };

    for transform in transforms.into_iter().skip(1) {
        let image = transform.apply_to_cells(&board.cells);
        if image < best.state.0 {
            best = CanonicalContext {
                state: CanonicalState(image),
                transform,
            };
        }
    }

    best
}

/// Canonical representative of `board`
pub fn canonicalize(board: &Board) -> CanonicalState {
    canonical_context(board).state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::symmetry::{reflect_horizontal, rotate_clockwise};

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_corner_openings_share_state() {
        let expected = canonicalize(&board("X........"));
        for corner in ["..X......", "......X..", "........X"] {
            assert_eq!(canonicalize(&board(corner)), expected);
        }
        // the smallest image puts the mark as late as possible
        assert_eq!(expected.cells()[8], Cell::X);
    }

    #[test]
    fn test_edge_and_corner_differ() {
        assert_ne!(
            canonicalize(&board("X........")),
            canonicalize(&board(".X......."))
        );
    }

    #[test]
    fn test_primitive_images_share_state() {
        let original = board("XO..X...O");
        let expected = canonicalize(&original);
        let rotated = Board::from_cells(rotate_clockwise(&original.cells));
        let mirrored = Board::from_cells(reflect_horizontal(&original.cells));
        assert_eq!(canonicalize(&rotated), expected);
        assert_eq!(canonicalize(&mirrored), expected);
    }

    #[test]
    fn test_idempotent() {
        let state = canonicalize(&board("OX..X...."));
        assert_eq!(canonicalize(&state.board()), state);
    }

    #[test]
    fn test_context_maps_moves() {
        let original = board("X........");
        let ctx = canonical_context(&original);
        let canonical_move = ctx.map_move_to_canonical(0);
        assert_eq!(ctx.state.cells()[canonical_move], Cell::X);
        assert_eq!(ctx.map_canonical_to_original(canonical_move), 0);
    }

    #[test]
    fn test_empty_board_uses_identity() {
        let ctx = canonical_context(&Board::new());
        assert_eq!(ctx.transform, D4Transform::identity());
        assert_eq!(ctx.state, CanonicalState::empty());
    }

    #[test]
    fn test_key_roundtrip() {
        let state = canonicalize(&board("X...O...."));
        let key = state.key();
        assert_eq!(key.split(',').count(), 9);
        assert_eq!(CanonicalState::from_key(&key).unwrap(), Some(state));
    }

    #[test]
    fn test_empty_key() {
        assert_eq!(CanonicalState::empty().key(), ",,,,,,,,");
        assert_eq!(
            CanonicalState::from_key(",,,,,,,,").unwrap(),
            Some(CanonicalState::empty())
        );
    }

    #[test]
    fn test_non_canonical_key_is_rejected() {
        assert_eq!(CanonicalState::from_key("X,,,,,,,,").unwrap(), None);
    }

    #[test]
    fn test_malformed_keys() {
        assert!(matches!(
            CanonicalState::from_key("X,,"),
            Err(Error::InvalidBoardLength { got: 3, .. })
        ));
        assert!(matches!(
            CanonicalState::from_key("Q,,,,,,,,"),
            Err(Error::InvalidCellToken { position: 0, .. })
        ));
    }
}
