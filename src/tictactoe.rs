//! Tic-Tac-Toe board model, line geometry and symmetry canonicalization

pub mod board;
pub mod canonical;
pub mod lines;
pub mod symmetry;

pub use board::{Board, Cell, Player};
pub use canonical::{CanonicalContext, CanonicalState, canonical_context, canonicalize};
pub use lines::{GameOutcome, WINNING_LINES, first_winning_move, winner_or_draw};
pub use symmetry::{D4Transform, reflect_horizontal, rotate_clockwise};
