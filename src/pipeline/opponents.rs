//! Scripted opponents the agent trains against

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::tictactoe::{Board, Player, first_winning_move};

/// A non-learning player driven by the training pipeline
pub trait Opponent: Send {
    /// Pick a move for `player` on `board`, or `None` if no cell is empty.
    fn select_move(&mut self, board: &Board, player: Player) -> Option<usize>;

    fn name(&self) -> &str;

    /// Reseed any internal randomness.
    fn set_rng_seed(&mut self, _seed: u64) {}
}

/// Uniform random play among the empty cells
pub struct RandomOpponent {
    rng: StdRng,
}

impl RandomOpponent {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomOpponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Opponent for RandomOpponent {
    fn select_move(&mut self, board: &Board, _player: Player) -> Option<usize> {
        board.available_actions().choose(&mut self.rng).copied()
    }

    fn name(&self) -> &str {
        "random"
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

/// Completes its own line, else blocks, else plays randomly
pub struct TacticalOpponent {
    rng: StdRng,
}

impl TacticalOpponent {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for TacticalOpponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Opponent for TacticalOpponent {
    fn select_move(&mut self, board: &Board, player: Player) -> Option<usize> {
        first_winning_move(&board.cells, player)
            .or_else(|| first_winning_move(&board.cells, player.opponent()))
            .or_else(|| board.available_actions().choose(&mut self.rng).copied())
    }

    fn name(&self) -> &str {
        "tactical"
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_random_opponent_picks_empty_cell() {
        let mut opponent = RandomOpponent::with_seed(9);
        let b = board("XOXOXO...");
        for _ in 0..20 {
            let pos = opponent.select_move(&b, Player::X).unwrap();
            assert!(b.is_empty(pos));
        }
        assert_eq!(opponent.select_move(&board("XOXXOOOXX"), Player::X), None);
    }

    #[test]
    fn test_random_opponent_is_reproducible() {
        let mut a = RandomOpponent::with_seed(4);
        let mut b = RandomOpponent::with_seed(4);
        let empty = Board::new();
        let seq_a: Vec<_> = (0..10).map(|_| a.select_move(&empty, Player::X)).collect();
        let seq_b: Vec<_> = (0..10).map(|_| b.select_move(&empty, Player::X)).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_tactical_opponent_prefers_win_over_block() {
        let mut opponent = TacticalOpponent::with_seed(1);
        // X X .
        // O O .
        // . . .
        assert_eq!(opponent.select_move(&board("XX.OO...."), Player::O), Some(5));
    }

    #[test]
    fn test_tactical_opponent_blocks() {
        let mut opponent = TacticalOpponent::with_seed(1);
        assert_eq!(opponent.select_move(&board("OO..X...."), Player::X), Some(2));
    }
}
