//! Observer port for monitoring training runs

use crate::{Result, q_learning::LearnReport, tictactoe::GameOutcome};

/// Observer trait for monitoring training
///
/// Observers are composed by the training pipeline; each receives the same
/// event sequence:
///
/// 1. `on_training_start(total_games)` once
/// 2. `on_game_end(game_num, outcome, report)` after every game
/// 3. `on_training_end()` once
///
/// `outcome` is absolute (which mark won), not relative to the agent.
///
/// # Examples
///
/// ```
/// use ttt_learner::ports::Observer;
/// use ttt_learner::q_learning::LearnReport;
/// use ttt_learner::tictactoe::GameOutcome;
///
/// struct DrawCounter {
///     draws: usize,
/// }
///
/// impl Observer for DrawCounter {
///     fn on_game_end(
///         &mut self,
///         _game_num: usize,
///         outcome: GameOutcome,
///         _report: &LearnReport,
///     ) -> ttt_learner::Result<()> {
///         if outcome == GameOutcome::Draw {
///             self.draws += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called once before the first game.
    fn on_training_start(&mut self, _total_games: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each game has been played and learned from.
    fn on_game_end(
        &mut self,
        _game_num: usize,
        _outcome: GameOutcome,
        _report: &LearnReport,
    ) -> Result<()> {
        Ok(())
    }

    /// Called once after the last game.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
