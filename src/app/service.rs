//! Boundary service around a single learning agent.

use std::{io::ErrorKind, path::Path};

use rand::{Rng, rngs::StdRng};
use tracing::{error, info, warn};

use super::config::AppConfig;
use crate::{
    Error, Result,
    ports::ValueTableRepository,
    q_learning::{AgentStatus, LearnReport, TdAgent, ValueTable},
    tictactoe::{Board, GameOutcome},
};

/// One agent, its repository and where its table lives.
///
/// Every mutation takes `&mut self`; callers that share a service across
/// threads wrap it in a `Mutex`.
pub struct AgentService<P, R = StdRng> {
    agent: TdAgent<R>,
    repository: P,
    config: AppConfig,
}

impl<P: ValueTableRepository> AgentService<P, StdRng> {
    /// Build the agent and restore its table from `config.table_path`.
    ///
    /// A missing or unreadable table is not fatal: the agent starts empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for invalid hyperparameters or
    /// rewards.
    pub fn open(config: AppConfig, repository: P) -> Result<Self> {
        let mut agent = TdAgent::new(config.agent.clone())?;
        if let Some(seed) = config.seed {
            agent.set_rng_seed(seed);
        }
        Self::with_agent(config, repository, agent)
    }
}

impl<P: ValueTableRepository, R: Rng> AgentService<P, R> {
    /// Wrap an existing agent, replacing its table with the stored one.
    pub fn with_agent(config: AppConfig, repository: P, agent: TdAgent<R>) -> Result<Self> {
        config.validate()?;
        let table = restore_table(&repository, &config.table_path);
        Ok(Self {
            agent: agent.with_value_table(table),
            repository,
            config,
        })
    }

    pub fn agent(&self) -> &TdAgent<R> {
        &self.agent
    }

    /// Direct access for batch training; call [`AgentService::flush`] afterwards.
    pub fn agent_mut(&mut self) -> &mut TdAgent<R> {
        &mut self.agent
    }

    pub fn repository(&self) -> &P {
        &self.repository
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Choose the agent's move for a board given as nine cell tokens.
    ///
    /// Returns `Ok(None)` when the game on `tokens` is already over.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBoardLength`] or [`Error::InvalidCellToken`]
    /// for a malformed payload.
    pub fn request_move<S: AsRef<str>>(&mut self, tokens: &[Option<S>]) -> Result<Option<usize>> {
        let board = Board::from_tokens(tokens)?;
        self.move_for(&board)
    }

    /// Choose the agent's move for an already parsed board.
    pub fn move_for(&mut self, board: &Board) -> Result<Option<usize>> {
        if board.is_terminal() {
            info!("board is already decided; no move requested");
            return Ok(None);
        }
        let action = self.agent.choose_action(board);
        if action.is_none() {
            warn!("agent found no available action on a live board");
        }
        Ok(action)
    }

    /// Learn from a finished game and persist the updated table.
    ///
    /// `winner_token` is `"X"`, `"O"` or `"Draw"` (case-insensitive). An
    /// unrecognized token or malformed board discards the current episode.
    /// A failed save is logged and does not fail the call.
    pub fn report_result<S: AsRef<str>>(
        &mut self,
        tokens: &[Option<S>],
        winner_token: &str,
    ) -> Result<LearnReport> {
        let outcome: GameOutcome = match winner_token.parse() {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(token = winner_token, "unrecognized outcome; discarding episode");
                self.agent.reset_episode();
                return Err(err);
            }
        };
        let board = match Board::from_tokens(tokens) {
            Ok(board) => board,
            Err(err) => {
                warn!(error = %err, "malformed final board; discarding episode");
                self.agent.reset_episode();
                return Err(err);
            }
        };
        Ok(self.record_outcome(&board, outcome))
    }

    /// Learn from a finished game on an already parsed board, then persist.
    pub fn record_outcome(&mut self, board: &Board, outcome: GameOutcome) -> LearnReport {
        let reward = self.config.rewards.for_outcome(outcome, self.agent.player());
        let report = self.agent.learn(reward, board);

        info!(
            outcome = %outcome,
            reward,
            exploration_rate = report.exploration_rate,
            table_size = self.agent.value_table().size(),
            "recorded game result"
        );

        self.persist();
        report
    }

    /// Drop the moves of an abandoned game.
    pub fn reset_episode(&mut self) {
        self.agent.reset_episode();
    }

    /// Forget everything learned and persist the empty table.
    pub fn reset_learning(&mut self) {
        self.agent.reset_learning();
        self.persist();
    }

    pub fn status(&self) -> AgentStatus {
        self.agent.status()
    }

    /// Save the table now.
    ///
    /// # Errors
    ///
    /// Unlike the implicit saves after learning, a failure is returned.
    pub fn flush(&self) -> Result<()> {
        self.agent.save_to(&self.repository, &self.config.table_path)
    }

    fn persist(&self) {
        if let Err(err) = self.flush() {
            error!(
                path = %self.config.table_path.display(),
                error = %err,
                "failed to save value table; keeping in-memory table"
            );
        }
    }
}

fn restore_table<P: ValueTableRepository>(repository: &P, path: &Path) -> ValueTable {
    match repository.load(path) {
        Ok(table) => table,
        Err(Error::Io { ref source, .. }) if source.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "no saved value table; starting empty");
            ValueTable::new()
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "could not load value table; starting empty"
            );
            ValueTable::new()
        }
    }
}
