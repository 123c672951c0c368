//! Batch self-training against a scripted opponent

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::opponents::Opponent;
use crate::{
    Error, Result,
    ports::Observer,
    q_learning::{Rewards, TdAgent},
    tictactoe::{Board, GameOutcome, Player},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of training games
    pub num_games: usize,

    /// Seeds the agent; the opponent receives `seed + 1`
    pub seed: Option<u64>,

    /// Which player opens every game
    pub first_player: Player,

    /// Reward scheme applied from the agent's perspective
    pub rewards: Rewards,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            num_games: 1000,
            seed: None,
            first_player: Player::X,
            rewards: Rewards::default(),
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    pub total_games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
    /// Exploration rate after the last game
    pub final_exploration_rate: f64,
    /// Canonical states known after the last game
    pub table_size: usize,
}

impl TrainingResult {
    pub fn new(
        total_games: usize,
        wins: usize,
        draws: usize,
        losses: usize,
        final_exploration_rate: f64,
        table_size: usize,
    ) -> Self {
        let rate = |count: usize| {
            if total_games > 0 {
                count as f64 / total_games as f64
            } else {
                0.0
            }
        };

        Self {
            total_games,
            wins,
            draws,
            losses,
            win_rate: rate(wins),
            draw_rate: rate(draws),
            loss_rate: rate(losses),
            final_exploration_rate,
            table_size,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|source| Error::Io {
            operation: format!("create summary {}", path.display()),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}

/// Plays sequential episodes between the agent and an opponent.
///
/// The agent learns after every game; the table is not persisted here.
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run training with the given agent and opponent
    pub fn run(&mut self, agent: &mut TdAgent, opponent: &mut dyn Opponent) -> Result<TrainingResult> {
        self.config.rewards.validate()?;
        if let Some(seed) = self.config.seed {
            agent.set_rng_seed(seed);
            opponent.set_rng_seed(seed.wrapping_add(1));
        }

        let me = agent.player();
        let mut wins = 0;
        let mut draws = 0;
        let mut losses = 0;

        info!(
            games = self.config.num_games,
            opponent = opponent.name(),
            agent = %me,
            first = %self.config.first_player,
            "starting training"
        );

        for observer in &mut self.observers {
            observer.on_training_start(self.config.num_games)?;
        }

        for game_num in 0..self.config.num_games {
            let (outcome, final_board) = self.play_game(agent, opponent)?;

            let reward = self.config.rewards.for_outcome(outcome, me);
            let report = agent.learn(reward, &final_board);

            match outcome {
                GameOutcome::Win(winner) if winner == me => wins += 1,
                GameOutcome::Win(_) => losses += 1,
                GameOutcome::Draw => draws += 1,
            }
            debug!(game = game_num, %outcome, reward, "game finished");

            for observer in &mut self.observers {
                observer.on_game_end(game_num, outcome, &report)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let result = TrainingResult::new(
            self.config.num_games,
            wins,
            draws,
            losses,
            agent.exploration_rate(),
            agent.value_table().size(),
        );
        info!(
            wins = result.wins,
            draws = result.draws,
            losses = result.losses,
            exploration_rate = result.final_exploration_rate,
            table_size = result.table_size,
            "training complete"
        );
        Ok(result)
    }

    fn play_game(
        &self,
        agent: &mut TdAgent,
        opponent: &mut dyn Opponent,
    ) -> Result<(GameOutcome, Board)> {
        agent.reset_episode();
        let me = agent.player();
        let mut board = Board::new();
        let mut to_move = self.config.first_player;

        loop {
            if let Some(outcome) = board.outcome() {
                return Ok((outcome, board));
            }

            let position = if to_move == me {
                agent.choose_action(&board)
            } else {
                opponent.select_move(&board, to_move)
            }
            .ok_or(Error::NoValidMoves)?;

            board.place(position, to_move)?;
            to_move = to_move.opponent();
        }
    }
}
