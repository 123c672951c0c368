//! Observer implementations for training runs

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::Observer,
    q_learning::LearnReport,
    tictactoe::{GameOutcome, Player},
};

/// Progress bar observer with running win/draw/loss counts
pub struct ProgressObserver {
    agent_player: Player,
    progress_bar: Option<ProgressBar>,
    wins: usize,
    draws: usize,
    losses: usize,
}

impl ProgressObserver {
    /// Count results from the perspective of `agent_player`.
    pub fn new(agent_player: Player) -> Self {
        Self {
            agent_player,
            progress_bar: None,
            wins: 0,
            draws: 0,
            losses: 0,
        }
    }

    fn message(&self) -> String {
        format!("{} D:{} L:{}", self.wins, self.draws, self.losses)
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_games: usize) -> Result<()> {
        let pb = ProgressBar::new(total_games as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games (W:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_game_end(
        &mut self,
        game_num: usize,
        outcome: GameOutcome,
        _report: &LearnReport,
    ) -> Result<()> {
        match outcome {
            GameOutcome::Win(winner) if winner == self.agent_player => self.wins += 1,
            GameOutcome::Win(_) => self.losses += 1,
            GameOutcome::Draw => self.draws += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(game_num as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Records every outcome and the average value change of every game.
#[derive(Debug, Clone)]
pub struct MetricsObserver {
    agent_player: Player,
    outcomes: Vec<GameOutcome>,
    average_changes: Vec<f64>,
    agent_moves: Vec<usize>,
}

impl MetricsObserver {
    pub fn new(agent_player: Player) -> Self {
        Self {
            agent_player,
            outcomes: Vec::new(),
            average_changes: Vec::new(),
            agent_moves: Vec::new(),
        }
    }

    pub fn outcomes(&self) -> &[GameOutcome] {
        &self.outcomes
    }

    /// Mean absolute value change per game, in game order
    pub fn average_changes(&self) -> &[f64] {
        &self.average_changes
    }

    pub fn total_games(&self) -> usize {
        self.outcomes.len()
    }

    pub fn summary(&self) -> MetricsSummary {
        let mut wins = 0;
        let mut draws = 0;
        let mut losses = 0;
        for outcome in &self.outcomes {
            match outcome {
                GameOutcome::Win(winner) if *winner == self.agent_player => wins += 1,
                GameOutcome::Win(_) => losses += 1,
                GameOutcome::Draw => draws += 1,
            }
        }

        MetricsSummary {
            total_games: self.total_games(),
            wins,
            draws,
            losses,
            mean_value_change: mean(self.average_changes.iter().copied()),
            avg_agent_moves: mean(self.agent_moves.iter().map(|&m| m as f64)),
        }
    }
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let len = values.len();
    if len == 0 {
        0.0
    } else {
        values.sum::<f64>() / len as f64
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    /// Mean over games of each game's average absolute value change
    pub mean_value_change: f64,
    /// Mean number of agent moves per game
    pub avg_agent_moves: f64,
}

impl Observer for MetricsObserver {
    fn on_game_end(
        &mut self,
        _game_num: usize,
        outcome: GameOutcome,
        report: &LearnReport,
    ) -> Result<()> {
        self.outcomes.push(outcome);
        self.average_changes.push(report.average_change);
        self.agent_moves.push(report.updates);
        Ok(())
    }
}
