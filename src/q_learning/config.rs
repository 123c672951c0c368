//! Hyperparameters and reward scheme for the learning agent

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    tictactoe::{GameOutcome, Player},
};

/// Configuration for a [`TdAgent`](super::TdAgent).
///
/// # Examples
///
/// ```
/// use ttt_learner::q_learning::AgentConfig;
/// use ttt_learner::tictactoe::Player;
///
/// let config = AgentConfig::default()
///     .with_learning_rate(0.2)
///     .with_exploration(0.5, 0.99, 0.01)
///     .with_agent_player(Player::X);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Step size α, in (0, 1]
    pub learning_rate: f64,
    /// Discount γ, in [0, 1]
    pub discount: f64,
    /// Exploration rate at construction and after a full reset
    pub initial_exploration: f64,
    /// Multiplicative decay applied after every learning call
    pub exploration_decay: f64,
    /// Floor for the exploration rate
    pub min_exploration: f64,
    /// Which mark the agent plays
    pub agent_player: Player,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount: 0.9,
            initial_exploration: 0.9,
            exploration_decay: 0.995,
            min_exploration: 0.05,
            agent_player: Player::O,
        }
    }
}

impl AgentConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    /// Set the initial rate, decay factor and floor together.
    pub fn with_exploration(mut self, initial: f64, decay: f64, min: f64) -> Self {
        self.initial_exploration = initial;
        self.exploration_decay = decay;
        self.min_exploration = min;
        self
    }

    pub fn with_agent_player(mut self, player: Player) -> Self {
        self.agent_player = player;
        self
    }

    /// Check every parameter range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first bad parameter.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfiguration { message });

        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return invalid(format!(
                "learning_rate {} must be in (0, 1]",
                self.learning_rate
            ));
        }
        if !(0.0..=1.0).contains(&self.discount) {
            return invalid(format!("discount {} must be in [0, 1]", self.discount));
        }
        if !(0.0..=1.0).contains(&self.min_exploration) {
            return invalid(format!(
                "min_exploration {} must be in [0, 1]",
                self.min_exploration
            ));
        }
        if !(self.min_exploration..=1.0).contains(&self.initial_exploration) {
            return invalid(format!(
                "initial_exploration {} must be in [min_exploration, 1]",
                self.initial_exploration
            ));
        }
        if !(self.exploration_decay > 0.0 && self.exploration_decay <= 1.0) {
            return invalid(format!(
                "exploration_decay {} must be in (0, 1]",
                self.exploration_decay
            ));
        }
        Ok(())
    }

    /// Read and validate a JSON config file. Missing fields take defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read agent config {}", path.display()),
            source,
        })?;
        let config: AgentConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }
}

/// Terminal rewards from the agent's perspective
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rewards {
    pub win: f64,
    pub draw: f64,
    pub loss: f64,
}

impl Default for Rewards {
    fn default() -> Self {
        Self {
            win: 1.0,
            draw: 0.5,
            loss: -1.0,
        }
    }
}

impl Rewards {
    /// Reward for `outcome` as seen by the player `agent`
    pub fn for_outcome(&self, outcome: GameOutcome, agent: Player) -> f64 {
        match outcome {
            GameOutcome::Win(winner) if winner == agent => self.win,
            GameOutcome::Win(_) => self.loss,
            GameOutcome::Draw => self.draw,
        }
    }

    /// Rewards must be finite and ordered win > draw > loss.
    pub fn validate(&self) -> Result<()> {
        let finite = self.win.is_finite() && self.draw.is_finite() && self.loss.is_finite();
        if finite && self.win > self.draw && self.draw > self.loss {
            Ok(())
        } else {
            Err(Error::InvalidConfiguration {
                message: format!(
                    "rewards must be finite with win > draw > loss (got {} / {} / {})",
                    self.win, self.draw, self.loss
                ),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(AgentConfig::default().validate().is_ok());
        assert!(Rewards::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(AgentConfig::default().with_learning_rate(0.0).validate().is_err());
        assert!(AgentConfig::default().with_learning_rate(1.5).validate().is_err());
        assert!(AgentConfig::default().with_discount(-0.1).validate().is_err());
        assert!(
            AgentConfig::default()
                .with_exploration(0.01, 0.99, 0.05)
                .validate()
                .is_err()
        );
        assert!(
            AgentConfig::default()
                .with_exploration(0.5, 0.0, 0.05)
                .validate()
                .is_err()
        );
        assert!(AgentConfig::default().with_learning_rate(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AgentConfig =
            serde_json::from_str(r#"{ "learning_rate": 0.3, "agent_player": "X" }"#).unwrap();
        assert_eq!(config.learning_rate, 0.3);
        assert_eq!(config.agent_player, Player::X);
        assert_eq!(config.discount, 0.9);
    }

    #[test]
    fn test_rewards_for_outcome() {
        let rewards = Rewards::default();
        assert_eq!(rewards.for_outcome(GameOutcome::Win(Player::O), Player::O), 1.0);
        assert_eq!(rewards.for_outcome(GameOutcome::Win(Player::X), Player::O), -1.0);
        assert_eq!(rewards.for_outcome(GameOutcome::Draw, Player::O), 0.5);
    }

    #[test]
    fn test_rewards_must_be_ordered() {
        let flat = Rewards {
            win: 0.0,
            draw: 0.0,
            loss: 0.0,
        };
        assert!(flat.validate().is_err());
    }
}
