//! Configuration for the boundary service.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    q_learning::{AgentConfig, Rewards},
};

/// Default location of the persisted value table
pub const DEFAULT_TABLE_PATH: &str = "q_table.json";

/// Everything [`AgentService`](super::AgentService) needs to start.
///
/// # Examples
///
/// ```
/// use ttt_learner::app::AppConfig;
/// use ttt_learner::q_learning::AgentConfig;
///
/// let config = AppConfig::default()
///     .with_table_path("data/agent.json")
///     .with_agent(AgentConfig::default().with_learning_rate(0.2))
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub agent: AgentConfig,
    pub rewards: Rewards,
    pub table_path: PathBuf,
    /// Seed for the agent's RNG (None = entropy)
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            rewards: Rewards::default(),
            table_path: PathBuf::from(DEFAULT_TABLE_PATH),
            seed: None,
        }
    }
}

impl AppConfig {
    pub fn with_agent(mut self, agent: AgentConfig) -> Self {
        self.agent = agent;
        self
    }

    pub fn with_rewards(mut self, rewards: Rewards) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn with_table_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.table_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.agent.validate()?;
        self.rewards.validate()
    }
}
