//! CLI infrastructure for the ttt-learner binary
//!
//! Each subcommand lives in [`commands`] as a clap `Args` struct plus an
//! `execute` function. Options shared by every subcommand are in
//! [`GlobalArgs`].

pub mod commands;
pub mod output;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Args;
use tracing_subscriber::EnvFilter;

use crate::{
    adapters::JsonFileRepository,
    app::{AgentService, AppConfig, config::DEFAULT_TABLE_PATH},
    q_learning::AgentConfig,
    tictactoe::Player,
};

/// Options accepted before any subcommand
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Value table file
    #[arg(long, global = true, default_value = DEFAULT_TABLE_PATH)]
    pub table: PathBuf,

    /// JSON file with agent hyperparameters
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

impl Default for GlobalArgs {
    fn default() -> Self {
        Self {
            table: PathBuf::from(DEFAULT_TABLE_PATH),
            config: None,
            verbose: false,
        }
    }
}

impl GlobalArgs {
    /// Agent hyperparameters from `--config`, or the defaults.
    pub fn agent_config(&self) -> Result<AgentConfig> {
        match &self.config {
            Some(path) => AgentConfig::load(path)
                .with_context(|| format!("loading agent config from {}", path.display())),
            None => Ok(AgentConfig::default()),
        }
    }

    pub fn app_config(&self) -> Result<AppConfig> {
        Ok(AppConfig::default()
            .with_agent(self.agent_config()?)
            .with_table_path(&self.table))
    }

    /// Open the file-backed service for `--table`.
    pub fn open_service(&self, config: AppConfig) -> Result<AgentService<JsonFileRepository>> {
        AgentService::open(config, JsonFileRepository::new()).context("starting agent")
    }
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `info`, or `debug` with `verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed (tests); keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub(crate) fn parse_player_token(value: &str, flag: &str) -> Result<Player> {
    match value.trim().to_ascii_lowercase().as_str() {
        "x" | "first" | "p1" => Ok(Player::X),
        "o" | "second" | "p2" => Ok(Player::O),
        other => Err(anyhow!(
            "Invalid value '{other}' for {flag} (expected 'x' or 'o')"
        )),
    }
}
