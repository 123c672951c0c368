//! Self-learning Tic-Tac-Toe agent
//!
//! This crate provides:
//! - Board representation, win/draw detection and the 8 board symmetries
//! - Canonical state keys so symmetric positions share what is learned
//! - A temporal difference agent with tactical win/block rules and
//!   ε-greedy move selection
//! - JSON persistence of the learned value table
//! - A boundary service, a batch training pipeline and a CLI
//!
//! ## Quick start
//!
//! ```
//! use ttt_learner::pipeline::{RandomOpponent, TrainingConfig, TrainingPipeline};
//! use ttt_learner::q_learning::{AgentConfig, TdAgent};
//!
//! let mut agent = TdAgent::new(AgentConfig::default())?;
//! let mut pipeline = TrainingPipeline::new(TrainingConfig {
//!     num_games: 100,
//!     seed: Some(1),
//!     ..TrainingConfig::default()
//! });
//! let result = pipeline.run(&mut agent, &mut RandomOpponent::new())?;
//! assert_eq!(result.wins + result.draws + result.losses, 100);
//! # Ok::<(), ttt_learner::Error>(())
//! ```

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod tictactoe;

pub use error::{Error, Result};
