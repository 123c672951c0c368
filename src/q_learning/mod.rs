//! Tabular temporal difference learning for Tic-Tac-Toe
//!
//! The agent keys its value table by canonical board state, so the up to 8
//! symmetric variants of a position share one set of estimates. Move
//! selection runs two tactical rules before falling back to ε-greedy play:
//!
//! | Order | Rule | Uses exploration rate |
//! |-------|------|-----------------------|
//! | 1 | Complete own line | no |
//! | 2 | Block opponent line | no |
//! | 3 | Random move with probability ε | yes |
//! | 4 | Best known value, random tie-break | yes |
//!
//! After a game, [`TdAgent::learn`] walks the episode backwards:
//!
//! ```text
//! V(s,a) ← V(s,a) + α [r + γ · bootstrap − V(s,a)]
//! ```
//!
//! where only the final move receives the terminal reward `r`.
//!
//! ## Usage Example
//!
//! ```
//! use ttt_learner::q_learning::{AgentConfig, TdAgent};
//! use ttt_learner::tictactoe::{Board, Player};
//!
//! let mut agent = TdAgent::new(AgentConfig::default())?.with_seed(42);
//! let mut board = Board::new();
//! board.place(4, Player::X)?;
//!
//! let action = agent.choose_action(&board).expect("board has empty cells");
//! board.place(action, Player::O)?;
//!
//! // ... play on; when the game is over:
//! agent.learn(-1.0, &board);
//! assert!(agent.trace().is_empty());
//! # Ok::<(), ttt_learner::Error>(())
//! ```

pub mod agent;
pub mod config;
pub mod serialization;
pub mod value_table;

pub use agent::{AgentStatus, Decision, LearnReport, SelectionRule, TdAgent, TraceEntry};
pub use config::{AgentConfig, Rewards};
pub use serialization::LoadReport;
pub use value_table::ValueTable;
