//! Application layer: wiring the agent to persistence.
//!
//! [`AgentService`] is the boundary the outside world talks to. It validates
//! board payloads and outcome tokens, maps outcomes to rewards, and writes the
//! value table back through a [`ValueTableRepository`](crate::ports::ValueTableRepository)
//! after every learning call.
//!
//! ```text
//!   caller ──tokens──▶ AgentService ──Board──▶ TdAgent
//!                          │                     │
//!                          └── save/load ──▶ repository (JSON file, memory)
//! ```
//!
//! # Usage
//!
//! ```
//! use ttt_learner::adapters::InMemoryRepository;
//! use ttt_learner::app::{AgentService, AppConfig};
//!
//! let config = AppConfig::default().with_seed(42);
//! let mut service = AgentService::open(config, InMemoryRepository::new())?;
//!
//! let board: Vec<Option<&str>> = vec![Some("X"), None, None, None, None, None, None, None, None];
//! let action = service.request_move(&board)?;
//! assert!(action.is_some_and(|a| a > 0 && a < 9));
//! # Ok::<(), ttt_learner::Error>(())
//! ```

pub mod config;
pub mod service;

pub use config::AppConfig;
pub use service::AgentService;
