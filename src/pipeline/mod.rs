//! Batch training pipeline
//!
//! Plays many sequential games between a [`TdAgent`](crate::q_learning::TdAgent)
//! and a scripted [`Opponent`], learning after each game and notifying any
//! attached [`Observer`]s.

pub mod observers;
pub mod opponents;
pub mod training;

pub use observers::{MetricsObserver, MetricsSummary, ProgressObserver};
pub use opponents::{Opponent, RandomOpponent, TacticalOpponent};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;
