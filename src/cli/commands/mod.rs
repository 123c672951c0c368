//! Subcommands of the ttt-learner binary

pub mod play;
pub mod reset;
pub mod status;
pub mod suggest;
pub mod train;
