//! Temporal difference learning agent
//!
//! The agent plays one mark, records a trace of (canonical state, action)
//! pairs while a game is in progress and, once the game is over, walks that
//! trace backwards propagating the terminal reward through the value table.

use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{config::AgentConfig, value_table::ValueTable};
use crate::{
    Result,
    ports::ValueTableRepository,
    tictactoe::{Board, CanonicalState, Player, canonicalize, first_winning_move},
};

/// One recorded move: canonical state and the action in its canonical frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEntry {
    pub state: CanonicalState,
    pub action: usize,
}

/// Which rule produced a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionRule {
    /// Completes a line for the agent
    ImmediateWin,
    /// Stops the opponent completing a line
    Block,
    /// Uniform random pick with probability equal to the exploration rate
    Explore,
    /// Random pick among the highest-valued actions
    Exploit,
    /// Random pick because every looked-up value was exactly zero
    Unexplored,
}

/// A selected move in the caller's board coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: usize,
    pub rule: SelectionRule,
}

/// Summary of one learning call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearnReport {
    /// Number of value updates counted toward the average
    pub updates: usize,
    /// Mean absolute change over the counted updates
    pub average_change: f64,
    /// Exploration rate after decay
    pub exploration_rate: f64,
}

/// Observability snapshot of the agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub exploration_rate: f64,
    /// Number of known canonical states
    pub table_size: usize,
    /// Best known value of the empty opening position
    pub opening_value: f64,
    pub last_average_change: f64,
    /// Moves recorded in the current, not yet learned, episode
    pub pending_moves: usize,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Tabular TD learner with tactical win/block rules
///
/// The random source is a type parameter so tests can substitute a
/// deterministic one; [`TdAgent::new`] and [`TdAgent::with_seed`] use
/// [`StdRng`].
#[derive(Debug, Clone)]
pub struct TdAgent<R = StdRng> {
    config: AgentConfig,
    table: ValueTable,
    exploration_rate: f64,
    trace: Vec<TraceEntry>,
    last_average_change: f64,
    rng: R,
}

impl TdAgent<StdRng> {
    /// Create an agent with an empty table and an entropy-seeded RNG.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if the config is invalid.
    pub fn new(config: AgentConfig) -> Result<Self> {
        Self::with_rng(config, build_rng(None))
    }

    /// Replace the RNG with one seeded from `seed`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.set_rng_seed(seed);
        self
    }

    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = build_rng(Some(seed));
    }
}

impl<R: Rng> TdAgent<R> {
    /// Create an agent that draws all randomness from `rng`.
    pub fn with_rng(config: AgentConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            exploration_rate: config.initial_exploration,
            config,
            table: ValueTable::new(),
            trace: Vec::new(),
            last_average_change: 0.0,
            rng,
        })
    }

    /// Start from an existing value table.
    pub fn with_value_table(mut self, table: ValueTable) -> Self {
        self.table = table;
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn player(&self) -> Player {
        self.config.agent_player
    }

    pub fn value_table(&self) -> &ValueTable {
        &self.table
    }

    pub fn exploration_rate(&self) -> f64 {
        self.exploration_rate
    }

    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    pub fn last_average_change(&self) -> f64 {
        self.last_average_change
    }

    /// Pick a move for `board`, or `None` if no cell is empty.
    pub fn choose_action(&mut self, board: &Board) -> Option<usize> {
        self.select(board).map(|decision| decision.action)
    }

    /// Pick a move and report which rule chose it.
    ///
    /// Tactical rules run first and ignore the exploration rate. Every
    /// decision is appended to the episode trace under the canonical state of
    /// `board`.
    pub fn select(&mut self, board: &Board) -> Option<Decision> {
        let available = board.available_actions();
        if available.is_empty() {
            debug!("no available action; returning none");
            return None;
        }

        let me = self.config.agent_player;
        let ctx = board.canonical_context();

        let (action, rule) = if let Some(action) = first_winning_move(&board.cells, me) {
            (action, SelectionRule::ImmediateWin)
        } else if let Some(action) = first_winning_move(&board.cells, me.opponent()) {
            (action, SelectionRule::Block)
        } else if self.rng.random::<f64>() < self.exploration_rate {
            (*available.choose(&mut self.rng)?, SelectionRule::Explore)
        } else {
            let scored: Vec<(usize, f64)> = available
                .iter()
                .map(|&action| {
                    let value = self.table.get(&ctx.state, ctx.map_move_to_canonical(action));
                    (action, value)
                })
                .collect();

            if scored.iter().all(|&(_, value)| value == 0.0) {
                (*available.choose(&mut self.rng)?, SelectionRule::Unexplored)
            } else {
                let best = scored
                    .iter()
                    .map(|&(_, value)| value)
                    .fold(f64::NEG_INFINITY, f64::max);
                let candidates: Vec<usize> = scored
                    .iter()
                    .filter(|&&(_, value)| value == best)
                    .map(|&(action, _)| action)
                    .collect();
                (*candidates.choose(&mut self.rng)?, SelectionRule::Exploit)
            }
        };

        debug!(
            action,
            ?rule,
            exploration_rate = self.exploration_rate,
            "selected move"
        );

        self.trace.push(TraceEntry {
            state: ctx.state,
            action: ctx.map_move_to_canonical(action),
        });

        Some(Decision { action, rule })
    }

    /// Propagate `terminal_reward` back through the recorded episode.
    ///
    /// The most recent move receives the reward; earlier moves receive zero
    /// and bootstrap from the highest stored value of the state recorded
    /// after them, read after that state's update has been written. Decays
    /// the exploration rate and clears the trace. Does not persist.
    pub fn learn(&mut self, terminal_reward: f64, final_board: &Board) -> LearnReport {
        if self.trace.is_empty() {
            self.last_average_change = 0.0;
            return LearnReport {
                updates: 0,
                average_change: 0.0,
                exploration_rate: self.exploration_rate,
            };
        }

        let final_state = canonicalize(final_board);
        let final_actions = final_state.available_actions();
        let mut bootstrap = if final_actions.is_empty() || final_board.is_terminal() {
            0.0
        } else {
            self.table.best_value(&final_state, &final_actions)
        };

        let alpha = self.config.learning_rate;
        let gamma = self.config.discount;
        let mut total_change = 0.0;
        let mut updates = 0;

        let trace = std::mem::take(&mut self.trace);
        for (step, entry) in trace.iter().rev().enumerate() {
            let reward = if step == 0 { terminal_reward } else { 0.0 };
            let current = self.table.get(&entry.state, entry.action);
            let updated = current + alpha * (reward + gamma * bootstrap - current);

            let change = (updated - current).abs();
            if change.is_finite() {
                total_change += change;
                updates += 1;
            }

            self.table.set(entry.state, entry.action, updated);
            bootstrap = self.table.max_known(&entry.state);
        }

        self.last_average_change = if updates > 0 {
            total_change / updates as f64
        } else {
            0.0
        };
        self.decay_exploration();

        info!(
            reward = terminal_reward,
            moves = trace.len(),
            average_change = self.last_average_change,
            exploration_rate = self.exploration_rate,
            table_size = self.table.size(),
            "learned from episode"
        );

        LearnReport {
            updates,
            average_change: self.last_average_change,
            exploration_rate: self.exploration_rate,
        }
    }

    /// Drop the current episode without learning from it.
    pub fn reset_episode(&mut self) {
        if !self.trace.is_empty() {
            debug!(moves = self.trace.len(), "discarding episode trace");
        }
        self.trace.clear();
    }

    /// Forget everything learned and restore the initial exploration rate.
    pub fn reset_learning(&mut self) {
        self.table.clear();
        self.exploration_rate = self.config.initial_exploration;
        self.last_average_change = 0.0;
        self.trace.clear();
        info!("value table reset");
    }

    pub fn status(&self) -> AgentStatus {
        let opening: Vec<usize> = (0..Board::SIZE).collect();
        AgentStatus {
            exploration_rate: self.exploration_rate,
            table_size: self.table.size(),
            opening_value: self.table.best_value(&CanonicalState::empty(), &opening),
            last_average_change: self.last_average_change,
            pending_moves: self.trace.len(),
        }
    }

    /// Write the value table through `repository`.
    pub fn save_to<P>(&self, repository: &P, path: &Path) -> Result<()>
    where
        P: ValueTableRepository + ?Sized,
    {
        repository.save(&self.table, path)
    }

    /// Replace the value table with the one stored at `path`.
    pub fn load_from<P>(&mut self, repository: &P, path: &Path) -> Result<()>
    where
        P: ValueTableRepository + ?Sized,
    {
        self.table = repository.load(path)?;
        Ok(())
    }

    fn decay_exploration(&mut self) {
        self.exploration_rate =
            (self.exploration_rate * self.config.exploration_decay).max(self.config.min_exploration);
    }
}

#[cfg(test)]
mod tests {
    use rand::RngCore;

    use super::*;
    use crate::tictactoe::Cell;

    /// RNG that always yields the same word, making every draw deterministic
    struct ConstantRng(u64);

    impl RngCore for ConstantRng {
        fn next_u32(&mut self) -> u32 {
            self.0 as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for (i, byte) in dest.iter_mut().enumerate() {
                *byte = self.0.to_le_bytes()[i % 8];
            }
        }
    }

    /// Every `random::<f64>()` draw is just below 1.0, so the agent never explores
    fn exploiting_agent() -> TdAgent<ConstantRng> {
        TdAgent::with_rng(AgentConfig::default(), ConstantRng(u64::MAX)).unwrap()
    }

    /// Every `random::<f64>()` draw is 0.0, so the agent always explores
    fn exploring_agent() -> TdAgent<ConstantRng> {
        TdAgent::with_rng(AgentConfig::default(), ConstantRng(0)).unwrap()
    }

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_full_board_returns_none() {
        let mut agent = exploiting_agent();
        assert_eq!(agent.choose_action(&board("XOXXOOOXX")), None);
        assert!(agent.trace().is_empty());
    }

    #[test]
    fn test_takes_immediate_win_even_when_exploring() {
        let mut agent = exploring_agent();
        // O O .
        // X X .
        // X . .
        let decision = agent.select(&board("OO.XX.X..")).unwrap();
        assert_eq!(decision.action, 2);
        assert_eq!(decision.rule, SelectionRule::ImmediateWin);
    }

    #[test]
    fn test_blocks_opponent() {
        let mut agent = exploring_agent();
        let decision = agent.select(&board("XX..O....")).unwrap();
        assert_eq!(decision.action, 2);
        assert_eq!(decision.rule, SelectionRule::Block);
    }

    #[test]
    fn test_exploit_picks_best_value() {
        let mut agent = exploiting_agent();
        let b = board("X........");
        let ctx = b.canonical_context();
        agent.table.set(ctx.state, ctx.map_move_to_canonical(4), 0.7);
        agent.table.set(ctx.state, ctx.map_move_to_canonical(1), 0.2);

        let decision = agent.select(&b).unwrap();
        assert_eq!(decision.action, 4);
        assert_eq!(decision.rule, SelectionRule::Exploit);
    }

    #[test]
    fn test_unexplored_state_picks_available_cell() {
        let mut agent = exploiting_agent();
        let b = board("X........");
        let decision = agent.select(&b).unwrap();
        assert_eq!(decision.rule, SelectionRule::Unexplored);
        assert!(b.is_empty(decision.action));
    }

    #[test]
    fn test_trace_records_canonical_state_and_action() {
        let mut agent = exploring_agent();
        let b = board("X........");
        let action = agent.choose_action(&b).unwrap();

        let entry = agent.trace()[0];
        let ctx = b.canonical_context();
        assert_eq!(entry.state, ctx.state);
        assert_eq!(entry.action, ctx.map_move_to_canonical(action));
        assert_eq!(entry.state.cells()[entry.action], Cell::Empty);
    }

    #[test]
    fn test_learn_single_loss() {
        let mut agent = exploiting_agent();
        let b = Board::new();
        agent.choose_action(&b).unwrap();
        let entry = agent.trace()[0];

        let report = agent.learn(-1.0, &board("XXXOO...."));
        assert_eq!(report.updates, 1);
        assert!((agent.value_table().get(&entry.state, entry.action) + 0.1).abs() < 1e-12);
        assert!((report.average_change - 0.1).abs() < 1e-12);
        assert!(agent.trace().is_empty());
    }

    #[test]
    fn test_learn_propagates_backwards() {
        let mut agent = exploiting_agent();
        let s1 = CanonicalState::empty();
        let s2 = board("X...O...X").canonical();
        agent.trace.push(TraceEntry { state: s1, action: 4 });
        agent.trace.push(TraceEntry { state: s2, action: 1 });

        agent.learn(1.0, &board("XOXXO.OOX"));

        // last move: 0 + 0.1 * (1.0 - 0) = 0.1
        assert!((agent.value_table().get(&s2, 1) - 0.1).abs() < 1e-12);
        // earlier move bootstraps from max_known(s2) = 0.1: 0.1 * 0.9 * 0.1
        assert!((agent.value_table().get(&s1, 4) - 0.009).abs() < 1e-12);
    }

    #[test]
    fn test_bootstrap_reads_value_after_update() {
        let mut agent = exploiting_agent();
        let s = board("X...O....").canonical();
        agent.table.set(s, 1, 0.5);
        agent.trace.push(TraceEntry {
            state: CanonicalState::empty(),
            action: 0,
        });
        agent.trace.push(TraceEntry { state: s, action: 2 });

        agent.learn(1.0, &board("XXXOO.O.."));

        // s,2 becomes 0.1; max_known(s) stays 0.5 from action 1
        assert!((agent.value_table().get(&s, 2) - 0.1).abs() < 1e-12);
        assert!((agent.value_table().get(&CanonicalState::empty(), 0) - 0.045).abs() < 1e-12);
    }

    #[test]
    fn test_loss_propagates_negative_value_backwards() {
        let mut agent = exploiting_agent();
        let s1 = CanonicalState::empty();
        let s2 = board("X...O...X").canonical();
        agent.trace.push(TraceEntry { state: s1, action: 4 });
        agent.trace.push(TraceEntry { state: s2, action: 1 });

        agent.learn(-1.0, &board("XXXOO.O.X"));

        // only stored value of s2 is -0.1; empty cells do not lift it to 0
        assert!((agent.value_table().get(&s2, 1) + 0.1).abs() < 1e-12);
        assert!((agent.value_table().get(&s1, 4) + 0.009).abs() < 1e-12);
    }

    #[test]
    fn test_non_terminal_final_board_bootstraps() {
        let mut agent = exploiting_agent();
        let final_board = board("X...O....");
        let final_state = final_board.canonical();
        let action = final_state.available_actions()[0];
        agent.table.set(final_state, action, 1.0);
        agent.trace.push(TraceEntry {
            state: CanonicalState::empty(),
            action: 0,
        });

        agent.learn(0.0, &final_board);

        // 0 + 0.1 * (0 + 0.9 * 1.0) = 0.09
        assert!((agent.value_table().get(&CanonicalState::empty(), 0) - 0.09).abs() < 1e-12);
    }

    #[test]
    fn test_learn_with_empty_trace_is_noop() {
        let mut agent = exploiting_agent();
        let before = agent.exploration_rate();
        let report = agent.learn(1.0, &Board::new());
        assert_eq!(report.updates, 0);
        assert_eq!(report.average_change, 0.0);
        assert_eq!(agent.exploration_rate(), before);
        assert!(agent.value_table().is_empty());
    }

    #[test]
    fn test_exploration_decays_to_floor() {
        let config = AgentConfig::default().with_exploration(0.5, 0.5, 0.2);
        let mut agent = TdAgent::with_rng(config, ConstantRng(u64::MAX)).unwrap();
        for expected in [0.25, 0.2, 0.2] {
            agent.choose_action(&Board::new());
            agent.learn(0.5, &board("XOXXOOOXX"));
            assert_eq!(agent.exploration_rate(), expected);
        }
    }

    #[test]
    fn test_reset_episode_keeps_table() {
        let mut agent = exploiting_agent();
        agent.table.set(CanonicalState::empty(), 4, 0.3);
        agent.choose_action(&Board::new());
        agent.reset_episode();
        assert!(agent.trace().is_empty());
        assert_eq!(agent.value_table().size(), 1);
    }

    #[test]
    fn test_reset_learning() {
        let mut agent = exploiting_agent();
        agent.choose_action(&Board::new());
        agent.learn(1.0, &board("OOOXX.X.."));
        assert!(agent.exploration_rate() < 0.9);

        agent.reset_learning();
        assert_eq!(agent.value_table().size(), 0);
        assert_eq!(agent.exploration_rate(), 0.9);
        assert_eq!(agent.last_average_change(), 0.0);
    }

    #[test]
    fn test_status_reports_opening_value() {
        let mut agent = exploiting_agent();
        agent.table.set(CanonicalState::empty(), 4, 0.4);
        agent.table.set(CanonicalState::empty(), 0, -0.2);
        let status = agent.status();
        assert_eq!(status.opening_value, 0.4);
        assert_eq!(status.table_size, 1);
        assert_eq!(status.pending_moves, 0);
    }

    #[test]
    fn test_seeded_agents_agree() {
        let mut a = TdAgent::new(AgentConfig::default()).unwrap().with_seed(7);
        let mut b = TdAgent::new(AgentConfig::default()).unwrap().with_seed(7);
        let mut board = Board::new();
        board.place(0, Player::X).unwrap();

        while !board.is_terminal() {
            let move_a = a.choose_action(&board).unwrap();
            let move_b = b.choose_action(&board).unwrap();
            assert_eq!(move_a, move_b);
            board.place(move_a, Player::O).unwrap();
            if board.is_terminal() {
                break;
            }
            let reply = board.available_actions()[0];
            board.place(reply, Player::X).unwrap();
        }
        assert_eq!(a.trace(), b.trace());
    }
}
