//! Value table for temporal difference learning

use std::collections::{BTreeMap, HashMap};

use crate::tictactoe::CanonicalState;

/// Learned values: canonical state -> (action -> estimate)
///
/// Actions are cell indices in the canonical frame of their state. Absent
/// states and actions read as 0.0; per-state maps are created on first write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueTable {
    values: HashMap<CanonicalState, BTreeMap<usize, f64>>,
}

impl ValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored estimate, or 0.0 for an unseen state or action
    pub fn get(&self, state: &CanonicalState, action: usize) -> f64 {
        self.values
            .get(state)
            .and_then(|actions| actions.get(&action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Store an estimate, creating the state's entry if needed
    pub fn set(&mut self, state: CanonicalState, action: usize, value: f64) {
        self.values.entry(state).or_default().insert(action, value);
    }

    /// Maximum over `actions`, treating unseen actions as 0.0
    ///
    /// Returns 0.0 when the state has no entries or `actions` is empty.
    pub fn best_value(&self, state: &CanonicalState, actions: &[usize]) -> f64 {
        if !self.values.contains_key(state) || actions.is_empty() {
            return 0.0;
        }
        actions
            .iter()
            .map(|&action| self.get(state, action))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Highest value among the actions stored for `state`, or 0.0 if none are
    pub fn max_known(&self, state: &CanonicalState) -> f64 {
        self.values
            .get(state)
            .and_then(|actions| actions.values().copied().reduce(f64::max))
            .unwrap_or(0.0)
    }

    /// Stored actions and values for one state
    pub fn actions(&self, state: &CanonicalState) -> Option<&BTreeMap<usize, f64>> {
        self.values.get(state)
    }

    /// Number of known states
    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of stored (state, action) pairs
    pub fn action_count(&self) -> usize {
        self.values.values().map(BTreeMap::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CanonicalState, &BTreeMap<usize, f64>)> {
        self.values.iter()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
