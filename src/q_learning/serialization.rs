//! Durable text form of the value table.
//!
//! The table is stored as a JSON object keyed by the canonical state key
//! (nine comma-joined cell tokens) with an object of stringified action
//! indices to values:
//!
//! ```json
//! {
//!   ",,,,,,,,": { "4": 0.12 },
//!   ",,,,X,,,,O": { "0": -0.1, "2": 0.05 }
//! }
//! ```
//!
//! Loading is tolerant per entry: keys that do not parse, are not already
//! canonical, or carry unusable actions are skipped with a warning. Only a
//! document that is not a JSON object at all fails the load.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::warn;

use super::value_table::ValueTable;
use crate::{Result, tictactoe::CanonicalState};

/// Counts from decoding a stored table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// States accepted into the table
    pub states: usize,
    /// (state, action) pairs accepted
    pub entries: usize,
    /// States or actions dropped because they failed validation
    pub skipped: usize,
}

impl ValueTable {
    /// Encode as pretty-printed JSON with keys in sorted order.
    ///
    /// Non-finite values cannot be represented in JSON and are left out.
    pub fn to_json(&self) -> Result<String> {
        let mut document: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
        for (state, actions) in self.iter() {
            let mut encoded = BTreeMap::new();
            for (&action, &value) in actions {
                if value.is_finite() {
                    encoded.insert(action.to_string(), value);
                } else {
                    warn!(state = %state, action, "dropping non-finite value from saved table");
                }
            }
            if !encoded.is_empty() {
                document.insert(state.key(), encoded);
            }
        }
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Decode the durable form, skipping invalid entries.
    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_json_with_report(text).map(|(table, _)| table)
    }

    /// Decode the durable form and report what was kept and skipped.
    pub fn from_json_with_report(text: &str) -> Result<(Self, LoadReport)> {
        let document: Map<String, Value> = serde_json::from_str(text)?;
        let mut table = ValueTable::new();
        let mut report = LoadReport::default();

        for (key, actions) in &document {
            let state = match CanonicalState::from_key(key) {
                Ok(Some(state)) => state,
                Ok(None) => {
                    warn!(key = %key, "skipping value table entry: key is not canonical");
                    report.skipped += 1;
                    continue;
                }
                Err(err) => {
                    warn!(key = %key, error = %err, "skipping value table entry: malformed key");
                    report.skipped += 1;
                    continue;
                }
            };

            let Some(actions) = actions.as_object() else {
                warn!(key = %key, "skipping value table entry: actions are not an object");
                report.skipped += 1;
                continue;
            };

            let mut accepted = 0;
            for (action_key, value) in actions {
                match decode_action(&state, action_key, value) {
                    Some((action, value)) => {
                        table.set(state, action, value);
                        accepted += 1;
                    }
                    None => {
                        warn!(
                            key = %key,
                            action = %action_key,
                            "skipping value table action: not an empty cell with a finite value"
                        );
                        report.skipped += 1;
                    }
                }
            }

            if accepted > 0 {
                report.states += 1;
                report.entries += accepted;
            }
        }

        Ok((table, report))
    }
}

fn decode_action(state: &CanonicalState, action_key: &str, value: &Value) -> Option<(usize, f64)> {
    let action: usize = action_key.trim().parse().ok()?;
    if action >= state.cells().len() || !state.board().is_empty(action) {
        return None;
    }
    let value = value.as_f64().filter(|v| v.is_finite())?;
    Some((action, value))
}
