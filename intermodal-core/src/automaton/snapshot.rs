//! Serializable form of a built automaton

use std::hash::Hash;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Automaton, INITIAL_STATE, StateId};
use crate::model::{CostPerModeClass, TrafficRules};
use crate::{Cost, Error};

/// Penalty of one mode class. Infinite penalties (forbidden movements) are
/// written as `null` since JSON has no infinity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyEntry {
    pub mode_class: TrafficRules,
    #[serde(serialize_with = "serialize_cost", deserialize_with = "deserialize_cost")]
    pub penalty: Cost,
}

/// Full content of an automaton: state count, initial state, transition
/// table and penalty tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomatonSnapshot<S> {
    pub state_count: usize,
    pub initial_state: StateId,
    pub transitions: Vec<(StateId, S, StateId)>,
    pub penalties: Vec<(StateId, Vec<PenaltyEntry>)>,
}

impl<S: Copy + Eq + Hash> Automaton<S> {
    pub fn to_snapshot(&self) -> AutomatonSnapshot<S> {
        let penalties = (0..self.state_count())
            .filter_map(|state| {
                let table = self.penalties(state)?;
                if table.is_empty() {
                    return None;
                }
                let mut entries: Vec<PenaltyEntry> = table
                    .iter()
                    .map(|(&mode_class, &penalty)| PenaltyEntry {
                        mode_class,
                        penalty,
                    })
                    .collect();
                entries.sort_by_key(|entry| entry.mode_class);
                Some((state, entries))
            })
            .collect();

        AutomatonSnapshot {
            state_count: self.state_count(),
            initial_state: INITIAL_STATE,
            transitions: self
                .transitions()
                .map(|t| (t.from, t.symbol, t.to))
                .collect(),
            penalties,
        }
    }

    /// Restore an automaton from its snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot references missing states, has a
    /// non-deterministic transition table or a non-zero initial state.
    pub fn from_snapshot(snapshot: &AutomatonSnapshot<S>) -> Result<Self, Error> {
        if snapshot.initial_state != INITIAL_STATE {
            return Err(Error::InvalidData(format!(
                "Initial state must be {INITIAL_STATE}, got {}",
                snapshot.initial_state
            )));
        }
        if snapshot.state_count == 0 {
            return Err(Error::InvalidData(
                "Automaton snapshot has no state".to_string(),
            ));
        }

        let mut automaton = Self::new();
        for _ in 1..snapshot.state_count {
            automaton.add_state();
        }
        for &(from, symbol, to) in &snapshot.transitions {
            automaton
                .add_transition(from, symbol, to)
                .map_err(|e| Error::InvalidData(e.to_string()))?;
        }
        for (state, entries) in &snapshot.penalties {
            let node = automaton.states.get_mut(*state).ok_or_else(|| {
                Error::InvalidData(format!("Penalty table for missing state {state}"))
            })?;
            node.penalty_per_mode = entries
                .iter()
                .map(|entry| (entry.mode_class, entry.penalty))
                .collect::<CostPerModeClass>();
        }
        Ok(automaton)
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_cost<Ser: Serializer>(cost: &Cost, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
    if cost.is_finite() {
        serializer.serialize_some(cost)
    } else {
        serializer.serialize_none()
    }
}

fn deserialize_cost<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Cost, D::Error> {
    Ok(Option::<Cost>::deserialize(deserializer)?.unwrap_or(Cost::INFINITY))
}
