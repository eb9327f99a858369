//! Automaton representing forbidden sequences
//!
//! Each state stands for "how much of some forbidden sequence was just
//! traversed"; a transition from `s` to `s'` happens when a given road
//! element (the symbol) is traversed. States reached at the end of a
//! sequence carry the penalties of that sequence, per mode class.
//!
//! Construction follows Aho & Corasick: a trie of the sequences, then the
//! failure function, then the failure function is folded into the
//! transitions so that the search needs one lookup per edge.

mod dot;
mod snapshot;

use std::collections::VecDeque;
use std::hash::Hash;

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use log::{debug, info};

use crate::model::{CostPerModeClass, Restriction, TrafficRules};
use crate::{Cost, Error};

pub use snapshot::{AutomatonSnapshot, PenaltyEntry};

/// Automaton state, an index in the state table
pub type StateId = usize;

/// State with no restriction context
pub const INITIAL_STATE: StateId = 0;

type TransitionId = usize;

#[derive(Debug, Clone, Default)]
struct StateNode {
    penalty_per_mode: CostPerModeClass,
    transitions: Vec<TransitionId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<S> {
    pub from: StateId,
    pub to: StateId,
    pub symbol: S,
}

#[derive(Debug, Clone)]
pub struct Automaton<S> {
    states: Vec<StateNode>,
    transitions: Vec<Transition<S>>,
    next: HashMap<(StateId, S), StateId>,
}

impl<S: Copy + Eq + Hash> Default for Automaton<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Copy + Eq + Hash> Automaton<S> {
    /// Automaton with only the initial state, matching nothing
    pub fn new() -> Self {
        Self {
            states: vec![StateNode::default()],
            transitions: Vec::new(),
            next: HashMap::new(),
        }
    }

    /// Build an automaton from forbidden sequences
    ///
    /// # Errors
    ///
    /// Returns [`Error::AutomatonInvariant`] if construction breaks one of
    /// its own invariants, which is a bug rather than bad input.
    pub fn build<'a, I>(sequences: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = &'a Restriction<S>>,
        S: 'a,
    {
        let mut automaton = Self::new();
        automaton.build_graph(sequences)?;
        Ok(automaton)
    }

    /// Rebuild this automaton from scratch
    ///
    /// # Errors
    ///
    /// See [`Automaton::build`].
    pub fn build_graph<'a, I>(&mut self, sequences: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = &'a Restriction<S>>,
        S: 'a,
    {
        self.clear();

        let mut sequence_count = 0usize;
        for restriction in sequences {
            self.add_sequence(&restriction.symbols, &restriction.cost_per_mode_class)?;
            sequence_count += 1;
        }
        let trie_transitions = self.transitions.len();
        debug!(
            "Trie built: {} states, {trie_transitions} transitions",
            self.states.len()
        );

        // Depth order of the trie, computed before shortcuts make it cyclic
        let order = self.breadth_first_order();
        let failure = self.build_failure_function(&order)?;
        self.build_shortcuts(&order, &failure)?;

        info!(
            "Restriction automaton built from {sequence_count} sequences: {} states, {} transitions ({} shortcuts)",
            self.states.len(),
            self.transitions.len(),
            self.transitions.len() - trie_transitions
        );
        Ok(())
    }

    /// Look for the transition leaving `state` on `symbol`
    ///
    /// Shortcuts are never copied from the initial state, so its trie
    /// transitions act as the fallback of every state. `None` means the
    /// symbol starts no sequence at all, the caller stays in `state`.
    #[inline]
    pub fn find_transition(&self, state: StateId, symbol: S) -> Option<StateId> {
        self.next
            .get(&(state, symbol))
            .or_else(|| self.next.get(&(INITIAL_STATE, symbol)))
            .copied()
    }

    /// Penalty incurred when reaching `state` with a mode of class `mode_class`
    #[inline]
    pub fn penalty(&self, state: StateId, mode_class: TrafficRules) -> Cost {
        if state == INITIAL_STATE {
            return 0.0;
        }
        self.states
            .get(state)
            .and_then(|node| node.penalty_per_mode.get(&mode_class))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn penalties(&self, state: StateId) -> Option<&CostPerModeClass> {
        self.states.get(state).map(|node| &node.penalty_per_mode)
    }

    pub fn initial_state(&self) -> StateId {
        INITIAL_STATE
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn transitions(&self) -> impl Iterator<Item = &Transition<S>> {
        self.transitions.iter()
    }

    /// Transitions leaving `state`
    pub fn out_transitions(&self, state: StateId) -> impl Iterator<Item = &Transition<S>> {
        self.states
            .get(state)
            .into_iter()
            .flat_map(|node| node.transitions.iter().map(|&t| &self.transitions[t]))
    }

    /// Transition stored on `state` itself, without the initial state
    /// fallback of [`Automaton::find_transition`]
    #[inline]
    fn goto(&self, state: StateId, symbol: S) -> Option<StateId> {
        self.next.get(&(state, symbol)).copied()
    }

    fn clear(&mut self) {
        self.states.clear();
        self.states.push(StateNode::default());
        self.transitions.clear();
        self.next.clear();
    }

    fn add_state(&mut self) -> StateId {
        self.states.push(StateNode::default());
        self.states.len() - 1
    }

    fn add_transition(&mut self, from: StateId, symbol: S, to: StateId) -> Result<(), Error> {
        if from >= self.states.len() || to >= self.states.len() {
            return Err(Error::AutomatonInvariant(format!(
                "transition {from} -> {to} references a missing state"
            )));
        }
        if self.next.contains_key(&(from, symbol)) {
            return Err(Error::AutomatonInvariant(format!(
                "state {from} already has a transition on this symbol"
            )));
        }
        let id = self.transitions.len();
        self.transitions.push(Transition { from, to, symbol });
        self.states[from].transitions.push(id);
        self.next.insert((from, symbol), to);
        Ok(())
    }

    /// Insert one sequence in the trie (the "goto" function of Aho & al.)
    ///
    /// The terminal state takes the sequence penalties, replacing those of
    /// an earlier sequence ending at the same state.
    fn add_sequence(&mut self, symbols: &[S], penalties: &CostPerModeClass) -> Result<(), Error> {
        if symbols.is_empty() {
            debug!("Ignoring empty forbidden sequence");
            return Ok(());
        }

        let mut current = INITIAL_STATE;
        for &symbol in symbols {
            current = match self.goto(current, symbol) {
                Some(next) => next,
                None => {
                    let state = self.add_state();
                    self.add_transition(current, symbol, state)?;
                    state
                }
            };
        }
        self.states[current].penalty_per_mode = penalties.clone();
        Ok(())
    }

    /// Non-initial states by increasing depth in the trie
    fn breadth_first_order(&self) -> Vec<StateId> {
        let mut visited = FixedBitSet::with_capacity(self.states.len());
        visited.insert(INITIAL_STATE);
        let mut order = Vec::with_capacity(self.states.len().saturating_sub(1));
        let mut queue = VecDeque::from([INITIAL_STATE]);

        while let Some(state) = queue.pop_front() {
            for transition in self.out_transitions(state) {
                if !visited.put(transition.to) {
                    order.push(transition.to);
                    queue.push_back(transition.to);
                }
            }
        }
        order
    }

    /// Failure state of every state, indexed by state
    fn build_failure_function(&self, order: &[StateId]) -> Result<Vec<StateId>, Error> {
        let mut failure: Vec<Option<StateId>> = vec![None; self.states.len()];
        failure[INITIAL_STATE] = Some(INITIAL_STATE);

        for &r in std::iter::once(&INITIAL_STATE).chain(order) {
            for transition in self.out_transitions(r) {
                let s = transition.to;
                if r == INITIAL_STATE {
                    failure[s] = Some(INITIAL_STATE);
                    continue;
                }

                let mut state = failure[r].ok_or_else(|| {
                    Error::AutomatonInvariant(format!("state {r} has no failure state"))
                })?;
                let fallback = loop {
                    if let Some(target) = self.goto(state, transition.symbol) {
                        break target;
                    }
                    if state == INITIAL_STATE {
                        break INITIAL_STATE;
                    }
                    state = failure[state].ok_or_else(|| {
                        Error::AutomatonInvariant(format!("state {state} has no failure state"))
                    })?;
                };
                failure[s] = Some(fallback);
            }
        }

        failure
            .into_iter()
            .enumerate()
            .map(|(state, f)| {
                f.ok_or_else(|| {
                    Error::AutomatonInvariant(format!("state {state} is unreachable"))
                })
            })
            .collect()
    }

    /// Fold the failure function into the transitions (the "next" function)
    fn build_shortcuts(&mut self, order: &[StateId], failure: &[StateId]) -> Result<(), Error> {
        for &r in order {
            let f = failure[r];
            if f == INITIAL_STATE {
                continue;
            }
            if f == r {
                return Err(Error::AutomatonInvariant(format!(
                    "state {r} is its own failure state"
                )));
            }

            // f is shallower than r, its own shortcuts are already in place.
            // Copy its transitions out before adding to the tables.
            let inherited: Vec<(S, StateId)> = self
                .out_transitions(f)
                .map(|t| (t.symbol, t.to))
                .collect();
            for (symbol, to) in inherited {
                if self.next.contains_key(&(r, symbol)) {
                    continue;
                }
                self.add_transition(r, symbol, to)?;
            }
        }
        Ok(())
    }
}
