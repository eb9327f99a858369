//! Forbidden movement sequences

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::TrafficRules;
use crate::{Cost, RoadEdgeId, UNREACHABLE};

/// Additive penalty per transport mode class
pub type CostPerModeClass = HashMap<TrafficRules, Cost>;

/// Ordered symbols that, traversed consecutively, are penalized for some
/// mode classes. An infinite penalty forbids the movement outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restriction<S = RoadEdgeId> {
    pub symbols: Vec<S>,
    pub cost_per_mode_class: CostPerModeClass,
}

impl<S> Restriction<S> {
    pub fn new(symbols: Vec<S>, cost_per_mode_class: CostPerModeClass) -> Self {
        Self {
            symbols,
            cost_per_mode_class,
        }
    }

    /// Movement forbidden for every class in `classes`
    pub fn forbidden(symbols: Vec<S>, classes: impl IntoIterator<Item = TrafficRules>) -> Self {
        let cost_per_mode_class = classes
            .into_iter()
            .map(|class| (class, UNREACHABLE))
            .collect();
        Self::new(symbols, cost_per_mode_class)
    }

    /// Penalty applied to `class`, 0 when the class is not listed
    pub fn penalty(&self, class: TrafficRules) -> Cost {
        self.cost_per_mode_class.get(&class).copied().unwrap_or(0.0)
    }
}

/// Set of forbidden sequences an automaton is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restrictions<S = RoadEdgeId> {
    restrictions: Vec<Restriction<S>>,
}

impl<S> Default for Restrictions<S> {
    fn default() -> Self {
        Self {
            restrictions: Vec::new(),
        }
    }
}

impl<S> Restrictions<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, restriction: Restriction<S>) {
        self.restrictions.push(restriction);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Restriction<S>> {
        self.restrictions.iter()
    }

    pub fn len(&self) -> usize {
        self.restrictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restrictions.is_empty()
    }
}

impl<S> FromIterator<Restriction<S>> for Restrictions<S> {
    fn from_iter<I: IntoIterator<Item = Restriction<S>>>(iter: I) -> Self {
        Self {
            restrictions: iter.into_iter().collect(),
        }
    }
}

impl<'a, S> IntoIterator for &'a Restrictions<S> {
    type Item = &'a Restriction<S>;
    type IntoIter = std::slice::Iter<'a, Restriction<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
