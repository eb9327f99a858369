use serde::{Deserialize, Serialize};

use crate::{Cost, ModeId};

/// Cost of switching from one mode to another
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferRule {
    pub from: ModeId,
    pub to: ModeId,
    /// Seconds
    pub cost: Cost,
}

/// Routing parameters shared by every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Guide the search with a great-circle lower bound (A*)
    pub use_heuristic: bool,
    /// Let the first boarding delay the departure instead of waiting
    pub allow_departure_shift: bool,
    /// Seconds needed to change from one trip to another
    pub min_transfer_time: Cost,
    /// Cost of mode changes without a matching rule, forbidden when unset
    pub default_transfer_cost: Option<Cost>,
    pub transfers: Vec<TransferRule>,
    /// Give up after examining that many labels
    pub max_examined: Option<usize>,
    /// Give up after that many milliseconds
    pub max_search_millis: Option<u64>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            use_heuristic: false,
            allow_departure_shift: false,
            min_transfer_time: 0.0,
            default_transfer_cost: None,
            transfers: Vec::new(),
            max_examined: None,
            max_search_millis: None,
        }
    }
}

impl RoutingConfig {
    #[must_use]
    pub fn with_transfer(mut self, from: ModeId, to: ModeId, cost: Cost) -> Self {
        self.transfers.push(TransferRule { from, to, cost });
        self
    }

    #[must_use]
    pub fn with_heuristic(mut self) -> Self {
        self.use_heuristic = true;
        self
    }
}
