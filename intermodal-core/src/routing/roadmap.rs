//! Itinerary reconstruction from search results

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Serialize;

use super::{CompoundObject, VertexDataMap};
use crate::model::MultimodalNetwork;
use crate::time::serialize_time;
use crate::{Cost, Error, ModeId, NO_TRIP, Time, TripId};

/// Kind of cost accumulated along a roadmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CostId {
    /// Seconds, waits, transfers and penalties included
    Duration,
    /// Seconds spent waiting for a departure
    Wait,
    /// Metres
    Distance,
}

pub type Costs = BTreeMap<CostId, Cost>;

/// One traversed edge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    /// External vertex ids
    pub from: u64,
    pub to: u64,
    pub mode: ModeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip: Option<TripId>,
    pub costs: Costs,
}

/// Consecutive steps with the same mode and trip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    pub from: u64,
    pub to: u64,
    pub mode: ModeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip: Option<TripId>,
    pub steps: usize,
    pub costs: Costs,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Roadmap {
    /// Effective departure, shifted when the first boarding allowed it
    #[serde(serialize_with = "serialize_time")]
    pub departure: Time,
    #[serde(serialize_with = "serialize_time")]
    pub arrival: Time,
    pub steps: Vec<Step>,
    pub total: Costs,
}

impl Roadmap {
    /// Follow predecessors from `target` back to its source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVertex`] if `target` was never reached and
    /// [`Error::InvalidEdge`] if a traversed edge is missing from the
    /// network.
    pub fn trace(
        network: &MultimodalNetwork,
        vertex_data: &VertexDataMap,
        target: CompoundObject,
        departure: Time,
    ) -> Result<Self, Error> {
        let path = vertex_data.path_to(target);
        let target_data = vertex_data.get(&target).ok_or(Error::InvalidVertex)?;

        let mut steps = Vec::with_capacity(path.len().saturating_sub(1));
        for (prev, next) in path.iter().tuple_windows() {
            let prev_data = vertex_data.get(prev).ok_or(Error::InvalidVertex)?;
            let next_data = vertex_data.get(next).ok_or(Error::InvalidVertex)?;
            let edge = next_data
                .edge
                .and_then(|id| network.edge(id))
                .ok_or(Error::InvalidEdge)?;

            let costs = Costs::from([
                (CostId::Duration, next_data.potential - prev_data.potential),
                (CostId::Wait, next_data.wait_time),
                (CostId::Distance, edge.length),
            ]);
            steps.push(Step {
                from: external_id(network, prev)?,
                to: external_id(network, next)?,
                mode: next.mode,
                trip: (next_data.trip != NO_TRIP).then_some(next_data.trip),
                costs,
            });
        }

        let total = sum_costs(steps.iter().map(|s| &s.costs));
        let departure = departure.saturating_add(to_seconds(target_data.shift_time));
        let arrival = departure.saturating_add(to_seconds(target_data.potential));
        Ok(Self {
            departure,
            arrival,
            steps,
            total,
        })
    }

    /// Sum of one kind of cost, 0 for an empty roadmap
    pub fn total_cost(&self, cost: CostId) -> Cost {
        self.total.get(&cost).copied().unwrap_or(0.0)
    }

    pub fn step(&self, idx: usize) -> Option<&Step> {
        self.steps.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn legs(&self) -> Vec<Leg> {
        let chunks = self.steps.iter().chunk_by(|step| (step.mode, step.trip));
        chunks
            .into_iter()
            .filter_map(|((mode, trip), steps)| {
                let steps: Vec<&Step> = steps.collect();
                let first = steps.first()?;
                let last = steps.last()?;
                Some(Leg {
                    from: first.from,
                    to: last.to,
                    mode,
                    trip,
                    steps: steps.len(),
                    costs: sum_costs(steps.iter().map(|s| &s.costs)),
                })
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Roadmap {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn external_id(network: &MultimodalNetwork, object: &CompoundObject) -> Result<u64, Error> {
    network
        .vertex(object.vertex)
        .map(|v| v.id)
        .ok_or(Error::InvalidVertex)
}

fn sum_costs<'a>(costs: impl Iterator<Item = &'a Costs>) -> Costs {
    let mut total = Costs::new();
    for step_costs in costs {
        for (&id, &value) in step_costs {
            *total.entry(id).or_insert(0.0) += value;
        }
    }
    total
}

fn to_seconds(cost: Cost) -> Time {
    cost.round().clamp(0.0, f64::from(Time::MAX)) as Time
}
