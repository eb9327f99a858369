//! Single origin / destination queries

use std::time::Duration;

use itertools::Itertools;
use log::{debug, info};
use rayon::prelude::*;

use super::{
    CompoundObject, DefaultCostCalculator, GeoHeuristic, Roadmap, RoutingConfig, TargetVisitor,
    VertexDataMap, combined_search, zero_heuristic,
};
use crate::automaton::Automaton;
use crate::model::MultimodalNetwork;
use crate::{Error, ModeId, RoadEdgeId, Time, VertexId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingRequest {
    pub origin: VertexId,
    pub destination: VertexId,
    /// Seconds since midnight
    pub departure: Time,
    pub allowed_modes: Vec<ModeId>,
    /// Modes the trip may start with, all allowed modes when empty
    pub start_modes: Vec<ModeId>,
}

impl RoutingRequest {
    pub fn new(
        origin: VertexId,
        destination: VertexId,
        departure: Time,
        allowed_modes: Vec<ModeId>,
    ) -> Self {
        Self {
            origin,
            destination,
            departure,
            allowed_modes,
            start_modes: Vec::new(),
        }
    }

    #[must_use]
    pub fn starting_with(mut self, start_modes: Vec<ModeId>) -> Self {
        self.start_modes = start_modes;
        self
    }
}

/// Best roadmap from the request origin to its destination.
///
/// Returns `Ok(None)` when the destination can't be reached or the search
/// budget ran out first.
///
/// # Errors
///
/// Returns an error if the origin or destination is not in the network or
/// a requested mode is unknown.
pub fn route(
    network: &MultimodalNetwork,
    automaton: &Automaton<RoadEdgeId>,
    request: &RoutingRequest,
    config: &RoutingConfig,
) -> Result<Option<Roadmap>, Error> {
    if network.vertex(request.origin).is_none() || network.vertex(request.destination).is_none()
    {
        return Err(Error::InvalidVertex);
    }

    let start_modes = if request.start_modes.is_empty() {
        &request.allowed_modes
    } else {
        &request.start_modes
    };
    let sources: Vec<CompoundObject> = start_modes
        .iter()
        .unique()
        .map(|&mode| CompoundObject::new(request.origin, mode, automaton.initial_state()))
        .collect();

    let mut vertex_data = VertexDataMap::new();
    for source in &sources {
        vertex_data.insert_source(*source);
    }

    let calculator = DefaultCostCalculator::new(network, request.departure, config);
    let mut visitor = TargetVisitor::new(request.destination)
        .with_max_examined(config.max_examined)
        .with_time_budget(config.max_search_millis.map(Duration::from_millis));

    let summary = if config.use_heuristic {
        let heuristic = GeoHeuristic::new(network, request.destination, &request.allowed_modes)?;
        combined_search(
            network,
            automaton,
            &sources,
            &mut vertex_data,
            &calculator,
            &request.allowed_modes,
            &mut visitor,
            |vertex| heuristic.estimate(vertex),
        )?
    } else {
        combined_search(
            network,
            automaton,
            &sources,
            &mut vertex_data,
            &calculator,
            &request.allowed_modes,
            &mut visitor,
            zero_heuristic,
        )?
    };

    let Some(target) = visitor.found() else {
        debug!(
            "Destination {:?} not reached after {} labels",
            request.destination, summary.examined
        );
        return Ok(None);
    };
    Roadmap::trace(network, &vertex_data, target, request.departure).map(Some)
}

/// Run independent requests in parallel. Results keep the request order.
pub fn route_many(
    network: &MultimodalNetwork,
    automaton: &Automaton<RoadEdgeId>,
    requests: &[RoutingRequest],
    config: &RoutingConfig,
) -> Vec<Result<Option<Roadmap>, Error>> {
    info!("Routing {} requests", requests.len());
    requests
        .par_iter()
        .map(|request| route(network, automaton, request, config))
        .collect()
}
