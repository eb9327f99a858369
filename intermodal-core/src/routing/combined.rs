//! Label-setting search over `(vertex, mode, automaton state)` labels
//!
//! One generic body serves both graph shapes: the restricted network, where
//! every traversed edge feeds the restriction automaton, and the plain
//! multimodal network, where labels stay in the initial state and no
//! restriction penalty is ever applied.

use itertools::Itertools;
use log::debug;

use super::queue::Frontier;
use super::{
    CompoundObject, CostCalculator, EdgeHandle, RestrictedGraph, RoutingGraph, VertexData,
    VertexDataMap, Visitor,
};
use crate::automaton::{Automaton, StateId};
use crate::model::TransportMode;
use crate::{Cost, Error, ModeId, RoadEdgeId, VertexId};

/// Counters of a finished search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchSummary {
    /// Labels popped and expanded
    pub examined: usize,
    /// Successful relaxations
    pub relaxed: usize,
    /// The visitor asked to stop before the frontier emptied
    pub stopped_early: bool,
}

/// Restriction context update on edge traversal
trait RestrictionTracker<G> {
    fn next_state(&self, graph: &G, state: StateId, edge: EdgeHandle) -> StateId;

    fn penalty(&self, state: StateId, mode: &TransportMode) -> Cost;
}

struct AutomatonTracker<'a>(&'a Automaton<RoadEdgeId>);

impl<G: RestrictedGraph> RestrictionTracker<G> for AutomatonTracker<'_> {
    #[inline]
    fn next_state(&self, graph: &G, state: StateId, edge: EdgeHandle) -> StateId {
        graph
            .symbol(edge)
            .and_then(|symbol| self.0.find_transition(state, symbol))
            .unwrap_or(state)
    }

    #[inline]
    fn penalty(&self, state: StateId, mode: &TransportMode) -> Cost {
        self.0.penalty(state, mode.mode_class())
    }
}

struct NoRestrictions;

impl<G> RestrictionTracker<G> for NoRestrictions {
    #[inline]
    fn next_state(&self, _graph: &G, state: StateId, _edge: EdgeHandle) -> StateId {
        state
    }

    #[inline]
    fn penalty(&self, _state: StateId, _mode: &TransportMode) -> Cost {
        0.0
    }
}

/// Multimodal shortest paths with restriction penalties.
///
/// Every source must already have an entry in `vertex_data` (its initial
/// potential). On return, `vertex_data` holds the potential, predecessor,
/// trip, wait and shift of every labelled object. The heuristic must be
/// admissible for the costs to be optimal; pass
/// [`zero_heuristic`](super::zero_heuristic) for plain Dijkstra.
///
/// # Errors
///
/// Returns [`Error::UnknownMode`] if an allowed mode or the mode of a source
/// is not registered in the graph, and [`Error::MissingSource`] if a source
/// has no vertex data.
#[allow(clippy::too_many_arguments)]
pub fn combined_search<G, C, H>(
    graph: &G,
    automaton: &Automaton<RoadEdgeId>,
    sources: &[CompoundObject],
    vertex_data: &mut VertexDataMap,
    cost_calculator: &C,
    allowed_modes: &[ModeId],
    visitor: &mut dyn Visitor<G>,
    heuristic: H,
) -> Result<SearchSummary, Error>
where
    G: RestrictedGraph,
    C: CostCalculator,
    H: Fn(VertexId) -> Cost,
{
    label_setting(
        graph,
        &AutomatonTracker(automaton),
        sources,
        vertex_data,
        cost_calculator,
        allowed_modes,
        visitor,
        heuristic,
    )
}

/// Multimodal shortest paths without restriction tracking.
///
/// Same contract as [`combined_search`]; sources' automaton states are kept
/// as given and no penalty is applied.
///
/// # Errors
///
/// See [`combined_search`].
#[allow(clippy::too_many_arguments)]
pub fn multimodal_search<G, C, H>(
    graph: &G,
    sources: &[CompoundObject],
    vertex_data: &mut VertexDataMap,
    cost_calculator: &C,
    allowed_modes: &[ModeId],
    visitor: &mut dyn Visitor<G>,
    heuristic: H,
) -> Result<SearchSummary, Error>
where
    G: RoutingGraph,
    C: CostCalculator,
    H: Fn(VertexId) -> Cost,
{
    label_setting(
        graph,
        &NoRestrictions,
        sources,
        vertex_data,
        cost_calculator,
        allowed_modes,
        visitor,
        heuristic,
    )
}

#[allow(clippy::too_many_arguments)]
fn label_setting<G, R, C, H>(
    graph: &G,
    tracker: &R,
    sources: &[CompoundObject],
    vertex_data: &mut VertexDataMap,
    cost_calculator: &C,
    allowed_modes: &[ModeId],
    visitor: &mut dyn Visitor<G>,
    heuristic: H,
) -> Result<SearchSummary, Error>
where
    G: RoutingGraph,
    R: RestrictionTracker<G>,
    C: CostCalculator,
    H: Fn(VertexId) -> Cost,
{
    let modes: Vec<&TransportMode> = allowed_modes
        .iter()
        .unique()
        .map(|&id| graph.transport_mode(id).ok_or(Error::UnknownMode(id)))
        .collect::<Result<_, _>>()?;

    let mut frontier = Frontier::new();
    for source in sources.iter().unique() {
        graph
            .transport_mode(source.mode)
            .ok_or(Error::UnknownMode(source.mode))?;
        let potential = vertex_data
            .get(source)
            .ok_or(Error::MissingSource)?
            .potential;
        frontier.push(*source, potential, potential + heuristic(source.vertex));
        visitor.discover_vertex(source, graph);
    }

    let mut summary = SearchSummary::default();
    while let Some((object, pushed)) = frontier.pop() {
        let Some(&current) = vertex_data.get(&object) else {
            continue;
        };
        // Stale entry, the object was improved after this push
        if pushed > current.potential {
            continue;
        }

        summary.examined += 1;
        visitor.examine_vertex(&object, graph);
        let current_mode = graph
            .transport_mode(object.mode)
            .ok_or(Error::UnknownMode(object.mode))?;

        for edge in graph.out_edges(object.vertex) {
            visitor.examine_edge(edge, graph);
            let state = tracker.next_state(graph, object.state, edge);
            let edge_rules = graph.traffic_rules(edge);

            for &mode in &modes {
                if !mode.allowed_on(edge_rules) {
                    visitor.edge_not_relaxed(edge, mode.id, graph);
                    continue;
                }

                let transfer = cost_calculator.transfer_time(edge, current_mode, mode);
                if !transfer.is_finite() {
                    visitor.edge_not_relaxed(edge, mode.id, graph);
                    continue;
                }

                let travel = cost_calculator.travel_time(
                    edge,
                    mode,
                    current.potential,
                    current.shift_time,
                    current.trip,
                );
                let mut total = transfer + travel.cost;
                if state != object.state {
                    total += tracker.penalty(state, mode);
                }

                let candidate = CompoundObject::new(edge.target, mode.id, state);
                let potential = current.potential + total;
                if total.is_finite() && potential < vertex_data.potential(&candidate) {
                    vertex_data.set(
                        candidate,
                        VertexData {
                            potential,
                            predecessor: Some(object),
                            edge: Some(edge.id),
                            trip: travel.trip,
                            wait_time: travel.wait_time,
                            shift_time: travel.shift_time,
                        },
                    );
                    frontier.push(candidate, potential, potential + heuristic(candidate.vertex));
                    summary.relaxed += 1;
                    visitor.edge_relaxed(edge, mode.id, graph);
                    visitor.discover_vertex(&candidate, graph);
                } else {
                    visitor.edge_not_relaxed(edge, mode.id, graph);
                }
            }
        }

        visitor.finish_vertex(&object, graph);
        if visitor.should_stop() {
            summary.stopped_early = true;
            break;
        }
    }

    debug!(
        "Search done: {} labels examined, {} relaxations, {} queued entries left{}",
        summary.examined,
        summary.relaxed,
        frontier.len(),
        if summary.stopped_early {
            ", stopped by visitor"
        } else {
            ""
        }
    );
    Ok(summary)
}
