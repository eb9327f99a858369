//! Multimodal label-setting search
//!
//! Labels are [`CompoundObject`]s: a vertex, the mode used to reach it and
//! the restriction automaton state. Results land in a caller-owned
//! [`VertexDataMap`], from which a [`Roadmap`] can be traced.

mod combined;
mod config;
mod cost;
mod graph;
mod heuristic;
mod object;
mod queue;
mod request;
mod roadmap;
mod vertex_data;
mod visitor;

#[cfg(test)]
mod search_tests;

pub use combined::{SearchSummary, combined_search, multimodal_search};
pub use config::{RoutingConfig, TransferRule};
pub use cost::{CostCalculator, DefaultCostCalculator, TravelTime};
pub use graph::{EdgeHandle, RestrictedGraph, RoutingGraph};
pub use heuristic::{GeoHeuristic, zero_heuristic};
pub use object::CompoundObject;
pub use request::{RoutingRequest, route, route_many};
pub use roadmap::{CostId, Costs, Leg, Roadmap, Step};
pub use vertex_data::{VertexData, VertexDataMap};
pub use visitor::{NullVisitor, RecordingVisitor, SearchEvent, TargetVisitor, Visitor};
