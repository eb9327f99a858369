// Re-export key components
pub use crate::automaton::{Automaton, AutomatonSnapshot, INITIAL_STATE, StateId};
pub use crate::model::{
    Departure, MultimodalNetwork, NetworkEdge, NetworkVertex, Restriction, Restrictions,
    Timetable, TrafficRules, TransportMode,
};
pub use crate::routing::{
    CompoundObject, CostId, DefaultCostCalculator, Roadmap, RoutingConfig, RoutingRequest,
    VertexDataMap, combined_search, multimodal_search, route, route_many,
};
pub use crate::time::{format_time, parse_time};

// Core types
pub use crate::Cost;
pub use crate::Error;
pub use crate::ModeId;
pub use crate::RoadEdgeId;
pub use crate::Time; // seconds since midnight
pub use crate::VertexId;
