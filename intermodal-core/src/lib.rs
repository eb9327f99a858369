//! Multimodal routing core.
//!
//! Holds the restriction automaton built from forbidden movement sequences
//! and the label-setting search that walks a multimodal network while
//! tracking `(vertex, mode, automaton state)` labels.

pub mod automaton;
pub mod error;
pub mod model;
pub mod prelude;
pub mod routing;
pub mod time;

pub use error::Error;

/// Travel cost, in seconds
pub type Cost = f64;
/// Seconds since midnight
pub type Time = u32;
/// Identifier of a transport mode
pub type ModeId = u32;
/// Identifier of a scheduled trip
pub type TripId = u64;
/// Identifier of a road section, used as automaton symbol
pub type RoadEdgeId = u64;
/// Vertex of the routing network
pub type VertexId = petgraph::graph::NodeIndex;

/// Trip id meaning "not aboard any scheduled service"
pub const NO_TRIP: TripId = 0;

/// Cost of a forbidden transfer or an impossible traversal
pub const UNREACHABLE: Cost = f64::INFINITY;
