//! Capabilities the search needs from a network

use petgraph::graph::EdgeIndex;
use petgraph::visit::EdgeRef;

use crate::model::{MultimodalNetwork, TrafficRules, TransportMode};
use crate::{ModeId, RoadEdgeId, VertexId};

/// Directed edge as seen by the search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeHandle {
    pub id: EdgeIndex,
    pub source: VertexId,
    pub target: VertexId,
}

pub trait RoutingGraph {
    fn out_edges(&self, vertex: VertexId) -> impl Iterator<Item = EdgeHandle>;

    /// Who may use the edge, empty for unknown edges
    fn traffic_rules(&self, edge: EdgeHandle) -> TrafficRules;

    fn transport_mode(&self, id: ModeId) -> Option<&TransportMode>;
}

/// Graph whose edges carry restriction symbols
pub trait RestrictedGraph: RoutingGraph {
    fn symbol(&self, edge: EdgeHandle) -> Option<RoadEdgeId>;
}

impl RoutingGraph for MultimodalNetwork {
    fn out_edges(&self, vertex: VertexId) -> impl Iterator<Item = EdgeHandle> {
        self.graph.edges(vertex).map(|edge| EdgeHandle {
            id: edge.id(),
            source: edge.source(),
            target: edge.target(),
        })
    }

    #[inline]
    fn traffic_rules(&self, edge: EdgeHandle) -> TrafficRules {
        self.edge(edge.id)
            .map_or(TrafficRules::empty(), |e| e.traffic_rules)
    }

    #[inline]
    fn transport_mode(&self, id: ModeId) -> Option<&TransportMode> {
        MultimodalNetwork::transport_mode(self, id)
    }
}

impl RestrictedGraph for MultimodalNetwork {
    #[inline]
    fn symbol(&self, edge: EdgeHandle) -> Option<RoadEdgeId> {
        self.edge(edge.id).and_then(|e| e.road_edge)
    }
}
