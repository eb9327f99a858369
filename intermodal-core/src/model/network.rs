//! In-memory multimodal network

use geo::Point;
use hashbrown::HashMap;
use log::debug;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use rstar::RTree;
use rstar::primitives::GeomWithData;

use super::{Timetable, TrafficRules, TransportMode};
use crate::{Error, ModeId, RoadEdgeId};

/// Vertex position in the spatial index, with its graph index
pub type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;

/// Network vertex (road intersection, stop, parking...)
#[derive(Debug, Clone)]
pub struct NetworkVertex {
    /// External identifier of the vertex
    pub id: u64,
    /// Longitude / latitude
    pub geometry: Point<f64>,
    /// Private vehicles which can be parked here
    pub parking: TrafficRules,
}

impl NetworkVertex {
    pub fn new(id: u64, geometry: Point<f64>) -> Self {
        Self {
            id,
            geometry,
            parking: TrafficRules::empty(),
        }
    }

    #[must_use]
    pub fn with_parking(mut self, parking: TrafficRules) -> Self {
        self.parking = parking;
        self
    }
}

/// Directed network edge
#[derive(Debug, Clone)]
pub struct NetworkEdge {
    /// Road section this edge belongs to, used by restriction sequences
    pub road_edge: Option<RoadEdgeId>,
    pub traffic_rules: TrafficRules,
    /// Length in metres
    pub length: f64,
    /// Scheduled services running over this edge
    pub timetable: Option<Timetable>,
}

impl NetworkEdge {
    pub fn road(road_edge: RoadEdgeId, traffic_rules: TrafficRules, length: f64) -> Self {
        Self {
            road_edge: Some(road_edge),
            traffic_rules,
            length,
            timetable: None,
        }
    }

    pub fn scheduled(timetable: Timetable, length: f64) -> Self {
        Self {
            road_edge: None,
            traffic_rules: TrafficRules::TRANSIT,
            length,
            timetable: Some(timetable),
        }
    }
}

/// Directed multimodal graph together with its transport modes
#[derive(Debug, Default)]
pub struct MultimodalNetwork {
    pub graph: DiGraph<NetworkVertex, NetworkEdge>,
    modes: HashMap<ModeId, TransportMode>,
    vertex_ids: HashMap<u64, NodeIndex>,
    rtree: RTree<IndexedPoint>,
}

impl MultimodalNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transport mode
    ///
    /// # Errors
    ///
    /// Returns an error if a mode with the same id is already registered.
    pub fn add_mode(&mut self, mode: TransportMode) -> Result<(), Error> {
        if self.modes.contains_key(&mode.id) {
            return Err(Error::InvalidData(format!(
                "Duplicate transport mode id {}",
                mode.id
            )));
        }
        self.modes.insert(mode.id, mode);
        Ok(())
    }

    pub fn transport_mode(&self, id: ModeId) -> Option<&TransportMode> {
        self.modes.get(&id)
    }

    pub fn modes(&self) -> impl Iterator<Item = &TransportMode> {
        self.modes.values()
    }

    /// Add a vertex and index its position
    ///
    /// # Errors
    ///
    /// Returns an error if the external id is already used.
    pub fn add_vertex(&mut self, vertex: NetworkVertex) -> Result<NodeIndex, Error> {
        if self.vertex_ids.contains_key(&vertex.id) {
            return Err(Error::InvalidData(format!(
                "Duplicate vertex id {}",
                vertex.id
            )));
        }
        let id = vertex.id;
        let position = [vertex.geometry.x(), vertex.geometry.y()];
        let index = self.graph.add_node(vertex);
        self.vertex_ids.insert(id, index);
        self.rtree.insert(IndexedPoint::new(position, index));
        Ok(index)
    }

    /// Add a directed edge between two existing vertices
    ///
    /// # Errors
    ///
    /// Returns an error if either vertex is missing or the length is not a
    /// finite non-negative number.
    pub fn add_edge(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        edge: NetworkEdge,
    ) -> Result<EdgeIndex, Error> {
        if self.graph.node_weight(from).is_none() || self.graph.node_weight(to).is_none() {
            return Err(Error::InvalidVertex);
        }
        if !edge.length.is_finite() || edge.length < 0.0 {
            return Err(Error::InvalidData(format!(
                "Invalid edge length {}",
                edge.length
            )));
        }
        Ok(self.graph.add_edge(from, to, edge))
    }

    pub fn vertex(&self, index: NodeIndex) -> Option<&NetworkVertex> {
        self.graph.node_weight(index)
    }

    pub fn edge(&self, index: EdgeIndex) -> Option<&NetworkEdge> {
        self.graph.edge_weight(index)
    }

    /// Graph index of the vertex with the given external id
    pub fn vertex_by_id(&self, id: u64) -> Option<NodeIndex> {
        self.vertex_ids.get(&id).copied()
    }

    pub fn find_edge(&self, from: NodeIndex, to: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(from, to)
    }

    /// Closest vertex to a point, in coordinate space
    pub fn nearest_vertex(&self, point: &Point<f64>) -> Option<NodeIndex> {
        let nearest = self
            .rtree
            .nearest_neighbor(&[point.x(), point.y()])
            .map(|p| p.data);
        if nearest.is_none() {
            debug!("No vertex close to {point:?}, the network is empty");
        }
        nearest
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
