//! TOML scenarios

use std::fs;
use std::path::Path;

use geo::Point;
use intermodal_core::model::{
    Departure, MultimodalNetwork, NetworkEdge, NetworkVertex, Restriction, Restrictions,
    Timetable, TrafficRules, TransportMode,
};
use intermodal_core::prelude::{Automaton, Roadmap, RoutingConfig, RoutingRequest, route_many};
use intermodal_core::time::deserialize_time;
use intermodal_core::{Cost, ModeId, RoadEdgeId, Time, TripId, UNREACHABLE, VertexId};
use log::info;
use serde::{Deserialize, Serialize};

use crate::ScenarioError;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: RoutingConfig,
    pub modes: Vec<TransportMode>,
    pub vertices: Vec<VertexSpec>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
    #[serde(default)]
    pub restrictions: Vec<RestrictionSpec>,
    #[serde(default)]
    pub requests: Vec<RequestSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VertexSpec {
    pub id: u64,
    pub lon: f64,
    pub lat: f64,
    /// Vehicles that can be parked here
    #[serde(default = "TrafficRules::empty")]
    pub parking: TrafficRules,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgeSpec {
    pub from: u64,
    pub to: u64,
    #[serde(default)]
    pub road_edge: Option<RoadEdgeId>,
    /// Defaults to `TRANSIT` for edges with a timetable
    #[serde(default)]
    pub traffic_rules: Option<TrafficRules>,
    pub length: f64,
    /// Also add the reverse edge
    #[serde(default)]
    pub bidirectional: bool,
    #[serde(default)]
    pub timetable: Option<Vec<DepartureSpec>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepartureSpec {
    pub trip: TripId,
    #[serde(deserialize_with = "deserialize_time")]
    pub departure: Time,
    #[serde(deserialize_with = "deserialize_time")]
    pub arrival: Time,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestrictionSpec {
    pub road_edges: Vec<RoadEdgeId>,
    pub penalties: Vec<PenaltySpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PenaltySpec {
    pub mode_class: TrafficRules,
    /// Seconds, the movement is forbidden when omitted
    #[serde(default = "forbidden")]
    pub cost: Cost,
}

fn forbidden() -> Cost {
    UNREACHABLE
}

/// Vertex given by id, or by coordinates snapped to the closest vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Vertex { vertex: u64 },
    Point { lon: f64, lat: f64 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestSpec {
    pub origin: Location,
    pub destination: Location,
    #[serde(deserialize_with = "deserialize_time")]
    pub departure: Time,
    pub modes: Vec<ModeId>,
    #[serde(default)]
    pub start_modes: Vec<ModeId>,
}

/// Network, automaton and requests ready to be routed
#[derive(Debug)]
pub struct BuiltScenario {
    pub network: MultimodalNetwork,
    pub automaton: Automaton<RoadEdgeId>,
    pub requests: Vec<RoutingRequest>,
    pub config: RoutingConfig,
}

/// Result of one request, as printed by the binary
#[derive(Debug, Clone, Serialize)]
pub struct RequestOutcome {
    pub request: usize,
    pub roadmap: Option<Roadmap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Scenario {
    /// # Errors
    ///
    /// Returns an error if the document is not a valid scenario.
    pub fn from_toml(content: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(content)?)
    }

    /// # Errors
    ///
    /// Returns an error if the file can't be read or is not a valid scenario.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Build the network, the restriction automaton and the requests
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate ids, edges or requests referencing
    /// unknown vertices, invalid lengths, or locations that can't be
    /// snapped.
    pub fn build(&self) -> Result<BuiltScenario, ScenarioError> {
        let mut network = MultimodalNetwork::new();
        for mode in &self.modes {
            network.add_mode(mode.clone())?;
        }
        for vertex in &self.vertices {
            network.add_vertex(
                NetworkVertex::new(vertex.id, Point::new(vertex.lon, vertex.lat))
                    .with_parking(vertex.parking),
            )?;
        }
        for edge in &self.edges {
            let from = vertex_index(&network, edge.from)?;
            let to = vertex_index(&network, edge.to)?;
            let network_edge = edge.to_network_edge();
            if edge.bidirectional {
                network.add_edge(to, from, network_edge.clone())?;
            }
            network.add_edge(from, to, network_edge)?;
        }

        let restrictions: Restrictions = self
            .restrictions
            .iter()
            .map(|r| {
                let penalties = r
                    .penalties
                    .iter()
                    .map(|p| (p.mode_class, p.cost))
                    .collect();
                Restriction::new(r.road_edges.clone(), penalties)
            })
            .collect();
        let automaton = Automaton::build(&restrictions)?;

        let requests = self
            .requests
            .iter()
            .map(|r| {
                Ok(RoutingRequest::new(
                    locate(&network, r.origin)?,
                    locate(&network, r.destination)?,
                    r.departure,
                    r.modes.clone(),
                )
                .starting_with(r.start_modes.clone()))
            })
            .collect::<Result<Vec<_>, ScenarioError>>()?;

        info!(
            "Scenario built: {} vertices, {} edges, {} modes, {} restrictions, {} requests",
            network.vertex_count(),
            network.edge_count(),
            self.modes.len(),
            restrictions.len(),
            requests.len()
        );
        Ok(BuiltScenario {
            network,
            automaton,
            requests,
            config: self.config.clone(),
        })
    }
}

impl EdgeSpec {
    fn to_network_edge(&self) -> NetworkEdge {
        match &self.timetable {
            Some(departures) => {
                let timetable = Timetable::new(
                    departures
                        .iter()
                        .map(|d| Departure {
                            trip: d.trip,
                            departure: d.departure,
                            arrival: d.arrival,
                        })
                        .collect(),
                );
                let mut edge = NetworkEdge::scheduled(timetable, self.length);
                edge.road_edge = self.road_edge;
                if let Some(rules) = self.traffic_rules {
                    edge.traffic_rules = rules;
                }
                edge
            }
            None => NetworkEdge {
                road_edge: self.road_edge,
                traffic_rules: self.traffic_rules.unwrap_or(TrafficRules::empty()),
                length: self.length,
                timetable: None,
            },
        }
    }
}

impl BuiltScenario {
    /// Route every request, in parallel
    pub fn run(&self) -> Vec<RequestOutcome> {
        route_many(&self.network, &self.automaton, &self.requests, &self.config)
            .into_iter()
            .enumerate()
            .map(|(request, result)| match result {
                Ok(roadmap) => RequestOutcome {
                    request,
                    roadmap,
                    error: None,
                },
                Err(e) => RequestOutcome {
                    request,
                    roadmap: None,
                    error: Some(e.to_string()),
                },
            })
            .collect()
    }
}

fn vertex_index(network: &MultimodalNetwork, id: u64) -> Result<VertexId, ScenarioError> {
    network
        .vertex_by_id(id)
        .ok_or(ScenarioError::UnknownVertex(id))
}

fn locate(network: &MultimodalNetwork, location: Location) -> Result<VertexId, ScenarioError> {
    match location {
        Location::Vertex { vertex } => vertex_index(network, vertex),
        Location::Point { lon, lat } => network
            .nearest_vertex(&Point::new(lon, lat))
            .ok_or(ScenarioError::NoVertexNear { lon, lat }),
    }
}
