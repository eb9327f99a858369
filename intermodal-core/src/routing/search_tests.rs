use geo::{Distance, Haversine, Point};
use hashbrown::HashMap;
use test_log::test;

use super::*;
use crate::automaton::{Automaton, INITIAL_STATE};
use crate::model::{
    Departure, MultimodalNetwork, NetworkEdge, NetworkVertex, Restriction, Timetable,
    TrafficRules, TransportMode,
};
use crate::{Error, ModeId, RoadEdgeId, VertexId};

const WALK: ModeId = 1;
const CAR: ModeId = 2;
const BUS: ModeId = 3;

const ROAD: TrafficRules = TrafficRules::PEDESTRIAN.union(TrafficRules::CAR);

fn network_with_modes() -> MultimodalNetwork {
    let mut network = MultimodalNetwork::new();
    // 1 m/s and 10 m/s, so costs read as metres
    network
        .add_mode(TransportMode::new(WALK, "walk", TrafficRules::PEDESTRIAN).with_speed(3.6))
        .unwrap();
    network
        .add_mode(
            TransportMode::new(CAR, "car", TrafficRules::CAR)
                .with_speed(36.0)
                .parked(),
        )
        .unwrap();
    network
        .add_mode(TransportMode::new(BUS, "bus", TrafficRules::TRANSIT).scheduled())
        .unwrap();
    network
}

fn add_vertex(network: &mut MultimodalNetwork, id: u64, lat: f64) -> VertexId {
    network
        .add_vertex(NetworkVertex::new(id, Point::new(0.0, lat)))
        .unwrap()
}

/// v0 -> v1 -> v2 with lengths 1 and 2, road edges 1 and 2
fn line_network() -> (MultimodalNetwork, [VertexId; 3]) {
    let mut network = network_with_modes();
    let v0 = add_vertex(&mut network, 0, 0.0);
    let v1 = add_vertex(&mut network, 1, 0.00001);
    let v2 = add_vertex(&mut network, 2, 0.00003);
    network
        .add_edge(v0, v1, NetworkEdge::road(1, ROAD, 1.0))
        .unwrap();
    network
        .add_edge(v1, v2, NetworkEdge::road(2, ROAD, 2.0))
        .unwrap();
    (network, [v0, v1, v2])
}

fn no_restrictions() -> Automaton<RoadEdgeId> {
    Automaton::new()
}

fn walk_from(vertex: VertexId) -> (Vec<CompoundObject>, VertexDataMap) {
    let source = CompoundObject::new(vertex, WALK, INITIAL_STATE);
    let mut vertex_data = VertexDataMap::new();
    vertex_data.insert_source(source);
    (vec![source], vertex_data)
}

fn search(
    network: &MultimodalNetwork,
    automaton: &Automaton<RoadEdgeId>,
    origin: VertexId,
    modes: &[ModeId],
    config: &RoutingConfig,
) -> VertexDataMap {
    let (sources, mut vertex_data) = walk_from(origin);
    let calculator = DefaultCostCalculator::new(network, 0, config);
    combined_search(
        network,
        automaton,
        &sources,
        &mut vertex_data,
        &calculator,
        modes,
        &mut NullVisitor,
        zero_heuristic,
    )
    .unwrap();
    vertex_data
}

fn best_potential(vertex_data: &VertexDataMap, vertex: VertexId) -> f64 {
    vertex_data
        .best_at(vertex)
        .map_or(f64::INFINITY, |(_, data)| data.potential)
}

#[test]
fn line_graph_potentials() {
    let (network, [v0, v1, v2]) = line_network();
    let vertex_data = search(
        &network,
        &no_restrictions(),
        v0,
        &[WALK],
        &RoutingConfig::default(),
    );

    let at = |v| CompoundObject::new(v, WALK, INITIAL_STATE);
    assert_eq!(vertex_data.potential(&at(v0)), 0.0);
    assert_eq!(vertex_data.potential(&at(v1)), 1.0);
    assert_eq!(vertex_data.potential(&at(v2)), 3.0);
    assert_eq!(vertex_data.get(&at(v2)).unwrap().predecessor, Some(at(v1)));
    assert_eq!(vertex_data.get(&at(v1)).unwrap().predecessor, Some(at(v0)));
    assert_eq!(vertex_data.get(&at(v0)).unwrap().predecessor, None);
}

#[test]
fn restriction_penalty_is_added() {
    let (network, [v0, v1, v2]) = line_network();
    let automaton = Automaton::build(&[Restriction::new(
        vec![1, 2],
        HashMap::from([(TrafficRules::PEDESTRIAN, 10.0)]),
    )])
    .unwrap();
    let vertex_data = search(&network, &automaton, v0, &[WALK], &RoutingConfig::default());

    let s1 = automaton.find_transition(INITIAL_STATE, 1).unwrap();
    let s2 = automaton.find_transition(s1, 2).unwrap();
    assert_ne!(s1, INITIAL_STATE);

    // The label at v1 carries the restriction context, not the initial one
    let restricted = CompoundObject::new(v1, WALK, s1);
    assert_eq!(vertex_data.potential(&restricted), 1.0);
    assert!(
        vertex_data
            .potential(&CompoundObject::new(v1, WALK, INITIAL_STATE))
            .is_infinite()
    );
    assert_eq!(
        vertex_data.potential(&CompoundObject::new(v2, WALK, s2)),
        13.0
    );
}

#[test]
fn penalty_only_hits_listed_mode_class() {
    let (network, [v0, _, v2]) = line_network();
    let automaton = Automaton::build(&[Restriction::new(
        vec![1, 2],
        HashMap::from([(TrafficRules::CAR, 10.0)]),
    )])
    .unwrap();
    let vertex_data = search(&network, &automaton, v0, &[WALK], &RoutingConfig::default());
    assert_eq!(best_potential(&vertex_data, v2), 3.0);
}

#[test]
fn unrelated_sequence_sharing_an_edge_adds_no_penalty() {
    let (network, [v0, v1, v2]) = line_network();
    let automaton = Automaton::build(&[
        Restriction::new(vec![1, 2], HashMap::from([(TrafficRules::PEDESTRIAN, 5.0)])),
        Restriction::new(vec![3, 1], HashMap::from([(TrafficRules::PEDESTRIAN, 9.0)])),
    ])
    .unwrap();
    let vertex_data = search(&network, &automaton, v0, &[WALK], &RoutingConfig::default());

    assert_eq!(best_potential(&vertex_data, v1), 1.0);
    assert_eq!(best_potential(&vertex_data, v2), 8.0);
}

#[test]
fn forbidden_sequence_takes_the_detour() {
    let (mut network, [v0, _, v2]) = line_network();
    let v3 = add_vertex(&mut network, 3, -0.00001);
    network
        .add_edge(v0, v3, NetworkEdge::road(3, ROAD, 2.0))
        .unwrap();
    network
        .add_edge(v3, v2, NetworkEdge::road(4, ROAD, 4.0))
        .unwrap();

    let automaton =
        Automaton::build(&[Restriction::forbidden(vec![1, 2], [TrafficRules::PEDESTRIAN])])
            .unwrap();
    let vertex_data = search(&network, &automaton, v0, &[WALK], &RoutingConfig::default());

    let (best, data) = vertex_data.best_at(v2).unwrap();
    assert_eq!(data.potential, 6.0);
    assert_eq!(data.predecessor.map(|p| p.vertex), Some(v3));
    assert_eq!(best.mode, WALK);
}

#[test]
fn multimodal_search_ignores_restrictions() {
    let (network, [v0, _, v2]) = line_network();
    let (sources, mut vertex_data) = walk_from(v0);
    let calculator = DefaultCostCalculator::new(&network, 0, &RoutingConfig::default());
    let summary = multimodal_search(
        &network,
        &sources,
        &mut vertex_data,
        &calculator,
        &[WALK],
        &mut NullVisitor,
        zero_heuristic,
    )
    .unwrap();

    assert_eq!(summary.examined, 3);
    assert!(!summary.stopped_early);
    assert_eq!(
        vertex_data.potential(&CompoundObject::new(v2, WALK, INITIAL_STATE)),
        3.0
    );
}

/// 4 x 4 grid, both directions, lengths a bit above the straight distance
fn grid_network() -> (MultimodalNetwork, Vec<VertexId>) {
    let mut network = network_with_modes();
    let mut vertices = Vec::new();
    for row in 0..4u32 {
        for col in 0..4u32 {
            let id = u64::from(row * 4 + col);
            let point = Point::new(f64::from(col) * 0.001, f64::from(row) * 0.001);
            vertices.push(
                network
                    .add_vertex(NetworkVertex::new(id, point).with_parking(TrafficRules::CAR))
                    .unwrap(),
            );
        }
    }

    let mut road: RoadEdgeId = 0;
    let mut connect = |network: &mut MultimodalNetwork, a: usize, b: usize| {
        let pa = network.vertex(vertices[a]).unwrap().geometry;
        let pb = network.vertex(vertices[b]).unwrap().geometry;
        let detour = 1.0 + ((a * 7 + b * 3) % 5) as f64 * 0.2;
        let length = Haversine.distance(pa, pb) * detour;
        for (from, to) in [(a, b), (b, a)] {
            road += 1;
            network
                .add_edge(
                    vertices[from],
                    vertices[to],
                    NetworkEdge::road(road, ROAD, length),
                )
                .unwrap();
        }
    };
    for row in 0..4 {
        for col in 0..4 {
            let idx = row * 4 + col;
            if col < 3 {
                connect(&mut network, idx, idx + 1);
            }
            if row < 3 {
                connect(&mut network, idx, idx + 4);
            }
        }
    }
    (network, vertices)
}

#[test]
fn objects_are_finalized_in_potential_order() {
    let (network, vertices) = grid_network();
    let (sources, mut vertex_data) = walk_from(vertices[0]);
    let config = RoutingConfig::default().with_transfer(WALK, CAR, 5.0);
    let calculator = DefaultCostCalculator::new(&network, 0, &config);
    let mut visitor = RecordingVisitor::new();
    combined_search(
        &network,
        &no_restrictions(),
        &sources,
        &mut vertex_data,
        &calculator,
        &[WALK, CAR],
        &mut visitor,
        zero_heuristic,
    )
    .unwrap();

    let potentials: Vec<f64> = visitor
        .finished()
        .map(|object| vertex_data.potential(&object))
        .collect();
    assert_eq!(potentials.first(), Some(&0.0));
    assert!(potentials.windows(2).all(|w| w[0] <= w[1]));
    // Every vertex is reached on foot and by car
    assert_eq!(potentials.len(), 2 * vertices.len());
}

#[test]
fn a_star_matches_dijkstra() {
    let (network, vertices) = grid_network();
    let automaton = no_restrictions();
    for &target in &[vertices[15], vertices[6], vertices[12]] {
        let request = RoutingRequest::new(vertices[0], target, 8 * 3600, vec![WALK]);
        let dijkstra = route(&network, &automaton, &request, &RoutingConfig::default())
            .unwrap()
            .unwrap();
        let a_star = route(
            &network,
            &automaton,
            &request,
            &RoutingConfig::default().with_heuristic(),
        )
        .unwrap()
        .unwrap();
        let expected = dijkstra.total_cost(CostId::Duration);
        assert!((a_star.total_cost(CostId::Duration) - expected).abs() < 1e-6);
        assert!(expected > 0.0);
    }
}

#[test]
fn sources_are_discovered_first() {
    let (network, [v0, _, _]) = line_network();
    let (sources, mut vertex_data) = walk_from(v0);
    let config = RoutingConfig::default();
    let calculator = DefaultCostCalculator::new(&network, 0, &config);
    let mut visitor = RecordingVisitor::new();
    combined_search(
        &network,
        &no_restrictions(),
        &sources,
        &mut vertex_data,
        &calculator,
        &[WALK],
        &mut visitor,
        zero_heuristic,
    )
    .unwrap();

    assert_eq!(visitor.events[0], SearchEvent::Discover(sources[0]));
    assert_eq!(visitor.events[1], SearchEvent::Examine(sources[0]));
    let discovered = visitor
        .events
        .iter()
        .filter(|event| matches!(event, SearchEvent::Discover(object) if *object == sources[0]))
        .count();
    assert_eq!(discovered, 1);
}

#[test]
fn modes_only_use_edges_they_are_allowed_on() {
    let mut network = network_with_modes();
    let v0 = add_vertex(&mut network, 0, 0.0);
    let v1 = add_vertex(&mut network, 1, 0.001);
    let footway = network
        .add_edge(v0, v1, NetworkEdge::road(1, TrafficRules::PEDESTRIAN, 50.0))
        .unwrap();

    let source = CompoundObject::new(v0, CAR, INITIAL_STATE);
    let mut vertex_data = VertexDataMap::new();
    vertex_data.insert_source(source);
    let config = RoutingConfig {
        default_transfer_cost: Some(0.0),
        ..RoutingConfig::default()
    };
    let calculator = DefaultCostCalculator::new(&network, 0, &config);
    let mut visitor = RecordingVisitor::new();
    combined_search(
        &network,
        &no_restrictions(),
        &[source],
        &mut vertex_data,
        &calculator,
        &[WALK, CAR],
        &mut visitor,
        zero_heuristic,
    )
    .unwrap();

    assert!(visitor.events.contains(&SearchEvent::NotRelaxed(footway, CAR)));
    assert!(!visitor.events.contains(&SearchEvent::Relaxed(footway, CAR)));
    assert!(
        vertex_data
            .potential(&CompoundObject::new(v1, CAR, INITIAL_STATE))
            .is_infinite()
    );
    // Leaving the car needs a parking at v0
    assert!(vertex_data.best_at(v1).is_none());
}

#[test]
fn parking_allows_switching_to_walk() {
    let mut network = network_with_modes();
    let v0 = add_vertex(&mut network, 0, 0.0);
    let v1 = network
        .add_vertex(
            NetworkVertex::new(1, Point::new(0.0, 0.001)).with_parking(TrafficRules::CAR),
        )
        .unwrap();
    let v2 = add_vertex(&mut network, 2, 0.002);
    network
        .add_edge(v0, v1, NetworkEdge::road(1, TrafficRules::CAR, 100.0))
        .unwrap();
    network
        .add_edge(v1, v2, NetworkEdge::road(2, TrafficRules::PEDESTRIAN, 30.0))
        .unwrap();

    let config = RoutingConfig::default().with_transfer(CAR, WALK, 60.0);
    let request = RoutingRequest::new(v0, v2, 0, vec![CAR, WALK]).starting_with(vec![CAR]);
    let roadmap = route(&network, &no_restrictions(), &request, &config)
        .unwrap()
        .unwrap();

    // 10 s driving, 60 s to park, 30 s walking
    assert_eq!(roadmap.total_cost(CostId::Duration), 100.0);
    assert_eq!(roadmap.total_cost(CostId::Distance), 130.0);
    let modes: Vec<ModeId> = roadmap.iter().map(|step| step.mode).collect();
    assert_eq!(modes, vec![CAR, WALK]);
}

#[test]
fn unknown_mode_aborts() {
    let (network, [v0, _, _]) = line_network();
    let (sources, mut vertex_data) = walk_from(v0);
    let calculator = DefaultCostCalculator::new(&network, 0, &RoutingConfig::default());
    let result = combined_search(
        &network,
        &no_restrictions(),
        &sources,
        &mut vertex_data,
        &calculator,
        &[WALK, 99],
        &mut NullVisitor,
        zero_heuristic,
    );
    assert_eq!(result, Err(Error::UnknownMode(99)));
}

#[test]
fn source_without_vertex_data_aborts() {
    let (network, [v0, _, _]) = line_network();
    let calculator = DefaultCostCalculator::new(&network, 0, &RoutingConfig::default());
    let mut vertex_data = VertexDataMap::new();
    let result = combined_search(
        &network,
        &no_restrictions(),
        &[CompoundObject::new(v0, WALK, INITIAL_STATE)],
        &mut vertex_data,
        &calculator,
        &[WALK],
        &mut NullVisitor,
        zero_heuristic,
    );
    assert_eq!(result, Err(Error::MissingSource));
}

#[test]
fn target_visitor_stops_at_target() {
    let (network, [v0, v1, _]) = line_network();
    let (sources, mut vertex_data) = walk_from(v0);
    let calculator = DefaultCostCalculator::new(&network, 0, &RoutingConfig::default());
    let mut visitor = TargetVisitor::new(v1);
    let summary = combined_search(
        &network,
        &no_restrictions(),
        &sources,
        &mut vertex_data,
        &calculator,
        &[WALK],
        &mut visitor,
        zero_heuristic,
    )
    .unwrap();

    assert!(summary.stopped_early);
    assert_eq!(summary.examined, 2);
    assert_eq!(
        visitor.found(),
        Some(CompoundObject::new(v1, WALK, INITIAL_STATE))
    );
    assert!(!visitor.exhausted());
}

#[test]
fn examination_budget_gives_up() {
    let (network, [v0, _, v2]) = line_network();
    let config = RoutingConfig {
        max_examined: Some(1),
        ..RoutingConfig::default()
    };
    let request = RoutingRequest::new(v0, v2, 0, vec![WALK]);
    assert_eq!(
        route(&network, &no_restrictions(), &request, &config),
        Ok(None)
    );
}

#[test]
fn unreachable_destination_yields_none() {
    let (network, [v0, _, v2]) = line_network();
    let request = RoutingRequest::new(v2, v0, 0, vec![WALK]);
    assert_eq!(
        route(
            &network,
            &no_restrictions(),
            &request,
            &RoutingConfig::default()
        ),
        Ok(None)
    );
}

#[test]
fn origin_is_destination() {
    let (network, [v0, _, _]) = line_network();
    let request = RoutingRequest::new(v0, v0, 3600, vec![WALK]);
    let roadmap = route(
        &network,
        &no_restrictions(),
        &request,
        &RoutingConfig::default(),
    )
    .unwrap()
    .unwrap();
    assert!(roadmap.is_empty());
    assert_eq!(roadmap.departure, 3600);
    assert_eq!(roadmap.arrival, 3600);
}

/// Walk 100 m to a stop, then a bus leaving at 1000 and arriving at 1500
fn bus_network() -> (MultimodalNetwork, [VertexId; 3]) {
    let mut network = network_with_modes();
    let home = add_vertex(&mut network, 0, 0.0);
    let stop = add_vertex(&mut network, 1, 0.001);
    let work = add_vertex(&mut network, 2, 0.02);
    network
        .add_edge(home, stop, NetworkEdge::road(1, ROAD, 100.0))
        .unwrap();
    let timetable = Timetable::new(vec![
        Departure {
            trip: 5,
            departure: 1000,
            arrival: 1500,
        },
        Departure {
            trip: 6,
            departure: 2000,
            arrival: 2500,
        },
    ]);
    network
        .add_edge(stop, work, NetworkEdge::scheduled(timetable, 2000.0))
        .unwrap();
    (network, [home, stop, work])
}

#[test]
fn bus_ride_waits_for_departure() {
    let (network, [home, _, work]) = bus_network();
    let config = RoutingConfig::default().with_transfer(WALK, BUS, 0.0);
    let request = RoutingRequest::new(home, work, 800, vec![WALK, BUS]).starting_with(vec![WALK]);
    let roadmap = route(&network, &no_restrictions(), &request, &config)
        .unwrap()
        .unwrap();

    assert_eq!(roadmap.len(), 2);
    assert_eq!(roadmap.step(1).and_then(|s| s.trip), Some(5));
    assert_eq!(roadmap.total_cost(CostId::Wait), 100.0);
    assert_eq!(roadmap.total_cost(CostId::Duration), 700.0);
    assert_eq!(roadmap.departure, 800);
    assert_eq!(roadmap.arrival, 1500);

    let legs = roadmap.legs();
    assert_eq!(legs.len(), 2);
    assert_eq!(legs[0].mode, WALK);
    assert_eq!(legs[1].trip, Some(5));
}

#[test]
fn departure_shift_removes_initial_wait() {
    let (network, [home, _, work]) = bus_network();
    let config = RoutingConfig {
        allow_departure_shift: true,
        ..RoutingConfig::default().with_transfer(WALK, BUS, 0.0)
    };
    let request = RoutingRequest::new(home, work, 800, vec![WALK, BUS]).starting_with(vec![WALK]);
    let roadmap = route(&network, &no_restrictions(), &request, &config)
        .unwrap()
        .unwrap();

    assert_eq!(roadmap.total_cost(CostId::Wait), 0.0);
    assert_eq!(roadmap.total_cost(CostId::Duration), 600.0);
    assert_eq!(roadmap.departure, 900);
    assert_eq!(roadmap.arrival, 1500);
}

#[test]
fn missing_transfer_rule_forbids_boarding() {
    let (network, [home, _, work]) = bus_network();
    let request = RoutingRequest::new(home, work, 800, vec![WALK, BUS]).starting_with(vec![WALK]);
    assert_eq!(
        route(
            &network,
            &no_restrictions(),
            &request,
            &RoutingConfig::default()
        ),
        Ok(None)
    );
}

#[test]
fn route_many_keeps_request_order() {
    let (network, [v0, v1, v2]) = line_network();
    let requests = vec![
        RoutingRequest::new(v0, v2, 0, vec![WALK]),
        RoutingRequest::new(v2, v0, 0, vec![WALK]),
        RoutingRequest::new(v0, v1, 0, vec![WALK]),
    ];
    let results = route_many(
        &network,
        &no_restrictions(),
        &requests,
        &RoutingConfig::default(),
    );

    assert_eq!(results.len(), 3);
    let durations: Vec<Option<f64>> = results
        .into_iter()
        .map(|r| r.unwrap().map(|roadmap| roadmap.total_cost(CostId::Duration)))
        .collect();
    assert_eq!(durations, vec![Some(3.0), None, Some(1.0)]);
}
