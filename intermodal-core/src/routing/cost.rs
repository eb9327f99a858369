//! Edge traversal and mode change costs

use hashbrown::HashMap;

use super::{EdgeHandle, RoutingConfig};
use crate::model::{MultimodalNetwork, TransportMode};
use crate::{Cost, ModeId, NO_TRIP, Time, TripId, UNREACHABLE};

/// Outcome of traversing an edge with a given mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelTime {
    pub cost: Cost,
    pub shift_time: Cost,
    pub trip: TripId,
    pub wait_time: Cost,
}

impl TravelTime {
    pub fn unreachable(shift_time: Cost) -> Self {
        Self {
            cost: UNREACHABLE,
            shift_time,
            trip: NO_TRIP,
            wait_time: 0.0,
        }
    }
}

pub trait CostCalculator {
    /// Cost of switching from `from` to `to` before traversing `edge`.
    /// [`UNREACHABLE`] forbids the switch.
    fn transfer_time(&self, edge: EdgeHandle, from: &TransportMode, to: &TransportMode) -> Cost;

    /// Cost of traversing `edge` with `mode`, given the state of the label
    /// the traversal starts from
    fn travel_time(
        &self,
        edge: EdgeHandle,
        mode: &TransportMode,
        potential: Cost,
        shift_time: Cost,
        trip: TripId,
    ) -> TravelTime;
}

/// Speeds for private modes, timetables for public transport, configured
/// transfer costs and parking constraints for mode changes
#[derive(Debug, Clone)]
pub struct DefaultCostCalculator<'a> {
    network: &'a MultimodalNetwork,
    departure: Time,
    allow_departure_shift: bool,
    min_transfer_time: Cost,
    default_transfer_cost: Option<Cost>,
    transfers: HashMap<(ModeId, ModeId), Cost>,
}

impl<'a> DefaultCostCalculator<'a> {
    pub fn new(network: &'a MultimodalNetwork, departure: Time, config: &RoutingConfig) -> Self {
        let transfers = config
            .transfers
            .iter()
            .map(|rule| ((rule.from, rule.to), rule.cost))
            .collect();
        Self {
            network,
            departure,
            allow_departure_shift: config.allow_departure_shift,
            min_transfer_time: config.min_transfer_time,
            default_transfer_cost: config.default_transfer_cost,
            transfers,
        }
    }

    fn scheduled_travel_time(
        &self,
        edge: EdgeHandle,
        potential: Cost,
        shift_time: Cost,
        trip: TripId,
    ) -> TravelTime {
        let Some(timetable) = self
            .network
            .edge(edge.id)
            .and_then(|e| e.timetable.as_ref())
        else {
            return TravelTime::unreachable(shift_time);
        };

        let clock = f64::from(self.departure) + shift_time + potential;

        // Still aboard: ride on without waiting
        if trip != NO_TRIP {
            if let Some(next) = timetable.trip_departure(trip, to_time(clock)) {
                return TravelTime {
                    cost: f64::from(next.arrival) - clock,
                    shift_time,
                    trip,
                    wait_time: 0.0,
                };
            }
        }

        let earliest = if trip == NO_TRIP {
            clock
        } else {
            clock + self.min_transfer_time
        };
        let Some(boarding) = timetable.next_departure(to_time(earliest)) else {
            return TravelTime::unreachable(shift_time);
        };
        if boarding.arrival < boarding.departure {
            return TravelTime::unreachable(shift_time);
        }

        let wait_time = f64::from(boarding.departure) - clock;
        let cost = f64::from(boarding.arrival) - clock;
        if self.allow_departure_shift && trip == NO_TRIP && shift_time == 0.0 {
            // Leave later rather than wait at the stop
            return TravelTime {
                cost: cost - wait_time,
                shift_time: wait_time,
                trip: boarding.trip,
                wait_time: 0.0,
            };
        }
        TravelTime {
            cost,
            shift_time,
            trip: boarding.trip,
            wait_time,
        }
    }
}

/// Earliest whole second at or after `clock`
fn to_time(clock: f64) -> Time {
    clock.ceil().clamp(0.0, f64::from(Time::MAX)) as Time
}

impl CostCalculator for DefaultCostCalculator<'_> {
    fn transfer_time(&self, edge: EdgeHandle, from: &TransportMode, to: &TransportMode) -> Cost {
        if from.id == to.id {
            return 0.0;
        }
        if from.needs_parking {
            let can_park = self
                .network
                .vertex(edge.source)
                .is_some_and(|v| v.parking.contains(from.traffic_rules));
            if !can_park {
                return UNREACHABLE;
            }
        }
        self.transfers
            .get(&(from.id, to.id))
            .copied()
            .or(self.default_transfer_cost)
            .unwrap_or(UNREACHABLE)
    }

    fn travel_time(
        &self,
        edge: EdgeHandle,
        mode: &TransportMode,
        potential: Cost,
        shift_time: Cost,
        trip: TripId,
    ) -> TravelTime {
        if mode.public_transport {
            return self.scheduled_travel_time(edge, potential, shift_time, trip);
        }

        let speed = mode.speed_mps();
        let Some(edge_data) = self.network.edge(edge.id) else {
            return TravelTime::unreachable(shift_time);
        };
        if !speed.is_finite() || speed <= 0.0 {
            return TravelTime::unreachable(shift_time);
        }
        TravelTime {
            cost: edge_data.length / speed,
            shift_time,
            trip: NO_TRIP,
            wait_time: 0.0,
        }
    }
}
