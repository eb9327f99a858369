//! Scheduled departures over a single network edge

use serde::{Deserialize, Serialize};

use crate::{Time, TripId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Departure {
    pub trip: TripId,
    pub departure: Time,
    pub arrival: Time,
}

/// Departures of the services running over an edge, sorted by departure time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timetable {
    departures: Vec<Departure>,
}

impl Timetable {
    pub fn new(mut departures: Vec<Departure>) -> Self {
        departures.sort_by_key(|d| (d.departure, d.trip));
        Self { departures }
    }

    pub fn departures(&self) -> &[Departure] {
        &self.departures
    }

    pub fn is_empty(&self) -> bool {
        self.departures.is_empty()
    }

    /// Earliest departure leaving at or after `earliest`
    pub fn next_departure(&self, earliest: Time) -> Option<&Departure> {
        let idx = self
            .departures
            .partition_point(|d| d.departure < earliest);
        self.departures.get(idx)
    }

    /// Departure of a given trip, if it leaves at or after `earliest`
    pub fn trip_departure(&self, trip: TripId, earliest: Time) -> Option<&Departure> {
        self.departures
            .iter()
            .find(|d| d.trip == trip && d.departure >= earliest)
    }
}
