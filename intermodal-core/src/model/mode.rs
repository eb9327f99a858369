//! Transport modes and traffic rules

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::ModeId;

bitflags! {
    /// Who may use a network edge. Also used as the class of a transport
    /// mode when looking up restriction penalties.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct TrafficRules: u32 {
        const PEDESTRIAN = 1 << 0;
        const BICYCLE = 1 << 1;
        const CAR = 1 << 2;
        const TAXI = 1 << 3;
        const CAR_POOL = 1 << 4;
        const TRUCK = 1 << 5;
        const TRANSIT = 1 << 6;
    }
}

/// A way of travelling over the network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportMode {
    pub id: ModeId,
    pub name: String,
    /// Rules an edge must allow for this mode to use it
    pub traffic_rules: TrafficRules,
    /// Cruise speed on edges without timetable
    #[serde(default)]
    pub speed_kmh: f64,
    /// Scheduled services, edges are traversed following their timetable
    #[serde(default)]
    pub public_transport: bool,
    /// Private vehicles must be parked before switching to another mode
    #[serde(default)]
    pub needs_parking: bool,
}

impl TransportMode {
    pub fn new(id: ModeId, name: impl Into<String>, traffic_rules: TrafficRules) -> Self {
        Self {
            id,
            name: name.into(),
            traffic_rules,
            speed_kmh: 0.0,
            public_transport: false,
            needs_parking: false,
        }
    }

    #[must_use]
    pub fn with_speed(mut self, speed_kmh: f64) -> Self {
        self.speed_kmh = speed_kmh;
        self
    }

    #[must_use]
    pub fn scheduled(mut self) -> Self {
        self.public_transport = true;
        self
    }

    #[must_use]
    pub fn parked(mut self) -> Self {
        self.needs_parking = true;
        self
    }

    /// Class used to index restriction penalty tables
    pub fn mode_class(&self) -> TrafficRules {
        self.traffic_rules
    }

    /// Speed in metres per second
    pub fn speed_mps(&self) -> f64 {
        self.speed_kmh / 3.6
    }

    /// Whether an edge allowing `edge_rules` can be used by this mode
    pub fn allowed_on(&self, edge_rules: TrafficRules) -> bool {
        !self.traffic_rules.is_empty() && edge_rules.contains(self.traffic_rules)
    }
}
