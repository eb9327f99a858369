//! Lower bounds of the remaining cost, for A*

use geo::{Distance, Haversine, Point};
use log::debug;

use crate::model::MultimodalNetwork;
use crate::{Cost, Error, ModeId, VertexId};

/// Plain Dijkstra
pub fn zero_heuristic(_vertex: VertexId) -> Cost {
    0.0
}

/// Great-circle distance to the target at the fastest allowed speed.
///
/// Scheduled modes have no reliable top speed unless one is configured, so
/// allowing one without a speed turns the bound into zero.
#[derive(Debug, Clone)]
pub struct GeoHeuristic<'a> {
    network: &'a MultimodalNetwork,
    target: Point<f64>,
    max_speed: f64,
}

impl<'a> GeoHeuristic<'a> {
    /// # Errors
    ///
    /// Returns an error if the target vertex or one of the modes is unknown.
    pub fn new(
        network: &'a MultimodalNetwork,
        target: VertexId,
        modes: &[ModeId],
    ) -> Result<Self, Error> {
        let target = network
            .vertex(target)
            .ok_or(Error::InvalidVertex)?
            .geometry;

        let mut max_speed: f64 = 0.0;
        let mut bounded = true;
        for &id in modes {
            let mode = network.transport_mode(id).ok_or(Error::UnknownMode(id))?;
            let speed = mode.speed_mps();
            if mode.public_transport && speed <= 0.0 {
                bounded = false;
            }
            max_speed = max_speed.max(speed);
        }
        if !bounded || max_speed <= 0.0 {
            debug!("No speed bound for the allowed modes, heuristic disabled");
            max_speed = f64::INFINITY;
        }

        Ok(Self {
            network,
            target,
            max_speed,
        })
    }

    pub fn estimate(&self, vertex: VertexId) -> Cost {
        self.network.vertex(vertex).map_or(0.0, |v| {
            Haversine.distance(v.geometry, self.target) / self.max_speed
        })
    }
}
