//! Per-label search results

use hashbrown::HashMap;
use petgraph::graph::EdgeIndex;

use super::CompoundObject;
use crate::{Cost, NO_TRIP, TripId, UNREACHABLE, VertexId};

/// What the search knows about one compound object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexData {
    /// Best known cost from the sources
    pub potential: Cost,
    /// Object this one was reached from, `None` for sources
    pub predecessor: Option<CompoundObject>,
    /// Network edge traversed from the predecessor
    pub edge: Option<EdgeIndex>,
    /// Scheduled trip the traveller is aboard, [`NO_TRIP`] otherwise
    pub trip: TripId,
    /// Time spent waiting before the last traversal
    pub wait_time: Cost,
    /// Delay applied to the requested departure
    pub shift_time: Cost,
}

impl VertexData {
    pub fn source(potential: Cost) -> Self {
        Self {
            potential,
            predecessor: None,
            edge: None,
            trip: NO_TRIP,
            wait_time: 0.0,
            shift_time: 0.0,
        }
    }
}

/// Vertex data of every labelled object. Owned by the caller so the
/// results survive the search.
#[derive(Debug, Clone, Default)]
pub struct VertexDataMap {
    data: HashMap<CompoundObject, VertexData>,
}

impl VertexDataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a source object with a zero potential
    pub fn insert_source(&mut self, object: CompoundObject) {
        self.insert_source_with(object, 0.0);
    }

    /// Seed a source object with an initial potential
    pub fn insert_source_with(&mut self, object: CompoundObject, potential: Cost) {
        self.data.insert(object, VertexData::source(potential));
    }

    pub fn get(&self, object: &CompoundObject) -> Option<&VertexData> {
        self.data.get(object)
    }

    /// Stored potential, infinite for objects never reached
    #[inline]
    pub fn potential(&self, object: &CompoundObject) -> Cost {
        self.data.get(object).map_or(UNREACHABLE, |d| d.potential)
    }

    pub fn set(&mut self, object: CompoundObject, data: VertexData) {
        self.data.insert(object, data);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CompoundObject, &VertexData)> {
        self.data.iter()
    }

    /// Cheapest object at a vertex, whatever its mode and state
    pub fn best_at(&self, vertex: VertexId) -> Option<(CompoundObject, &VertexData)> {
        self.data
            .iter()
            .filter(|(object, _)| object.vertex == vertex)
            .min_by(|(a, da), (b, db)| da.potential.total_cmp(&db.potential).then(a.cmp(b)))
            .map(|(object, data)| (*object, data))
    }

    /// Objects from a source to `target`, following predecessors.
    /// Empty if `target` was never reached.
    pub fn path_to(&self, target: CompoundObject) -> Vec<CompoundObject> {
        let mut path = Vec::new();
        let mut current = Some(target);
        while let Some(object) = current {
            let Some(data) = self.data.get(&object) else {
                break;
            };
            path.push(object);
            // A predecessor chain can't be longer than the map
            if path.len() > self.data.len() {
                log::warn!("Predecessor cycle detected while tracing {target:?}");
                return Vec::new();
            }
            current = data.predecessor;
        }
        path.reverse();
        path
    }
}
