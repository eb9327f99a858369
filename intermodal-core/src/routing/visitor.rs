//! Search observers
//!
//! The search reports its progress to a visitor, which may also ask it to
//! stop once it has what it needs.

use std::time::{Duration, Instant};

use log::{trace, warn};
use petgraph::graph::EdgeIndex;

use super::{CompoundObject, EdgeHandle};
use crate::{ModeId, VertexId};

pub trait Visitor<G: ?Sized> {
    /// An object got a better potential and was queued
    fn discover_vertex(&mut self, _object: &CompoundObject, _graph: &G) {}

    /// An object was popped from the frontier
    fn examine_vertex(&mut self, _object: &CompoundObject, _graph: &G) {}

    fn examine_edge(&mut self, _edge: EdgeHandle, _graph: &G) {}

    fn edge_relaxed(&mut self, _edge: EdgeHandle, _mode: ModeId, _graph: &G) {}

    fn edge_not_relaxed(&mut self, _edge: EdgeHandle, _mode: ModeId, _graph: &G) {}

    /// All out edges of a popped object were processed
    fn finish_vertex(&mut self, _object: &CompoundObject, _graph: &G) {}

    /// Checked after every finished object
    fn should_stop(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullVisitor;

impl<G: ?Sized> Visitor<G> for NullVisitor {}

/// Stops the search when a target vertex is finalized or a budget runs out
#[derive(Debug, Clone)]
pub struct TargetVisitor {
    target: VertexId,
    found: Option<CompoundObject>,
    examined: usize,
    max_examined: Option<usize>,
    budget: Option<Duration>,
    started: Instant,
    exhausted: bool,
}

impl TargetVisitor {
    pub fn new(target: VertexId) -> Self {
        Self {
            target,
            found: None,
            examined: 0,
            max_examined: None,
            budget: None,
            started: Instant::now(),
            exhausted: false,
        }
    }

    #[must_use]
    pub fn with_max_examined(mut self, max_examined: Option<usize>) -> Self {
        self.max_examined = max_examined;
        self
    }

    #[must_use]
    pub fn with_time_budget(mut self, budget: Option<Duration>) -> Self {
        self.budget = budget;
        self.started = Instant::now();
        self
    }

    /// First finalized object at the target
    pub fn found(&self) -> Option<CompoundObject> {
        self.found
    }

    /// Whether a budget stopped the search
    pub fn exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn examined(&self) -> usize {
        self.examined
    }
}

impl<G: ?Sized> Visitor<G> for TargetVisitor {
    fn examine_vertex(&mut self, _object: &CompoundObject, _graph: &G) {
        self.examined += 1;
        if self.exhausted {
            return;
        }
        if self.max_examined.is_some_and(|max| self.examined >= max) {
            warn!(
                "Search stopped after examining {} labels without reaching the target",
                self.examined
            );
            self.exhausted = true;
        } else if self
            .budget
            .is_some_and(|budget| self.started.elapsed() >= budget)
        {
            warn!(
                "Search time budget exhausted after {} labels",
                self.examined
            );
            self.exhausted = true;
        }
    }

    fn finish_vertex(&mut self, object: &CompoundObject, _graph: &G) {
        if self.found.is_none() && object.vertex == self.target {
            self.found = Some(*object);
        }
    }

    fn should_stop(&self) -> bool {
        self.found.is_some() || self.exhausted
    }
}

/// Event reported to a [`RecordingVisitor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEvent {
    Discover(CompoundObject),
    Examine(CompoundObject),
    ExamineEdge(EdgeIndex),
    Relaxed(EdgeIndex, ModeId),
    NotRelaxed(EdgeIndex, ModeId),
    Finish(CompoundObject),
}

/// Keeps every event in order
#[derive(Debug, Clone, Default)]
pub struct RecordingVisitor {
    pub events: Vec<SearchEvent>,
}

impl RecordingVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, event: SearchEvent) {
        trace!("{event:?}");
        self.events.push(event);
    }

    /// Objects in the order they were finalized
    pub fn finished(&self) -> impl Iterator<Item = CompoundObject> + '_ {
        self.events.iter().filter_map(|event| match event {
            SearchEvent::Finish(object) => Some(*object),
            _ => None,
        })
    }
}

impl<G: ?Sized> Visitor<G> for RecordingVisitor {
    fn discover_vertex(&mut self, object: &CompoundObject, _graph: &G) {
        self.record(SearchEvent::Discover(*object));
    }

    fn examine_vertex(&mut self, object: &CompoundObject, _graph: &G) {
        self.record(SearchEvent::Examine(*object));
    }

    fn examine_edge(&mut self, edge: EdgeHandle, _graph: &G) {
        self.record(SearchEvent::ExamineEdge(edge.id));
    }

    fn edge_relaxed(&mut self, edge: EdgeHandle, mode: ModeId, _graph: &G) {
        self.record(SearchEvent::Relaxed(edge.id, mode));
    }

    fn edge_not_relaxed(&mut self, edge: EdgeHandle, mode: ModeId, _graph: &G) {
        self.record(SearchEvent::NotRelaxed(edge.id, mode));
    }

    fn finish_vertex(&mut self, object: &CompoundObject, _graph: &G) {
        self.record(SearchEvent::Finish(*object));
    }
}
