use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::CompoundObject;
use crate::Cost;

#[derive(Debug, Clone, Copy)]
struct Entry {
    priority: Cost,
    potential: Cost,
    seq: u64,
    object: CompoundObject,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap on priority, first pushed first popped on ties
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

/// Priority queue of compound objects with lazy invalidation: improving an
/// object pushes it again, and the caller drops popped entries whose
/// potential is worse than the stored one.
#[derive(Debug, Default)]
pub(crate) struct Frontier {
    heap: BinaryHeap<Entry>,
    seq: u64,
}

impl Frontier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, object: CompoundObject, potential: Cost, priority: Cost) {
        self.heap.push(Entry {
            priority,
            potential,
            seq: self.seq,
            object,
        });
        self.seq += 1;
    }

    /// Pop the object with the lowest priority, with the potential it was
    /// pushed with
    pub(crate) fn pop(&mut self) -> Option<(CompoundObject, Cost)> {
        self.heap.pop().map(|e| (e.object, e.potential))
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}
