use crate::automaton::StateId;
use crate::{ModeId, VertexId};

/// Search label: the same vertex reached with another mode or another
/// restriction context is another node of the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompoundObject {
    pub vertex: VertexId,
    pub mode: ModeId,
    pub state: StateId,
}

impl CompoundObject {
    pub fn new(vertex: VertexId, mode: ModeId, state: StateId) -> Self {
        Self {
            vertex,
            mode,
            state,
        }
    }
}
