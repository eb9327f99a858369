use thiserror::Error;

use crate::ModeId;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Unknown transport mode: {0}")]
    UnknownMode(ModeId),
    #[error("Search source has no vertex data entry")]
    MissingSource,
    #[error("Invalid vertex index")]
    InvalidVertex,
    #[error("Invalid edge index")]
    InvalidEdge,
    #[error("Automaton invariant violated: {0}")]
    AutomatonInvariant(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Invalid time value: {0}")]
    InvalidTime(String),
}
