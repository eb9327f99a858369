//! Data model for multimodal routing
//!
//! Contains transport modes, the in-memory network, timetables and
//! forbidden movement sequences.

pub mod mode;
pub mod network;
pub mod restriction;
pub mod timetable;

pub use mode::{TrafficRules, TransportMode};
pub use network::{MultimodalNetwork, NetworkEdge, NetworkVertex};
pub use restriction::{CostPerModeClass, Restriction, Restrictions};
pub use timetable::{Departure, Timetable};
