//! Scenario front end for the multimodal router.
//!
//! A scenario is a TOML document describing transport modes, a network,
//! restricted movements and routing requests.

mod error;
pub mod scenario;

pub use error::ScenarioError;
pub use scenario::{BuiltScenario, Location, RequestOutcome, Scenario};
