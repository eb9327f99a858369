use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid scenario: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] intermodal_core::Error),
    #[error("Unknown vertex id: {0}")]
    UnknownVertex(u64),
    #[error("No vertex near ({lon}, {lat})")]
    NoVertexNear { lon: f64, lat: f64 },
}
