use thiserror::Error;

use tourguard_geofence::GeoError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Geo(#[from] GeoError),
    #[error("Unknown user {0}")]
    UnknownUser(String),
    #[error("Unknown alert {1} for user {0}")]
    UnknownAlert(String, String),
    #[error("Unknown notification {0}")]
    UnknownNotification(String),
    #[error("Missing required documents: {}", .0.join(", "))]
    MissingDocuments(Vec<String>),
    #[error("Storage error: {0}")]
    Store(String),
    #[error("External service error: {0}")]
    Capability(String),
    #[error("Bad configuration: {0}")]
    BadConfig(String),
    #[error("Bad file version {0}")]
    BadFileVersion(usize),
}
