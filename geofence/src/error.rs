use thiserror::Error;

/// Everything that can be wrong with the input of the evaluator or the estimator.
///
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GeoError {
    #[error("Latitude {0} is outside [-90, 90]")]
    BadLatitude(f64),
    #[error("Longitude {0} is outside [-180, 180]")]
    BadLongitude(f64),
    #[error("Fence {id}: invalid radius {radius} km")]
    BadRadius { id: String, radius: f64 },
    #[error("Fence '{0}' has no identifier")]
    MissingFenceId(String),
}
