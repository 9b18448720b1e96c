use serde::{Deserialize, Serialize};
use tempora_cache::FetchError;

/// Label used when the device gives coordinates but no resolvable name.
pub const CURRENT_LOCATION_LABEL: &str = "Current location";

/// A resolved place: canonical display name plus coordinates.
///
/// Immutable once constructed; lives for one user interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Raw device coordinates before any naming.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: Option<f64>,
}

/// Location service errors
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("No geocoding match for {0:?}")]
    NotFound(String),
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<FetchError> for LocationError {
    fn from(e: FetchError) -> Self {
        LocationError::Network(e.to_string())
    }
}
