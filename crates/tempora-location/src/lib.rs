//! Location resolution for Tempora.
//!
//! Turns a free-text query or a device coordinate into a canonical place,
//! and drives the type-ahead suggestion flow with its ordering guarantee.

pub mod device;
pub mod geocoding;
pub mod types;

pub use device::{resolve_by_device, DeviceLocator, FixedPosition, PositionOptions, PositionSource};
pub use geocoding::{GeocodingClient, SuggestSession};
pub use types::{LocationError, Place, Position, CURRENT_LOCATION_LABEL};
