//! One-shot device position with browser-geolocation semantics: a bounded
//! timeout and tolerance for reusing a recently cached fix.

use std::future::Future;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tempora_cache::Fetch;

use crate::geocoding::GeocodingClient;
use crate::types::{LocationError, Place, Position, CURRENT_LOCATION_LABEL};

/// One-shot position request options.
#[derive(Debug, Clone, Copy)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Maximum age of a cached fix that may be reused.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(300),
        }
    }
}

/// Where device coordinates come from. Platform integrations implement this;
/// tests substitute fixed or failing sources.
pub trait PositionSource: Send + Sync {
    fn position(
        &self,
        high_accuracy: bool,
    ) -> impl Future<Output = Result<Position, LocationError>> + Send;
}

/// A fixed position, e.g. coordinates from configuration.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Position);

impl PositionSource for FixedPosition {
    async fn position(&self, _high_accuracy: bool) -> Result<Position, LocationError> {
        Ok(self.0)
    }
}

/// Drives one-shot position requests against a source.
pub struct DeviceLocator<S> {
    source: S,
    options: PositionOptions,
    last_fix: Mutex<Option<(Instant, Position)>>,
}

impl<S: PositionSource> DeviceLocator<S> {
    pub fn new(source: S, options: PositionOptions) -> Self {
        Self {
            source,
            options,
            last_fix: Mutex::new(None),
        }
    }

    /// Request the device position once.
    ///
    /// A fix younger than `maximum_age` is reused without touching the
    /// source; otherwise the source is queried under the configured timeout.
    pub async fn locate(&self) -> Result<Position, LocationError> {
        if let Some(position) = self.recent_fix() {
            tracing::debug!("reusing cached device fix");
            return Ok(position);
        }

        let position = tokio::time::timeout(
            self.options.timeout,
            self.source.position(self.options.high_accuracy),
        )
        .await
        .map_err(|_| LocationError::Timeout)??;

        *self.last_fix.lock() = Some((Instant::now(), position));
        Ok(position)
    }

    fn recent_fix(&self) -> Option<Position> {
        let guard = self.last_fix.lock();
        let (at, position) = guard.as_ref()?;
        // Strict: a zero maximum age means a cached fix is never acceptable.
        (at.elapsed() < self.options.maximum_age).then_some(*position)
    }
}

/// Resolve the device position to a `Place`.
///
/// When the coordinate cannot be named, the place is labeled "Current
/// location" rather than failing.
pub async fn resolve_by_device<S: PositionSource, F: Fetch>(
    locator: &DeviceLocator<S>,
    geocoder: &GeocodingClient<F>,
) -> Result<Place, LocationError> {
    let position = locator.locate().await?;
    tracing::info!(
        "device position: {:.4}, {:.4}",
        position.latitude,
        position.longitude
    );

    let name = geocoder
        .reverse_lookup(position.latitude, position.longitude)
        .await
        .unwrap_or_else(|| CURRENT_LOCATION_LABEL.to_string());

    Ok(Place {
        name,
        latitude: position.latitude,
        longitude: position.longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tempora_cache::NetFetcher;

    const SEATTLE: Position = Position {
        latitude: 47.6062,
        longitude: -122.3321,
        accuracy_meters: None,
    };

    struct CountingSource {
        calls: AtomicU32,
    }

    impl PositionSource for &CountingSource {
        async fn position(&self, _high_accuracy: bool) -> Result<Position, LocationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SEATTLE)
        }
    }

    struct StalledSource;

    impl PositionSource for StalledSource {
        async fn position(&self, _high_accuracy: bool) -> Result<Position, LocationError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(SEATTLE)
        }
    }

    struct DeniedSource;

    impl PositionSource for DeniedSource {
        async fn position(&self, _high_accuracy: bool) -> Result<Position, LocationError> {
            Err(LocationError::PermissionDenied)
        }
    }

    #[tokio::test]
    async fn recent_fix_is_reused() {
        let source = CountingSource {
            calls: AtomicU32::new(0),
        };
        let locator = DeviceLocator::new(&source, PositionOptions::default());

        locator.locate().await.unwrap();
        locator.locate().await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_maximum_age_always_queries_the_source() {
        let source = CountingSource {
            calls: AtomicU32::new(0),
        };
        let options = PositionOptions {
            maximum_age: Duration::ZERO,
            ..PositionOptions::default()
        };
        let locator = DeviceLocator::new(&source, options);

        locator.locate().await.unwrap();
        locator.locate().await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn slow_source_times_out() {
        let options = PositionOptions {
            timeout: Duration::from_millis(50),
            ..PositionOptions::default()
        };
        let locator = DeviceLocator::new(StalledSource, options);

        let err = locator.locate().await.unwrap_err();
        assert!(matches!(err, LocationError::Timeout));
    }

    #[tokio::test]
    async fn permission_denial_passes_through() {
        let locator = DeviceLocator::new(DeniedSource, PositionOptions::default());
        let err = locator.locate().await.unwrap_err();
        assert!(matches!(err, LocationError::PermissionDenied));
    }

    #[tokio::test]
    async fn unnamed_coordinate_falls_back_to_current_location_label() {
        // Geocoder pointed at a dead port: reverse lookup fails, the label
        // falls back instead of the whole resolution failing.
        let geocoder = GeocodingClient::with_base_url(
            NetFetcher::new().unwrap(),
            "en",
            "http://127.0.0.1:9/v1",
        );
        let locator = DeviceLocator::new(FixedPosition(SEATTLE), PositionOptions::default());

        let place = resolve_by_device(&locator, &geocoder).await.unwrap();
        assert_eq!(place.name, CURRENT_LOCATION_LABEL);
        assert!((place.latitude - SEATTLE.latitude).abs() < 1e-9);
    }
}
