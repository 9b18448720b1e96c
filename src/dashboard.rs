//! Orchestration: one user action in, one painted dashboard out.

use std::sync::Arc;

use tempora_cache::Fetch;
use tempora_core::{AppError, Config};
use tempora_forecast::{ForecastBundle, ForecastClient, ForecastError, ForecastOptions};
use tempora_location::{
    resolve_by_device, DeviceLocator, GeocodingClient, LocationError, Place, PositionSource,
    SuggestSession,
};
use tempora_view::{
    background_for, current_view, daily_cards, daily_view_model, hourly_view_model,
    last_update_label, AssetRef, ChartBackend, ChartRenderer, CurrentView, DailyCard,
};

/// Everything the surface needs for one refresh.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub location_label: String,
    pub current: CurrentView,
    pub background: AssetRef,
    pub cards: Vec<DailyCard>,
    /// Local time of the data at the target location; the prior success's
    /// capture time when a cached copy was served.
    pub updated_at: String,
    pub from_cache: bool,
    pub charts_rendered: bool,
}

/// The retrieval-and-render pipeline behind one dashboard.
///
/// Generic over the transport so the offline cache can sit beneath every
/// network call without the pipeline knowing.
pub struct Dashboard<F: Fetch + Clone> {
    geocoder: GeocodingClient<F>,
    forecast: ForecastClient<F>,
    suggestions: SuggestSession<F>,
    charts: ChartRenderer,
}

fn forecast_options(config: &Config) -> ForecastOptions {
    ForecastOptions {
        hourly_window: config.forecast.hourly_window_hours as usize,
        include_feels_like: config.forecast.include_hourly_feels_like,
        include_precipitation: config.forecast.include_hourly_precipitation,
        include_wind: config.forecast.include_hourly_wind,
        forecast_days: config.forecast.forecast_days,
    }
}

impl<F: Fetch + Clone> Dashboard<F> {
    pub fn new(
        fetcher: F,
        config: &Config,
        chart_backend: Option<Arc<dyn ChartBackend>>,
    ) -> Self {
        let geocoder = GeocodingClient::new(fetcher.clone(), &config.location.language);
        let suggestions = SuggestSession::new(
            GeocodingClient::new(fetcher.clone(), &config.location.language),
            config.location.suggest_min_chars,
            config.location.suggest_count,
        );
        Self {
            geocoder,
            forecast: ForecastClient::new(fetcher, forecast_options(config)),
            suggestions,
            charts: ChartRenderer::new(chart_backend),
        }
    }

    /// Like `new`, but with both collaborators pointed at explicit base URLs.
    pub fn with_base_urls(
        fetcher: F,
        config: &Config,
        chart_backend: Option<Arc<dyn ChartBackend>>,
        geocoding_base: &str,
        forecast_base: &str,
    ) -> Self {
        let language = &config.location.language;
        let geocoder = GeocodingClient::with_base_url(fetcher.clone(), language, geocoding_base);
        let suggestions = SuggestSession::new(
            GeocodingClient::with_base_url(fetcher.clone(), language, geocoding_base),
            config.location.suggest_min_chars,
            config.location.suggest_count,
        );
        Self {
            geocoder,
            forecast: ForecastClient::with_base_url(
                fetcher,
                forecast_options(config),
                forecast_base,
            ),
            suggestions,
            charts: ChartRenderer::new(chart_backend),
        }
    }

    /// Search flow: free-text query to a painted dashboard.
    pub async fn search(&self, query: &str) -> Result<DashboardView, AppError> {
        let place = self
            .geocoder
            .resolve_by_name(query)
            .await
            .map_err(map_location_error)?;
        tracing::info!("resolved {:?} to {}", query, place.name);
        self.refresh(place).await
    }

    /// Geolocate flow: device position to a painted dashboard.
    pub async fn locate<S: PositionSource>(
        &self,
        locator: &DeviceLocator<S>,
    ) -> Result<DashboardView, AppError> {
        let place = resolve_by_device(locator, &self.geocoder)
            .await
            .map_err(map_location_error)?;
        self.refresh(place).await
    }

    /// Type-ahead lookup. `None` means leave the current list untouched.
    pub async fn suggest(&self, prefix: &str) -> Option<Vec<Place>> {
        self.suggestions.suggest(prefix).await
    }

    async fn refresh(&self, place: Place) -> Result<DashboardView, AppError> {
        let bundle = self
            .forecast
            .fetch(place.latitude, place.longitude)
            .await
            .map_err(map_forecast_error)?;

        let charts_rendered = self.render_charts(&bundle);
        Ok(assemble_view(&place, &bundle, charts_rendered))
    }

    /// Rebuild both charts. A missing or failing chart backend degrades to
    /// data-only display, never to a user-visible error.
    fn render_charts(&self, bundle: &ForecastBundle) -> bool {
        if !self.charts.is_available() {
            return false;
        }

        let hourly = hourly_view_model(&bundle.hourly);
        if let Err(e) = self.charts.render_hourly(&hourly) {
            tracing::warn!("hourly chart render failed: {}", e);
            return false;
        }

        let daily = daily_view_model(&bundle.daily);
        if let Err(e) = self.charts.render_daily(&daily) {
            tracing::warn!("daily chart render failed: {}", e);
            return false;
        }
        true
    }
}

fn assemble_view(place: &Place, bundle: &ForecastBundle, charts_rendered: bool) -> DashboardView {
    DashboardView {
        location_label: place.name.clone(),
        current: current_view(&bundle.current),
        background: background_for(bundle.current.weather_code, bundle.current.is_day),
        cards: daily_cards(&bundle.daily),
        updated_at: last_update_label(bundle.fetched_at, bundle.utc_offset_seconds),
        from_cache: bundle.served_from_cache,
        charts_rendered,
    }
}

fn map_location_error(e: LocationError) -> AppError {
    match e {
        LocationError::NotFound(query) => AppError::NotFound(query),
        LocationError::Network(m) | LocationError::Parse(m) => AppError::Network(m),
        unavailable => AppError::Unavailable(unavailable.to_string()),
    }
}

fn map_forecast_error(e: ForecastError) -> AppError {
    match e {
        ForecastError::Network(m) => AppError::Network(m),
        ForecastError::Status(s) => {
            AppError::Network(format!("forecast service returned status {}", s))
        }
        ForecastError::IncompleteData(m) => AppError::IncompleteData(m),
        ForecastError::Parse(m) => AppError::IncompleteData(m),
    }
}
