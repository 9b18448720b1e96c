//! Forecast collaborator client.

use tempora_cache::{Fetch, NetFetcher};
use tracing::instrument;
use url::Url;

use crate::normalize::normalize;
use crate::types::{ApiForecast, ForecastBundle, ForecastError};

const FORECAST_API_BASE: &str = "https://api.open-meteo.com/v1";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,\
precipitation,is_day,weather_code,surface_pressure,wind_speed_10m,visibility";

const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,\
precipitation_sum,wind_speed_10m_max,relative_humidity_2m_max";

/// What one forecast request asks for.
///
/// The hourly window and the optional hourly series are configuration: 24 and
/// 48 hour windows are both supported, and each optional series can be
/// dropped from the request independently.
#[derive(Debug, Clone)]
pub struct ForecastOptions {
    pub hourly_window: usize,
    pub include_feels_like: bool,
    pub include_precipitation: bool,
    pub include_wind: bool,
    pub forecast_days: u32,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            hourly_window: 24,
            include_feels_like: true,
            include_precipitation: true,
            include_wind: true,
            forecast_days: 15,
        }
    }
}

impl ForecastOptions {
    fn hourly_fields(&self) -> String {
        let mut fields = vec!["temperature_2m"];
        if self.include_feels_like {
            fields.push("apparent_temperature");
        }
        if self.include_precipitation {
            fields.push("precipitation");
        }
        if self.include_wind {
            fields.push("wind_speed_10m");
        }
        fields.push("weather_code");
        fields.join(",")
    }
}

/// Client for the forecast collaborator.
pub struct ForecastClient<F = NetFetcher> {
    fetcher: F,
    base_url: String,
    options: ForecastOptions,
}

impl<F: Fetch> ForecastClient<F> {
    pub fn new(fetcher: F, options: ForecastOptions) -> Self {
        Self {
            fetcher,
            base_url: FORECAST_API_BASE.to_string(),
            options,
        }
    }

    pub fn with_base_url(fetcher: F, options: ForecastOptions, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.to_string(),
            options,
        }
    }

    pub fn options(&self) -> &ForecastOptions {
        &self.options
    }

    /// Fetch current + hourly + daily blocks for one coordinate, with the
    /// local timezone auto-detected server-side.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, latitude: f64, longitude: f64) -> Result<ForecastBundle, ForecastError> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&current={}&hourly={}&daily={}&forecast_days={}&timezone=auto",
            self.base_url,
            latitude,
            longitude,
            CURRENT_FIELDS,
            self.options.hourly_fields(),
            DAILY_FIELDS,
            self.options.forecast_days,
        );
        let url = Url::parse(&url).map_err(|e| ForecastError::Parse(e.to_string()))?;

        let response = self.fetcher.get(url).await?;
        if !response.is_success() {
            return Err(ForecastError::Status(response.status));
        }

        let api: ApiForecast = response
            .json()
            .map_err(|e| ForecastError::Parse(e.to_string()))?;

        normalize(
            api,
            &self.options,
            response.fetched_at,
            response.served_from_cache,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param, query_param_contains};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn forecast_json() -> serde_json::Value {
        serde_json::json!({
            "utc_offset_seconds": 7200,
            "current": {
                "temperature_2m": 31.4,
                "relative_humidity_2m": 30,
                "apparent_temperature": 30.2,
                "precipitation": 0.0,
                "is_day": 1,
                "weather_code": 0,
                "surface_pressure": 1014.0,
                "visibility": 40000.0,
                "wind_speed_10m": 9.7
            },
            "hourly": {
                "time": ["2026-08-06T00:00", "2026-08-06T01:00"],
                "temperature_2m": [24.0, 23.1],
                "apparent_temperature": [24.8, 23.9],
                "precipitation": [0.0, 0.0],
                "wind_speed_10m": [6.0, 5.4],
                "weather_code": [0, 0]
            },
            "daily": {
                "time": ["2026-08-06"],
                "weather_code": [0],
                "temperature_2m_max": [33.0],
                "temperature_2m_min": [19.0],
                "precipitation_sum": [0.0],
                "wind_speed_10m_max": [15.0],
                "relative_humidity_2m_max": [55]
            }
        })
    }

    fn client_for(server: &MockServer, options: ForecastOptions) -> ForecastClient {
        ForecastClient::with_base_url(
            NetFetcher::new().unwrap(),
            options,
            &format!("{}/v1", server.uri()),
        )
    }

    #[tokio::test]
    async fn fetch_requests_all_three_blocks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "40.42"))
            .and(query_param("longitude", "-3.7"))
            .and(query_param("forecast_days", "15"))
            .and(query_param("timezone", "auto"))
            .and(query_param_contains("hourly", "apparent_temperature"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_json()))
            .mount(&server)
            .await;

        let bundle = client_for(&server, ForecastOptions::default())
            .fetch(40.42, -3.7)
            .await
            .unwrap();

        assert_eq!(bundle.current.weather_code, 0);
        assert!(!bundle.hourly.is_empty());
        assert!(!bundle.daily.is_empty());
        assert!(!bundle.served_from_cache);
    }

    #[tokio::test]
    async fn disabled_series_are_left_out_of_the_request() {
        let server = MockServer::start().await;
        // Only matches when the hourly list is exactly the two base fields.
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("hourly", "temperature_2m,weather_code"))
            .respond_with(ResponseTemplate::new(200).set_body_json({
                let mut json = forecast_json();
                let hourly = json["hourly"].as_object_mut().unwrap();
                hourly.remove("apparent_temperature");
                hourly.remove("precipitation");
                hourly.remove("wind_speed_10m");
                json
            }))
            .mount(&server)
            .await;

        let options = ForecastOptions {
            include_feels_like: false,
            include_precipitation: false,
            include_wind: false,
            ..ForecastOptions::default()
        };
        let bundle = client_for(&server, options).fetch(40.42, -3.7).await.unwrap();
        assert_eq!(bundle.hourly[0].precipitation_mm, 0.0);
        assert_eq!(bundle.hourly[0].feels_like_c, bundle.hourly[0].temperature_c);
    }

    #[tokio::test]
    async fn missing_block_is_incomplete_data() {
        let server = MockServer::start().await;
        let mut json = forecast_json();
        json.as_object_mut().unwrap().remove("daily");
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json))
            .mount(&server)
            .await;

        let err = client_for(&server, ForecastOptions::default())
            .fetch(40.42, -3.7)
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastError::IncompleteData(_)));
    }

    #[tokio::test]
    async fn error_status_is_typed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = client_for(&server, ForecastOptions::default())
            .fetch(40.42, -3.7)
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastError::Status(429)));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_network_error() {
        let client = ForecastClient::with_base_url(
            NetFetcher::new().unwrap(),
            ForecastOptions::default(),
            "http://127.0.0.1:9/v1",
        );
        let err = client.fetch(40.42, -3.7).await.unwrap_err();
        assert!(matches!(err, ForecastError::Network(_)));
    }
}
