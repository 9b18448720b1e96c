//! Forecast API types and domain data structures.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tempora_cache::FetchError;

/// Current conditions, normalized: Celsius, km/h, km, hPa, mm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_kph: f64,
    pub visibility_km: f64,
    pub pressure_hpa: f64,
    pub precipitation_mm: f64,
    pub weather_code: i32,
    pub is_day: bool,
}

/// One hourly forecast entry. Optional series the request left out are
/// backfilled during normalization, so these fields are always populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourSample {
    pub time: NaiveDateTime,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub precipitation_mm: f64,
    pub wind_kph: f64,
    pub weather_code: i32,
}

/// One daily forecast entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySample {
    pub date: NaiveDate,
    pub weather_code: i32,
    pub temp_max_c: f64,
    pub temp_min_c: f64,
    pub precipitation_sum_mm: Option<f64>,
    pub wind_max_kph: Option<f64>,
    pub humidity_max_pct: Option<u8>,
}

/// Complete forecast for one coordinate: all three blocks present, or the
/// fetch failed with a typed error — never a partial bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastBundle {
    pub current: CurrentConditions,
    pub hourly: Vec<HourSample>,
    pub daily: Vec<DaySample>,
    /// Offset of the location's local time from UTC, resolved server-side.
    pub utc_offset_seconds: i32,
    /// When the data was produced; the store time of the prior success when
    /// a cached copy was served.
    pub fetched_at: DateTime<Utc>,
    pub served_from_cache: bool,
}

/// Forecast retrieval errors
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Forecast service returned status {0}")]
    Status(u16),
    #[error("Incomplete forecast data: {0}")]
    IncompleteData(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<FetchError> for ForecastError {
    fn from(e: FetchError) -> Self {
        ForecastError::Network(e.to_string())
    }
}

// API response types

#[derive(Debug, Deserialize)]
pub struct ApiForecast {
    pub current: Option<ApiCurrent>,
    pub hourly: Option<ApiHourly>,
    pub daily: Option<ApiDaily>,
    #[serde(default)]
    pub utc_offset_seconds: i32,
}

#[derive(Debug, Deserialize)]
pub struct ApiCurrent {
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
    pub apparent_temperature: f64,
    pub precipitation: f64,
    #[serde(default)]
    pub is_day: u8,
    pub weather_code: i32,
    pub surface_pressure: f64,
    /// Meters; normalized to kilometers downstream.
    pub visibility: f64,
    pub wind_speed_10m: f64,
}

#[derive(Debug, Deserialize)]
pub struct ApiHourly {
    pub time: Vec<String>,
    pub temperature_2m: Vec<f64>,
    pub apparent_temperature: Option<Vec<f64>>,
    pub precipitation: Option<Vec<f64>>,
    pub wind_speed_10m: Option<Vec<f64>>,
    pub weather_code: Vec<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ApiDaily {
    pub time: Vec<String>,
    pub weather_code: Vec<i32>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
    pub precipitation_sum: Option<Vec<f64>>,
    pub wind_speed_10m_max: Option<Vec<f64>>,
    pub relative_humidity_2m_max: Option<Vec<f64>>,
}
