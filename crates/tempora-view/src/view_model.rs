//! Pure projections from forecast data to display-ready view models.

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use tempora_forecast::{CurrentConditions, DaySample, HourSample};

use crate::weather_code::weather_info;

/// Current conditions, formatted for direct display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentView {
    pub temperature: String,
    pub icon: &'static str,
    pub description: &'static str,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
    pub visibility: String,
    pub pressure: String,
    pub precipitation: String,
}

/// Format current conditions: integer Celsius, one-decimal kilometers, raw
/// km/h, hPa and mm values as delivered.
pub fn current_view(current: &CurrentConditions) -> CurrentView {
    let info = weather_info(current.weather_code);
    CurrentView {
        temperature: format!("{}°C", current.temperature_c.round() as i64),
        icon: info.icon,
        description: info.description,
        feels_like: format!("{}°C", current.feels_like_c.round() as i64),
        humidity: format!("{}%", current.humidity_pct),
        wind: format!("{} km/h", current.wind_kph),
        visibility: format!("{:.1} km", current.visibility_km),
        pressure: format!("{} hPa", current.pressure_hpa),
        precipitation: format!("{} mm", current.precipitation_mm),
    }
}

/// Series feeding the hourly chart.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyViewModel {
    pub labels: Vec<String>,
    pub temps: Vec<f64>,
    pub precipitation: Vec<f64>,
    pub wind: Vec<f64>,
    pub codes: Vec<i32>,
}

pub fn hourly_view_model(hourly: &[HourSample]) -> HourlyViewModel {
    HourlyViewModel {
        labels: hourly.iter().map(|h| format!("{}h", h.time.hour())).collect(),
        temps: hourly.iter().map(|h| h.temperature_c).collect(),
        precipitation: hourly.iter().map(|h| h.precipitation_mm).collect(),
        wind: hourly.iter().map(|h| h.wind_kph).collect(),
        codes: hourly.iter().map(|h| h.weather_code).collect(),
    }
}

/// Series feeding the daily chart.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyViewModel {
    pub labels: Vec<String>,
    pub temp_max: Vec<f64>,
    pub temp_min: Vec<f64>,
    pub icons: Vec<&'static str>,
}

pub fn daily_view_model(daily: &[DaySample]) -> DailyViewModel {
    DailyViewModel {
        labels: daily.iter().map(|d| d.date.format("%a %-d").to_string()).collect(),
        temp_max: daily.iter().map(|d| d.temp_max_c).collect(),
        temp_min: daily.iter().map(|d| d.temp_min_c).collect(),
        icons: daily.iter().map(|d| weather_info(d.weather_code).icon).collect(),
    }
}

/// One forecast card with the per-day details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCard {
    pub day_name: String,
    pub date: String,
    pub icon: &'static str,
    pub description: &'static str,
    pub high: String,
    pub low: String,
    pub precipitation: Option<String>,
    pub wind: Option<String>,
    pub humidity: Option<String>,
}

/// Build the forecast card list; the first entry is labeled "Today".
pub fn daily_cards(daily: &[DaySample]) -> Vec<DailyCard> {
    daily
        .iter()
        .enumerate()
        .map(|(i, day)| {
            let info = weather_info(day.weather_code);
            DailyCard {
                day_name: if i == 0 {
                    "Today".to_string()
                } else {
                    day.date.format("%A").to_string()
                },
                date: day.date.format("%b %-d").to_string(),
                icon: info.icon,
                description: info.description,
                high: format!("{}°", day.temp_max_c.round() as i64),
                low: format!("{}°", day.temp_min_c.round() as i64),
                precipitation: day.precipitation_sum_mm.map(|p| format!("{} mm", p)),
                wind: day.wind_max_kph.map(|w| format!("{} km/h", w)),
                humidity: day.humidity_max_pct.map(|h| format!("{}%", h)),
            }
        })
        .collect()
}

/// "Updated at" label in the target location's local time, derived from the
/// server-resolved UTC offset.
pub fn last_update_label(fetched_at: DateTime<Utc>, utc_offset_seconds: i32) -> String {
    let shifted = FixedOffset::east_opt(utc_offset_seconds)
        .map(|offset| fetched_at.with_timezone(&offset).format("%H:%M").to_string());
    shifted.unwrap_or_else(|| fetched_at.format("%H:%M").to_string())
}
