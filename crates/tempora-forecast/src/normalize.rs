//! Validation and unit normalization of raw forecast responses.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::client::ForecastOptions;
use crate::types::{
    ApiCurrent, ApiDaily, ApiForecast, ApiHourly, CurrentConditions, DaySample, ForecastBundle,
    ForecastError, HourSample,
};

const HOURLY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DAILY_TIME_FORMAT: &str = "%Y-%m-%d";

/// Turn a raw response into a validated, unit-normalized bundle.
///
/// All three blocks must be present and internally consistent; anything else
/// is `IncompleteData` rather than a partially populated bundle.
pub fn normalize(
    api: ApiForecast,
    options: &ForecastOptions,
    fetched_at: DateTime<Utc>,
    served_from_cache: bool,
) -> Result<ForecastBundle, ForecastError> {
    let current = api
        .current
        .ok_or_else(|| ForecastError::IncompleteData("missing current block".into()))?;
    let hourly = api
        .hourly
        .ok_or_else(|| ForecastError::IncompleteData("missing hourly block".into()))?;
    let daily = api
        .daily
        .ok_or_else(|| ForecastError::IncompleteData("missing daily block".into()))?;

    Ok(ForecastBundle {
        current: current_from_api(&current),
        hourly: hourly_from_api(hourly, options.hourly_window)?,
        daily: daily_from_api(daily)?,
        utc_offset_seconds: api.utc_offset_seconds,
        fetched_at,
        served_from_cache,
    })
}

fn current_from_api(api: &ApiCurrent) -> CurrentConditions {
    CurrentConditions {
        temperature_c: api.temperature_2m,
        feels_like_c: api.apparent_temperature,
        humidity_pct: api.relative_humidity_2m.round().clamp(0.0, 100.0) as u8,
        wind_kph: api.wind_speed_10m,
        visibility_km: api.visibility / 1000.0,
        pressure_hpa: api.surface_pressure,
        precipitation_mm: api.precipitation,
        weather_code: api.weather_code,
        is_day: api.is_day == 1,
    }
}

fn hourly_from_api(api: ApiHourly, window: usize) -> Result<Vec<HourSample>, ForecastError> {
    let len = api.time.len();
    if api.temperature_2m.len() != len || api.weather_code.len() != len {
        return Err(ForecastError::IncompleteData(
            "hourly series lengths disagree".into(),
        ));
    }

    // Optional series that were not requested get a same-length stand-in:
    // apparent temperature mirrors temperature, the rest zero-fill.
    let feels_like = match checked(api.apparent_temperature, len, "apparent_temperature")? {
        Some(values) => values,
        None => api.temperature_2m.clone(),
    };
    let precipitation =
        checked(api.precipitation, len, "precipitation")?.unwrap_or_else(|| vec![0.0; len]);
    let wind =
        checked(api.wind_speed_10m, len, "wind_speed_10m")?.unwrap_or_else(|| vec![0.0; len]);

    let mut samples = Vec::with_capacity(window.min(len));
    for (i, time) in api.time.iter().take(window).enumerate() {
        let time = NaiveDateTime::parse_from_str(time, HOURLY_TIME_FORMAT)
            .map_err(|e| ForecastError::Parse(format!("hourly time {:?}: {}", time, e)))?;
        samples.push(HourSample {
            time,
            temperature_c: api.temperature_2m[i],
            feels_like_c: feels_like[i],
            precipitation_mm: precipitation[i],
            wind_kph: wind[i],
            weather_code: api.weather_code[i],
        });
    }
    Ok(samples)
}

fn checked(
    series: Option<Vec<f64>>,
    len: usize,
    field: &str,
) -> Result<Option<Vec<f64>>, ForecastError> {
    match series {
        Some(values) if values.len() == len => Ok(Some(values)),
        Some(_) => Err(ForecastError::IncompleteData(format!(
            "hourly {} length disagrees",
            field
        ))),
        None => Ok(None),
    }
}

fn daily_from_api(api: ApiDaily) -> Result<Vec<DaySample>, ForecastError> {
    let len = api.time.len();
    if api.weather_code.len() != len
        || api.temperature_2m_max.len() != len
        || api.temperature_2m_min.len() != len
    {
        return Err(ForecastError::IncompleteData(
            "daily series lengths disagree".into(),
        ));
    }

    let mut samples = Vec::with_capacity(len);
    for (i, date) in api.time.iter().enumerate() {
        let date = NaiveDate::parse_from_str(date, DAILY_TIME_FORMAT)
            .map_err(|e| ForecastError::Parse(format!("daily date {:?}: {}", date, e)))?;
        samples.push(DaySample {
            date,
            weather_code: api.weather_code[i],
            temp_max_c: api.temperature_2m_max[i],
            temp_min_c: api.temperature_2m_min[i],
            precipitation_sum_mm: api.precipitation_sum.as_ref().and_then(|v| v.get(i).copied()),
            wind_max_kph: api.wind_speed_10m_max.as_ref().and_then(|v| v.get(i).copied()),
            humidity_max_pct: api
                .relative_humidity_2m_max
                .as_ref()
                .and_then(|v| v.get(i).copied())
                .map(|h| h.round().clamp(0.0, 100.0) as u8),
        });
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_api_json() -> serde_json::Value {
        serde_json::json!({
            "utc_offset_seconds": 7200,
            "current": {
                "temperature_2m": 22.6,
                "relative_humidity_2m": 48,
                "apparent_temperature": 24.1,
                "precipitation": 0.0,
                "is_day": 1,
                "weather_code": 2,
                "surface_pressure": 1016.2,
                "visibility": 24140.0,
                "wind_speed_10m": 11.4
            },
            "hourly": {
                "time": ["2026-08-06T00:00", "2026-08-06T01:00", "2026-08-06T02:00"],
                "temperature_2m": [18.0, 17.5, 17.1],
                "apparent_temperature": [19.0, 18.4, 18.0],
                "precipitation": [0.0, 0.1, 0.0],
                "wind_speed_10m": [8.0, 7.5, 7.2],
                "weather_code": [1, 2, 3]
            },
            "daily": {
                "time": ["2026-08-06", "2026-08-07"],
                "weather_code": [2, 61],
                "temperature_2m_max": [28.0, 24.5],
                "temperature_2m_min": [17.0, 16.2],
                "precipitation_sum": [0.0, 4.2],
                "wind_speed_10m_max": [18.0, 22.5],
                "relative_humidity_2m_max": [70, 88]
            }
        })
    }

    fn options() -> ForecastOptions {
        ForecastOptions::default()
    }

    #[test]
    fn full_response_normalizes() {
        let api: ApiForecast = serde_json::from_value(full_api_json()).unwrap();
        let bundle = normalize(api, &options(), Utc::now(), false).unwrap();

        assert_eq!(bundle.utc_offset_seconds, 7200);
        assert!(bundle.current.is_day);
        assert_eq!(bundle.current.humidity_pct, 48);
        assert!((bundle.current.visibility_km - 24.14).abs() < 1e-9);
        assert_eq!(bundle.hourly.len(), 3);
        assert_eq!(bundle.daily.len(), 2);
        assert_eq!(bundle.daily[1].weather_code, 61);
        assert_eq!(bundle.daily[1].precipitation_sum_mm, Some(4.2));
        assert_eq!(bundle.daily[1].humidity_max_pct, Some(88));
    }

    #[test]
    fn missing_block_is_incomplete_data() {
        for block in ["current", "hourly", "daily"] {
            let mut json = full_api_json();
            json.as_object_mut().unwrap().remove(block);
            let api: ApiForecast = serde_json::from_value(json).unwrap();
            let err = normalize(api, &options(), Utc::now(), false).unwrap_err();
            assert!(
                matches!(err, ForecastError::IncompleteData(_)),
                "missing {} should be IncompleteData",
                block
            );
        }
    }

    #[test]
    fn absent_optional_hourly_series_are_backfilled() {
        let mut json = full_api_json();
        let hourly = json["hourly"].as_object_mut().unwrap();
        hourly.remove("apparent_temperature");
        hourly.remove("precipitation");
        hourly.remove("wind_speed_10m");

        let api: ApiForecast = serde_json::from_value(json).unwrap();
        let bundle = normalize(api, &options(), Utc::now(), false).unwrap();

        let first = &bundle.hourly[0];
        assert_eq!(first.feels_like_c, first.temperature_c);
        assert_eq!(first.precipitation_mm, 0.0);
        assert_eq!(first.wind_kph, 0.0);
    }

    #[test]
    fn mismatched_hourly_lengths_are_incomplete_data() {
        let mut json = full_api_json();
        json["hourly"]["temperature_2m"] = serde_json::json!([18.0]);
        let api: ApiForecast = serde_json::from_value(json).unwrap();
        assert!(matches!(
            normalize(api, &options(), Utc::now(), false).unwrap_err(),
            ForecastError::IncompleteData(_)
        ));

        let mut json = full_api_json();
        json["hourly"]["precipitation"] = serde_json::json!([0.0]);
        let api: ApiForecast = serde_json::from_value(json).unwrap();
        assert!(matches!(
            normalize(api, &options(), Utc::now(), false).unwrap_err(),
            ForecastError::IncompleteData(_)
        ));
    }

    #[test]
    fn hourly_series_truncate_to_the_window() {
        let hours: Vec<String> = (0..48)
            .map(|h| format!("2026-08-{:02}T{:02}:00", 6 + h / 24, h % 24))
            .collect();
        let temps: Vec<f64> = (0..48).map(|h| h as f64).collect();
        let codes: Vec<i32> = vec![0; 48];

        let mut json = full_api_json();
        json["hourly"] = serde_json::json!({
            "time": hours,
            "temperature_2m": temps,
            "weather_code": codes,
        });

        let api: ApiForecast = serde_json::from_value(json).unwrap();
        let opts = ForecastOptions {
            hourly_window: 24,
            ..ForecastOptions::default()
        };
        let bundle = normalize(api, &opts, Utc::now(), false).unwrap();
        assert_eq!(bundle.hourly.len(), 24);
        assert_eq!(bundle.hourly.last().unwrap().temperature_c, 23.0);
    }

    #[test]
    fn bad_timestamp_is_a_parse_error() {
        let mut json = full_api_json();
        json["hourly"]["time"][0] = serde_json::json!("yesterday");
        let api: ApiForecast = serde_json::from_value(json).unwrap();
        assert!(matches!(
            normalize(api, &options(), Utc::now(), false).unwrap_err(),
            ForecastError::Parse(_)
        ));
    }
}
