//! Forecast retrieval for Tempora.
//!
//! Fetches current/hourly/daily blocks from the forecast collaborator,
//! validates completeness, and normalizes units into display-independent
//! domain types.

pub mod client;
pub mod normalize;
pub mod types;

pub use client::{ForecastClient, ForecastOptions};
pub use types::{
    CurrentConditions, DaySample, ForecastBundle, ForecastError, HourSample,
};
