//! Presentation layer for Tempora.
//!
//! Pure mappings from forecast data to display-ready view models, plus the
//! chart slot manager. Binding view models to a concrete surface (terminal,
//! canvas, whatever) is the caller's job.

pub mod background;
pub mod chart;
pub mod view_model;
pub mod weather_code;

pub use background::{background_for, AssetKind, AssetRef};
pub use chart::{
    daily_chart_spec, hourly_chart_spec, ChartBackend, ChartError, ChartRenderer, ChartSpec,
};
pub use view_model::{
    current_view, daily_cards, daily_view_model, hourly_view_model, last_update_label,
    CurrentView, DailyCard, DailyViewModel, HourlyViewModel,
};
pub use weather_code::{weather_info, WeatherInfo};
