//! Centralized error types for the Tempora application.
//!
//! This module provides a typed error hierarchy that:
//! - Enables precise error handling throughout the codebase
//! - Provides user-friendly messages suitable for UI display
//! - Preserves full error context for debugging/logging

use thiserror::Error;

/// Top-level application error type.
///
/// Every failure that reaches the orchestration boundary is mapped to one of
/// these classes. Use `user_message()` to get the single message shown to the
/// user; the `Display` form keeps the technical detail for logs.
#[derive(Debug, Error)]
pub enum AppError {
    /// No geocoding match for the query
    #[error("No match for place: {0}")]
    NotFound(String),

    /// Device location denied, unsupported, or timed out
    #[error("Device location unavailable: {0}")]
    Unavailable(String),

    /// Transport failure with no cached fallback
    #[error("Network error: {0}")]
    Network(String),

    /// Response was missing an expected block
    #[error("Incomplete forecast data: {0}")]
    IncompleteData(String),

    /// Charting collaborator not loaded; display degrades to data-only
    #[error("Chart backend unavailable")]
    RenderUnavailable,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    ///
    /// These messages are designed to be actionable and non-technical.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "City not found",
            AppError::Unavailable(_) => "Could not determine your current location",
            AppError::Network(_) => "Could not load weather data. Check your connection.",
            AppError::IncompleteData(_) => "Weather data is incomplete right now. Try again.",
            AppError::RenderUnavailable => "Charts are unavailable",
            AppError::Config(_) => "Configuration problem. Check your settings.",
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }

    /// Whether this failure should be surfaced to the user at all.
    ///
    /// A missing chart backend degrades to a data-only display (the rest of
    /// the dashboard still renders); everything else is user-visible.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, AppError::RenderUnavailable)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Network(e.to_string())
    }
}
