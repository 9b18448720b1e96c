//! Forward/reverse geocoding and the type-ahead suggestion session.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;
use tempora_cache::{Fetch, NetFetcher};
use tracing::instrument;
use url::Url;

use crate::types::{LocationError, Place};

const GEOCODING_API_BASE: &str = "https://geocoding-api.open-meteo.com/v1";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Option<Vec<SearchResult>>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    name: String,
    latitude: f64,
    longitude: f64,
    admin1: Option<String>,
    country: Option<String>,
}

impl SearchResult {
    /// Display name in `"{name}, {admin1}, {country}"` form, skipping
    /// whichever parts the result does not carry.
    fn display_name(&self) -> String {
        let mut name = self.name.clone();
        if let Some(admin1) = self.admin1.as_deref().filter(|s| !s.is_empty()) {
            name.push_str(", ");
            name.push_str(admin1);
        }
        if let Some(country) = self.country.as_deref().filter(|s| !s.is_empty()) {
            name.push_str(", ");
            name.push_str(country);
        }
        name
    }

    fn into_place(self) -> Place {
        let name = self.display_name();
        Place {
            name,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Client for the geocoding collaborator.
pub struct GeocodingClient<F = NetFetcher> {
    fetcher: F,
    base_url: String,
    language: String,
}

impl<F: Fetch> GeocodingClient<F> {
    pub fn new(fetcher: F, language: &str) -> Self {
        Self {
            fetcher,
            base_url: GEOCODING_API_BASE.to_string(),
            language: language.to_string(),
        }
    }

    pub fn with_base_url(fetcher: F, language: &str, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.to_string(),
            language: language.to_string(),
        }
    }

    /// Resolve a free-text query to its single best match.
    #[instrument(skip(self), level = "info")]
    pub async fn resolve_by_name(&self, query: &str) -> Result<Place, LocationError> {
        let mut results = self.search(query, 1).await?;
        if results.is_empty() {
            return Err(LocationError::NotFound(query.to_string()));
        }
        Ok(results.remove(0).into_place())
    }

    /// Multi-result lookup for type-ahead suggestions.
    pub async fn search_places(&self, query: &str, count: u32) -> Result<Vec<Place>, LocationError> {
        Ok(self
            .search(query, count)
            .await?
            .into_iter()
            .map(SearchResult::into_place)
            .collect())
    }

    /// Name a coordinate, or `None` when nothing resolves.
    ///
    /// The coordinates go to the forward-search endpoint, matching the
    /// upstream service's behavior for reverse lookups. Every failure mode
    /// collapses to `None`; the caller falls back to a generic label.
    pub async fn reverse_lookup(&self, latitude: f64, longitude: f64) -> Option<String> {
        let url = format!(
            "{}/search?latitude={}&longitude={}&count=1&language={}&format=json",
            self.base_url, latitude, longitude, self.language
        );
        let url = Url::parse(&url).ok()?;

        let response = match self.fetcher.get(url).await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("reverse lookup request failed: {}", e);
                return None;
            }
        };
        if !response.is_success() {
            tracing::debug!("reverse lookup returned status {}", response.status);
            return None;
        }

        let body: SearchResponse = match response.json() {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!("reverse lookup parse error: {}", e);
                return None;
            }
        };

        body.results?.into_iter().next().map(|r| r.display_name())
    }

    async fn search(&self, query: &str, count: u32) -> Result<Vec<SearchResult>, LocationError> {
        let url = format!(
            "{}/search?name={}&count={}&language={}&format=json",
            self.base_url,
            urlencoding::encode(query),
            count,
            self.language
        );
        let url = Url::parse(&url).map_err(|e| LocationError::Parse(e.to_string()))?;

        let response = self.fetcher.get(url).await?;
        if !response.is_success() {
            return Err(LocationError::Network(format!(
                "geocoding returned status {}",
                response.status
            )));
        }

        let body: SearchResponse = response
            .json()
            .map_err(|e| LocationError::Parse(e.to_string()))?;
        Ok(body.results.unwrap_or_default())
    }
}

/// Type-ahead suggestion session.
///
/// Tolerates rapid repeated calls: responses are applied in request-issue
/// order, and a response superseded by a newer request's response is
/// discarded instead of overwriting it.
pub struct SuggestSession<F = NetFetcher> {
    client: GeocodingClient<F>,
    min_chars: usize,
    count: u32,
    issued: AtomicU64,
    applied: AtomicU64,
}

impl<F: Fetch> SuggestSession<F> {
    pub fn new(client: GeocodingClient<F>, min_chars: usize, count: u32) -> Self {
        Self {
            client,
            min_chars,
            count,
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        }
    }

    /// Look up suggestions for a query prefix.
    ///
    /// `Some(batch)` is the list to display (possibly empty, which hides the
    /// list); `None` means leave the current display untouched — either the
    /// request failed or a newer request's results are already showing.
    pub async fn suggest(&self, prefix: &str) -> Option<Vec<Place>> {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        let prefix = prefix.trim();
        if prefix.chars().count() < self.min_chars {
            return self.apply(seq, Vec::new());
        }

        match self.client.search_places(prefix, self.count).await {
            Ok(places) => self.apply(seq, places),
            Err(e) => {
                tracing::debug!("suggestion lookup failed: {}", e);
                None
            }
        }
    }

    fn apply(&self, seq: u64, places: Vec<Place>) -> Option<Vec<Place>> {
        // fetch_max keeps the newest applied sequence; anything below it
        // arrived too late and must not overwrite newer results.
        let prev = self.applied.fetch_max(seq, Ordering::SeqCst);
        if prev > seq {
            tracing::debug!("discarding stale suggestion response #{}", seq);
            None
        } else {
            Some(places)
        }
    }
}
