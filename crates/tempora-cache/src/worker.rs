//! Cache worker: install/activate lifecycle and the per-class fetch policies.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use url::Url;

use crate::fetch::{Fetch, FetchError, FetchedResponse, NetFetcher};
use crate::policy::{classify, GenerationNames, RequestClass};
use crate::store::{CacheStore, StoredResponse};

/// Outcome of populating the static generation.
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    pub shell_cached: usize,
    pub media_cached: usize,
    pub media_failed: usize,
}

/// Outcome of an activation sweep.
#[derive(Debug, Clone, Default)]
pub struct PurgeReport {
    pub deleted: Vec<String>,
}

/// Applies the offline-cache policies on top of the plain transport.
///
/// One worker owns one store and one pair of generation names. Cloning is
/// cheap; clones share the store.
#[derive(Clone)]
pub struct CacheWorker {
    store: Arc<Mutex<CacheStore>>,
    names: GenerationNames,
    api_hosts: Arc<Vec<String>>,
    net: NetFetcher,
}

impl CacheWorker {
    pub fn new(store: CacheStore, version: &str, api_hosts: Vec<String>) -> Result<Self, FetchError> {
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            names: GenerationNames::new(version),
            api_hosts: Arc::new(api_hosts),
            net: NetFetcher::new()?,
        })
    }

    /// Open (or create) the store at `path` and build a worker over it.
    pub fn open<P: AsRef<Path>>(
        path: P,
        version: &str,
        api_hosts: Vec<String>,
    ) -> anyhow::Result<Self> {
        let store = CacheStore::new(path)?;
        Ok(Self::new(store, version, api_hosts)?)
    }

    pub fn generation_names(&self) -> &GenerationNames {
        &self.names
    }

    /// Populate the static generation with the declared asset lists.
    ///
    /// Shell assets are all-or-nothing: a single failure aborts the install.
    /// Media assets (large background videos) are fetched individually and a
    /// per-file failure only lowers the report's counters.
    pub async fn install(
        &self,
        shell_assets: &[Url],
        media_assets: &[Url],
    ) -> Result<InstallReport, FetchError> {
        let mut report = InstallReport::default();

        for url in shell_assets {
            let resp = self.net.get_response(url).await?;
            if !resp.is_success() {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: resp.status,
                });
            }
            self.store_copy(&self.names.static_gen, url, &resp);
            report.shell_cached += 1;
        }

        for url in media_assets {
            match self.net.get_response(url).await {
                Ok(resp) if resp.is_success() => {
                    self.store_copy(&self.names.static_gen, url, &resp);
                    report.media_cached += 1;
                }
                Ok(resp) => {
                    tracing::warn!("skipping media asset {} (status {})", url, resp.status);
                    report.media_failed += 1;
                }
                Err(e) => {
                    tracing::warn!("skipping media asset {}: {}", url, e);
                    report.media_failed += 1;
                }
            }
        }

        tracing::info!(
            "cache install complete: {} shell, {} media ({} failed)",
            report.shell_cached,
            report.media_cached,
            report.media_failed
        );
        Ok(report)
    }

    /// Delete every cache generation whose name is not one of the current
    /// static/api pair. This is the only eviction mechanism.
    pub fn activate(&self) -> Result<PurgeReport, FetchError> {
        let deleted = self
            .store
            .lock()
            .purge_except(&self.names.current())
            .map_err(|e| FetchError::Storage(e.to_string()))?;

        if !deleted.is_empty() {
            tracing::info!("purged stale cache generations: {:?}", deleted);
        }
        Ok(PurgeReport { deleted })
    }

    /// The stored copy that would serve as offline fallback for `url`, if any.
    pub fn cached_copy(&self, url: &Url) -> Option<StoredResponse> {
        let generation = match classify(url, &self.api_hosts) {
            RequestClass::Api => self.names.api_gen.clone(),
            RequestClass::Static => self.names.static_gen.clone(),
        };
        self.lookup(&generation, url)
    }

    /// Network-first: live response preferred, status-ok copies stored, the
    /// cached copy served only on transport failure.
    async fn network_first(&self, url: &Url) -> Result<FetchedResponse, FetchError> {
        match self.net.get_response(url).await {
            Ok(resp) => {
                if resp.is_success() {
                    self.store_copy(&self.names.api_gen, url, &resp);
                }
                Ok(resp)
            }
            Err(e) => {
                tracing::debug!("network-first fetch failed for {}: {}", url, e);
                match self.lookup(&self.names.api_gen, url) {
                    Some(stored) => {
                        tracing::info!("serving cached API response for {}", url);
                        Ok(Self::from_stored(stored))
                    }
                    None => Err(FetchError::Offline(url.to_string())),
                }
            }
        }
    }

    /// Stale-while-revalidate: cached copy served immediately while a
    /// background refresh updates the store; straight to the network on miss.
    async fn stale_while_revalidate(&self, url: &Url) -> Result<FetchedResponse, FetchError> {
        if let Some(stored) = self.lookup(&self.names.static_gen, url) {
            self.spawn_revalidate(url.clone());
            return Ok(Self::from_stored(stored));
        }

        let resp = self.net.get_response(url).await?;
        if resp.is_success() {
            self.store_copy(&self.names.static_gen, url, &resp);
        }
        Ok(resp)
    }

    /// Refresh one static entry in the background. Failures are silent: the
    /// cached copy stays authoritative for that request.
    fn spawn_revalidate(&self, url: Url) {
        let store = Arc::clone(&self.store);
        let generation = self.names.static_gen.clone();
        let net = self.net.clone();

        tokio::spawn(async move {
            match net.get_response(&url).await {
                Ok(resp) if resp.is_success() => {
                    let result = store.lock().put(
                        &generation,
                        "GET",
                        url.as_str(),
                        resp.status,
                        resp.content_type.as_deref(),
                        &resp.body,
                    );
                    if let Err(e) = result {
                        tracing::debug!("background refresh store failed for {}: {}", url, e);
                    }
                }
                Ok(resp) => {
                    tracing::debug!("background refresh for {} returned {}", url, resp.status);
                }
                Err(e) => {
                    tracing::debug!("background refresh for {} failed: {}", url, e);
                }
            }
        });
    }

    fn lookup(&self, generation: &str, url: &Url) -> Option<StoredResponse> {
        match self.store.lock().get(generation, "GET", url.as_str()) {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!("cache lookup failed for {}: {}", url, e);
                None
            }
        }
    }

    fn store_copy(&self, generation: &str, url: &Url, resp: &FetchedResponse) {
        let result = self.store.lock().put(
            generation,
            "GET",
            url.as_str(),
            resp.status,
            resp.content_type.as_deref(),
            &resp.body,
        );
        if let Err(e) = result {
            tracing::warn!("failed to store cache copy for {}: {}", url, e);
        }
    }

    fn from_stored(stored: StoredResponse) -> FetchedResponse {
        FetchedResponse {
            status: stored.status,
            content_type: stored.content_type,
            body: stored.body,
            fetched_at: stored.stored_at,
            served_from_cache: true,
        }
    }
}

impl Fetch for CacheWorker {
    async fn get(&self, url: Url) -> Result<FetchedResponse, FetchError> {
        match classify(&url, &self.api_hosts) {
            RequestClass::Api => self.network_first(&url).await,
            RequestClass::Static => self.stale_while_revalidate(&url).await,
        }
    }
}
