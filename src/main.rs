use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use url::Url;

use tempora::surface;
use tempora::Dashboard;
use tempora_cache::{CacheWorker, Fetch, NetFetcher};
use tempora_core::Config;
use tempora_location::{DeviceLocator, FixedPosition, Position, PositionOptions};
use tempora_view::{ChartBackend, ChartError, ChartSpec};

/// Terminal weather dashboard
#[derive(Debug, Parser)]
#[command(name = "tempora", version, about)]
struct Cli {
    /// Place to look up; the device position is used when omitted
    query: Vec<String>,

    /// Print type-ahead suggestions for the query instead of a forecast
    #[arg(long)]
    suggest: bool,

    /// Talk straight to the network, skipping the offline cache
    #[arg(long)]
    no_cache: bool,
}

/// Chart collaborator for the terminal: instances are tracked and logged,
/// the actual drawing stays external.
#[derive(Default)]
struct LogChartBackend {
    next_id: AtomicU64,
}

impl ChartBackend for LogChartBackend {
    fn create(&self, spec: &ChartSpec) -> Result<u64, ChartError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(
            "built {:?} chart #{} with {} points",
            spec.slot,
            id,
            spec.labels.len()
        );
        Ok(id)
    }

    fn destroy(&self, id: u64) {
        tracing::debug!("destroyed chart #{}", id);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tempora_core::init()?;
    let cli = Cli::parse();

    let (config, _validation) = Config::load_validated()?;
    std::fs::create_dir_all(&config.config_dir).context("Failed to create config directory")?;

    if cli.no_cache {
        let fetcher = NetFetcher::new()?;
        return run(fetcher, &config, &cli).await;
    }

    let worker = CacheWorker::open(
        config.cache.db_path(&config.config_dir),
        &config.cache.version,
        config.cache.api_hosts.clone(),
    )?;

    let shell = parse_asset_urls(&config.cache.shell_assets);
    let media = parse_asset_urls(&config.cache.media_assets);
    if !shell.is_empty() || !media.is_empty() {
        if let Err(e) = worker.install(&shell, &media).await {
            tracing::warn!("cache install failed: {}", e);
        }
    }
    worker.activate()?;

    run(worker, &config, &cli).await
}

async fn run<F: Fetch + Clone>(fetcher: F, config: &Config, cli: &Cli) -> Result<()> {
    let backend: Arc<dyn ChartBackend> = Arc::new(LogChartBackend::default());
    let dashboard = Dashboard::new(fetcher, config, Some(backend));
    let query = cli.query.join(" ");

    if cli.suggest {
        if let Some(places) = dashboard.suggest(&query).await {
            print!("{}", surface::render_suggestions(&places));
        }
        return Ok(());
    }

    let result = if query.is_empty() {
        match device_position() {
            Some(position) => {
                let locator =
                    DeviceLocator::new(FixedPosition(position), position_options(config));
                dashboard.locate(&locator).await
            }
            None => Err(tempora_core::AppError::Unavailable(
                "no position source on this host".to_string(),
            )),
        }
    } else {
        dashboard.search(&query).await
    };

    match result {
        Ok(view) => {
            print!("{}", surface::render(&view));
            Ok(())
        }
        Err(e) => {
            tracing::error!("dashboard refresh failed: {}", e);
            eprintln!("❌ {}", e.user_message());
            std::process::exit(1);
        }
    }
}

fn position_options(config: &Config) -> PositionOptions {
    PositionOptions {
        high_accuracy: config.location.device.high_accuracy,
        timeout: Duration::from_secs(config.location.device.timeout_secs),
        maximum_age: Duration::from_secs(config.location.device.maximum_age_secs),
    }
}

/// Device position for this host, taken from `TEMPORA_POSITION` ("lat,lon").
fn device_position() -> Option<Position> {
    let raw = std::env::var("TEMPORA_POSITION").ok()?;
    let (lat, lon) = raw.split_once(',')?;
    Some(Position {
        latitude: lat.trim().parse().ok()?,
        longitude: lon.trim().parse().ok()?,
        accuracy_meters: None,
    })
}

fn parse_asset_urls(raw: &[String]) -> Vec<Url> {
    raw.iter()
        .filter_map(|s| match Url::parse(s) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("skipping invalid asset URL {:?}: {}", s, e);
                None
            }
        })
        .collect()
}
