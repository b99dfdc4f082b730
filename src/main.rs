//! pokecache - fetch REST resources through the time-expiring cache
//!
//! Usage: `pokecache [RESOURCE_PATH]...`
//!
//! Each path is resolved against `API_BASE_URL` and fetched in order; repeat a
//! path to see it served from the cache. With no arguments the location-area
//! listing is fetched.

use std::env;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pokecache::fetch::resource_url;
use pokecache::{CachedFetcher, Config, HttpFetcher, TimedCache};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache (starts its reaper) and the fetch-through client
/// 4. Fetch every requested resource, reporting hit or miss
/// 5. Print cache statistics and shut the reaper down
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pokecache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_ttl={}ms, api_base_url={}",
        config.cache_ttl_ms, config.api_base_url
    );

    let cache = Arc::new(TimedCache::new(config.ttl())?);
    let fetcher = CachedFetcher::new(cache.clone(), HttpFetcher::new());

    let mut paths: Vec<String> = env::args().skip(1).collect();
    if paths.is_empty() {
        paths.push("location-area".to_string());
    }

    let mut failures = 0usize;
    for path in &paths {
        let url = resource_url(&config.api_base_url, path);
        match fetcher.fetch_bytes(&url).await {
            Ok(fetched) => println!("{:<4} {} ({} bytes)", fetched.source, url, fetched.body.len()),
            Err(e) => {
                failures += 1;
                error!(url = %url, error = %e, "Fetch failed");
            }
        }
    }

    let stats = cache.stats().await;
    println!("{}", serde_json::to_string_pretty(&stats)?);

    cache.shutdown().await;

    if failures > 0 {
        anyhow::bail!("{} of {} fetches failed", failures, paths.len());
    }
    Ok(())
}
