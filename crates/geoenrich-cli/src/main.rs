#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use clap::Parser;
use config::{BatchConfig, CliArgs};
use geoenrich_core::{Pipeline, RunSummary};
use telemetry::{init_telemetry, record_run, shutdown_telemetry};

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = BatchConfig::try_from(args)?;

    let providers = init_telemetry()?;
    log_startup_info(&config);

    let result = run(config).await;
    match &result {
        Ok(summary) => {
            record_run(summary);
            log_summary(summary);
        }
        Err(err) => tracing::error!("Geocoding run failed: {err:#}"),
    }

    shutdown_telemetry(providers);
    result.map(|_| ())
}

#[tracing::instrument(name = "run", skip_all)]
async fn run(config: BatchConfig) -> anyhow::Result<RunSummary> {
    let pipeline = Pipeline::here(&config.geocode, config.api_key, config.fields)?;
    let summary = pipeline.run_file(&config.input, &config.output).await?;
    Ok(summary)
}

fn log_startup_info(config: &BatchConfig) {
    tracing::info!("Starting geocoder with config:");
    tracing::info!("  Input:           {}", config.input.display());
    tracing::info!("  Output:          {}", config.output.display());
    tracing::info!("  Workers:         {}", config.geocode.num_workers);
    tracing::info!(
        "  Request timeout: {}s",
        config.geocode.request_timeout.as_secs()
    );
    tracing::info!("  Provider:        {}", config.geocode.provider_url);
}

fn log_summary(summary: &RunSummary) {
    tracing::info!(
        records = summary.records,
        found = summary.found,
        not_found = summary.not_found,
        failed = summary.failed,
        unaddressable = summary.unaddressable,
        coerced_sort_keys = summary.coerced_sort_keys,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "Run summary"
    );

    if let Some(path) = &summary.output {
        tracing::info!("Geocoding complete. Output saved to '{}'", path.display());
    }
}
