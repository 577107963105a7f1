//! Observability module for logging and metrics setup.
//!
//! This module provides:
//! - Structured logging with configurable levels (pretty for development, JSON otherwise)
//! - A Prometheus metrics recorder whose handle renders the exposition text on demand
//! - Recording helpers used by the matcher and the scan session

use std::time::Duration;

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::prelude::*;

use crate::allergen::MatchResult;
use crate::observability_config::ObservabilityConfig;

/// Initialize logging and, when enabled, metrics
///
/// Returns the Prometheus handle when metrics are enabled.
pub fn init_observability(config: &ObservabilityConfig) -> Result<Option<PrometheusHandle>> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid observability configuration: {}", e))?;

    init_tracing(config)?;

    let handle = if config.enable_metrics {
        Some(init_metrics()?)
    } else {
        None
    };

    tracing::info!(
        environment = %config.environment,
        metrics_enabled = config.enable_metrics,
        "Observability initialized"
    );
    Ok(handle)
}

/// Initialize the tracing subscriber
pub fn init_tracing(config: &ObservabilityConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("allergen_scanner={}", config.log_level.to_lowercase()).parse()?);

    // Logs go to stderr so stdout stays clean for JSON results
    if config.use_pretty_logs() {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    }

    Ok(())
}

/// Install the Prometheus recorder as the global metrics recorder
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::info!("Metrics collection initialized");
    Ok(handle)
}

/// Record one allergen scan
pub fn record_scan_metrics(duration: Duration, results: &[MatchResult]) {
    metrics::counter!("allergen_scans_total").increment(1);
    metrics::histogram!("allergen_scan_duration_seconds").record(duration.as_secs_f64());

    for result in results {
        metrics::counter!("allergen_matches_total", "type" => result.match_type.as_str())
            .increment(1);
    }
}

/// Record a scan request skipped by the session (throttled or duplicate text)
pub fn record_skipped_scan(reason: &'static str) {
    metrics::counter!("allergen_scans_skipped_total", "reason" => reason).increment(1);
}
