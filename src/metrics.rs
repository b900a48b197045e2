use anyhow::{Context, Result};
use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use tracing::{info, warn};

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize Prometheus metrics exporter
/// Returns a handle that can be used to render metrics for scraping
pub fn init_metrics() -> Result<PrometheusHandle> {
    // Buckets: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        )
        .context("failed to set buckets for http_request_duration_seconds")?
        .install_recorder()
        .context("failed to install Prometheus recorder")?;

    Ok(handle)
}

async fn render_metrics() -> impl IntoResponse {
    match METRICS_HANDLE.get() {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not initialized".to_string(),
        ),
    }
}

/// Background task to update process metrics
/// Updates uptime and memory usage metrics every 5 seconds
pub async fn process_metrics_task() {
    let start_time = Instant::now();

    loop {
        metrics::gauge!("process.uptime.seconds").set(start_time.elapsed().as_secs() as f64);
        metrics::gauge!("process.is_up").set(1.0);

        #[cfg(target_os = "linux")]
        {
            if let Some(bytes) = resident_memory_bytes() {
                metrics::gauge!("process.memory.bytes").set(bytes);
            }
        }

        tokio::time::sleep(Duration::from_secs(5)).await;
    }
}

#[cfg(target_os = "linux")]
fn resident_memory_bytes() -> Option<f64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let line = status.lines().find(|line| line.starts_with("VmRSS:"))?;
    let kb = line.split_whitespace().nth(1)?.parse::<f64>().ok()?;
    Some(kb * 1024.0)
}

/// Initialize route metrics to zero so they show up in Prometheus before
/// the first request touches them
pub fn initialize_route_metrics() {
    metrics::counter!("routes.upsert.inserted_total").absolute(0);
    metrics::counter!("routes.upsert.updated_total").absolute(0);
    metrics::counter!("routes.upsert.failed_total").absolute(0);
    metrics::counter!("routes.bulk.skipped_total").absolute(0);
    metrics::counter!("routes.bulk.aborted_total").absolute(0);

    metrics::counter!("routes.api.upsert.requests_total").absolute(0);
    metrics::counter!("routes.api.bulk.requests_total").absolute(0);
    metrics::counter!("routes.api.lookup.requests_total").absolute(0);
    metrics::counter!("routes.api.lookup.not_found_total").absolute(0);
    metrics::counter!("routes.api.errors_total").absolute(0);

    metrics::counter!("routes.import.rows_rejected_total").absolute(0);
}

/// Install the recorder and serve `/metrics` on `port` until the process exits
pub async fn start_metrics_server(port: u16) -> Result<()> {
    let handle = init_metrics()?;
    if METRICS_HANDLE.set(handle).is_err() {
        warn!("Metrics handle already initialized");
    }
    initialize_route_metrics();

    tokio::spawn(process_metrics_task());

    let app = Router::new().route("/metrics", get(render_metrics));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting metrics server on http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind metrics server on {}", addr))?;

    axum::serve(listener, app)
        .await
        .context("Metrics server failed")?;

    Ok(())
}
