//! Health endpoint with version and uptime

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::sync::OnceLock;
use std::time::Instant;

static SERVER_START_TIME: OnceLock<Instant> = OnceLock::new();

/// Record the server start time (call this when the server starts)
pub fn init_server_start_time() {
    SERVER_START_TIME.get_or_init(Instant::now);
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthInfo {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub uptime_human: String,
}

fn format_duration(seconds: u64) -> String {
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if days > 0 {
        format!("{}d {}h {}m {}s", days, hours, minutes, secs)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Handler for GET /data/health
pub async fn get_health() -> impl IntoResponse {
    let start_time = SERVER_START_TIME.get_or_init(Instant::now);
    let uptime_seconds = start_time.elapsed().as_secs();

    let health = HealthInfo {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds,
        uptime_human: format_duration(uptime_seconds),
    };

    (StatusCode::OK, Json(health))
}
