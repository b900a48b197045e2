use anyhow::Result;
use tracing::{error, info};

use airlog::config::AppConfig;
use airlog::database::{create_pool, run_migrations};
use airlog::metrics::start_metrics_server;
use airlog::web::{AppState, start_web_server};

pub async fn handle_web(config: &AppConfig, interface: String, port: u16) -> Result<()> {
    sentry::configure_scope(|scope| {
        scope.set_tag("operation", "web");
    });

    let pool = create_pool(config)?;
    run_migrations(&pool).await?;

    if let Some(metrics_port) = config.metrics_port {
        tokio::spawn(async move {
            if let Err(e) = start_metrics_server(metrics_port).await {
                error!("Metrics server stopped: {}", e);
            }
        });
    } else {
        info!("METRICS_PORT not set, Prometheus endpoint disabled");
    }

    start_web_server(interface, port, AppState::from_pool(pool)).await
}
