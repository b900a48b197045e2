use anyhow::Result;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::actions;
use crate::route_store::{PgRouteStore, RouteStore};

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

// App state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub route_store: Arc<dyn RouteStore>,
}

impl AppState {
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            route_store: Arc::new(PgRouteStore::new(pool)),
        }
    }
}

async fn handle_not_found() -> impl IntoResponse {
    actions::json_error(StatusCode::NOT_FOUND, "Not Found")
}

// Middleware for request logging with correlation ID
async fn request_logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = Uuid::new_v4().to_string()[..8].to_string();
    let start_time = Instant::now();

    info!("Started {} {} [{}]", method, path, request_id);

    let response = next.run(request).await;
    let duration = start_time.elapsed();
    let status = response.status();

    metrics::histogram!("http_request_duration_seconds").record(duration.as_secs_f64());
    info!(
        "Completed {} {} [{}] {} in {:.2}ms",
        method,
        path,
        request_id,
        status.as_u16(),
        duration.as_secs_f64() * 1000.0
    );

    response
}

// Middleware to capture HTTP errors to Sentry
async fn sentry_error_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    if response.status().is_server_error() {
        let status = response.status();
        error!("HTTP {} error on {} {}", status.as_u16(), method, uri);

        sentry::configure_scope(|scope| {
            scope.set_tag("http.method", method.as_str());
            scope.set_tag("http.url", uri.to_string());
            scope.set_tag("http.status_code", status.as_u16().to_string());
        });

        sentry::capture_message(
            &format!("HTTP {} error on {} {}", status.as_u16(), method, uri),
            sentry::Level::Error,
        );
    }

    response
}

/// Build the application router. Everything lives under `/data`.
pub fn build_router(app_state: AppState) -> Router {
    let api_router = Router::new()
        .route("/health", get(actions::get_health))
        .route("/routes", put(actions::upsert_route))
        .route("/routes/bulk", post(actions::bulk_upsert_routes))
        .route(
            "/routes/lookup",
            get(actions::lookup_route_by_flight_number),
        )
        .with_state(app_state);

    Router::new()
        .nest("/data", api_router)
        .fallback(handle_not_found)
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(middleware::from_fn(sentry_error_middleware))
        .layer(CorsLayer::permissive())
}

pub async fn start_web_server(interface: String, port: u16, app_state: AppState) -> Result<()> {
    sentry::configure_scope(|scope| {
        scope.set_tag("operation", "web-server");
    });
    info!("Starting web server on {}:{}", interface, port);

    actions::init_server_start_time();
    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", interface, port)).await?;
    info!("Web server listening on http://{}:{}", interface, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal (Ctrl+C), draining connections"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
