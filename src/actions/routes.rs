use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::route_lookup::lookup_route;
use crate::route_upsert::RouteUpserter;
use crate::routes::{RouteDescriptor, RouteError};
use crate::web::AppState;

use super::{DataResponse, json_error, views::FlightDraftView};

const MISSING_ROUTE_FIELDS: &str =
    "Missing required fields: airline_iata, origin_iata, destination_iata, flight_number";
const MISSING_ROUTES: &str = "Missing required field: routes";
const NO_VALID_ROUTES: &str = "No valid routes provided. Each route requires airline_iata, origin_iata, destination_iata, flight_number.";
const MISSING_FLIGHT_NUMBER: &str = "Missing required query param: flightNumber";

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct BulkUpsertResponse {
    pub message: &'static str,
    pub upserted: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BulkRoutesRequest {
    pub routes: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
pub struct RouteLookupParams {
    #[serde(rename = "flightNumber")]
    pub flight_number: Option<String>,
    #[serde(rename = "flight_number")]
    pub flight_number_alias: Option<String>,
}

impl RouteLookupParams {
    fn flight_number(&self) -> Option<&str> {
        self.flight_number
            .as_deref()
            .or(self.flight_number_alias.as_deref())
            .filter(|value| !value.is_empty())
    }
}

/// Keep the entries that carry all four route fields. Anything else,
/// including entries that are not JSON objects, is dropped here.
fn well_formed_routes(entries: Vec<serde_json::Value>) -> Vec<RouteDescriptor> {
    entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<RouteDescriptor>(entry).ok())
        .filter(|descriptor| descriptor.validate().is_ok())
        .collect()
}

/// Handler for PUT /data/routes
///
/// A body that is not valid JSON is treated like an empty one.
pub async fn upsert_route(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    metrics::counter!("routes.api.upsert.requests_total").increment(1);

    let descriptor: RouteDescriptor = serde_json::from_slice(&body).unwrap_or_default();
    if descriptor.validate().is_err() {
        return json_error(StatusCode::BAD_REQUEST, MISSING_ROUTE_FIELDS).into_response();
    }

    match RouteUpserter::new(state.route_store.as_ref())
        .upsert_one(&descriptor)
        .await
    {
        Ok(write) => {
            info!("Route upserted ({:?})", write);
            Json(MessageResponse {
                message: "Route upserted",
            })
            .into_response()
        }
        Err(e) => {
            warn!("Failed to upsert route: {}", e);
            metrics::counter!("routes.api.errors_total").increment(1);
            json_error(e.status_code(), &e.to_string()).into_response()
        }
    }
}

/// Handler for POST /data/routes/bulk
///
/// Partial failure is still a 200: callers read `skipped` and `errors`.
pub async fn bulk_upsert_routes(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    metrics::counter!("routes.api.bulk.requests_total").increment(1);

    let request: BulkRoutesRequest = serde_json::from_slice(&body).unwrap_or_default();
    let entries = match request.routes {
        Some(entries) if !entries.is_empty() => entries,
        _ => return json_error(StatusCode::BAD_REQUEST, MISSING_ROUTES).into_response(),
    };

    let submitted = entries.len();
    let descriptors = well_formed_routes(entries);
    if descriptors.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, NO_VALID_ROUTES).into_response();
    }
    if descriptors.len() < submitted {
        info!(
            "Dropped {} malformed route entries from bulk request",
            submitted - descriptors.len()
        );
    }

    let result = RouteUpserter::new(state.route_store.as_ref())
        .upsert_bulk(&descriptors)
        .await;
    metrics::histogram!("routes.api.bulk.batch_size").record(descriptors.len() as f64);

    Json(BulkUpsertResponse {
        message: "Routes upserted",
        upserted: result.upserted,
        skipped: result.skipped,
        errors: result.errors,
    })
    .into_response()
}

/// Handler for GET /data/routes/lookup
///
/// Returns a flight draft built from the stored route for `flightNumber`.
pub async fn lookup_route_by_flight_number(
    State(state): State<AppState>,
    Query(params): Query<RouteLookupParams>,
) -> impl IntoResponse {
    metrics::counter!("routes.api.lookup.requests_total").increment(1);

    let Some(flight_number) = params.flight_number() else {
        return json_error(StatusCode::BAD_REQUEST, MISSING_FLIGHT_NUMBER).into_response();
    };

    match lookup_route(state.route_store.as_ref(), flight_number).await {
        Ok(lookup) => Json(DataResponse {
            data: FlightDraftView::from(lookup),
        })
        .into_response(),
        Err(RouteError::RouteNotFound) => {
            metrics::counter!("routes.api.lookup.not_found_total").increment(1);
            json_error(StatusCode::NOT_FOUND, &RouteError::RouteNotFound.to_string())
                .into_response()
        }
        Err(e) => {
            error!("Failed to look up route for {}: {}", flight_number, e);
            metrics::counter!("routes.api.errors_total").increment(1);
            json_error(e.status_code(), &e.to_string()).into_response()
        }
    }
}
