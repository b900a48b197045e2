use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// A route as the client submits it. Every field is optional at the boundary;
/// [`RouteDescriptor::validate`] is the single place that checks presence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RouteDescriptor {
    pub airline_iata: Option<String>,
    pub origin_iata: Option<String>,
    pub destination_iata: Option<String>,
    /// `flight_num` is accepted as an alias; `flight_number` wins when both are sent
    pub flight_number: Option<String>,
    pub flight_num: Option<String>,
}

impl RouteDescriptor {
    pub fn new(
        airline_iata: impl Into<String>,
        origin_iata: impl Into<String>,
        destination_iata: impl Into<String>,
        flight_number: impl Into<String>,
    ) -> Self {
        Self {
            airline_iata: Some(airline_iata.into()),
            origin_iata: Some(origin_iata.into()),
            destination_iata: Some(destination_iata.into()),
            flight_number: Some(flight_number.into()),
            flight_num: None,
        }
    }

    /// Check that all four route fields are present and non-empty
    pub fn validate(&self) -> Result<ValidRoute, RouteError> {
        let flight_number = present(&self.flight_number).or_else(|| present(&self.flight_num));

        match (
            present(&self.airline_iata),
            present(&self.origin_iata),
            present(&self.destination_iata),
            flight_number,
        ) {
            (Some(airline), Some(origin), Some(destination), Some(number)) => Ok(ValidRoute {
                airline_iata: airline.to_string(),
                origin_iata: origin.to_string(),
                destination_iata: destination.to_string(),
                flight_number: number.to_string(),
            }),
            _ => Err(RouteError::MissingRouteFields),
        }
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// A route descriptor that passed validation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidRoute {
    pub airline_iata: String,
    pub origin_iata: String,
    pub destination_iata: String,
    pub flight_number: String,
}

impl ValidRoute {
    pub fn natural_key(&self) -> RouteNaturalKey {
        RouteNaturalKey {
            airline_code: self.airline_iata.clone(),
            source_airport_code: self.origin_iata.clone(),
            destination_airport_code: self.destination_iata.clone(),
        }
    }
}

/// The (airline, origin, destination) triple identifying one stored route
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteNaturalKey {
    pub airline_code: String,
    pub source_airport_code: String,
    pub destination_airport_code: String,
}

/// Internal identifiers resolved from a route's IATA codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteIds {
    pub airline_id: i32,
    pub source_airport_id: i32,
    pub destination_airport_id: i32,
}

/// Which write an upsert performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteWrite {
    Inserted,
    Updated,
}

/// Diesel model for the routes table
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::routes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RouteModel {
    pub id: i32,
    pub airline_code: String,
    pub airline_id: Option<i32>,
    pub source_airport_code: String,
    pub source_airport_id: Option<i32>,
    pub destination_airport_code: String,
    pub destination_airport_id: Option<i32>,
    pub flight_num: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for new routes
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = crate::schema::routes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewRouteModel {
    pub airline_code: String,
    pub airline_id: Option<i32>,
    pub source_airport_code: String,
    pub source_airport_id: Option<i32>,
    pub destination_airport_code: String,
    pub destination_airport_id: Option<i32>,
    pub flight_num: Option<String>,
}

impl NewRouteModel {
    pub fn from_resolved(route: &ValidRoute, ids: RouteIds) -> Self {
        Self {
            airline_code: route.airline_iata.clone(),
            airline_id: Some(ids.airline_id),
            source_airport_code: route.origin_iata.clone(),
            source_airport_id: Some(ids.source_airport_id),
            destination_airport_code: route.destination_iata.clone(),
            destination_airport_id: Some(ids.destination_airport_id),
            flight_num: Some(route.flight_number.clone()),
        }
    }
}

/// Update model applied when a route already exists for the natural key
#[derive(Debug, Clone, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = crate::schema::routes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RouteUpdate {
    pub airline_id: Option<i32>,
    pub source_airport_id: Option<i32>,
    pub destination_airport_id: Option<i32>,
    pub flight_num: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl RouteUpdate {
    pub fn from_resolved(route: &ValidRoute, ids: RouteIds) -> Self {
        Self {
            airline_id: Some(ids.airline_id),
            source_airport_id: Some(ids.source_airport_id),
            destination_airport_id: Some(ids.destination_airport_id),
            flight_num: Some(route.flight_number.clone()),
            updated_at: Utc::now(),
        }
    }
}

/// The columns a flight number lookup needs from a stored route
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = crate::schema::routes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RouteMatch {
    pub airline_code: String,
    pub source_airport_code: String,
    pub destination_airport_code: String,
    pub flight_num: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("Missing required route fields")]
    MissingRouteFields,

    #[error("Invalid flight number: {0}")]
    InvalidFlightNumber(String),

    #[error("Unknown airline code: {0}")]
    UnknownAirline(String),

    #[error("Unknown source airport code: {0}")]
    UnknownSourceAirport(String),

    #[error("Unknown destination airport code: {0}")]
    UnknownDestinationAirport(String),

    /// Query or write failure against the route store
    #[error("{0}")]
    Store(String),

    /// The shared identifier lookup for a whole batch failed
    #[error("{0}")]
    Resolver(String),

    #[error("Route not found for flight number")]
    RouteNotFound,
}

impl RouteError {
    pub fn store(err: anyhow::Error) -> Self {
        RouteError::Store(err.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RouteError::RouteNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
