use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

/// Diesel model for the airports reference table
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::airports)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AirportModel {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub country: String,
    pub iata_code: Option<String>,
    pub icao_code: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
