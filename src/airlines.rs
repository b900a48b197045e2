use diesel::prelude::*;
use serde::Serialize;

/// Diesel model for the airlines reference table (loaded from OpenFlights)
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::airlines)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AirlineModel {
    pub id: i32,
    pub name: String,
    pub alias: Option<String>,
    pub iata: Option<String>,
    pub icao: Option<String>,
    pub callsign: Option<String>,
    pub country: String,
    pub active: bool,
}
