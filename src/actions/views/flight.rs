use serde::Serialize;
use ts_rs::TS;

use crate::route_lookup::RouteLookup;

/// Flight draft pre-filled from a stored route.
///
/// A route carries no per-flight data, so date, owner, circle and note are
/// always null and role/visibility take the defaults of a new flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../web/src/lib/types/generated/")]
pub struct FlightDraftView {
    pub flight_number: String,
    pub flight_date: Option<String>,
    pub user_id: Option<String>,
    pub airline_iata: String,
    pub origin_iata: String,
    pub destination_iata: String,
    pub role: String,
    pub visibility: String,
    pub circle_id: Option<String>,
    pub note: Option<String>,
}

impl From<RouteLookup> for FlightDraftView {
    fn from(lookup: RouteLookup) -> Self {
        let flight_number = lookup.flight_number().to_string();
        let route = lookup.route;

        Self {
            flight_number,
            flight_date: None,
            user_id: None,
            airline_iata: route.airline_code,
            origin_iata: route.source_airport_code,
            destination_iata: route.destination_airport_code,
            role: "passenger".to_string(),
            visibility: "private".to_string(),
            circle_id: None,
            note: None,
        }
    }
}
