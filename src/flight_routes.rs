use tracing::warn;

use crate::flight_numbers::extract_flight_number;
use crate::route_store::RouteStore;
use crate::route_upsert::RouteUpserter;
use crate::routes::{RouteDescriptor, RouteError, RouteWrite};

/// The route-relevant fields of a flight that was just created
#[derive(Debug, Clone, Default)]
pub struct FlightRouteFields {
    /// Flight number as the user typed it, e.g. `DL 296`
    pub flight_number: String,
    pub airline_iata: Option<String>,
    pub origin_iata: Option<String>,
    pub destination_iata: Option<String>,
}

impl FlightRouteFields {
    /// Numeric flight number stored on the flight record itself
    pub fn numeric_flight_number(&self) -> Result<u32, RouteError> {
        extract_flight_number(&self.flight_number)
    }

    fn route_descriptor(&self) -> Option<RouteDescriptor> {
        match (&self.airline_iata, &self.origin_iata, &self.destination_iata) {
            (Some(airline), Some(origin), Some(destination))
                if !airline.is_empty() && !origin.is_empty() && !destination.is_empty() =>
            {
                Some(RouteDescriptor::new(
                    airline.as_str(),
                    origin.as_str(),
                    destination.as_str(),
                    self.flight_number.as_str(),
                ))
            }
            _ => None,
        }
    }
}

/// Keep the route catalog current after a flight is recorded.
///
/// The flight itself is already stored, so route problems are logged and
/// swallowed. Returns the write performed, if any.
pub async fn upsert_route_for_flight(
    store: &dyn RouteStore,
    flight: &FlightRouteFields,
) -> Option<RouteWrite> {
    let descriptor = flight.route_descriptor()?;

    match RouteUpserter::new(store).upsert_one(&descriptor).await {
        Ok(write) => Some(write),
        Err(e) => {
            warn!(
                "Error upserting route for flight {}: {}",
                flight.flight_number, e
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route_store::InMemoryRouteStore;

    fn flight(airline: Option<&str>) -> FlightRouteFields {
        FlightRouteFields {
            flight_number: "DL 296".to_string(),
            airline_iata: airline.map(str::to_string),
            origin_iata: Some("ATL".to_string()),
            destination_iata: Some("LAX".to_string()),
        }
    }

    #[test]
    fn test_numeric_flight_number() {
        assert_eq!(flight(Some("DL")).numeric_flight_number().unwrap(), 296);
    }

    #[tokio::test]
    async fn test_route_recorded_with_raw_flight_number() {
        let store = InMemoryRouteStore::new();
        store.add_airline("DL", 1).unwrap();
        store.add_airport("ATL", 10).unwrap();
        store.add_airport("LAX", 20).unwrap();

        let write = upsert_route_for_flight(&store, &flight(Some("DL"))).await;

        assert_eq!(write, Some(RouteWrite::Inserted));
        let routes = store.routes().unwrap();
        assert_eq!(routes[0].flight_num.as_deref(), Some("DL 296"));
    }

    #[tokio::test]
    async fn test_flight_without_airline_skips_route() {
        let store = InMemoryRouteStore::new();

        assert_eq!(upsert_route_for_flight(&store, &flight(None)).await, None);
        assert_eq!(store.airline_queries(), 0);
    }

    #[tokio::test]
    async fn test_route_errors_are_swallowed() {
        let store = InMemoryRouteStore::new();

        assert_eq!(
            upsert_route_for_flight(&store, &flight(Some("DL"))).await,
            None
        );
        assert!(store.routes().unwrap().is_empty());
    }
}
