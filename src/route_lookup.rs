use tracing::debug;

use crate::flight_numbers::{normalize_flight_number, parse_flight_number};
use crate::route_store::RouteStore;
use crate::routes::{RouteError, RouteMatch};

/// A stored route found for a flight number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteLookup {
    pub route: RouteMatch,
    /// The normalized form of the flight number that was looked up
    pub normalized_flight_number: String,
}

impl RouteLookup {
    /// Stored flight number, or the normalized input when none is stored
    pub fn flight_number(&self) -> &str {
        self.route
            .flight_num
            .as_deref()
            .filter(|number| !number.is_empty())
            .unwrap_or(&self.normalized_flight_number)
    }
}

/// Flight number spellings to match against stored `flight_num` values
pub fn flight_number_candidates(flight_number: &str) -> Vec<String> {
    let normalized = normalize_flight_number(flight_number);
    if normalized == flight_number {
        vec![normalized]
    } else {
        vec![flight_number.to_string(), normalized]
    }
}

/// Find the stored route for a free-form flight number.
///
/// Tries an exact match on the raw and normalized spellings first, then falls
/// back to airline code plus numeric suffix (`DL295` matches a `DL` route
/// stored with flight number `295`). Query errors end the lookup immediately
/// and are reported as [`RouteError::Store`], never as not found.
pub async fn lookup_route(
    store: &dyn RouteStore,
    flight_number: &str,
) -> Result<RouteLookup, RouteError> {
    let normalized_flight_number = normalize_flight_number(flight_number);
    let candidates = flight_number_candidates(flight_number);

    if let Some(route) = store
        .find_route_by_flight_numbers(candidates)
        .await
        .map_err(RouteError::store)?
    {
        return Ok(RouteLookup {
            route,
            normalized_flight_number,
        });
    }

    let Some(parsed) = parse_flight_number(flight_number) else {
        debug!("No route for '{}' and it does not parse as airline + number", flight_number);
        return Err(RouteError::RouteNotFound);
    };

    match store
        .find_route_by_airline_and_number(&parsed.airline_code, &parsed.number)
        .await
        .map_err(RouteError::store)?
    {
        Some(route) => Ok(RouteLookup {
            route,
            normalized_flight_number,
        }),
        None => Err(RouteError::RouteNotFound),
    }
}
