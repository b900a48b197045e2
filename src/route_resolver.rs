use std::collections::HashMap;

use tracing::{debug, error};

use crate::route_batch::DedupedBatch;
use crate::route_store::RouteStore;
use crate::routes::{RouteError, RouteIds, ValidRoute};

/// IATA code to internal id maps built once per batch
#[derive(Debug, Clone, Default)]
pub struct RouteLookupMaps {
    pub airline_by_iata: HashMap<String, i32>,
    pub airport_by_iata: HashMap<String, i32>,
}

impl RouteLookupMaps {
    /// Resolve one route from the prebuilt maps. No store access.
    pub fn resolve(&self, route: &ValidRoute) -> Result<RouteIds, RouteError> {
        let airline_id = self
            .airline_by_iata
            .get(&route.airline_iata)
            .copied()
            .ok_or_else(|| RouteError::UnknownAirline(route.airline_iata.clone()))?;
        let source_airport_id = self
            .airport_by_iata
            .get(&route.origin_iata)
            .copied()
            .ok_or_else(|| RouteError::UnknownSourceAirport(route.origin_iata.clone()))?;
        let destination_airport_id = self
            .airport_by_iata
            .get(&route.destination_iata)
            .copied()
            .ok_or_else(|| RouteError::UnknownDestinationAirport(route.destination_iata.clone()))?;

        Ok(RouteIds {
            airline_id,
            source_airport_id,
            destination_airport_id,
        })
    }
}

/// Resolve every code referenced by a batch with one airline query and one
/// airport query, issued concurrently.
///
/// A failed query fails the whole batch with [`RouteError::Resolver`]. Codes
/// that simply don't exist are left out of the maps and surface later as
/// per-route errors from [`RouteLookupMaps::resolve`].
pub async fn resolve_batch(
    store: &dyn RouteStore,
    batch: &DedupedBatch,
) -> Result<RouteLookupMaps, RouteError> {
    if batch.is_empty() {
        return Ok(RouteLookupMaps::default());
    }

    let airline_codes: Vec<String> = batch.airline_codes().into_iter().collect();
    let airport_codes: Vec<String> = batch.airport_codes().into_iter().collect();
    debug!(
        "Resolving {} airline codes and {} airport codes for {} routes",
        airline_codes.len(),
        airport_codes.len(),
        batch.len()
    );

    let (airline_by_iata, airport_by_iata) = tokio::try_join!(
        store.find_airline_ids(airline_codes),
        store.find_airport_ids(airport_codes),
    )
    .map_err(|e| {
        error!("Failed to resolve route identifiers: {}", e);
        RouteError::Resolver(e.to_string())
    })?;

    Ok(RouteLookupMaps {
        airline_by_iata,
        airport_by_iata,
    })
}

/// Resolve a single route with three concurrent point queries
pub async fn resolve_single(
    store: &dyn RouteStore,
    route: &ValidRoute,
) -> Result<RouteIds, RouteError> {
    let (airline_id, source_airport_id, destination_airport_id) = tokio::try_join!(
        store.find_airline_id(&route.airline_iata),
        store.find_airport_id(&route.origin_iata),
        store.find_airport_id(&route.destination_iata),
    )
    .map_err(RouteError::store)?;

    Ok(RouteIds {
        airline_id: airline_id
            .ok_or_else(|| RouteError::UnknownAirline(route.airline_iata.clone()))?,
        source_airport_id: source_airport_id
            .ok_or_else(|| RouteError::UnknownSourceAirport(route.origin_iata.clone()))?,
        destination_airport_id: destination_airport_id
            .ok_or_else(|| RouteError::UnknownDestinationAirport(route.destination_iata.clone()))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route_batch::dedupe_routes;
    use crate::route_store::InMemoryRouteStore;
    use crate::routes::RouteDescriptor;

    fn reference_store() -> InMemoryRouteStore {
        let store = InMemoryRouteStore::new();
        store.add_airline("DL", 1).unwrap();
        store.add_airline("UA", 2).unwrap();
        store.add_airport("ATL", 10).unwrap();
        store.add_airport("LAX", 20).unwrap();
        store.add_airport("SFO", 30).unwrap();
        store
    }

    fn route(airline: &str, origin: &str, destination: &str) -> ValidRoute {
        RouteDescriptor::new(airline, origin, destination, "123")
            .validate()
            .unwrap()
    }

    #[tokio::test]
    async fn test_batch_uses_one_query_per_table() {
        let store = reference_store();
        let batch = dedupe_routes(&[
            RouteDescriptor::new("DL", "ATL", "LAX", "DL296"),
            RouteDescriptor::new("DL", "LAX", "ATL", "DL295"),
            RouteDescriptor::new("UA", "SFO", "LAX", "UA1"),
            RouteDescriptor::new("ZZ", "SFO", "QQQ", "ZZ1"),
        ]);

        let maps = resolve_batch(&store, &batch).await.unwrap();

        assert_eq!(store.airline_queries(), 1);
        assert_eq!(store.airport_queries(), 1);
        assert_eq!(maps.airline_by_iata.len(), 2);
        assert_eq!(maps.airport_by_iata.len(), 3);
        assert!(!maps.airport_by_iata.contains_key("QQQ"));
    }

    #[tokio::test]
    async fn test_empty_batch_issues_no_queries() {
        let store = reference_store();
        let maps = resolve_batch(&store, &DedupedBatch::default()).await.unwrap();

        assert!(maps.airline_by_iata.is_empty());
        assert_eq!(store.airline_queries(), 0);
        assert_eq!(store.airport_queries(), 0);
    }

    #[tokio::test]
    async fn test_batch_query_failure_is_resolver_error() {
        let store = reference_store();
        store.fail_identifier_queries(true);
        let batch = dedupe_routes(&[RouteDescriptor::new("DL", "ATL", "LAX", "DL296")]);

        let err = resolve_batch(&store, &batch).await.unwrap_err();
        assert!(matches!(err, RouteError::Resolver(_)));
    }

    #[test]
    fn test_maps_report_first_unknown_code() {
        let maps = RouteLookupMaps {
            airline_by_iata: HashMap::from([("DL".to_string(), 1)]),
            airport_by_iata: HashMap::from([("ATL".to_string(), 10)]),
        };

        assert_eq!(
            maps.resolve(&route("DL", "ATL", "ATL")).unwrap(),
            RouteIds {
                airline_id: 1,
                source_airport_id: 10,
                destination_airport_id: 10,
            }
        );
        assert_eq!(
            maps.resolve(&route("ZZ", "XXX", "YYY")),
            Err(RouteError::UnknownAirline("ZZ".to_string()))
        );
        assert_eq!(
            maps.resolve(&route("DL", "XXX", "YYY")),
            Err(RouteError::UnknownSourceAirport("XXX".to_string()))
        );
        assert_eq!(
            maps.resolve(&route("DL", "ATL", "YYY")),
            Err(RouteError::UnknownDestinationAirport("YYY".to_string()))
        );
    }

    #[tokio::test]
    async fn test_single_resolution() {
        let store = reference_store();

        let ids = resolve_single(&store, &route("UA", "SFO", "LAX"))
            .await
            .unwrap();
        assert_eq!(
            ids,
            RouteIds {
                airline_id: 2,
                source_airport_id: 30,
                destination_airport_id: 20,
            }
        );
        assert_eq!(store.airline_queries(), 1);
        assert_eq!(store.airport_queries(), 2);

        assert_eq!(
            resolve_single(&store, &route("UA", "SFO", "JFK")).await,
            Err(RouteError::UnknownDestinationAirport("JFK".to_string()))
        );
    }

    #[tokio::test]
    async fn test_single_resolution_store_failure() {
        let store = reference_store();
        store.fail_identifier_queries(true);

        let err = resolve_single(&store, &route("DL", "ATL", "LAX"))
            .await
            .unwrap_err();
        assert!(matches!(err, RouteError::Store(_)));
    }
}
