use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::route_batch::dedupe_routes;
use crate::route_resolver::{resolve_batch, resolve_single};
use crate::route_store::RouteStore;
use crate::routes::{
    NewRouteModel, RouteDescriptor, RouteError, RouteIds, RouteUpdate, RouteWrite, ValidRoute,
};

/// Outcome of one bulk upsert call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkUpsertResult {
    pub upserted: usize,
    /// Malformed, duplicate and failed descriptors
    pub skipped: usize,
    /// One message per failed route, in input order
    pub errors: Vec<String>,
}

/// Writes routes keyed by (airline, origin, destination).
///
/// Each route gets exactly one write: an update when a row already exists for
/// its natural key, otherwise an insert.
pub struct RouteUpserter<'a> {
    store: &'a dyn RouteStore,
}

impl<'a> RouteUpserter<'a> {
    pub fn new(store: &'a dyn RouteStore) -> Self {
        Self { store }
    }

    /// Upsert a single route, resolving its codes with point queries
    pub async fn upsert_one(&self, descriptor: &RouteDescriptor) -> Result<RouteWrite, RouteError> {
        let route = descriptor.validate()?;
        let ids = resolve_single(self.store, &route).await?;
        let write = self.write_route(&route, ids).await?;
        record_write(write);
        Ok(write)
    }

    /// Upsert a batch of routes.
    ///
    /// Duplicates collapse before any store access and all codes resolve with
    /// two queries. Routes are then written one at a time; a failed route is
    /// reported in `errors` and the rest of the batch continues. Only a failed
    /// identifier lookup aborts the batch.
    pub async fn upsert_bulk(&self, descriptors: &[RouteDescriptor]) -> BulkUpsertResult {
        if descriptors.is_empty() {
            return BulkUpsertResult::default();
        }

        let batch = dedupe_routes(descriptors);
        debug!(
            "Bulk upsert of {} descriptors collapsed to {} routes",
            descriptors.len(),
            batch.len()
        );

        let maps = match resolve_batch(self.store, &batch).await {
            Ok(maps) => maps,
            Err(e) => {
                error!("Aborting bulk upsert of {} routes: {}", descriptors.len(), e);
                metrics::counter!("routes.bulk.aborted_total").increment(1);
                metrics::counter!("routes.bulk.skipped_total")
                    .increment(descriptors.len() as u64);
                return BulkUpsertResult {
                    upserted: 0,
                    skipped: descriptors.len(),
                    errors: vec![e.to_string()],
                };
            }
        };

        let mut result = BulkUpsertResult::default();
        for route in &batch.routes {
            let written = match maps.resolve(route) {
                Ok(ids) => self.write_route(route, ids).await,
                Err(e) => Err(e),
            };

            match written {
                Ok(write) => {
                    record_write(write);
                    result.upserted += 1;
                }
                Err(e) => {
                    warn!(
                        "Skipping route {} {}-{}: {}",
                        route.flight_number, route.origin_iata, route.destination_iata, e
                    );
                    metrics::counter!("routes.upsert.failed_total").increment(1);
                    result.errors.push(e.to_string());
                }
            }
        }
        result.skipped = batch.skipped + result.errors.len();

        metrics::counter!("routes.bulk.skipped_total").increment(result.skipped as u64);
        info!(
            "Bulk route upsert: {} upserted, {} skipped, {} errors",
            result.upserted,
            result.skipped,
            result.errors.len()
        );

        result
    }

    async fn write_route(&self, route: &ValidRoute, ids: RouteIds) -> Result<RouteWrite, RouteError> {
        let existing = self
            .store
            .find_route_id(&route.natural_key())
            .await
            .map_err(RouteError::store)?;

        match existing {
            Some(route_id) => {
                self.store
                    .update_route(route_id, RouteUpdate::from_resolved(route, ids))
                    .await
                    .map_err(RouteError::store)?;
                Ok(RouteWrite::Updated)
            }
            None => {
                self.store
                    .insert_route(NewRouteModel::from_resolved(route, ids))
                    .await
                    .map_err(RouteError::store)?;
                Ok(RouteWrite::Inserted)
            }
        }
    }
}

fn record_write(write: RouteWrite) {
    match write {
        RouteWrite::Inserted => metrics::counter!("routes.upsert.inserted_total").increment(1),
        RouteWrite::Updated => metrics::counter!("routes.upsert.updated_total").increment(1),
    }
}
