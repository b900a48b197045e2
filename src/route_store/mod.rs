//! Storage seam for the route engine.
//!
//! The engine only needs point lookups, batched `IN (...)` selects, inserts
//! and updates over the airlines, airports and routes tables. [`RouteStore`]
//! names exactly those operations so the resolver, upsert and lookup logic can
//! run against PostgreSQL in production and against memory in tests.

mod memory;
mod postgres;

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

use crate::routes::{NewRouteModel, RouteMatch, RouteNaturalKey, RouteUpdate};

pub use memory::InMemoryRouteStore;
pub use postgres::PgRouteStore;

#[async_trait]
pub trait RouteStore: Send + Sync {
    /// Internal id of the airline with this IATA designator
    async fn find_airline_id(&self, iata: &str) -> Result<Option<i32>>;

    /// Internal id of the airport with this IATA code
    async fn find_airport_id(&self, iata_code: &str) -> Result<Option<i32>>;

    /// One query for all codes. Unknown codes are absent from the map.
    async fn find_airline_ids(&self, codes: Vec<String>) -> Result<HashMap<String, i32>>;

    /// One query for all codes. Unknown codes are absent from the map.
    async fn find_airport_ids(&self, codes: Vec<String>) -> Result<HashMap<String, i32>>;

    async fn find_route_id(&self, key: &RouteNaturalKey) -> Result<Option<i32>>;

    async fn insert_route(&self, route: NewRouteModel) -> Result<()>;

    async fn update_route(&self, route_id: i32, changes: RouteUpdate) -> Result<()>;

    /// Any route whose `flight_num` equals one of the candidates
    async fn find_route_by_flight_numbers(
        &self,
        candidates: Vec<String>,
    ) -> Result<Option<RouteMatch>>;

    async fn find_route_by_airline_and_number(
        &self,
        airline_code: &str,
        flight_num: &str,
    ) -> Result<Option<RouteMatch>>;
}
