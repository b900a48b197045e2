//! airlog - flight log backend
//!
//! The interesting part is the route engine: flight number parsing, in-batch
//! deduplication, batched IATA code resolution and the route upsert/lookup
//! paths built on them. The HTTP layer and CLI are thin wrappers around it.

pub mod actions;
pub mod airlines;
pub mod airlines_repo;
pub mod airports;
pub mod airports_repo;
pub mod config;
pub mod database;
pub mod flight_numbers;
pub mod flight_routes;
pub mod metrics;
pub mod route_batch;
pub mod route_import;
pub mod route_lookup;
pub mod route_resolver;
pub mod route_store;
pub mod route_upsert;
pub mod routes;
pub mod routes_repo;
pub mod schema;
pub mod web;

pub use route_lookup::{RouteLookup, lookup_route};
pub use route_store::{InMemoryRouteStore, PgRouteStore, RouteStore};
pub use route_upsert::{BulkUpsertResult, RouteUpserter};
pub use routes::{RouteDescriptor, RouteError, RouteWrite};
