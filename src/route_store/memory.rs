use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use chrono::Utc;

use super::RouteStore;
use crate::routes::{NewRouteModel, RouteMatch, RouteModel, RouteNaturalKey, RouteUpdate};

#[derive(Default)]
struct MemoryState {
    airlines: HashMap<String, i32>,
    airports: HashMap<String, i32>,
    routes: Vec<RouteModel>,
    next_route_id: i32,
    failing_airline_writes: HashSet<String>,
    failing_airline_lookups: HashSet<String>,
}

/// [`RouteStore`] held in memory.
///
/// Mirrors the PostgreSQL schema closely enough for engine tests: inserts
/// reject a second row for the same natural key, and every call is counted
/// so tests can assert how many queries and writes a code path issued.
/// Failures can be injected per call type.
#[derive(Default)]
pub struct InMemoryRouteStore {
    state: Mutex<MemoryState>,
    airline_queries: AtomicUsize,
    airport_queries: AtomicUsize,
    route_writes: AtomicUsize,
    fail_identifier_queries: AtomicBool,
    fail_route_queries: AtomicBool,
}

impl InMemoryRouteStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("in-memory route store lock poisoned"))
    }

    pub fn add_airline(&self, iata: &str, id: i32) -> Result<()> {
        self.state()?.airlines.insert(iata.to_string(), id);
        Ok(())
    }

    pub fn add_airport(&self, iata_code: &str, id: i32) -> Result<()> {
        self.state()?.airports.insert(iata_code.to_string(), id);
        Ok(())
    }

    /// Store a route row directly, bypassing the upsert engine
    pub fn seed_route(&self, route: RouteMatch) -> Result<()> {
        let mut state = self.state()?;
        state.next_route_id += 1;
        let now = Utc::now();
        let row = RouteModel {
            id: state.next_route_id,
            airline_code: route.airline_code,
            airline_id: None,
            source_airport_code: route.source_airport_code,
            source_airport_id: None,
            destination_airport_code: route.destination_airport_code,
            destination_airport_id: None,
            flight_num: route.flight_num,
            created_at: now,
            updated_at: now,
        };
        state.routes.push(row);
        Ok(())
    }

    pub fn routes(&self) -> Result<Vec<RouteModel>> {
        Ok(self.state()?.routes.clone())
    }

    /// Make inserts and updates of routes for this airline fail
    pub fn fail_writes_for_airline(&self, airline_code: &str) -> Result<()> {
        self.state()?
            .failing_airline_writes
            .insert(airline_code.to_string());
        Ok(())
    }

    /// Make the natural key existence check fail for this airline
    pub fn fail_route_lookups_for_airline(&self, airline_code: &str) -> Result<()> {
        self.state()?
            .failing_airline_lookups
            .insert(airline_code.to_string());
        Ok(())
    }

    /// Make every airline and airport lookup fail
    pub fn fail_identifier_queries(&self, fail: bool) {
        self.fail_identifier_queries.store(fail, Ordering::SeqCst);
    }

    /// Make every route select fail
    pub fn fail_route_queries(&self, fail: bool) {
        self.fail_route_queries.store(fail, Ordering::SeqCst);
    }

    pub fn airline_queries(&self) -> usize {
        self.airline_queries.load(Ordering::SeqCst)
    }

    pub fn airport_queries(&self) -> usize {
        self.airport_queries.load(Ordering::SeqCst)
    }

    pub fn route_writes(&self) -> usize {
        self.route_writes.load(Ordering::SeqCst)
    }

    fn check_identifier_query(&self) -> Result<()> {
        if self.fail_identifier_queries.load(Ordering::SeqCst) {
            bail!("identifier lookup failed: connection reset");
        }
        Ok(())
    }

    fn check_route_query(&self) -> Result<()> {
        if self.fail_route_queries.load(Ordering::SeqCst) {
            bail!("route query failed: connection reset");
        }
        Ok(())
    }
}

fn to_match(route: &RouteModel) -> RouteMatch {
    RouteMatch {
        airline_code: route.airline_code.clone(),
        source_airport_code: route.source_airport_code.clone(),
        destination_airport_code: route.destination_airport_code.clone(),
        flight_num: route.flight_num.clone(),
    }
}

#[async_trait]
impl RouteStore for InMemoryRouteStore {
    async fn find_airline_id(&self, iata: &str) -> Result<Option<i32>> {
        self.airline_queries.fetch_add(1, Ordering::SeqCst);
        self.check_identifier_query()?;
        Ok(self.state()?.airlines.get(iata).copied())
    }

    async fn find_airport_id(&self, iata_code: &str) -> Result<Option<i32>> {
        self.airport_queries.fetch_add(1, Ordering::SeqCst);
        self.check_identifier_query()?;
        Ok(self.state()?.airports.get(iata_code).copied())
    }

    async fn find_airline_ids(&self, codes: Vec<String>) -> Result<HashMap<String, i32>> {
        self.airline_queries.fetch_add(1, Ordering::SeqCst);
        self.check_identifier_query()?;
        let state = self.state()?;
        Ok(codes
            .into_iter()
            .filter_map(|code| state.airlines.get(&code).map(|id| (code, *id)))
            .collect())
    }

    async fn find_airport_ids(&self, codes: Vec<String>) -> Result<HashMap<String, i32>> {
        self.airport_queries.fetch_add(1, Ordering::SeqCst);
        self.check_identifier_query()?;
        let state = self.state()?;
        Ok(codes
            .into_iter()
            .filter_map(|code| state.airports.get(&code).map(|id| (code, *id)))
            .collect())
    }

    async fn find_route_id(&self, key: &RouteNaturalKey) -> Result<Option<i32>> {
        self.check_route_query()?;
        let state = self.state()?;
        if state.failing_airline_lookups.contains(&key.airline_code) {
            bail!("route query failed for airline {}", key.airline_code);
        }
        Ok(state
            .routes
            .iter()
            .find(|route| {
                route.airline_code == key.airline_code
                    && route.source_airport_code == key.source_airport_code
                    && route.destination_airport_code == key.destination_airport_code
            })
            .map(|route| route.id))
    }

    async fn insert_route(&self, route: NewRouteModel) -> Result<()> {
        self.route_writes.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state()?;

        if state.failing_airline_writes.contains(&route.airline_code) {
            bail!("insert into routes failed for airline {}", route.airline_code);
        }

        let duplicate = state.routes.iter().any(|existing| {
            existing.airline_code == route.airline_code
                && existing.source_airport_code == route.source_airport_code
                && existing.destination_airport_code == route.destination_airport_code
        });
        if duplicate {
            bail!(
                "duplicate key value violates unique constraint \"idx_routes_natural_key\""
            );
        }

        state.next_route_id += 1;
        let now = Utc::now();
        let row = RouteModel {
            id: state.next_route_id,
            airline_code: route.airline_code,
            airline_id: route.airline_id,
            source_airport_code: route.source_airport_code,
            source_airport_id: route.source_airport_id,
            destination_airport_code: route.destination_airport_code,
            destination_airport_id: route.destination_airport_id,
            flight_num: route.flight_num,
            created_at: now,
            updated_at: now,
        };
        state.routes.push(row);
        Ok(())
    }

    async fn update_route(&self, route_id: i32, changes: RouteUpdate) -> Result<()> {
        self.route_writes.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state()?;
        let failing = state.failing_airline_writes.clone();

        let route = state
            .routes
            .iter_mut()
            .find(|route| route.id == route_id)
            .ok_or_else(|| anyhow!("Route {} disappeared before it could be updated", route_id))?;

        if failing.contains(&route.airline_code) {
            bail!("update of routes failed for airline {}", route.airline_code);
        }

        route.airline_id = changes.airline_id;
        route.source_airport_id = changes.source_airport_id;
        route.destination_airport_id = changes.destination_airport_id;
        route.flight_num = changes.flight_num;
        route.updated_at = changes.updated_at;
        Ok(())
    }

    async fn find_route_by_flight_numbers(
        &self,
        candidates: Vec<String>,
    ) -> Result<Option<RouteMatch>> {
        self.check_route_query()?;
        let state = self.state()?;
        Ok(state
            .routes
            .iter()
            .find(|route| {
                route
                    .flight_num
                    .as_ref()
                    .is_some_and(|number| candidates.contains(number))
            })
            .map(to_match))
    }

    async fn find_route_by_airline_and_number(
        &self,
        airline_code: &str,
        flight_num: &str,
    ) -> Result<Option<RouteMatch>> {
        self.check_route_query()?;
        let state = self.state()?;
        Ok(state
            .routes
            .iter()
            .find(|route| {
                route.airline_code == airline_code && route.flight_num.as_deref() == Some(flight_num)
            })
            .map(to_match))
    }
}
