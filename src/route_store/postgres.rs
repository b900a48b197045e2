use std::collections::HashMap;

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use super::RouteStore;
use crate::airlines_repo::AirlinesRepository;
use crate::airports_repo::AirportsRepository;
use crate::routes::{NewRouteModel, RouteMatch, RouteNaturalKey, RouteUpdate};
use crate::routes_repo::RoutesRepository;
use crate::web::PgPool;

/// [`RouteStore`] backed by the diesel repositories
#[derive(Clone)]
pub struct PgRouteStore {
    airlines: AirlinesRepository,
    airports: AirportsRepository,
    routes: RoutesRepository,
}

impl PgRouteStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            airlines: AirlinesRepository::new(pool.clone()),
            airports: AirportsRepository::new(pool.clone()),
            routes: RoutesRepository::new(pool),
        }
    }
}

#[async_trait]
impl RouteStore for PgRouteStore {
    async fn find_airline_id(&self, iata: &str) -> Result<Option<i32>> {
        let airline = self.airlines.get_airline_by_iata(iata).await?;
        Ok(airline.map(|a| a.id))
    }

    async fn find_airport_id(&self, iata_code: &str) -> Result<Option<i32>> {
        let airport = self.airports.get_airport_by_iata(iata_code).await?;
        Ok(airport.map(|a| a.id))
    }

    async fn find_airline_ids(&self, codes: Vec<String>) -> Result<HashMap<String, i32>> {
        self.airlines.get_airline_ids_by_iata(codes).await
    }

    async fn find_airport_ids(&self, codes: Vec<String>) -> Result<HashMap<String, i32>> {
        self.airports.get_airport_ids_by_iata(codes).await
    }

    async fn find_route_id(&self, key: &RouteNaturalKey) -> Result<Option<i32>> {
        self.routes.find_route_id(key).await
    }

    async fn insert_route(&self, route: NewRouteModel) -> Result<()> {
        self.routes.insert_route(route).await
    }

    async fn update_route(&self, route_id: i32, changes: RouteUpdate) -> Result<()> {
        if self.routes.update_route(route_id, changes).await? {
            Ok(())
        } else {
            Err(anyhow!("Route {} disappeared before it could be updated", route_id))
        }
    }

    async fn find_route_by_flight_numbers(
        &self,
        candidates: Vec<String>,
    ) -> Result<Option<RouteMatch>> {
        self.routes.find_route_by_flight_numbers(candidates).await
    }

    async fn find_route_by_airline_and_number(
        &self,
        airline_code: &str,
        flight_num: &str,
    ) -> Result<Option<RouteMatch>> {
        self.routes
            .find_route_by_airline_and_number(airline_code, flight_num)
            .await
    }
}
