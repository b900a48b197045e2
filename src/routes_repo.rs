use anyhow::Result;
use diesel::prelude::*;

use crate::routes::{NewRouteModel, RouteMatch, RouteNaturalKey, RouteUpdate};
use crate::web::PgPool;

#[derive(Clone)]
pub struct RoutesRepository {
    pool: PgPool,
}

impl RoutesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the id of the route stored for a natural key, if any
    pub async fn find_route_id(&self, key: &RouteNaturalKey) -> Result<Option<i32>> {
        use crate::schema::routes::dsl::*;

        let key = key.clone();
        let pool = self.pool.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let route_id: Option<i32> = routes
                .filter(airline_code.eq(&key.airline_code))
                .filter(source_airport_code.eq(&key.source_airport_code))
                .filter(destination_airport_code.eq(&key.destination_airport_code))
                .select(id)
                .first(&mut conn)
                .optional()?;

            Ok::<Option<i32>, anyhow::Error>(route_id)
        })
        .await??;

        Ok(result)
    }

    pub async fn insert_route(&self, new_route: NewRouteModel) -> Result<()> {
        use crate::schema::routes::dsl::*;

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            diesel::insert_into(routes)
                .values(&new_route)
                .execute(&mut conn)?;

            Ok::<(), anyhow::Error>(())
        })
        .await??;

        Ok(())
    }

    /// Overwrite the resolved ids and flight number of an existing route.
    /// Returns true if the route was found and updated.
    pub async fn update_route(&self, route_id: i32, changes: RouteUpdate) -> Result<bool> {
        use crate::schema::routes::dsl::*;

        let pool = self.pool.clone();
        let rows_affected = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let rows = diesel::update(routes.filter(id.eq(route_id)))
                .set(&changes)
                .execute(&mut conn)?;

            Ok::<usize, anyhow::Error>(rows)
        })
        .await??;

        Ok(rows_affected > 0)
    }

    /// Find any route whose stored flight number equals one of the candidates
    pub async fn find_route_by_flight_numbers(
        &self,
        candidates: Vec<String>,
    ) -> Result<Option<RouteMatch>> {
        use crate::schema::routes::dsl::*;

        let pool = self.pool.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let route: Option<RouteMatch> = routes
                .filter(flight_num.eq_any(&candidates))
                .order(updated_at.desc())
                .select(RouteMatch::as_select())
                .first(&mut conn)
                .optional()?;

            Ok::<Option<RouteMatch>, anyhow::Error>(route)
        })
        .await??;

        Ok(result)
    }

    /// Find a route by exact airline code and flight number
    pub async fn find_route_by_airline_and_number(
        &self,
        airline: &str,
        number: &str,
    ) -> Result<Option<RouteMatch>> {
        use crate::schema::routes::dsl::*;

        let airline = airline.to_string();
        let number = number.to_string();
        let pool = self.pool.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let route: Option<RouteMatch> = routes
                .filter(airline_code.eq(&airline))
                .filter(flight_num.eq(&number))
                .order(updated_at.desc())
                .select(RouteMatch::as_select())
                .first(&mut conn)
                .optional()?;

            Ok::<Option<RouteMatch>, anyhow::Error>(route)
        })
        .await??;

        Ok(result)
    }
}
