use std::collections::HashMap;

use anyhow::Result;
use diesel::prelude::*;

use crate::airlines::AirlineModel;
use crate::web::PgPool;

#[derive(Clone)]
pub struct AirlinesRepository {
    pool: PgPool,
}

impl AirlinesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get an airline by its IATA designator.
    /// OpenFlights reuses some designators, so the lowest id wins.
    pub async fn get_airline_by_iata(&self, airline_iata: &str) -> Result<Option<AirlineModel>> {
        use crate::schema::airlines::dsl::*;

        let airline_iata = airline_iata.to_string();
        let pool = self.pool.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let airline: Option<AirlineModel> = airlines
                .filter(iata.eq(&airline_iata))
                .order(id.asc())
                .select(AirlineModel::as_select())
                .first(&mut conn)
                .optional()?;

            Ok::<Option<AirlineModel>, anyhow::Error>(airline)
        })
        .await??;

        Ok(result)
    }

    /// Resolve many IATA designators in a single query.
    /// Codes with no airline are simply absent from the returned map.
    pub async fn get_airline_ids_by_iata(&self, codes: Vec<String>) -> Result<HashMap<String, i32>> {
        use crate::schema::airlines::dsl::*;

        if codes.is_empty() {
            return Ok(HashMap::new());
        }

        let pool = self.pool.clone();
        let rows = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let rows: Vec<(i32, Option<String>)> = airlines
                .filter(iata.eq_any(&codes))
                .order(id.asc())
                .select((id, iata))
                .load(&mut conn)?;

            Ok::<Vec<(i32, Option<String>)>, anyhow::Error>(rows)
        })
        .await??;

        let mut airline_by_iata = HashMap::new();
        for (airline_id, code) in rows {
            if let Some(code) = code {
                airline_by_iata.entry(code).or_insert(airline_id);
            }
        }

        Ok(airline_by_iata)
    }
}
