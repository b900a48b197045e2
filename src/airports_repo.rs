use std::collections::HashMap;

use anyhow::Result;
use diesel::prelude::*;

use crate::airports::AirportModel;
use crate::web::PgPool;

#[derive(Clone)]
pub struct AirportsRepository {
    pool: PgPool,
}

impl AirportsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get an airport by its IATA code
    pub async fn get_airport_by_iata(&self, airport_iata: &str) -> Result<Option<AirportModel>> {
        use crate::schema::airports::dsl::*;

        let airport_iata = airport_iata.to_string();
        let pool = self.pool.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let airport: Option<AirportModel> = airports
                .filter(iata_code.eq(&airport_iata))
                .order(id.asc())
                .select(AirportModel::as_select())
                .first(&mut conn)
                .optional()?;

            Ok::<Option<AirportModel>, anyhow::Error>(airport)
        })
        .await??;

        Ok(result)
    }

    /// Resolve many IATA codes in a single query, covering both origins and
    /// destinations of a batch
    pub async fn get_airport_ids_by_iata(&self, codes: Vec<String>) -> Result<HashMap<String, i32>> {
        use crate::schema::airports::dsl::*;

        if codes.is_empty() {
            return Ok(HashMap::new());
        }

        let pool = self.pool.clone();
        let rows = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let rows: Vec<(i32, Option<String>)> = airports
                .filter(iata_code.eq_any(&codes))
                .order(id.asc())
                .select((id, iata_code))
                .load(&mut conn)?;

            Ok::<Vec<(i32, Option<String>)>, anyhow::Error>(rows)
        })
        .await??;

        let mut airport_by_iata = HashMap::new();
        for (airport_id, code) in rows {
            if let Some(code) = code {
                airport_by_iata.entry(code).or_insert(airport_id);
            }
        }

        Ok(airport_by_iata)
    }
}
