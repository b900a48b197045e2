//! Common test utilities for route engine integration tests
//!
//! Most tests run against [`InMemoryRouteStore`]. Tests that exercise the
//! diesel store use [`TestDatabase`], which creates a throwaway PostgreSQL
//! database per test and drops it afterwards. Those tests are skipped when
//! `TEST_DATABASE_URL` is not set.

#![allow(dead_code)]

use airlog::database::MIGRATIONS;
use airlog::route_store::InMemoryRouteStore;
use airlog::web::PgPool;
use anyhow::{Context, Result};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::MigrationHarness;
use uuid::Uuid;

pub const AIRLINES: [(&str, i32); 3] = [("DL", 1), ("UA", 2), ("AA", 3)];
pub const AIRPORTS: [(&str, i32); 4] = [("ATL", 10), ("LAX", 20), ("SFO", 30), ("JFK", 40)];

/// In-memory store holding the reference airlines and airports above
pub fn reference_store() -> InMemoryRouteStore {
    let store = InMemoryRouteStore::new();
    for (code, id) in AIRLINES {
        store.add_airline(code, id).expect("add airline");
    }
    for (code, id) in AIRPORTS {
        store.add_airport(code, id).expect("add airport");
    }
    store
}

/// Isolated PostgreSQL database for one test, dropped when this is dropped
pub struct TestDatabase {
    db_name: String,
    pool: PgPool,
    admin_url: String,
}

impl TestDatabase {
    /// Create and migrate a fresh database, or `None` when no test server is configured
    pub fn create() -> Result<Option<Self>> {
        dotenvy::dotenv().ok();

        let Ok(base_url) = std::env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set, skipping PostgreSQL test");
            return Ok(None);
        };

        let (server_url, _) = base_url
            .rsplit_once('/')
            .context("TEST_DATABASE_URL must end with a database name")?;
        let admin_url = format!("{}/postgres", server_url);
        let db_name = format!("airlog_test_{}", Uuid::new_v4().simple());

        let mut admin_conn = PgConnection::establish(&admin_url).context(
            "Failed to connect to PostgreSQL for database creation. Is PostgreSQL running?",
        )?;
        // db_name is generated from a uuid, safe to interpolate
        diesel::sql_query(format!("CREATE DATABASE \"{}\"", db_name))
            .execute(&mut admin_conn)
            .with_context(|| format!("Failed to create test database {}", db_name))?;

        let test_db_url = format!("{}/{}", server_url, db_name);
        let manager = ConnectionManager::<PgConnection>::new(&test_db_url);
        let pool = Pool::builder()
            .max_size(4)
            .build(manager)
            .with_context(|| format!("Failed to create connection pool for {}", db_name))?;

        let mut conn = pool.get()?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow::anyhow!("Failed to migrate {}: {}", db_name, e))?;

        Ok(Some(TestDatabase {
            db_name,
            pool,
            admin_url,
        }))
    }

    pub fn pool(&self) -> PgPool {
        self.pool.clone()
    }

    /// Insert the reference airlines and airports with the ids above
    pub fn seed_reference_data(&self) -> Result<()> {
        let mut conn = self.pool.get()?;
        for (code, id) in AIRLINES {
            diesel::sql_query(
                "INSERT INTO airlines (id, name, iata, country, active) VALUES ($1, $2, $3, 'United States', TRUE)",
            )
            .bind::<diesel::sql_types::Integer, _>(id)
            .bind::<diesel::sql_types::Text, _>(format!("{} Airlines", code))
            .bind::<diesel::sql_types::Text, _>(code)
            .execute(&mut conn)?;
        }
        for (code, id) in AIRPORTS {
            diesel::sql_query(
                "INSERT INTO airports (id, name, city, country, iata_code) VALUES ($1, $2, $3, 'United States', $4)",
            )
            .bind::<diesel::sql_types::Integer, _>(id)
            .bind::<diesel::sql_types::Text, _>(format!("{} Airport", code))
            .bind::<diesel::sql_types::Text, _>(code)
            .bind::<diesel::sql_types::Text, _>(code)
            .execute(&mut conn)?;
        }
        Ok(())
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        if let Ok(mut conn) = PgConnection::establish(&self.admin_url) {
            let drop_sql = format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)", self.db_name);
            if let Err(e) = diesel::sql_query(drop_sql).execute(&mut conn) {
                eprintln!("Failed to drop test database {}: {}", self.db_name, e);
            }
        }
    }
}
