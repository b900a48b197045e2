//! Runtime configuration read from the environment (and `.env` via dotenvy)

use anyhow::{Context, Result, bail};

const DEFAULT_POOL_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Only commands that touch the database require it
    pub database_url: Option<String>,
    pub database_pool_size: u32,
    /// Deployment environment, e.g. `production` or `staging`
    pub environment: String,
    pub sentry_dsn: Option<String>,
    pub metrics_port: Option<u16>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_pool_size = match get("DATABASE_POOL_SIZE") {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("DATABASE_POOL_SIZE is not a number: {}", raw))?,
            None => DEFAULT_POOL_SIZE,
        };
        if database_pool_size == 0 {
            bail!("DATABASE_POOL_SIZE must be at least 1");
        }

        let metrics_port = get("METRICS_PORT")
            .map(|raw| {
                raw.parse::<u16>()
                    .with_context(|| format!("METRICS_PORT is not a valid port: {}", raw))
            })
            .transpose()?;

        Ok(Self {
            database_url: get("DATABASE_URL"),
            database_pool_size,
            environment: get("AIRLOG_ENV").unwrap_or_else(|| "development".to_string()),
            sentry_dsn: get("SENTRY_DSN"),
            metrics_port,
        })
    }

    pub fn database_url(&self) -> Result<&str> {
        match self.database_url.as_deref() {
            Some(url) => Ok(url),
            None => bail!("DATABASE_URL must be set"),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/airlog")]).unwrap();

        assert_eq!(config.database_url().unwrap(), "postgres://localhost/airlog");
        assert_eq!(config.database_pool_size, 10);
        assert_eq!(config.environment, "development");
        assert_eq!(config.sentry_dsn, None);
        assert_eq!(config.metrics_port, None);
        assert!(!config.is_production());
    }

    #[test]
    fn test_database_url_required_on_use() {
        let config = config_from(&[]).unwrap();
        assert!(config.database_url().is_err());

        let blank = config_from(&[("DATABASE_URL", "  ")]).unwrap();
        assert_eq!(blank.database_url, None);
    }

    #[test]
    fn test_explicit_values() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://db/airlog"),
            ("DATABASE_POOL_SIZE", "4"),
            ("AIRLOG_ENV", "production"),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
            ("METRICS_PORT", "9090"),
        ])
        .unwrap();

        assert_eq!(config.database_pool_size, 4);
        assert!(config.is_production());
        assert_eq!(config.metrics_port, Some(9090));
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        assert!(
            config_from(&[("DATABASE_URL", "x"), ("DATABASE_POOL_SIZE", "many")]).is_err()
        );
        assert!(config_from(&[("DATABASE_URL", "x"), ("DATABASE_POOL_SIZE", "0")]).is_err());
        assert!(config_from(&[("DATABASE_URL", "x"), ("METRICS_PORT", "70000")]).is_err());
    }
}
