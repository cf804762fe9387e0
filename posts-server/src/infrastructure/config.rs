use std::str::FromStr;

use serde::Deserialize;

use crate::infrastructure::security::MAX_TOKEN_TTL_SECS;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow::anyhow!("invalid STORAGE: {other}")),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub run_migrations: bool,
    pub jwt_secret: String,
    pub jwt_expires_in_secs: i64,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let storage = lookup("STORAGE")
            .map(|s| s.parse::<StorageBackend>())
            .transpose()?
            .unwrap_or(StorageBackend::Postgres);
        let database_url = lookup("DATABASE_URL").filter(|s| !s.is_empty());
        if storage == StorageBackend::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL must be set");
        }
        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "20".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid DATABASE_MAX_CONNECTIONS: {}", e))?;
        let run_migrations = lookup("RUN_MIGRATIONS")
            .unwrap_or_else(|| "true".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid RUN_MIGRATIONS: {}", e))?;
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let jwt_expires_in_secs: i64 = lookup("JWT_EXPIRES_IN_SECS")
            .unwrap_or_else(|| "3600".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid JWT_EXPIRES_IN_SECS: {}", e))?;
        if jwt_expires_in_secs <= 0 {
            anyhow::bail!("JWT_EXPIRES_IN_SECS must be positive");
        }
        if jwt_expires_in_secs > MAX_TOKEN_TTL_SECS {
            anyhow::bail!("JWT_EXPIRES_IN_SECS must be at most {MAX_TOKEN_TTL_SECS}");
        }
        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            storage,
            database_url,
            database_max_connections,
            run_migrations,
            jwt_secret,
            jwt_expires_in_secs,
            cors_origins,
        })
    }
}
