use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};

/// Which persistence backend the service runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow!("unknown STORE_BACKEND '{other}' (expected postgres or memory)")),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    /// Only required for the Postgres backend.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let store_backend = std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse::<StoreBackend>()?;

        let database_url = std::env::var("DATABASE_URL").ok();
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            bail!("Required environment variable 'DATABASE_URL' is not set (STORE_BACKEND=postgres)");
        }

        let token_ttl_days =
            parse_token_ttl(&std::env::var("TOKEN_TTL_DAYS").unwrap_or_else(|_| "7".to_string()))?;

        Ok(Config {
            store_backend,
            database_url,
            jwt_secret: require_env("JWT_SECRET")?,
            token_ttl_days,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Upper bound on token lifetime, in days.
pub const MAX_TOKEN_TTL_DAYS: i64 = 3650;

fn parse_token_ttl(raw: &str) -> Result<i64> {
    let days = raw
        .trim()
        .parse::<i64>()
        .context("TOKEN_TTL_DAYS must be an integer")?;
    if !(1..=MAX_TOKEN_TTL_DAYS).contains(&days) {
        bail!("TOKEN_TTL_DAYS must be between 1 and {MAX_TOKEN_TTL_DAYS}, got {days}");
    }
    Ok(days)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
impl Config {
    /// In-memory configuration used by handler tests.
    pub fn for_tests() -> Self {
        Config {
            store_backend: StoreBackend::Memory,
            database_url: None,
            jwt_secret: "test-secret".to_string(),
            token_ttl_days: 7,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
