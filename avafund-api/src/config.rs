//! Configuration management for the API server
//!
//! Loaded from environment variables (and a `.env` file in development).
//!
//! # Environment Variables
//!
//! - `HOST`: Host to bind to (default: 0.0.0.0)
//! - `PORT`: Port to bind to (default: 3001)
//! - `JWT_SECRET`: Secret key for token signing (required, at least 32 characters)
//! - `DATABASE_URL`: PostgreSQL connection string (optional; in-memory store when unset)
//! - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
//! - `FALLBACK_KES_PER_AVAX`: KES per AVAX rate fixed onto new campaigns (default: 146500)
//! - `NETWORK`: Network label reported by `/health` (default: development)
//! - `CORS_ORIGINS`: Comma-separated allowed origins, `*` for any (default: *)
//! - `LOG_FORMAT`: `json` for JSON logs, anything else for human-readable
//! - `RUST_LOG`: Log filter
//!
//! # Example
//!
//! ```no_run
//! use avafund_api::config::Config;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! println!("Server will listen on {}", config.bind_address());
//! # Ok(())
//! # }
//! ```

use anyhow::Context;
use avafund_shared::ledger::amount::Amount;
use std::env;

/// Minimum accepted `JWT_SECRET` length
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,

    /// `None` selects the in-memory store
    pub database: Option<DatabaseConfig>,

    pub jwt: JwtConfig,

    pub pricing: PricingConfig,

    /// Emit JSON logs
    pub log_json: bool,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Network label, e.g. "development" or "fuji"
    pub network: String,

    /// Allowed CORS origins; `["*"]` allows any
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HS256 signing
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,
}

/// Conversion rate configuration
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// KES per AVAX, fixed onto each campaign at creation
    pub fallback_kes_per_avax: Amount,
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET` is missing or too short, or a
    /// variable has an unparseable value.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which returns a variable's value
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = var("PORT")
            .unwrap_or_else(|| "3001".to_string())
            .parse::<u16>()
            .context("PORT must be a port number")?;

        let jwt_secret = var("JWT_SECRET").context("JWT_SECRET environment variable is required")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            anyhow::bail!("JWT_SECRET must be at least {} characters long", MIN_JWT_SECRET_LEN);
        }

        let database = match var("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|| "10".to_string())
                    .parse::<u32>()
                    .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            }),
            None => None,
        };

        let fallback_kes_per_avax: Amount = var("FALLBACK_KES_PER_AVAX")
            .unwrap_or_else(|| "146500".to_string())
            .parse()
            .context("FALLBACK_KES_PER_AVAX must be a decimal number")?;
        if !fallback_kes_per_avax.is_positive() {
            anyhow::bail!("FALLBACK_KES_PER_AVAX must be greater than zero");
        }

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                network: var("NETWORK").unwrap_or_else(|| "development".to_string()),
                cors_origins,
            },
            database,
            jwt: JwtConfig { secret: jwt_secret },
            pricing: PricingConfig {
                fallback_kes_per_avax,
            },
            log_json: var("LOG_FORMAT").is_some_and(|format| format.eq_ignore_ascii_case("json")),
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Whether any origin may call the API
    pub fn allows_any_origin(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn load(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("JWT_SECRET", SECRET)]).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:3001");
        assert_eq!(config.api.network, "development");
        assert!(config.allows_any_origin());
        assert!(config.database.is_none());
        assert_eq!(config.pricing.fallback_kes_per_avax, Amount::from_whole(146_500));
        assert!(!config.log_json);
    }

    #[test]
    fn test_explicit_values() {
        let config = load(&[
            ("JWT_SECRET", SECRET),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DATABASE_URL", "postgresql://localhost/avafund"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("FALLBACK_KES_PER_AVAX", "150000.5"),
            ("NETWORK", "fuji"),
            ("CORS_ORIGINS", "https://avafund.app, https://admin.avafund.app"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        let database = config.database.as_ref().unwrap();
        assert_eq!(database.url, "postgresql://localhost/avafund");
        assert_eq!(database.max_connections, 4);
        assert_eq!(config.pricing.fallback_kes_per_avax.to_plain_string(), "150000.5");
        assert_eq!(config.api.network, "fuji");
        assert_eq!(
            config.api.cors_origins,
            vec!["https://avafund.app", "https://admin.avafund.app"]
        );
        assert!(!config.allows_any_origin());
        assert!(config.log_json);
    }

    #[test]
    fn test_jwt_secret_rules() {
        assert!(load(&[]).is_err());
        assert!(load(&[("JWT_SECRET", "short")]).is_err());
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        assert!(load(&[("JWT_SECRET", SECRET), ("PORT", "abc")]).is_err());
        assert!(load(&[("JWT_SECRET", SECRET), ("FALLBACK_KES_PER_AVAX", "0")]).is_err());
        assert!(load(&[("JWT_SECRET", SECRET), ("FALLBACK_KES_PER_AVAX", "-3")]).is_err());
    }
}
