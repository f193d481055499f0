//! Application configuration loaded from environment variables.

use std::env;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use cookbook_core::domain::NewUser;
use cookbook_infra::auth::{DEFAULT_ISSUER, MAX_EXPIRATION_HOURS};
use cookbook_infra::{DatabaseConfig, JwtConfig, RateLimitConfig};

const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs on the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub login_rate_limit: RateLimitConfig,
    /// Proxies allowed to name the client through forwarding headers.
    pub trusted_proxies: Vec<IpAddr>,
    /// Administrator created at startup when it does not exist yet.
    pub superuser: Option<NewUser>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let database = match env::var("DATABASE_URL") {
            Ok(url) => Some(DatabaseConfig {
                url,
                max_connections: parsed("DB_MAX_CONNECTIONS", 100)?,
                min_connections: parsed("DB_MIN_CONNECTIONS", 10)?,
            }),
            Err(_) => None,
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080)?,
            database,
            jwt: JwtConfig {
                secret: jwt_secret(),
                expiration_hours: token_lifetime(parsed("JWT_EXPIRATION_HOURS", 24)?)?,
                issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string()),
            },
            login_rate_limit: RateLimitConfig {
                max_requests: parsed("LOGIN_RATE_LIMIT_MAX_REQUESTS", 10)?,
                window: Duration::from_secs(parsed("LOGIN_RATE_LIMIT_WINDOW_SECS", 60)?),
            },
            trusted_proxies: trusted_proxies()?,
            superuser: superuser(),
        })
    }
}

/// Parse an optional variable, failing on values that do not parse.
fn parsed<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        Err(_) => Ok(default),
    }
}

fn token_lifetime(hours: i64) -> anyhow::Result<i64> {
    anyhow::ensure!(
        (1..=MAX_EXPIRATION_HOURS).contains(&hours),
        "JWT_EXPIRATION_HOURS must be between 1 and {MAX_EXPIRATION_HOURS}, got {hours}"
    );
    Ok(hours)
}

/// Comma-separated `TRUSTED_PROXIES`, empty when unset.
fn trusted_proxies() -> anyhow::Result<Vec<IpAddr>> {
    let Ok(raw) = env::var("TRUSTED_PROXIES") else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .parse()
                .with_context(|| format!("invalid address in TRUSTED_PROXIES: {entry:?}"))
        })
        .collect()
}

fn jwt_secret() -> String {
    let secret = env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string());

    if secret == DEFAULT_JWT_SECRET {
        let is_production = env::var("RUST_ENV")
            .map(|v| v == "production" || v == "prod")
            .unwrap_or(false);

        if is_production {
            tracing::error!(
                "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
            );
        } else {
            tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
        }
    }

    secret
}

fn superuser() -> Option<NewUser> {
    let email = env::var("SUPERUSER_EMAIL").ok()?;
    let Ok(password) = env::var("SUPERUSER_PASSWORD") else {
        tracing::warn!("SUPERUSER_EMAIL set without SUPERUSER_PASSWORD; skipping superuser");
        return None;
    };

    Some(NewUser {
        email,
        name: env::var("SUPERUSER_NAME").unwrap_or_else(|_| "admin".to_string()),
        password,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_lifetime_bounds() {
        assert_eq!(token_lifetime(24).unwrap(), 24);
        assert!(token_lifetime(0).is_err());
        assert!(token_lifetime(-1).is_err());
        assert!(token_lifetime(MAX_EXPIRATION_HOURS + 1).is_err());
        assert!(token_lifetime(i64::MAX).is_err());
    }
}
