//! Tracing subscriber setup.

use std::env;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events follow `app_level` rather than the global level.
const COOKBOOK_TARGETS: [&str; 4] = ["api_server", "cookbook_core", "cookbook_infra", "migration"];

/// Output format of the fmt layer, from `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "compact" | "text" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub format: LogFormat,
    /// Level for everything outside the cookbook crates.
    pub level: String,
    /// Level for the cookbook crates.
    pub app_level: String,
    /// Log the SQL sea-orm sends to PostgreSQL.
    pub sql_logs: bool,
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            level: "info".to_string(),
            app_level: "debug".to_string(),
            sql_logs: false,
            service_name: "cookbook-api".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Load configuration from `LOG_FORMAT`, `LOG_LEVEL`, `APP_LOG_LEVEL`,
    /// `LOG_SQL` and `OTEL_SERVICE_NAME`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            format: env::var("LOG_FORMAT")
                .ok()
                .and_then(|raw| LogFormat::parse(&raw))
                .unwrap_or(defaults.format),
            level: env::var("LOG_LEVEL").unwrap_or(defaults.level),
            app_level: env::var("APP_LOG_LEVEL").unwrap_or(defaults.app_level),
            sql_logs: env::var("LOG_SQL")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.sql_logs),
            service_name: env::var("OTEL_SERVICE_NAME").unwrap_or(defaults.service_name),
        }
    }

    /// Filter used when `RUST_LOG` is unset.
    pub fn default_directives(&self) -> String {
        let mut directives = vec![self.level.clone()];
        directives.extend(
            COOKBOOK_TARGETS
                .iter()
                .map(|target| format!("{target}={}", self.app_level)),
        );
        if self.sql_logs {
            directives.push("sea_orm=debug".to_string());
            directives.push("sqlx::query=info".to_string());
        } else {
            directives.push("sqlx=warn".to_string());
        }
        directives.join(",")
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.default_directives())?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()?,
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init()?,
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()?,
    }

    tracing::info!(
        service = %config.service_name,
        format = ?config.format,
        sql_logs = config.sql_logs,
        "Telemetry initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse(" text "), Some(LogFormat::Compact));
        assert_eq!(LogFormat::parse("xml"), None);
    }

    #[test]
    fn test_default_directives_cover_cookbook_crates() {
        let config = TelemetryConfig::default();

        assert_eq!(
            config.default_directives(),
            "info,api_server=debug,cookbook_core=debug,cookbook_infra=debug,migration=debug,sqlx=warn"
        );
    }

    #[test]
    fn test_sql_logs_enable_sea_orm() {
        let config = TelemetryConfig {
            sql_logs: true,
            app_level: "trace".to_string(),
            ..Default::default()
        };

        let directives = config.default_directives();
        assert!(directives.contains("cookbook_infra=trace"));
        assert!(directives.contains("sea_orm=debug"));
        assert!(!directives.contains("sqlx=warn"));
    }
}
