//! # Cookbook API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::middleware::{NormalizePath, TrailingSlash};
use actix_web::{App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use cookbook_infra::InMemoryRateLimiter;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::rate_limit::RateLimitMiddleware;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env()).context("failed to initialize tracing")?;

    let config = AppConfig::from_env()?;

    tracing::info!(
        "Starting Cookbook API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await?;
    state.bootstrap_superuser(config.superuser.clone()).await?;

    // One limiter shared by every worker
    let login_throttle = RateLimitMiddleware::new(Arc::new(
        InMemoryRateLimiter::new(config.login_rate_limit.clone())
            .context("invalid login rate limit")?,
    ))
    .trust_proxies(config.trusted_proxies.clone());

    HttpServer::new(move || {
        App::new()
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .configure(handlers::configure(state.clone(), login_throttle.clone()))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
