//! HTTP handlers and route configuration.

mod attributes;
mod auth;
mod feed;
mod health;
mod profiles;
mod recipes;


use actix_web::web;

use cookbook_core::domain::{Ingredient, Tag};

use crate::middleware::error::{json_error, path_error, query_error};
use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::state::AppState;

/// Register shared state, extractor error handlers and all routes.
///
/// Paths are declared without trailing slashes; the app is wrapped in
/// `NormalizePath::trim()` so `/api/recipes/` resolves too.
pub fn configure(
    state: AppState,
    login_throttle: RateLimitMiddleware,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state))
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .app_data(web::QueryConfig::default().error_handler(query_error))
            .app_data(web::PathConfig::default().error_handler(path_error))
            .service(
                web::scope("/api")
                    // Public routes
                    .route("/health", web::get().to(health::health_check))
                    .service(
                        web::resource("/login")
                            .wrap(login_throttle)
                            .route(web::post().to(auth::login)),
                    )
                    .service(
                        web::resource("/profile")
                            .route(web::get().to(profiles::list))
                            .route(web::post().to(profiles::create)),
                    )
                    .service(
                        web::resource("/profile/{id}")
                            .route(web::get().to(profiles::retrieve))
                            .route(web::put().to(profiles::update))
                            .route(web::patch().to(profiles::partial_update))
                            .route(web::delete().to(profiles::delete)),
                    )
                    // Token-protected routes
                    .service(
                        web::resource("/feed")
                            .route(web::get().to(feed::list))
                            .route(web::post().to(feed::create)),
                    )
                    .service(
                        web::resource("/feed/{id}")
                            .route(web::get().to(feed::retrieve))
                            .route(web::put().to(feed::update))
                            .route(web::patch().to(feed::partial_update))
                            .route(web::delete().to(feed::delete)),
                    )
                    .service(
                        web::resource("/recipes")
                            .route(web::get().to(recipes::list))
                            .route(web::post().to(recipes::create)),
                    )
                    .service(
                        web::resource("/recipes/{id}")
                            .route(web::get().to(recipes::retrieve))
                            .route(web::put().to(recipes::update))
                            .route(web::patch().to(recipes::partial_update))
                            .route(web::delete().to(recipes::delete)),
                    )
                    .configure(attributes::routes::<Tag>("/tags"))
                    .configure(attributes::routes::<Ingredient>("/ingredients")),
            );
    }
}
