//! Top-level router configuration combining admin pages and JSON routes.
//!
//! # Route Structure
//!
//! - `GET  /health`          - Health check: record store, sessions (public)
//! - `/admin/login`, `/admin/logout` - Login screen (public, strict rate limit)
//! - `/admin/dashboard`      - Admin pages (signed-in session required)
//! - `/admin/api/*`          - JSON routes (session checked per handler)
//! - `/static/*`             - Static assets
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket
//! - **Authentication** - Cookie session for the dashboard
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use crate::web;
use crate::web::middleware::web_auth;
use axum::response::Redirect;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let web_protected = web::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            web_auth::layer,
        ))
        .layer(rate_limit::layer());

    let web_public = web::routes::public_routes().layer(rate_limit::secure_layer());

    let admin_router = Router::new()
        .merge(web_protected)
        .merge(web_public)
        .nest("/api", api::routes::session_routes().layer(rate_limit::layer()))
        .route("/", get(|| async { Redirect::to("/admin/dashboard") }));

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/admin", admin_router)
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
