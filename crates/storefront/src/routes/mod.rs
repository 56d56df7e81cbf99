//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//!
//! # Products
//! GET  /products               - Product listing (?searchTerm, minPrice, maxPrice, page)
//! POST /products               - Create product
//! GET  /products/{id}          - Product detail
//! POST /products/{id}          - Update product
//! POST /products/{id}/delete   - Delete product
//!
//! # Members
//! POST /members/register       - Register action
//! POST /members/login          - Login action
//! POST /members/logout         - Logout action
//! GET  /members/me             - Current identity (requires login)
//! ```
//!
//! Writes answer with `303 See Other` to `/products`; failures answer with the
//! `AppError` status and a JSON body.

pub mod members;
pub mod products;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/{id}", get(products::show).post(products::update))
        .route("/{id}/delete", post(products::delete))
}

/// Create the member routes router.
pub fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(members::register))
        .route("/login", post(members::login))
        .route("/logout", post(members::logout))
        .route("/me", get(members::me))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/products", product_routes())
        .nest("/members", member_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    let Some(pool) = state.pool() else {
        return StatusCode::OK;
    };
    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
