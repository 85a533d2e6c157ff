//! HTTP application wiring.
//!
//! - `services.rs`: storage backend plus the services built over it
//! - `routes/`: handlers, one file per entity
//! - `dto.rs`: request bodies and response shapes
//! - `extract.rs`: extractors that reject with the response envelope
//! - `errors.rs`: the `{ statusCode, message, data?, token? }` envelope

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod services;

pub use services::AppServices;

pub const API_PREFIX: &str = "/api/v1";

/// Build the full HTTP router.
pub fn build_app(services: Arc<AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        jwt: services.auth.jwt().clone(),
    };

    let protected = routes::router().route_layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));
    let api = routes::public_router().merge(protected);

    Router::new()
        .route("/health", get(routes::system::health))
        .nest(API_PREFIX, api)
        .fallback(routes::system::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(Extension(services)),
        )
}
