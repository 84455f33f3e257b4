//! HTTP API application wiring (axum router + service graph).
//!
//! - `services.rs`: adapters and use-case services
//! - `routes/`: HTTP handlers
//! - `dto.rs`: request/response bodies
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use orgdesk_infra::AppConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Mount point of the organisation API.
pub const API_PREFIX: &str = "/api/v1/organisations";

/// Build the full HTTP router from process configuration (used by `main.rs`).
pub async fn build_app(config: AppConfig) -> anyhow::Result<Router> {
    let services = services::build_services(&config).await?;
    Ok(build_router(Arc::new(services)))
}

/// Build the router over an existing service graph.
pub fn build_router(services: Arc<AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        resolver: services.resolver.clone(),
    };

    // Protected routes: require a resolvable bearer token.
    let protected = routes::organisations::protected_router().route_layer(
        axum::middleware::from_fn_with_state(auth_state, middleware::auth_middleware),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .nest(
            API_PREFIX,
            routes::organisations::public_router().merge(protected),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::log_request))
                .layer(Extension(services)),
        )
}
