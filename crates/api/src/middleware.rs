use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use orgdesk_auth::{AuthError, IdentityResolver, Unauthenticated};

use crate::app::errors;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub resolver: IdentityResolver,
}

/// Resolve the bearer token into a [`PrincipalContext`] or short-circuit
/// with 401. Rejection reasons are logged, never returned.
pub async fn auth_middleware(State(state): State<AuthState>, mut req: Request, next: Next) -> Response {
    let Some(token) = extract_bearer(req.headers()) else {
        tracing::debug!(reason = ?Unauthenticated::MissingToken, "request rejected");
        return errors::unauthenticated();
    };

    let principal = match state.resolver.resolve(token, Utc::now()).await {
        Ok(principal) => principal,
        Err(AuthError::Unauthenticated(reason)) => {
            tracing::debug!(?reason, "request rejected");
            return errors::unauthenticated();
        }
        Err(err) => return errors::service_error_to_response(err.into()),
    };

    req.extensions_mut().insert(PrincipalContext::new(principal));
    next.run(req).await
}

pub(crate) fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// One log line per request with method, path, status and latency.
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request handled"
    );
    response
}
