use axum::http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use orgdesk_tenancy::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> Response {
    match err {
        ServiceError::Unauthenticated(_) => unauthenticated(),
        ServiceError::InvalidCredentials => with_challenge(json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid email or password",
        )),
        ServiceError::Forbidden(reason) => {
            tracing::warn!(?reason, "access denied");
            json_error(StatusCode::FORBIDDEN, "forbidden", "forbidden")
        }
        ServiceError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        ServiceError::EmailTaken => json_error(StatusCode::BAD_REQUEST, "email_taken", "email already registered"),
        ServiceError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        ServiceError::Storage(msg) | ServiceError::Internal(msg) => {
            tracing::error!(error = %msg, "request failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal server error")
        }
    }
}

pub fn unauthenticated() -> Response {
    with_challenge(json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "authentication required"))
}

pub fn bad_request(message: impl Into<String>) -> Response {
    json_error(StatusCode::BAD_REQUEST, "validation_error", message)
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

fn with_challenge(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    response
}
