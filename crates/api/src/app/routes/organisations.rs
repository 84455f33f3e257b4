use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Extension, Multipart, Path,
        multipart::MultipartRejection,
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};

use orgdesk_auth::authorize_manage;
use orgdesk_core::OrganisationId;
use orgdesk_tenancy::{CreateOrganisation, LogoUpload, UpdateOrganisation};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

/// Open endpoints: signup and login.
pub fn public_router() -> Router {
    Router::new()
        .route("/create", post(create_organisation))
        .route("/onboard", post(onboard))
        .route("/onboard-with-admin", post(onboard_with_admin))
        .route("/login", post(login))
}

/// Endpoints that require an authenticated principal.
pub fn protected_router() -> Router {
    Router::new()
        .route("/me", get(me))
        .route("/update", put(update_organisation))
        .route("/:id", get(get_organisation))
        .route("/:id/users", get(list_members))
}

pub async fn create_organisation(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateOrganisationRequest>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => return errors::bad_request(rejection.body_text()),
    };

    match services.onboarding.create_organisation(body.into()).await {
        Ok(organisation) => Json(dto::OrganisationCreatedResponse::new(
            "organisation created successfully",
            organisation.id,
        ))
        .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn onboard(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::OnboardRequest>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => return errors::bad_request(rejection.body_text()),
    };

    let input = CreateOrganisation {
        name: body.name,
        logo_url: None,
    };
    match services.onboarding.create_organisation(input).await {
        Ok(organisation) => Json(dto::OrganisationCreatedResponse::new(
            "organisation onboarded successfully",
            organisation.id,
        ))
        .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn onboard_with_admin(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::OnboardWithAdminRequest>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => return errors::bad_request(rejection.body_text()),
    };

    match services.onboarding.onboard_with_admin(body.into()).await {
        Ok((organisation, _admin)) => Json(dto::OrganisationCreatedResponse::new(
            "organisation and admin user created successfully",
            organisation.id,
        ))
        .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::LoginRequest>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => return errors::bad_request(rejection.body_text()),
    };

    match services.onboarding.login(&body.email, &body.password).await {
        Ok(out) => Json(dto::LoginResponse::from(out)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    match services.organisations.current_user(principal.principal()).await {
        Ok(profile) => Json(profile).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_organisation(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    let id = match id.parse::<OrganisationId>() {
        Ok(id) => id,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()),
    };

    match services.organisations.get(principal.principal(), id).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_members(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    let id = match id.parse::<OrganisationId>() {
        Ok(id) => id,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()),
    };

    match services.organisations.members(principal.principal(), id).await {
        Ok(users) => Json(dto::MembersResponse { users }).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Multipart form with optional `name` text field and optional `logo` file.
pub async fn update_organisation(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    // Reject non-admins before looking at the body.
    if let Err(e) = authorize_manage(principal.principal()) {
        return errors::service_error_to_response(e.into());
    }
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => return errors::bad_request(rejection.body_text()),
    };

    let input = match read_update_form(multipart).await {
        Ok(input) => input,
        Err(response) => return response,
    };

    match services.organisations.update(principal.principal(), input).await {
        Ok(organisation) => Json(dto::OrganisationUpdatedResponse {
            success: true,
            message: "organisation updated successfully",
            organisation,
        })
        .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

async fn read_update_form(mut multipart: Multipart) -> Result<UpdateOrganisation, Response> {
    let mut input = UpdateOrganisation::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| errors::bad_request(e.body_text()))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => {
                let name = field.text().await.map_err(|e| errors::bad_request(e.body_text()))?;
                input.name = Some(name);
            }
            "logo" => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| errors::bad_request(e.body_text()))?;
                input.logo = Some(LogoUpload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok(input)
}
