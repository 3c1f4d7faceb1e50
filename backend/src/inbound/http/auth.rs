//! Registration, login and logout handlers.
//!
//! ```text
//! POST /api/v1/register {"studentId":"s2024001","password":"..."}
//! POST /api/v1/login    {"studentId":"s2024001","password":"..."}
//! POST /api/v1/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{Credentials, CredentialsValidationError, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body shared by registration and login.
///
/// Missing fields deserialise as empty strings so they are reported by the
/// same validation as blank ones.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CredentialsRequest {
    pub student_id: String,
    pub password: String,
}

impl TryFrom<&CredentialsRequest> for Credentials {
    type Error = CredentialsValidationError;

    fn try_from(value: &CredentialsRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.student_id, &value.password)
    }
}

/// Body returned by a successful registration.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredResponse {
    pub student_id: String,
}

pub(crate) fn map_credentials_error(err: CredentialsValidationError) -> Error {
    let code = match &err {
        CredentialsValidationError::EmptyStudentId => "empty_student_id",
        CredentialsValidationError::InvalidStudentId(_) => "invalid_student_id",
        CredentialsValidationError::EmptyPassword => "empty_password",
        CredentialsValidationError::PasswordTooLong { .. } => "password_too_long",
    };
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": code }))
}

/// Create a student account.
///
/// Does not log the student in.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = RegisteredResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Student id already registered", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = Credentials::try_from(&*payload).map_err(map_credentials_error)?;
    let student_id = state.registration.register(&credentials).await?;
    Ok(HttpResponse::Created().json(RegisteredResponse {
        student_id: student_id.to_string(),
    }))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = Credentials::try_from(&*payload).map_err(map_credentials_error)?;
    let student_id = state.login.authenticate(&credentials).await?;
    session.persist_student(&student_id)?;
    Ok(HttpResponse::Ok().finish())
}

/// End the session. Succeeds whether or not one existed.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}
