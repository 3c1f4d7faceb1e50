//! Browser entry points that answer with redirects instead of JSON.
//!
//! The landing route sends each visitor to the page matching their state:
//! anonymous visitors to the login page, students without a ranking to the
//! submission page, everyone else to the dashboard.
//!
//! This service renders no pages. [`LOGIN_PATH`], [`REGISTER_CHOICES_PATH`]
//! and [`DASHBOARD_PATH`] are served by the web front end deployed on the
//! same origin, which drives the `/api/v1` routes. The paths here and the
//! `redirect` hint on 401 responses are the contract with that front end, so
//! changing one means changing both.

use actix_web::http::header;
use actix_web::{HttpResponse, get, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::session::{LOGIN_PATH, SessionContext};
use crate::inbound::http::state::HttpState;

/// Page for students who have not ranked labs yet.
pub const REGISTER_CHOICES_PATH: &str = "/register-choices";

/// Page showing the caller's ranking and the demand report.
pub const DASHBOARD_PATH: &str = "/dashboard";

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Redirect to login, submission or dashboard.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 303, description = "Redirect to the page matching the session state")),
    tags = ["navigation"],
    security([])
)]
#[get("/")]
pub async fn landing(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let Some(student) = session.student_id()? else {
        return Ok(see_other(LOGIN_PATH));
    };
    let target = match state.choices.current_choices(&student).await? {
        Some(_) => DASHBOARD_PATH,
        None => REGISTER_CHOICES_PATH,
    };
    Ok(see_other(target))
}

/// Clear the session and go back to the login page.
#[utoipa::path(
    get,
    path = "/logout",
    responses((status = 303, description = "Session cleared")),
    tags = ["navigation"],
    security([])
)]
#[get("/logout")]
pub async fn logout_redirect(session: SessionContext) -> HttpResponse {
    session.purge();
    see_other(LOGIN_PATH)
}
