//! HTTP inbound adapter exposing the JSON API and browser redirects.

pub mod auth;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod navigation;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

use actix_web::{HttpRequest, HttpResponse, web};

use crate::domain::Error;

/// JSON extractor settings that report malformed bodies in the standard
/// error envelope.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err, _req| {
            Error::invalid_request(format!("malformed JSON body: {err}")).into()
        })
}

/// Unmatched `/api/v1` paths answer in the error envelope, not an empty 404.
async fn unknown_api_route(req: HttpRequest) -> ApiResult<HttpResponse> {
    Err(Error::not_found(format!(
        "no API route for {} {}",
        req.method(),
        req.path()
    )))
}

/// Register every API route under `/api/v1` plus the browser entry points.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(json_config())
            .service(auth::register)
            .service(auth::login)
            .service(auth::logout)
            .service(dashboard::dashboard)
            .service(dashboard::submit_choices)
            .default_service(web::to(unknown_api_route)),
    )
    .service(navigation::landing)
    .service(navigation::logout_redirect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{MockPorts, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;

    #[rstest]
    #[actix_web::test]
    async fn malformed_json_uses_error_envelope() {
        let app = test::init_service(
            App::new()
                .app_data(MockPorts::default().into_state())
                .wrap(test_session_middleware())
                .configure(configure),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .insert_header(("content-type", "application/json"))
                .set_payload("{not json")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let error: Error = test::read_body_json(res).await;
        assert!(error.message().starts_with("malformed JSON body"));
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_api_routes_use_error_envelope() {
        let app = test::init_service(
            App::new()
                .app_data(MockPorts::default().into_state())
                .wrap(test_session_middleware())
                .configure(configure),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/labs").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let error: Error = test::read_body_json(res).await;
        assert_eq!(error.code(), crate::domain::ErrorCode::NotFound);
        assert_eq!(error.message(), "no API route for GET /api/v1/labs");
    }
}
