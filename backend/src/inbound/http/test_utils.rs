//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::web;
use std::sync::Arc;

use crate::domain::ports::{
    MockChoiceSubmission, MockChoicesQuery, MockDemandReportQuery, MockLoginService,
    MockRegistrationService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Cookie name used by the session middleware.
pub const SESSION_COOKIE: &str = "session";

/// Session middleware with a fresh key and the `Secure` flag off for plain
/// HTTP test requests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Session cookie set by `response`, if any.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
}

/// Mocked driving ports for handler tests; unused ports stay unconfigured
/// and panic if called.
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub registration: MockRegistrationService,
    pub submission: MockChoiceSubmission,
    pub choices: MockChoicesQuery,
    pub report: MockDemandReportQuery,
}

impl MockPorts {
    /// Wrap the mocks into handler state.
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            login: Arc::new(self.login),
            registration: Arc::new(self.registration),
            submission: Arc::new(self.submission),
            choices: Arc::new(self.choices),
            report: Arc::new(self.report),
        }))
    }
}
