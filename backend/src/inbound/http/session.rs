//! Session helpers so handlers deal in student ids, not cookies.
//!
//! The cookie carries only the authenticated student id. A missing, blank or
//! tampered value is treated as "not logged in".

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde_json::json;
use tracing::warn;

use crate::domain::{Error, StudentId};

pub(crate) const STUDENT_ID_KEY: &str = "student_id";

/// Front-end login page clients are sent to when a session is missing.
///
/// Served by the web front end, not by this service; see
/// [`crate::inbound::http::navigation`].
pub const LOGIN_PATH: &str = "/login";

/// Error returned when a protected operation has no authenticated student.
///
/// Carries a `redirect` hint so browser clients can navigate to the login
/// page.
#[must_use]
pub fn login_required() -> Error {
    Error::unauthorized("login required").with_details(json!({ "redirect": LOGIN_PATH }))
}

/// Wrapper exposing student-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap an Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Record `student` as the authenticated principal.
    ///
    /// The session is renewed first so a pre-login cookie cannot be reused.
    pub fn persist_student(&self, student: &StudentId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(STUDENT_ID_KEY, student.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Authenticated student, if any.
    pub fn student_id(&self) -> Result<Option<StudentId>, Error> {
        let raw = self
            .0
            .get::<String>(STUDENT_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|value| match StudentId::new(&value) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "invalid student id in session cookie");
                None
            }
        }))
    }

    /// Authenticated student or [`login_required`].
    pub fn require_student(&self) -> Result<StudentId, Error> {
        self.student_id()?.ok_or_else(login_required)
    }

    /// Forget the authenticated student and drop the cookie.
    ///
    /// Cookie sessions keep no server-side record, so a copy of the cookie
    /// captured earlier stays valid until its TTL expires.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
