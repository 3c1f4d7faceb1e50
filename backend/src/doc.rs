//! OpenAPI document for the HTTP API.
//!
//! Served by Swagger UI at `/docs` in debug builds and printed by the
//! `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::auth::{CredentialsRequest, RegisteredResponse};
use crate::inbound::http::dashboard::{
    ChoicesBody, DashboardResponse, LabDemandBody, LabReference, PriorityTotals,
    SubmitChoicesRequest,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "labrank API",
        description = "Student registration, lab ranking submission and demand reporting."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::dashboard::dashboard,
        crate::inbound::http::dashboard::submit_choices,
        crate::inbound::http::navigation::landing,
        crate::inbound::http::navigation::logout_redirect,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CredentialsRequest,
        RegisteredResponse,
        SubmitChoicesRequest,
        LabReference,
        ChoicesBody,
        LabDemandBody,
        PriorityTotals,
        DashboardResponse,
    )),
    tags(
        (name = "auth", description = "Registration and sessions"),
        (name = "dashboard", description = "Lab rankings and demand"),
        (name = "navigation", description = "Browser redirects"),
        (name = "health", description = "Orchestration probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn object_fields(doc: &utoipa::openapi::OpenApi, name: &str) -> Vec<String> {
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(name).expect("schema registered") {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected object schema for {name}"),
        }
    }

    #[rstest]
    fn error_schema_is_registered() {
        let fields = object_fields(&ApiDoc::openapi(), "Error");
        assert!(fields.iter().any(|f| f == "code"));
        assert!(fields.iter().any(|f| f == "traceId"));
    }

    #[rstest]
    fn dashboard_schema_lists_report_and_totals() {
        let fields = object_fields(&ApiDoc::openapi(), "DashboardResponse");
        for expected in ["choices", "report", "totals"] {
            assert!(fields.iter().any(|f| f == expected), "missing {expected}");
        }
    }

    #[rstest]
    #[case("/api/v1/register")]
    #[case("/api/v1/login")]
    #[case("/api/v1/dashboard")]
    #[case("/health/ready")]
    fn paths_are_documented(#[case] path: &str) {
        assert!(ApiDoc::openapi().paths.paths.contains_key(path));
    }
}
