//! Ranking submission and demand report handlers.
//!
//! ```text
//! GET  /api/v1/dashboard
//! POST /api/v1/dashboard {"choice1":"3","choice2":"7","choice3":"12"}
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    ChoiceValidationError, DemandReport, Error, LabDemand, Priority, RankedChoices,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// A lab reference as submitted by a form or JSON client.
///
/// Any other JSON value (fractions, booleans, arrays) is kept so validation
/// can reject it as `invalid_choice` rather than failing the whole body.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum LabReference {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl LabReference {
    fn as_text(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(value) => value.clone(),
            Self::Other(value) => value.to_string(),
        }
    }
}

/// Submission body. Every field is optional so absence is reported as a
/// validation error naming the field.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(default)]
pub struct SubmitChoicesRequest {
    pub choice1: Option<LabReference>,
    pub choice2: Option<LabReference>,
    pub choice3: Option<LabReference>,
}

impl TryFrom<&SubmitChoicesRequest> for RankedChoices {
    type Error = ChoiceValidationError;

    fn try_from(value: &SubmitChoicesRequest) -> Result<Self, Self::Error> {
        let choice1 = value.choice1.as_ref().map(LabReference::as_text);
        let choice2 = value.choice2.as_ref().map(LabReference::as_text);
        let choice3 = value.choice3.as_ref().map(LabReference::as_text);
        Self::from_form(
            choice1.as_deref(),
            choice2.as_deref(),
            choice3.as_deref(),
        )
    }
}

/// A stored ranking.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ChoicesBody {
    pub choice1: i32,
    pub choice2: i32,
    pub choice3: i32,
}

impl From<RankedChoices> for ChoicesBody {
    fn from(value: RankedChoices) -> Self {
        Self {
            choice1: value.lab_for(Priority::First).get(),
            choice2: value.lab_for(Priority::Second).get(),
            choice3: value.lab_for(Priority::Third).get(),
        }
    }
}

/// One row of the demand report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LabDemandBody {
    pub lab_id: i32,
    pub name: String,
    pub staff: Option<String>,
    pub capacity: Option<u32>,
    pub first: u64,
    pub second: u64,
    pub third: u64,
}

impl From<&LabDemand> for LabDemandBody {
    fn from(value: &LabDemand) -> Self {
        let lab = value.lab();
        Self {
            lab_id: lab.id().get(),
            name: lab.name().to_owned(),
            staff: lab.staff().map(str::to_owned),
            capacity: lab.capacity().map(|capacity| capacity.get()),
            first: value.count(Priority::First),
            second: value.count(Priority::Second),
            third: value.count(Priority::Third),
        }
    }
}

/// Per-priority totals; each equals the number of submitting students.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
pub struct PriorityTotals {
    pub first: u64,
    pub second: u64,
    pub third: u64,
}

/// Dashboard payload: the caller's ranking plus the demand report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
pub struct DashboardResponse {
    pub choices: Option<ChoicesBody>,
    pub report: Vec<LabDemandBody>,
    pub totals: PriorityTotals,
}

impl DashboardResponse {
    fn new(choices: Option<RankedChoices>, report: &DemandReport) -> Self {
        Self {
            choices: choices.map(ChoicesBody::from),
            report: report.rows().iter().map(LabDemandBody::from).collect(),
            totals: PriorityTotals {
                first: report.total(Priority::First),
                second: report.total(Priority::Second),
                third: report.total(Priority::Third),
            },
        }
    }
}

fn map_choice_error(err: ChoiceValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(err.details())
}

/// The caller's ranking and the current demand report.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = DashboardResponse),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["dashboard"],
    operation_id = "getDashboard"
)]
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardResponse>> {
    let student = session.require_student()?;
    let choices = state.choices.current_choices(&student).await?;
    let report = state.report.demand_report().await?;
    Ok(web::Json(DashboardResponse::new(choices, &report)))
}

/// Submit or replace the caller's ranking.
#[utoipa::path(
    post,
    path = "/api/v1/dashboard",
    request_body = SubmitChoicesRequest,
    responses(
        (status = 200, description = "Stored ranking", body = ChoicesBody),
        (status = 400, description = "Invalid ranking", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["dashboard"],
    operation_id = "submitChoices"
)]
#[post("/dashboard")]
pub async fn submit_choices(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubmitChoicesRequest>,
) -> ApiResult<web::Json<ChoicesBody>> {
    let student = session.require_student()?;
    let ranked = RankedChoices::try_from(&*payload).map_err(map_choice_error)?;
    let stored = state.submission.submit(&student, ranked).await?;
    Ok(web::Json(ChoicesBody::from(stored)))
}
