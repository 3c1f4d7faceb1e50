//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only ever see driving
//! ports, so they can be exercised against mocks or in-memory adapters.

use std::sync::Arc;

use crate::domain::ports::{
    ChoiceSubmission, ChoicesQuery, DemandReportQuery, LoginService, RegistrationService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub submission: Arc<dyn ChoiceSubmission>,
    pub choices: Arc<dyn ChoicesQuery>,
    pub report: Arc<dyn DemandReportQuery>,
}

/// Parameter object naming each port explicitly at construction sites.
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub submission: Arc<dyn ChoiceSubmission>,
    pub choices: Arc<dyn ChoicesQuery>,
    pub report: Arc<dyn DemandReportQuery>,
}

impl HttpState {
    /// Build state from a ports bundle.
    ///
    /// A single service value often implements several ports; clone its
    /// `Arc` into each slot.
    ///
    /// ```ignore
    /// let accounts = Arc::new(AccountService::new(students, hasher, clock));
    /// let choices = Arc::new(ChoiceService::new(choice_repo));
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: accounts.clone(),
    ///     registration: accounts,
    ///     submission: choices.clone(),
    ///     choices,
    ///     report: Arc::new(DemandReportService::new(labs, choice_repo)),
    /// });
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            registration,
            submission,
            choices,
            report,
        } = ports;
        Self {
            login,
            registration,
            submission,
            choices,
            report,
        }
    }
}
