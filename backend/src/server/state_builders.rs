//! Builds the HTTP state from repository adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use labrank::domain::{AccountService, ChoiceService, DemandReportService};
use labrank::inbound::http::state::{HttpState, HttpStatePorts};
use labrank::outbound::crypto::Pbkdf2Hasher;
use labrank::outbound::persistence::{
    DieselChoiceRepository, DieselLabRepository, DieselStudentRepository,
};

use super::ServerConfig;

/// Wire the Diesel adapters into the services behind each driving port.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let pool = &config.db_pool;
    let choice_repo = Arc::new(DieselChoiceRepository::new(pool.clone()));

    let accounts = Arc::new(AccountService::new(
        Arc::new(DieselStudentRepository::new(pool.clone())),
        Arc::new(Pbkdf2Hasher::new(config.hash_rounds)),
        Arc::new(DefaultClock),
    ));
    let choices = Arc::new(ChoiceService::new(Arc::clone(&choice_repo)));
    let report = Arc::new(DemandReportService::new(
        Arc::new(DieselLabRepository::new(pool.clone())),
        choice_repo,
    ));

    web::Data::new(HttpState::new(HttpStatePorts {
        login: accounts.clone(),
        registration: accounts,
        submission: choices.clone(),
        choices,
        report,
    }))
}
