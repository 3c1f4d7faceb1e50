//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`LoginService`, `RegistrationService`, `ChoiceSubmission`,
//! `ChoicesQuery`, `DemandReportQuery`) are called by inbound adapters.
//! Driven ports (`StudentRepository`, `LabRepository`, `ChoiceRepository`,
//! `CredentialHasher`) are implemented by outbound adapters and expose typed
//! errors instead of transport-specific ones.

mod macros;
pub(crate) use macros::define_port_error;

mod choice_repository;
mod choice_submission;
mod credential_hasher;
mod demand_report_query;
mod lab_repository;
mod login_service;
mod registration_service;
mod student_repository;

#[cfg(test)]
pub use choice_repository::MockChoiceRepository;
pub use choice_repository::{ChoiceRepository, ChoiceRepositoryError};
#[cfg(test)]
pub use choice_submission::{MockChoiceSubmission, MockChoicesQuery};
pub use choice_submission::{ChoiceSubmission, ChoicesQuery};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use demand_report_query::MockDemandReportQuery;
pub use demand_report_query::DemandReportQuery;
#[cfg(test)]
pub use lab_repository::MockLabRepository;
pub use lab_repository::{LabRepository, LabRepositoryError, SeedOutcome};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use registration_service::MockRegistrationService;
pub use registration_service::RegistrationService;
#[cfg(test)]
pub use student_repository::MockStudentRepository;
pub use student_repository::{StudentPersistenceError, StudentRepository};
