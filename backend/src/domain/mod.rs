//! Domain layer: value types, services and the ports they depend on.
//!
//! Nothing in here knows about HTTP or SQL. Inbound adapters translate
//! requests into domain values and call driving ports; outbound adapters
//! implement the driven ports.

pub mod account_service;
pub mod auth;
pub mod catalogue_bootstrap;
pub mod choice;
pub mod choice_service;
pub mod demand_report;
pub mod error;
pub mod lab;
pub mod ports;
pub mod report_service;
pub mod student;
pub mod trace_id;

pub use self::account_service::AccountService;
pub use self::auth::{Credentials, CredentialsValidationError, PASSWORD_MAX_BYTES};
pub use self::catalogue_bootstrap::{CatalogueBootstrap, CatalogueBootstrapError};
pub use self::choice::{ChoiceValidationError, Priority, RankedChoices};
pub use self::choice_service::ChoiceService;
pub use self::demand_report::{ChoiceTally, DemandReport, LabDemand};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::lab::{Lab, LabId, LabValidationError, NewLab};
pub use self::report_service::DemandReportService;
pub use self::student::{
    PASSWORD_DIGEST_MAX, PasswordDigest, STUDENT_ID_MAX, Student, StudentId,
    StudentValidationError,
};
pub use self::trace_id::TraceId;
