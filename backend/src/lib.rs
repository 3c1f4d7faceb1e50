//! Lab preference service: students rank three labs, everyone reads demand.
//!
//! The crate follows a hexagonal layout. [`domain`] holds value types,
//! services and ports; [`inbound`] adapts HTTP onto the driving ports;
//! [`outbound`] implements the driven ports with Diesel and PBKDF2.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod startup;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
