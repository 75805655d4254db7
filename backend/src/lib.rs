//! Townsquare backend: community directory service.
//!
//! Hexagonal layout: [`domain`] holds the model, services and ports,
//! [`inbound`] adapts HTTP requests onto the driving ports and [`outbound`]
//! implements the driven ports against PostgreSQL, Mapbox and Argon2.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
