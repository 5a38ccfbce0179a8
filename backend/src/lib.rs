//! Schedule generation service for clinic doctors.
//!
//! The crate is laid out hexagonally: scheduling rules live in [`domain`],
//! the REST surface in [`inbound`], and storage adapters in [`outbound`].

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
