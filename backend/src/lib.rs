//! Backend library modules.

pub mod doc;
pub mod domain;
mod files;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod roster;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
