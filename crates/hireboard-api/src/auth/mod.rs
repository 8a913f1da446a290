//! Principal resolution
//!
//! Callers identify themselves with the `X-Hireboard-User` header. The
//! middleware loads the user and stores a [`Principal`] in the request
//! extensions; handlers take it as an extractor.

pub mod middleware;
pub mod models;

pub use middleware::principal_middleware;
pub use models::Principal;
