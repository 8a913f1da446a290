//! Hireboard API Library
//!
//! HTTP handlers, the principal middleware, file transfer services and
//! application setup.

mod api_doc;
mod handlers;

pub mod auth;
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

pub use api_doc::get_openapi_spec;
pub use error::{HttpAppError, ValidatedJson};
pub use state::AppState;
