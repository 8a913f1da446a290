//! Data models for the application
//!
//! Organized by domain: jobs, applications, users, file transfer and the
//! shared page envelope.

mod application;
mod file;
mod job;
mod pagination;
mod user;

pub use application::*;
pub use file::*;
pub use job::*;
pub use pagination::*;
pub use user::*;
