//! Data access for jobs, applications and users.
//!
//! PostgreSQL repositories live under [`db`]; the `test-helpers` feature adds
//! an in-memory store implementing the same traits.

pub mod db;

#[cfg(any(test, feature = "test-helpers"))]
pub mod memory;

pub use db::{
    ApplicationRepository, ApplicationStore, JobRepository, JobStore, UserRepository, UserStore,
};
