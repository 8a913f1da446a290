//! Core types for the Hireboard job board.
//!
//! Domain models, configuration, the access policy table, list filter
//! normalization and the unified error type shared by every other crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod filter;
pub mod models;
pub mod policy;
pub mod validation;

pub use config::{BaseConfig, Config, OtelConfig, OtlpProtocol};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use filter::{ApplicationFilter, JobFilter, PageLimits};
pub use models::*;

/// Result type used throughout the workspace.
pub type Result<T> = std::result::Result<T, AppError>;
