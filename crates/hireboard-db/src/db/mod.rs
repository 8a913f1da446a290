//! Database repositories
//!
//! Each repository owns one table and implements the matching store trait so
//! handlers can be exercised against other backends.

pub mod applications;
pub mod cursor;
pub mod jobs;
pub mod store;
pub mod users;

pub use applications::ApplicationRepository;
pub use jobs::JobRepository;
pub use store::{ApplicationStore, JobStore, UserStore};
pub use users::UserRepository;
