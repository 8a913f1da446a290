pub mod applications;
pub mod fallback;
pub mod files;
pub mod health;
pub mod jobs;
